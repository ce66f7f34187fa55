//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Attribute name used when none is configured.
pub const DEFAULT_ATTRIBUTE_NAME: &str = "user_agent";

/// Proxy override header inspected when none is configured.
pub const DEFAULT_PROXY_HEADER: &str = "X-User-Agent";

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// User-agent resolution policy.
    pub user_agent: ResolverConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// User-agent resolution policy.
///
/// Built once and shared read-only by every request.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResolverConfig {
    /// Whether proxy override headers are ever consulted.
    pub check_proxy_headers: bool,

    /// If non-empty, the direct user-agent must be a member for proxy
    /// headers to be consulted.
    pub trusted_proxies: HashSet<String>,

    /// Request attribute that receives the resolved value.
    pub attribute_name: String,

    /// Candidate override headers, checked in order.
    pub headers_to_inspect: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            check_proxy_headers: false,
            trusted_proxies: HashSet::new(),
            attribute_name: DEFAULT_ATTRIBUTE_NAME.to_string(),
            headers_to_inspect: vec![DEFAULT_PROXY_HEADER.to_string()],
        }
    }
}

impl ResolverConfig {
    /// Enable or disable proxy header inspection.
    pub fn with_proxy_headers(mut self, enabled: bool) -> Self {
        self.check_proxy_headers = enabled;
        self
    }

    /// Replace the trusted proxy set.
    pub fn with_trusted_proxies<I, T>(mut self, proxies: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.trusted_proxies = proxies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_attribute_name(mut self, name: impl Into<String>) -> Self {
        self.attribute_name = name.into();
        self
    }

    /// Replace the ordered list of override headers.
    pub fn with_headers<I, T>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.headers_to_inspect = headers.into_iter().map(Into::into).collect();
        self
    }

    /// Fill empty fields with their defaults.
    ///
    /// An empty attribute name or header list means "not configured".
    pub fn normalized(mut self) -> Self {
        if self.attribute_name.is_empty() {
            self.attribute_name = DEFAULT_ATTRIBUTE_NAME.to_string();
        }
        if self.headers_to_inspect.is_empty() {
            self.headers_to_inspect = vec![DEFAULT_PROXY_HEADER.to_string()];
        }
        self
    }
}
