//! Client user-agent resolution.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → direct user-agent (connection-reported)
//!     → trusted proxy gate (is the direct value in trusted_proxies?)
//!     → override headers, first present wins, first comma part, trimmed
//!     → attribute attached under attribute_name
//!     → Pass to next stage
//! ```
//!
//! # Design Decisions
//! - No trust in override headers unless explicitly enabled
//! - The trusted proxy gate compares against the direct user-agent string,
//!   not a network address
//! - Resolution never fails; the direct value is always the fallback

use std::fmt;

use crate::config::ResolverConfig;
use crate::http::request::RequestView;
use crate::observability::metrics;

/// Where a resolved user-agent came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentSource {
    /// The connection-reported user-agent.
    Direct,
    /// A proxy override header, by configured name.
    ProxyHeader(String),
}

impl AgentSource {
    /// Metric label for this source.
    pub fn label(&self) -> &'static str {
        match self {
            AgentSource::Direct => "direct",
            AgentSource::ProxyHeader(_) => "proxy_header",
        }
    }
}

impl fmt::Display for AgentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentSource::Direct => write!(f, "direct"),
            AgentSource::ProxyHeader(name) => write!(f, "header:{}", name),
        }
    }
}

/// A resolved user-agent and its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub user_agent: String,
    pub source: AgentSource,
}

/// The rest of a processing chain.
pub enum Chain<'a, R, Resp> {
    /// No further stage is registered.
    End,
    /// Next stage, called with the annotated request and the response.
    Next(Box<dyn FnOnce(R, Resp) -> Resp + Send + 'a>),
}

impl<'a, R, Resp> Chain<'a, R, Resp> {
    /// Wrap a closure as the next stage.
    pub fn next<F>(f: F) -> Self
    where
        F: FnOnce(R, Resp) -> Resp + Send + 'a,
    {
        Chain::Next(Box::new(f))
    }
}

impl<R, Resp> fmt::Debug for Chain<'_, R, Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chain::End => f.write_str("Chain::End"),
            Chain::Next(_) => f.write_str("Chain::Next(..)"),
        }
    }
}

/// Decides a request's user-agent and attaches it as a request attribute.
#[derive(Debug, Clone)]
pub struct AgentResolver {
    config: ResolverConfig,
}

impl AgentResolver {
    /// Create a resolver. Empty attribute name or header list fall back to
    /// their defaults.
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config: config.normalized(),
        }
    }

    /// The normalized configuration this resolver applies.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Name of the attribute the resolved value is attached under.
    pub fn attribute_name(&self) -> &str {
        &self.config.attribute_name
    }

    /// Resolve the user-agent for a request.
    pub fn resolve<R: RequestView>(&self, request: &R) -> String {
        self.resolve_with_source(request).user_agent
    }

    /// Resolve the user-agent and report which input it came from.
    pub fn resolve_with_source<R: RequestView>(&self, request: &R) -> Resolution {
        let direct = request.direct_user_agent();

        let mut check_proxy = self.config.check_proxy_headers;
        if check_proxy
            && !self.config.trusted_proxies.is_empty()
            && !self.config.trusted_proxies.contains(direct.as_ref())
        {
            tracing::trace!(
                user_agent = %direct,
                "Direct user-agent not trusted, ignoring proxy headers"
            );
            check_proxy = false;
        }

        if check_proxy {
            for header in &self.config.headers_to_inspect {
                if let Some(line) = request.header_line(header) {
                    return Resolution {
                        user_agent: first_value(&line).to_string(),
                        source: AgentSource::ProxyHeader(header.clone()),
                    };
                }
            }
        }

        Resolution {
            user_agent: direct.into_owned(),
            source: AgentSource::Direct,
        }
    }

    /// Resolve the user-agent and return the request with it attached.
    pub fn annotate<R: RequestView>(&self, request: R) -> R {
        let resolution = self.resolve_with_source(&request);

        tracing::debug!(
            attribute = %self.config.attribute_name,
            user_agent = %resolution.user_agent,
            source = %resolution.source,
            "Resolved client user-agent"
        );
        metrics::record_resolution(resolution.source.label());

        request.with_attribute(&self.config.attribute_name, resolution.user_agent)
    }

    /// Run this stage of a processing chain.
    ///
    /// With [`Chain::End`] the response comes back untouched and nothing is
    /// resolved. Otherwise the annotated request and the unchanged response
    /// are handed to the next stage and its response is returned.
    pub fn process<R, Resp>(&self, request: R, response: Resp, chain: Chain<'_, R, Resp>) -> Resp
    where
        R: RequestView,
    {
        match chain {
            Chain::End => response,
            Chain::Next(next) => next(self.annotate(request), response),
        }
    }
}

impl Default for AgentResolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

/// First comma-separated value of a header line, trimmed.
fn first_value(line: &str) -> &str {
    line.split(',').next().unwrap_or_default().trim()
}
