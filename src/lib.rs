//! Client user-agent resolution for HTTP request pipelines.
//!
//! Decides a request's effective user-agent, honoring proxy override
//! headers only when configured and trusted, and attaches the result as
//! a request attribute for downstream handlers.

pub mod config;
pub mod http;
pub mod observability;
pub mod resolver;

pub use config::schema::{ResolverConfig, ServiceConfig};
pub use http::request::{RequestAttributes, RequestView};
pub use http::{HttpServer, UserAgentLayer};
pub use resolver::{AgentResolver, AgentSource, Chain, Resolution};
