//! Request middleware.

pub mod user_agent;

pub use user_agent::{user_agent_middleware, UserAgentLayer, UserAgentService};
