//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → middleware/user_agent.rs (resolve and attach user-agent)
//!     → request.rs (RequestView, RequestAttributes)
//!     → echo handler
//! ```

pub mod middleware;
pub mod request;
pub mod server;

pub use middleware::{user_agent_middleware, UserAgentLayer, UserAgentService};
pub use request::{RequestAttributes, RequestView};
pub use server::{HttpServer, X_REQUEST_ID};
