//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the echo handler
//! - Wire up middleware (tracing, timeout, status metrics, request ID, user-agent)
//! - Bind server to listener
//! - Graceful shutdown on Ctrl+C

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Json},
    routing::any,
    Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::middleware::UserAgentLayer;
use crate::http::request::RequestAttributes;
use crate::observability::metrics;
use crate::resolver::AgentResolver;

/// Request ID header set on requests and echoed on responses.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<AgentResolver>,
}

/// Body returned by the echo handler.
#[derive(Debug, Serialize)]
pub struct EchoResponse {
    pub attribute: String,
    pub user_agent: Option<String>,
}

/// HTTP server exposing the resolved user-agent.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServiceConfig) -> Self {
        let resolver = Arc::new(AgentResolver::new(config.user_agent.clone()));
        let router = Self::build_router(&config, resolver);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, resolver: Arc<AgentResolver>) -> Router {
        let x_request_id = axum::http::HeaderName::from_static(X_REQUEST_ID);
        let state = AppState {
            resolver: resolver.clone(),
        };

        Router::new()
            .route("/{*path}", any(echo_handler))
            .route("/", any(echo_handler))
            .with_state(state)
            .layer(UserAgentLayer::new(resolver))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(axum::middleware::map_response(metrics::record_status))
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
    }

    /// The configured router, for serving or driving directly in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            attribute = %self.config.user_agent.attribute_name,
            check_proxy_headers = self.config.user_agent.check_proxy_headers,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// Echo the resolved user-agent back to the client.
async fn echo_handler(
    State(state): State<AppState>,
    attributes: RequestAttributes,
    request: Request<axum::body::Body>,
) -> impl IntoResponse {
    let attribute = state.resolver.attribute_name().to_string();
    let user_agent = attributes.get(&attribute).map(str::to_string);

    tracing::debug!(
        method = %request.method(),
        path = %request.uri().path(),
        user_agent = ?user_agent,
        "Echoing resolved user-agent"
    );

    (
        StatusCode::OK,
        Json(EchoResponse {
            attribute,
            user_agent,
        }),
    )
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
