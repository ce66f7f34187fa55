//! User-agent resolution middleware.
//!
//! Two entry points over the same [`AgentResolver`]:
//! - [`UserAgentLayer`] for any tower stack over `http::Request<B>`
//! - [`user_agent_middleware`] for `axum::middleware::from_fn_with_state`

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tower::{Layer, Service};

use crate::resolver::AgentResolver;

/// Layer that attaches the resolved user-agent to every request.
#[derive(Debug, Clone)]
pub struct UserAgentLayer {
    resolver: Arc<AgentResolver>,
}

impl UserAgentLayer {
    pub fn new(resolver: Arc<AgentResolver>) -> Self {
        Self { resolver }
    }
}

impl<S> Layer<S> for UserAgentLayer {
    type Service = UserAgentService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        UserAgentService {
            inner,
            resolver: self.resolver.clone(),
        }
    }
}

/// Service produced by [`UserAgentLayer`].
#[derive(Debug, Clone)]
pub struct UserAgentService<S> {
    inner: S,
    resolver: Arc<AgentResolver>,
}

impl<S, B> Service<Request<B>> for UserAgentService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let req = self.resolver.annotate(req);
        self.inner.call(req)
    }
}

/// Middleware function form, for `from_fn_with_state`.
pub async fn user_agent_middleware(
    State(resolver): State<Arc<AgentResolver>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    next.run(resolver.annotate(req)).await
}
