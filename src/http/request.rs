//! Request views and request attributes.
//!
//! # Responsibilities
//! - Expose the direct user-agent and header lines of a request
//! - Carry string-keyed attributes attached by middleware
//! - Hand attributes to downstream handlers as an extractor
//!
//! # Design Decisions
//! - Attaching an attribute consumes the request and returns the annotated
//!   one, so no shared request is ever mutated in place
//! - Missing headers read as `None`, never as an error

use std::borrow::Cow;
use std::collections::HashMap;
use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{header::USER_AGENT, request::Parts, Request};

/// Read access to the parts of a request the resolver needs, plus a
/// wither for attaching attributes.
pub trait RequestView: Sized {
    /// User-agent reported by the connection itself, empty when absent.
    fn direct_user_agent(&self) -> Cow<'_, str>;

    /// Combined value of a header, or `None` when the header is absent.
    ///
    /// Multiple header lines are joined with `", "`.
    fn header_line(&self, name: &str) -> Option<String>;

    /// Return this request with one additional attribute set.
    fn with_attribute(self, name: &str, value: String) -> Self;
}

/// String-keyed attributes attached to a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestAttributes(HashMap<String, String>);

impl RequestAttributes {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<B> RequestView for Request<B> {
    fn direct_user_agent(&self) -> Cow<'_, str> {
        match self.headers().get(USER_AGENT) {
            Some(value) => String::from_utf8_lossy(value.as_bytes()),
            None => Cow::Borrowed(""),
        }
    }

    fn header_line(&self, name: &str) -> Option<String> {
        let mut values = self.headers().get_all(name).iter().peekable();
        values.peek()?;

        let line = values
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(", ");
        Some(line)
    }

    fn with_attribute(mut self, name: &str, value: String) -> Self {
        let mut attributes = self
            .extensions_mut()
            .remove::<RequestAttributes>()
            .unwrap_or_default();
        attributes.insert(name, value);
        self.extensions_mut().insert(attributes);
        self
    }
}

impl<S> FromRequestParts<S> for RequestAttributes
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestAttributes>()
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::HeaderValue;

    #[test]
    fn test_direct_user_agent() {
        let req = Request::builder()
            .header("User-Agent", "curl/7.68")
            .body(Body::empty())
            .unwrap();
        assert_eq!(req.direct_user_agent(), "curl/7.68");

        let bare = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(bare.direct_user_agent(), "");
    }

    #[test]
    fn test_direct_user_agent_keeps_non_ascii() {
        let req = Request::builder()
            .header(
                "User-Agent",
                HeaderValue::from_bytes("Agent/ü 1.0".as_bytes()).unwrap(),
            )
            .body(Body::empty())
            .unwrap();
        assert_eq!(req.direct_user_agent(), "Agent/ü 1.0");
    }

    #[test]
    fn test_header_line_joins_repeated_headers() {
        let req = Request::builder()
            .header("X-User-Agent", "First/1.0")
            .header("x-user-agent", "Second/2.0")
            .body(Body::empty())
            .unwrap();

        assert_eq!(
            req.header_line("X-User-Agent").as_deref(),
            Some("First/1.0, Second/2.0")
        );
        assert_eq!(req.header_line("X-Forwarded-UA"), None);
    }

    #[test]
    fn test_header_line_invalid_name_is_absent() {
        let req = Request::builder()
            .header("X-User-Agent", "Real/2.0")
            .body(Body::empty())
            .unwrap();
        assert_eq!(req.header_line("not a header"), None);
    }

    #[test]
    fn test_empty_header_is_present() {
        let req = Request::builder()
            .header("X-User-Agent", "")
            .body(Body::empty())
            .unwrap();
        assert_eq!(req.header_line("X-User-Agent").as_deref(), Some(""));
    }

    #[test]
    fn test_with_attribute_keeps_existing_attributes() {
        let req = Request::builder()
            .body(Body::empty())
            .unwrap()
            .with_attribute("tenant", "acme".to_string())
            .with_attribute("user_agent", "curl/7.68".to_string());

        let attributes = req.extensions().get::<RequestAttributes>().unwrap();
        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes.get("tenant"), Some("acme"));
        assert_eq!(attributes.get("user_agent"), Some("curl/7.68"));
    }

    #[tokio::test]
    async fn test_extractor_defaults_to_empty() {
        let (mut parts, _) = Request::builder().body(Body::empty()).unwrap().into_parts();
        let attributes = RequestAttributes::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(attributes.is_empty());
    }
}
