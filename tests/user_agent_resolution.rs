//! End-to-end resolution through the service router.

use axum::http::StatusCode;
use tower::ServiceExt;

use agent_resolver::config::ServiceConfig;
use agent_resolver::{HttpServer, ResolverConfig};

mod common;

fn server(user_agent: ResolverConfig) -> HttpServer {
    HttpServer::new(ServiceConfig {
        user_agent,
        ..ServiceConfig::default()
    })
}

#[tokio::test]
async fn test_default_config_ignores_proxy_header() {
    let app = server(ResolverConfig::default()).router();
    let req = common::request(Some("curl/7.68"), &[("X-User-Agent", "Evil/1.0")]);

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = common::json_body(resp).await;
    assert_eq!(body["attribute"], "user_agent");
    assert_eq!(body["user_agent"], "curl/7.68");
}

#[tokio::test]
async fn test_proxy_header_overrides_when_enabled() {
    let app = server(ResolverConfig::default().with_proxy_headers(true)).router();
    let req = common::request(Some("curl/7.68"), &[("X-User-Agent", "Real/2.0, extra")]);

    let body = common::json_body(app.oneshot(req).await.unwrap()).await;
    assert_eq!(body["user_agent"], "Real/2.0");
}

#[tokio::test]
async fn test_trusted_proxy_gate() {
    let config = ResolverConfig::default()
        .with_proxy_headers(true)
        .with_trusted_proxies(["edge-proxy/1.0"]);
    let app = server(config).router();

    let trusted = common::request(Some("edge-proxy/1.0"), &[("X-User-Agent", "Real/2.0")]);
    let body = common::json_body(app.clone().oneshot(trusted).await.unwrap()).await;
    assert_eq!(body["user_agent"], "Real/2.0");

    let untrusted = common::request(Some("curl/7.68"), &[("X-User-Agent", "Real/2.0")]);
    let body = common::json_body(app.oneshot(untrusted).await.unwrap()).await;
    assert_eq!(body["user_agent"], "curl/7.68");
}

#[tokio::test]
async fn test_header_priority_and_custom_attribute() {
    let config = ResolverConfig::default()
        .with_proxy_headers(true)
        .with_attribute_name("client_ua")
        .with_headers(["X-Forwarded-UA", "X-User-Agent"]);
    let app = server(config).router();

    let req = common::request(Some("curl/7.68"), &[("X-User-Agent", "  Foo/1.0 , Bar/2.0")]);
    let body = common::json_body(app.oneshot(req).await.unwrap()).await;
    assert_eq!(body["attribute"], "client_ua");
    assert_eq!(body["user_agent"], "Foo/1.0");
}

#[tokio::test]
async fn test_missing_user_agent_resolves_empty() {
    let app = server(ResolverConfig::default()).router();

    let body = common::json_body(app.oneshot(common::request(None, &[])).await.unwrap()).await;
    assert_eq!(body["user_agent"], "");
}

#[tokio::test]
async fn test_served_over_tcp_with_request_id() {
    let addr = common::spawn_server(ServiceConfig {
        user_agent: ResolverConfig::default().with_proxy_headers(true),
        ..ServiceConfig::default()
    })
    .await;

    let response = common::raw_request(
        addr,
        "GET /anything HTTP/1.1\r\n\
         Host: localhost\r\n\
         User-Agent: curl/7.68\r\n\
         X-User-Agent: Real/2.0\r\n\
         Connection: close\r\n\r\n",
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.to_ascii_lowercase().contains("x-request-id:"));
    assert!(response.contains(r#""user_agent":"Real/2.0""#));
}
