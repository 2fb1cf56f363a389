//! Shared helpers for the wiremock-backed integration tests

#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use liveengage::{FixedBackoff, RetryLimit, Session, SessionBuilder};
use serde_json::Value;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ACCOUNT: &str = "12345";

pub const INTERACTION_SEARCH: &str = "/interaction_history/api/account/12345/interactions/search";
pub const CONVERSATION_SEARCH: &str = "/messaging_history/api/account/12345/conversations/search";

/// Load a JSON response fixture, substituting `{{base_url}}` with the server URI.
pub fn load_response_fixture(name: &str, server: &MockServer) -> Value {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = Path::new(manifest_dir)
        .join("tests")
        .join("fixtures")
        .join("responses")
        .join(format!("{}.json", name));

    let raw = std::fs::read_to_string(&path).unwrap_or_else(|e| {
        panic!(
            "Failed to load response fixture '{}' from {:?}: {}",
            name, path, e
        )
    });
    let raw = raw
        .replace("{{base_url}}", &server.uri())
        .replace("{{host}}", &host(server));
    serde_json::from_str(&raw).unwrap_or_else(|e| panic!("Fixture '{}' is not JSON: {}", name, e))
}

/// `host:port` of the mock server, as discovery would report it.
pub fn host(server: &MockServer) -> String {
    server.address().to_string()
}

/// Builder preconfigured to talk plain HTTP to `server` with immediate retries.
pub fn builder(server: &MockServer) -> SessionBuilder {
    Session::builder()
        .account(ACCOUNT)
        .credentials("consumer-key", "consumer-secret", "token", "token-secret")
        .discovery_url(server.uri())
        .scheme("http")
        .backoff(FixedBackoff::immediate())
        .timeout(Duration::from_secs(5))
}

/// Session whose domain is already the mock server.
pub fn session(server: &MockServer, limit: RetryLimit) -> Session {
    builder(server)
        .domain(host(server))
        .retry_limit(limit)
        .build()
        .expect("session should build")
}

/// Mount a discovery answer for `service`, expected `times` times.
pub async fn mount_discovery(server: &MockServer, service: &str, times: u64) {
    let body = load_response_fixture("discovery", server)
        .to_string()
        .replace("{{service}}", service);
    Mock::given(method("GET"))
        .and(path(format!(
            "/api/account/{}/service/{}/baseURI.json",
            ACCOUNT, service
        )))
        .and(query_param("version", "1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(times)
        .mount(server)
        .await;
}

/// Mount the first page of an interaction search.
pub async fn mount_first_page(server: &MockServer, search_path: &str, fixture: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path(search_path))
        .and(query_param("limit", "50"))
        .and(query_param("offset", "0"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_response_fixture(fixture, server)),
        )
        .expect(times)
        .mount(server)
        .await;
}

/// Address of a port that refuses connections.
pub fn closed_port() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    addr.to_string()
}
