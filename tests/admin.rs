//! Admin API over HTTP.

use reqwest::StatusCode;
use serde_json::Value;

mod common;

use common::{client, config, TestServer, API_KEY, ROUTES};

async fn admin_get(server: &TestServer, path: &str) -> Value {
    let res = client()
        .get(server.url(path))
        .bearer_auth(API_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK, "GET {path}");
    res.json().await.unwrap()
}

#[tokio::test]
async fn test_requires_api_key() {
    let server = TestServer::start(config(ROUTES)).await;
    let client = client();

    let res = client.get(server.url("/_admin/status")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(server.url("/_admin/routes"))
        .bearer_auth("wrong")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_status() {
    let server = TestServer::start(config(ROUTES)).await;

    let status = admin_get(&server, "/_admin/status").await;
    assert_eq!(status["status"], "operational");
    assert_eq!(status["routes"], 9);
    assert_eq!(status["max_params"], 2);
    assert_eq!(status["reloads"], 0);
}

#[tokio::test]
async fn test_routes_in_registration_order() {
    let server = TestServer::start(config(ROUTES)).await;

    let routes = admin_get(&server, "/_admin/routes").await;
    let routes = routes.as_array().unwrap();
    assert_eq!(routes.len(), 9);
    assert_eq!(
        routes[0],
        serde_json::json!({"method": "GET", "path": "/", "name": "home"})
    );
    assert_eq!(
        routes[8],
        serde_json::json!({"method": "GET", "path": "/api/v1/items/:item", "name": "item"})
    );
}

#[tokio::test]
async fn test_match() {
    let server = TestServer::start(config(ROUTES)).await;

    let report = admin_get(&server, "/_admin/match?path=/users/me").await;
    assert_eq!(report["outcome"], "found");
    assert_eq!(report["route"], "me");

    let report = admin_get(&server, "/_admin/match?method=PUT&path=/users/9").await;
    assert_eq!(report["route"], "user");
    assert_eq!(report["params"]["id"], "9");

    let report = admin_get(&server, "/_admin/match?method=DELETE&path=/users/9").await;
    assert_eq!(report["outcome"], "method_not_allowed");
    assert_eq!(report["allowed"], serde_json::json!(["GET", "PUT"]));

    let report = admin_get(&server, "/_admin/match?path=/missing").await;
    assert_eq!(report["outcome"], "not_found");
}

#[tokio::test]
async fn test_disabled_admin_is_not_mounted() {
    let mut config = config(ROUTES);
    config.admin.enabled = false;
    let server = TestServer::start(config).await;

    let res = client()
        .get(server.url("/_admin/status"))
        .bearer_auth(API_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
