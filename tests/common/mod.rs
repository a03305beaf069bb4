//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::net::SocketAddr;

use radix_router::config::{parse_config, ServerConfig};
use radix_router::http::HttpServer;
use radix_router::lifecycle::Shutdown;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

pub const API_KEY: &str = "test-admin-key";

/// Routes shared by the HTTP tests.
pub const ROUTES: &str = r#"
[admin]
enabled = true
api_key = "test-admin-key"

[[routes]]
name = "home"
path = "/"
body = "home"

[[routes]]
name = "users"
methods = ["GET", "POST"]
path = "/users"
body = "users"

[[routes]]
name = "me"
path = "/users/me"
body = "me"

[[routes]]
name = "user"
methods = ["GET", "PUT"]
path = "/users/:id"
body = "user {id}"

[[routes]]
name = "user_file"
path = "/users/:id/files/*"

[[groups]]
prefix = "/api/v1"

[[groups.routes]]
name = "create_item"
methods = ["POST"]
path = "/items"
status = 201
body = '{"created":true}'
content_type = "application/json"

[[groups.routes]]
name = "item"
path = "/items/:item"
body = "item {item}"
"#;

pub fn config(text: &str) -> ServerConfig {
    parse_config(text).unwrap()
}

/// A server on an ephemeral port, stopped on drop.
pub struct TestServer {
    pub addr: SocketAddr,
    pub updates: mpsc::UnboundedSender<ServerConfig>,
    shutdown: Shutdown,
}

impl TestServer {
    pub async fn start(config: ServerConfig) -> Self {
        let server = HttpServer::new(&config).unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let server_shutdown = shutdown.subscribe();
        let (updates, config_updates) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let _ = server.run(listener, config_updates, server_shutdown).await;
        });

        Self {
            addr,
            updates,
            shutdown,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
