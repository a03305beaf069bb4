//! Concurrent load against the router, with and without reloads.

use std::time::{Duration, Instant};

use reqwest::StatusCode;

mod common;

use common::{client, config, TestServer, ROUTES};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_lookups() {
    let server = TestServer::start(config(ROUTES)).await;
    let client = client();
    let start = Instant::now();

    let mut tasks = Vec::new();
    for task in 0..20 {
        let client = client.clone();
        let base = server.url("");
        tasks.push(tokio::spawn(async move {
            for i in 0..25 {
                let id = task * 100 + i;
                let res = client
                    .get(format!("{base}/users/{id}"))
                    .send()
                    .await
                    .unwrap();
                assert_eq!(res.status(), StatusCode::OK);
                assert_eq!(res.text().await.unwrap(), format!("user {id}"));
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    println!("500 requests in {:?}", start.elapsed());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_reload_under_load_serves_whole_tables() {
    let version = |v: &str| {
        config(&format!(
            r#"
            [[routes]]
            name = "version"
            path = "/version/:n"
            body = "{v} {{n}}"
            "#
        ))
    };
    let server = TestServer::start(version("v1")).await;
    let client = client();

    let base = server.url("");
    let reader = tokio::spawn(async move {
        let deadline = Instant::now() + Duration::from_millis(500);
        let mut seen = Vec::new();
        while Instant::now() < deadline {
            let res = client
                .get(format!("{base}/version/1"))
                .send()
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::OK);
            seen.push(res.text().await.unwrap());
        }
        seen
    });

    for i in 0..50 {
        let v = if i % 2 == 0 { "v2" } else { "v1" };
        server.updates.send(version(v)).unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let seen = reader.await.unwrap();
    assert!(!seen.is_empty());
    assert!(seen.iter().all(|body| body == "v1 1" || body == "v2 1"));
}
