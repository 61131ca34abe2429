#![cfg(unix)]

mod common;

use common::{Fixture, EXAMPLE_PROGRAM, SUMMARY};
use futures_util::future::join_all;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tint_service::envelope::TIMEOUT_MESSAGE;
use tint_service::http_server;
use tint_service::state::AppState;
use tint_service::{Dispatcher, ExecutionResult, ServiceConfig};
use tokio::net::TcpListener;

async fn spawn_server(config: &ServiceConfig) -> SocketAddr {
    let dispatcher = Dispatcher::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(http_server::serve(
        listener,
        AppState::new(dispatcher),
        std::future::pending(),
    ));
    addr
}

#[tokio::test]
async fn start_reports_alive() {
    let fx = Fixture::new();
    let addr = spawn_server(&fx.config()).await;

    let body: Value = reqwest::get(format!("http://{}/api/start", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({"status": 200}));

    let health = reqwest::get(format!("http://{}/health", addr))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(health, "OK");
}

#[tokio::test]
async fn two_way_tm_example_end_to_end() {
    let fx = Fixture::new();
    let addr = spawn_server(&fx.config()).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{}/api/two-way-tm", addr))
        .json(&json!({"program": EXAMPLE_PROGRAM, "tests": "a b\n", "verbose": true}))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());

    let res: ExecutionResult = resp.json().await.unwrap();
    assert_eq!(res.status, 200);
    assert!(res.output.contains("Accepted."));
    assert!(res.output.ends_with(SUMMARY));
    assert!(fx.scratch_entries().is_empty());
}

#[tokio::test]
async fn routes_select_machine_type() {
    let fx = Fixture::new();
    let addr = spawn_server(&fx.config()).await;
    let client = reqwest::Client::new();

    for (route, mode) in [
        ("dfa", "dfa"),
        ("one-way-tm", "one-way-tm"),
        ("two-way-tm", "two-way-tm"),
    ] {
        let res: ExecutionResult = client
            .post(format!("http://{}/api/{}", addr, route))
            .json(&json!({"program": "ECHO", "tests": "a"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(res.status, 200);
        assert_eq!(res.output, format!("mode={} verbose=0\nECHO", mode));
    }
}

#[tokio::test]
async fn looping_program_gets_timeout_envelope() {
    let fx = Fixture::new();
    let mut config = fx.config();
    config.timeout = Duration::from_secs(1);
    let addr = spawn_server(&config).await;

    let start = Instant::now();
    let res: ExecutionResult = reqwest::Client::new()
        .post(format!("http://{}/api/dfa", addr))
        .json(&json!({"program": "LOOP", "tests": "a"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(res.status, 400);
    assert_eq!(res.output, TIMEOUT_MESSAGE);
    assert!(start.elapsed() < Duration::from_secs(2));
    assert!(fx.scratch_entries().is_empty());
}

#[tokio::test]
async fn malformed_body_is_rejected_before_dispatch() {
    let fx = Fixture::new();
    let addr = spawn_server(&fx.config()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{}/api/dfa", addr))
        .json(&json!({"program": "ECHO"}))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_client_error());

    let resp = client
        .post(format!("http://{}/api/dfa", addr))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
    assert!(fx.scratch_entries().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn fifty_concurrent_requests_all_succeed() {
    let fx = Fixture::new();
    let addr = spawn_server(&fx.config()).await;
    let client = reqwest::Client::new();

    let calls = (0..50).map(|_| {
        let client = client.clone();
        async move {
            client
                .post(format!("http://{}/api/one-way-tm", addr))
                .json(&json!({"program": EXAMPLE_PROGRAM, "tests": "a b\n", "verbose": false}))
                .send()
                .await
                .unwrap()
                .json::<ExecutionResult>()
                .await
                .unwrap()
        }
    });

    for res in join_all(calls).await {
        assert_eq!(res.status, 200);
        assert_eq!(res.output, format!("Accepted.\n\n{}", SUMMARY));
    }
    assert!(fx.scratch_entries().is_empty());
}
