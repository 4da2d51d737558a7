use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use vpncheck_common::config::Config;
use vpncheck_server::{Server, ServerConfig, StatsStore, build_router};

use crate::fixtures::ListFiles;

fn server_config(files: &ListFiles) -> ServerConfig {
    ServerConfig {
        stats_path: files.ipv4_path().with_file_name("stats.json"),
        ..ServerConfig::default()
    }
}

async fn send(app: &axum::Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn startup_fails_without_lists() {
    let files = ListFiles::new();

    let result = Server::builder()
        .source(files.source())
        .server_config(server_config(&files))
        .build()
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn startup_fails_on_partial_load() {
    let files = ListFiles::new();
    files.write_ipv4(&["10.0.0.0/8"]);

    let result = Server::builder()
        .source(files.source())
        .server_config(server_config(&files))
        .build()
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn startup_succeeds_with_an_empty_ipv6_list() {
    let files = ListFiles::new();
    files.write_ipv4(&["10.0.0.0/8"]);
    files.write_ipv6(&[]);

    let server = Server::builder()
        .source(files.source())
        .server_config(server_config(&files))
        .build()
        .await
        .unwrap();
    let app = build_router(server.state().clone());

    let (_, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(body["rangeCount"], json!({"ipv4": 1, "ipv6": 0, "total": 1}));

    let (status, _) = send(&app, Method::GET, "/check/10.0.0.1", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, Method::GET, "/check/2001:db8::1", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn serves_after_startup() {
    let files = ListFiles::new();
    files.write_ipv4(&["10.0.0.0/8", "192.168.0.0/16"]);
    files.write_ipv6(&["2001:db8::/32"]);

    let server = Server::builder()
        .config(Config::default())
        .source(files.source())
        .server_config(server_config(&files))
        .build()
        .await
        .unwrap();
    let app = build_router(server.state().clone());

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["initialized"], true);
    assert_eq!(body["rangeCount"], json!({"ipv4": 2, "ipv6": 1, "total": 3}));

    let (_, body) = send(&app, Method::GET, "/check/10.20.30.40", None).await;
    assert_eq!(body["isVPN"], true);

    // Seeded from the default config.
    let (_, body) = send(&app, Method::GET, "/check/163.116.254.42", None).await;
    assert_eq!(body["isVPN"], true);

    let (_, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(body["name"], "VPN Detector API");
}

#[tokio::test]
async fn manual_refresh_picks_up_new_lists() {
    let files = ListFiles::new();
    files.write_ipv4(&["10.0.0.0/8"]);
    files.write_ipv6(&["2001:db8::/32"]);

    let server = Server::builder()
        .source(files.source())
        .server_config(server_config(&files))
        .build()
        .await
        .unwrap();
    let app = build_router(server.state().clone());

    let (_, body) = send(&app, Method::GET, "/check/172.16.0.1", None).await;
    assert_eq!(body["isVPN"], false);

    files.write_ipv4(&["172.16.0.0/12"]);
    let (status, body) = send(&app, Method::POST, "/refresh", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["warnings"], json!([]));

    let (_, body) = send(&app, Method::GET, "/check/172.16.0.1", None).await;
    assert_eq!(body["isVPN"], true);
    let (_, body) = send(&app, Method::GET, "/check/10.0.0.1", None).await;
    assert_eq!(body["isVPN"], false);

    files.remove_ipv4();
    let (status, body) = send(&app, Method::POST, "/refresh", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rangeCount"]["ipv4"], 1);
    assert_eq!(body["warnings"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn pings_persist_across_restarts() {
    let files = ListFiles::new();
    files.write_ipv4(&["10.0.0.0/8"]);
    files.write_ipv6(&["2001:db8::/32"]);
    let cfg = server_config(&files);

    let server = Server::builder()
        .source(files.source())
        .server_config(cfg.clone())
        .build()
        .await
        .unwrap();
    let app = build_router(server.state().clone());

    let (status, _) = send(
        &app,
        Method::POST,
        "/ping",
        Some(json!({"serverId": "lobby", "timestamp": 42, "online": 12})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(server.state().stats.flush().unwrap());

    let reloaded = StatsStore::load(&cfg.stats_path);
    assert_eq!(
        reloaded.get("lobby"),
        Some(json!({"serverId": "lobby", "timestamp": 42, "online": 12}))
    );
}
