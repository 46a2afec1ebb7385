//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use method_override::http::EchoResponse;
use method_override::{HttpServer, MethodOverride, ServerConfig, Shutdown};
use tower::ServiceExt;

/// Send one request through the full service stack without a socket.
pub async fn send(server: &HttpServer, request: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = server.service().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, body.to_vec())
}

/// Send a request to the echo handler and decode its reply.
#[allow(dead_code)]
pub async fn echo(server: &HttpServer, request: Request<Body>) -> (HeaderMap, EchoResponse) {
    let (status, headers, body) = send(server, request).await;
    assert_eq!(status, StatusCode::OK);
    (headers, serde_json::from_slice(&body).unwrap())
}

/// Server with the given `[override]` source and default everything else.
#[allow(dead_code)]
pub fn server_with_source(source: &str) -> HttpServer {
    let mut config = ServerConfig::default();
    config.method_override.source = source.to_string();
    HttpServer::new(config).unwrap()
}

#[allow(dead_code)]
pub fn server_with_engine(engine: MethodOverride) -> HttpServer {
    HttpServer::with_engine(ServerConfig::default(), engine)
}

/// Start a server on an ephemeral port.
#[allow(dead_code)]
pub async fn start_server(server: HttpServer) -> (SocketAddr, Shutdown, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    let handle = tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Give the accept loop a moment to start
    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown, handle)
}
