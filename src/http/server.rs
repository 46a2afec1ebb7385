//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the demo handlers
//! - Wire up middleware (tracing, timeout)
//! - Wrap the whole router in the method override layer
//! - Serve until the shutdown signal fires

use std::time::Duration;

use axum::{
    extract::Request,
    http::{Method, Uri},
    routing::{any, get},
    Json, Router, ServiceExt,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::Layer;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::http::middleware::{MethodOverrideLayer, MethodOverrideService};
use crate::http::request::OriginalMethod;
use crate::lifecycle::shutdown;
use crate::method_override::{MethodOverride, OverrideError};

/// Body returned by the echo handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoResponse {
    /// Effective method after override.
    pub method: String,
    /// Method the request arrived with.
    pub original_method: String,
    pub path: String,
}

/// Demo HTTP server with method override applied ahead of routing.
pub struct HttpServer {
    app: MethodOverrideService<Router>,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a server, building the override engine from `config`.
    pub fn new(config: ServerConfig) -> Result<Self, OverrideError> {
        let engine = MethodOverride::from_config(&config.method_override)?;
        Ok(Self::with_engine(config, engine))
    }

    /// Create a server around an already built engine (e.g. one with a
    /// custom extractor function).
    pub fn with_engine(config: ServerConfig, engine: MethodOverride) -> Self {
        tracing::info!(
            getter = ?engine.getter(),
            allowed = %engine.allowed_methods(),
            "Method override configured"
        );

        let router = Self::build_router(&config);
        let app = MethodOverrideLayer::new(engine).layer(router);
        Self { app, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig) -> Router {
        Router::new()
            .route(
                "/resource",
                get(|| async { "show" })
                    .post(|| async { "create" })
                    .put(|| async { "replace" })
                    .patch(|| async { "update" })
                    .delete(|| async { "delete" }),
            )
            .route("/", any(echo_handler))
            .route("/{*path}", any(echo_handler))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// The full service, override layer included.
    pub fn service(&self) -> MethodOverrideService<Router> {
        self.app.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = ServiceExt::<Request>::into_make_service(self.app);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Echo the effective and original method.
async fn echo_handler(
    OriginalMethod(original): OriginalMethod,
    method: Method,
    uri: Uri,
) -> Json<EchoResponse> {
    tracing::debug!(method = %method, original_method = %original, path = %uri.path(), "Echo");
    Json(EchoResponse {
        method: method.to_string(),
        original_method: original.to_string(),
        path: uri.path().to_string(),
    })
}
