//! HTTP host integration.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum::serve)
//!     → middleware.rs (MethodOverrideService or method_override_middleware)
//!         → request.rs (HttpRequestView: method, headers, query)
//!         → MethodOverride::resolve
//!         → response.rs (VaryFields collected)
//!     → Router (routes on the effective method)
//!     → middleware.rs merges Vary into the response
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use middleware::{method_override_middleware, MethodOverrideLayer, MethodOverrideService};
pub use request::{HttpRequestView, OriginalMethod, RequestOriginalMethodExt};
pub use response::{append_vary, VaryFields};
pub use server::{EchoResponse, HttpServer};
