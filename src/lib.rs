//! HTTP method override for axum/tower services.
//!
//! Lets a client constrained to one transport method (typically `POST` from an
//! HTML form) ask for another through a header, a query parameter or a custom
//! extractor. The override runs before routing, so handlers and method routers
//! see the effective method while the transport method stays available as
//! [`OriginalMethod`](http::OriginalMethod).

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod method_override;
pub mod observability;

pub use config::ServerConfig;
pub use http::{HttpServer, MethodOverrideLayer};
pub use lifecycle::Shutdown;
pub use method_override::{MethodOverride, Outcome};
