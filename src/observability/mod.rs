//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! engine / middleware / server produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (override counters)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Overrides log at debug level; nothing on the request path logs above it
//! - Metrics are cheap counter increments with two low-cardinality labels

pub mod logging;
pub mod metrics;
