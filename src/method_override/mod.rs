//! Method override subsystem.
//!
//! # Data Flow
//! ```text
//! Construction (once per pipeline):
//!     Source (header name / query key / function)
//!     → getter.rs (build_getter)
//!     → engine.rs (MethodOverride: getter + allow-list + recognized set)
//!
//! Per request:
//!     record original method
//!     → allow-list check (methods.rs)      ── ineligible ──┐
//!     → getter (may add to Vary)                          │
//!     → first value (value.rs)                            │
//!     → recognize + upper-case → set method               │
//!     → continue ◀────────────────────────────────────────┘
//! ```
//!
//! # Design Decisions
//! - The engine sees requests only through the traits in view.rs, so it is
//!   independent of any HTTP framework
//! - Construction can fail, resolution cannot

pub mod engine;
pub mod error;
pub mod getter;
pub mod methods;
pub mod value;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use engine::{MethodOverride, MethodOverrideBuilder, Outcome};
pub use error::OverrideError;
pub use getter::{build_getter, ExtractorFn, Getter, Source, DEFAULT_HEADER};
pub use methods::{AllowedMethods, RecognizedMethods};
pub use value::{ParamValue, QueryMap};
pub use view::{RequestView, ResponseView};
