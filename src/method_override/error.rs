//! Construction-time errors.
//!
//! Per-request resolution never fails; every bad input there degrades to
//! "no override". Only misconfiguration detected while building a getter or
//! engine is reported.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OverrideError {
    #[error("invalid header name for method override: {0:?}")]
    InvalidHeaderName(String),

    #[error("invalid method token in allow-list: {0:?}")]
    InvalidAllowedMethod(String),

    #[error("invalid extension method token: {0:?}")]
    InvalidExtensionMethod(String),
}
