//! Request and response views the engine operates on.
//!
//! The host owns both objects; the engine only borrows them for the duration
//! of a single resolution. Both traits are object safe so extractor functions
//! can take them as trait objects.

use std::borrow::Cow;

use axum::http::Method;

use crate::method_override::value::ParamValue;

/// Read/write access to the parts of a request the engine needs.
pub trait RequestView {
    /// The current effective method.
    fn method(&self) -> &Method;

    fn set_method(&mut self, method: Method);

    /// The transport method as received, once recorded.
    fn original_method(&self) -> Option<&Method>;

    fn set_original_method(&mut self, method: Method);

    /// Case-insensitive header lookup.
    ///
    /// Repeated header lines are joined with `", "`.
    fn header(&self, name: &str) -> Option<Cow<'_, str>>;

    /// Query parameter lookup.
    fn query(&self, key: &str) -> Option<&ParamValue>;
}

/// The response side: only the `Vary` header is ever touched.
pub trait ResponseView {
    /// Add `field` to `Vary`. Adding a field that is already present is a no-op.
    fn vary(&mut self, field: &str);
}
