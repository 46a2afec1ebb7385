//! Response-side adapter.
//!
//! # Responsibilities
//! - Collect `Vary` fields while the request is being resolved
//! - Merge them into the response once the inner service produced it
//!
//! # Design Decisions
//! - Field names compare case-insensitively; the first spelling wins
//! - An existing `Vary: *` already covers every field
//! - Existing fields are kept as raw bytes, whatever their encoding

use axum::http::header::VARY;
use axum::http::{HeaderMap, HeaderValue};

use crate::method_override::ResponseView;

/// `Vary` fields recorded before the response exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VaryFields {
    fields: Vec<String>,
}

impl VaryFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    /// Merge every recorded field into `headers`.
    pub fn apply(&self, headers: &mut HeaderMap) {
        for field in &self.fields {
            append_vary(headers, field);
        }
    }
}

impl ResponseView for VaryFields {
    fn vary(&mut self, field: &str) {
        if !self.fields.iter().any(|f| f.eq_ignore_ascii_case(field)) {
            self.fields.push(field.to_string());
        }
    }
}

/// Add `field` to the `Vary` header unless it is already listed.
pub fn append_vary(headers: &mut HeaderMap, field: &str) {
    let existing: Vec<&[u8]> = headers
        .get_all(VARY)
        .iter()
        .flat_map(|v| v.as_bytes().split(|&b| b == b','))
        .map(<[u8]>::trim_ascii)
        .filter(|v| !v.is_empty())
        .collect();

    if existing
        .iter()
        .any(|v| *v == b"*" || v.eq_ignore_ascii_case(field.as_bytes()))
    {
        return;
    }

    let mut merged = Vec::new();
    if field != "*" {
        for token in &existing {
            merged.extend_from_slice(token);
            merged.extend_from_slice(b", ");
        }
    }
    merged.extend_from_slice(field.as_bytes());

    match HeaderValue::from_bytes(&merged) {
        Ok(value) => {
            headers.insert(VARY, value);
        }
        Err(e) => {
            tracing::warn!(field = %field, error = %e, "Cannot set Vary header");
        }
    }
}
