//! Getter construction.
//!
//! # Responsibilities
//! - Turn a configured source (name or function) into a getter
//! - Header getters record their header in `Vary` on every call
//! - Query getters return the raw mapped value without side effects
//!
//! # Design Decisions
//! - A name starting with `X-` (any case) selects a header, anything else a
//!   query key
//! - Getters capture only their configured name, so one getter is shared by
//!   all concurrent requests
//! - Custom functions are stored as given and called as given

use std::fmt;
use std::sync::Arc;

use axum::http::HeaderName;

use crate::method_override::error::OverrideError;
use crate::method_override::value::ParamValue;
use crate::method_override::view::{RequestView, ResponseView};

/// Header consulted when no source is configured.
pub const DEFAULT_HEADER: &str = "X-HTTP-Method-Override";

/// A caller-supplied extraction function.
pub type ExtractorFn =
    Arc<dyn Fn(&dyn RequestView, &mut dyn ResponseView) -> Option<ParamValue> + Send + Sync>;

/// Where a candidate method is looked up.
#[derive(Clone)]
pub enum Source {
    /// A header name (`X-` prefix) or a query key.
    Named(String),
    /// An arbitrary extractor.
    Function(ExtractorFn),
}

impl Source {
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&dyn RequestView, &mut dyn ResponseView) -> Option<ParamValue> + Send + Sync + 'static,
    {
        Source::Function(Arc::new(f))
    }
}

impl Default for Source {
    fn default() -> Self {
        Source::Named(DEFAULT_HEADER.to_string())
    }
}

impl From<&str> for Source {
    fn from(name: &str) -> Self {
        Source::Named(name.to_string())
    }
}

impl From<String> for Source {
    fn from(name: String) -> Self {
        Source::Named(name)
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Source::Function(_) => f.debug_tuple("Function").finish(),
        }
    }
}

/// Extracts a candidate method from a request/response pair.
#[derive(Clone)]
pub enum Getter {
    Header(HeaderGetter),
    Query(QueryGetter),
    Function(ExtractorFn),
}

impl Getter {
    pub fn get(&self, req: &dyn RequestView, res: &mut dyn ResponseView) -> Option<ParamValue> {
        match self {
            Getter::Header(getter) => getter.get(req, res),
            Getter::Query(getter) => getter.get(req),
            Getter::Function(f) => f(req, res),
        }
    }

    /// Header getters are the only ones that touch `Vary`.
    pub fn is_header(&self) -> bool {
        matches!(self, Getter::Header(_))
    }
}

impl Default for Getter {
    fn default() -> Self {
        Getter::Header(HeaderGetter {
            name: DEFAULT_HEADER.to_string(),
        })
    }
}

impl fmt::Debug for Getter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Getter::Header(g) => f.debug_tuple("Header").field(&g.name).finish(),
            Getter::Query(g) => f.debug_tuple("Query").field(&g.key).finish(),
            Getter::Function(_) => f.debug_tuple("Function").finish(),
        }
    }
}

/// Reads the first comma-separated value of a header.
#[derive(Debug, Clone)]
pub struct HeaderGetter {
    name: String,
}

impl HeaderGetter {
    pub fn new(name: impl Into<String>) -> Result<Self, OverrideError> {
        let name = name.into();
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            return Err(OverrideError::InvalidHeaderName(name));
        }
        Ok(Self { name })
    }

    /// The header name exactly as configured.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, req: &dyn RequestView, res: &mut dyn ResponseView) -> Option<ParamValue> {
        // Recorded even when the header is absent: the response still varies on it.
        res.vary(&self.name);

        let header = req.header(&self.name)?;
        if header.is_empty() {
            return None;
        }

        let first = match header.find(',') {
            Some(index) => &header[..index],
            None => &header[..],
        };
        Some(ParamValue::One(first.trim().to_string()))
    }
}

/// Returns the raw query value under a key.
#[derive(Debug, Clone)]
pub struct QueryGetter {
    key: String,
}

impl QueryGetter {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn get(&self, req: &dyn RequestView) -> Option<ParamValue> {
        req.query(&self.key).cloned()
    }
}

/// Build the getter for a configured source.
///
/// An empty name falls back to [`DEFAULT_HEADER`].
pub fn build_getter(source: Source) -> Result<Getter, OverrideError> {
    match source {
        Source::Function(f) => Ok(Getter::Function(f)),
        Source::Named(name) if name.is_empty() => {
            Ok(Getter::Header(HeaderGetter::new(DEFAULT_HEADER)?))
        }
        Source::Named(name) if is_header_name(&name) => Ok(Getter::Header(HeaderGetter::new(name)?)),
        Source::Named(name) => Ok(Getter::Query(QueryGetter::new(name))),
    }
}

fn is_header_name(name: &str) -> bool {
    name.as_bytes()
        .get(..2)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(b"X-"))
}
