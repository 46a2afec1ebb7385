//! Candidate values and the parsed query mapping.
//!
//! # Design Decisions
//! - A value is either a single string or the sequence produced when a
//!   transport collapses repeated keys
//! - Only the first element of a sequence is ever considered

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use axum::http::Uri;

/// A raw value pulled from a request: a single string or a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    One(String),
    Many(Vec<String>),
}

impl ParamValue {
    /// The value a candidate method is read from.
    ///
    /// An empty sequence yields `None`.
    pub fn first(&self) -> Option<&str> {
        match self {
            ParamValue::One(s) => Some(s.as_str()),
            ParamValue::Many(values) => values.first().map(String::as_str),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            ParamValue::One(existing) => {
                let existing = std::mem::take(existing);
                *self = ParamValue::Many(vec![existing, value]);
            }
            ParamValue::Many(values) => values.push(value),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::One(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::One(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::Many(values)
    }
}

/// Query parameters keyed by name.
///
/// Hosts that already parse the query string can insert a `QueryMap` into the
/// request extensions; the middleware then uses it instead of re-parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryMap {
    params: HashMap<String, ParamValue>,
}

impl QueryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` query string.
    ///
    /// Repeated keys collapse into [`ParamValue::Many`] in arrival order.
    pub fn parse(query: &str) -> Self {
        let mut map = Self::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            map.append(key.into_owned(), value.into_owned());
        }
        map
    }

    /// Parse the query component of a URI; no query means an empty map.
    pub fn from_uri(uri: &Uri) -> Self {
        uri.query().map(Self::parse).unwrap_or_default()
    }

    /// Add a value under `key`, turning an existing entry into a sequence.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        match self.params.entry(key.into()) {
            Entry::Occupied(mut entry) => entry.get_mut().push(value),
            Entry::Vacant(entry) => {
                entry.insert(ParamValue::One(value));
            }
        }
    }

    /// Replace whatever is stored under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.params.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
