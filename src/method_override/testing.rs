//! In-memory request/response views for unit tests.

use std::borrow::Cow;

use axum::http::Method;

use crate::method_override::value::{ParamValue, QueryMap};
use crate::method_override::view::{RequestView, ResponseView};

#[derive(Debug, Clone)]
pub struct TestRequest {
    pub method: Method,
    pub original_method: Option<Method>,
    pub headers: Vec<(String, String)>,
    pub query: QueryMap,
}

impl TestRequest {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            original_method: None,
            headers: Vec::new(),
            query: QueryMap::new(),
        }
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.append(key, value);
        self
    }
}

impl RequestView for TestRequest {
    fn method(&self) -> &Method {
        &self.method
    }

    fn set_method(&mut self, method: Method) {
        self.method = method;
    }

    fn original_method(&self) -> Option<&Method> {
        self.original_method.as_ref()
    }

    fn set_original_method(&mut self, method: Method) {
        self.original_method = Some(method);
    }

    fn header(&self, name: &str) -> Option<Cow<'_, str>> {
        let values: Vec<&str> = self
            .headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect();
        match values.len() {
            0 => None,
            1 => Some(Cow::Borrowed(values[0])),
            _ => Some(Cow::Owned(values.join(", "))),
        }
    }

    fn query(&self, key: &str) -> Option<&ParamValue> {
        self.query.get(key)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TestResponse {
    pub vary: Vec<String>,
}

impl ResponseView for TestResponse {
    fn vary(&mut self, field: &str) {
        if !self.vary.iter().any(|f| f.eq_ignore_ascii_case(field)) {
            self.vary.push(field.to_string());
        }
    }
}
