//! Request-side adapter.
//!
//! # Responsibilities
//! - Expose an `axum::http::Request` to the override engine
//! - Keep the transport method in a request extension
//! - Provide the parsed query mapping (host-supplied or parsed from the URI)
//!
//! # Design Decisions
//! - Repeated header lines are joined with ", " before the engine sees them
//! - Header bytes outside visible ASCII are decoded as Latin-1, never dropped
//! - The URI query is parsed on first lookup only

use std::borrow::Cow;
use std::cell::OnceCell;
use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderValue, Method, Request};

use crate::method_override::{ParamValue, QueryMap, RequestView};

/// The method the request arrived with, before any override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalMethod(pub Method);

impl<S> FromRequestParts<S> for OriginalMethod
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<OriginalMethod>()
            .cloned()
            .unwrap_or_else(|| OriginalMethod(parts.method.clone())))
    }
}

/// Extension trait for reading the original method off a request.
pub trait RequestOriginalMethodExt {
    /// The transport method; the current method when no override ran.
    fn original_method(&self) -> &Method;
}

impl<B> RequestOriginalMethodExt for Request<B> {
    fn original_method(&self) -> &Method {
        self.extensions()
            .get::<OriginalMethod>()
            .map(|m| &m.0)
            .unwrap_or_else(|| self.method())
    }
}

/// [`RequestView`] over a borrowed `axum::http::Request`.
pub struct HttpRequestView<'a, B> {
    request: &'a mut Request<B>,
    parsed_query: OnceCell<QueryMap>,
}

impl<'a, B> HttpRequestView<'a, B> {
    pub fn new(request: &'a mut Request<B>) -> Self {
        Self {
            request,
            parsed_query: OnceCell::new(),
        }
    }

    fn query_map(&self) -> &QueryMap {
        if let Some(host_parsed) = self.request.extensions().get::<QueryMap>() {
            return host_parsed;
        }
        self.parsed_query
            .get_or_init(|| QueryMap::from_uri(self.request.uri()))
    }
}

fn decode_value(value: &HeaderValue) -> Cow<'_, str> {
    match value.to_str() {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(value.as_bytes().iter().map(|&b| b as char).collect()),
    }
}

impl<B> RequestView for HttpRequestView<'_, B> {
    fn method(&self) -> &Method {
        self.request.method()
    }

    fn set_method(&mut self, method: Method) {
        *self.request.method_mut() = method;
    }

    fn original_method(&self) -> Option<&Method> {
        self.request
            .extensions()
            .get::<OriginalMethod>()
            .map(|m| &m.0)
    }

    fn set_original_method(&mut self, method: Method) {
        self.request.extensions_mut().insert(OriginalMethod(method));
    }

    fn header(&self, name: &str) -> Option<Cow<'_, str>> {
        let mut values = self.request.headers().get_all(name).iter();

        let first = decode_value(values.next()?);
        match values.next() {
            None => Some(first),
            Some(second) => {
                let mut joined = format!("{}, {}", first, decode_value(second));
                for value in values {
                    joined.push_str(", ");
                    joined.push_str(&decode_value(value));
                }
                Some(Cow::Owned(joined))
            }
        }
    }

    fn query(&self, key: &str) -> Option<&ParamValue> {
        self.query_map().get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_header_lookup_joins_repeated_lines() {
        let mut req = Request::builder()
            .method(Method::POST)
            .header("X-HTTP-Method-Override", "DELETE")
            .header("x-http-method-override", "PUT")
            .body(Body::empty())
            .unwrap();
        let view = HttpRequestView::new(&mut req);

        assert_eq!(view.header("x-HTTP-method-override").as_deref(), Some("DELETE, PUT"));
        assert_eq!(view.header("X-Missing"), None);
        assert_eq!(view.header("not a header"), None);
    }

    #[test]
    fn test_header_bytes_outside_ascii_keep_leading_token() {
        let mut req = Request::builder()
            .method(Method::POST)
            .header(
                "X-HTTP-Method-Override",
                HeaderValue::from_bytes(b"DELETE, caf\xe9").unwrap(),
            )
            .body(Body::empty())
            .unwrap();
        let view = HttpRequestView::new(&mut req);

        assert_eq!(
            view.header("X-HTTP-Method-Override").as_deref(),
            Some("DELETE, caf\u{e9}")
        );
    }

    #[test]
    fn test_query_parsed_only_on_lookup() {
        let mut req = Request::builder()
            .uri("/?_method=PUT")
            .body(Body::empty())
            .unwrap();
        let view = HttpRequestView::new(&mut req);
        assert!(view.parsed_query.get().is_none());

        let _ = view.header("X-HTTP-Method-Override");
        assert!(view.parsed_query.get().is_none());

        assert_eq!(view.query("_method").and_then(ParamValue::first), Some("PUT"));
        assert!(view.parsed_query.get().is_some());
    }

    #[test]
    fn test_query_from_uri_or_extension() {
        let mut req = Request::builder()
            .uri("/?_method=DELETE&_method=PUT")
            .body(Body::empty())
            .unwrap();
        let view = HttpRequestView::new(&mut req);
        assert_eq!(view.query("_method").and_then(ParamValue::first), Some("DELETE"));

        let mut host_parsed = QueryMap::new();
        host_parsed.insert("_method", "PATCH");
        let mut req = Request::builder()
            .uri("/?_method=DELETE")
            .extension(host_parsed)
            .body(Body::empty())
            .unwrap();
        let view = HttpRequestView::new(&mut req);
        assert_eq!(view.query("_method").and_then(ParamValue::first), Some("PATCH"));
        assert!(view.parsed_query.get().is_none());
    }

    #[test]
    fn test_original_method_lives_in_extensions() {
        let mut req = Request::builder()
            .method(Method::POST)
            .body(Body::empty())
            .unwrap();
        assert_eq!(req.original_method(), &Method::POST);

        {
            let mut view = HttpRequestView::new(&mut req);
            assert_eq!(RequestView::original_method(&view), None);
            view.set_original_method(Method::POST);
            view.set_method(Method::DELETE);
        }

        assert_eq!(req.method(), &Method::DELETE);
        assert_eq!(req.original_method(), &Method::POST);
    }
}
