//! Tower and axum integration.
//!
//! # Responsibilities
//! - Run the override engine before the wrapped service sees the request
//! - Offer the same step as an `axum::middleware::from_fn_with_state` function
//! - Merge `Vary` fields into whatever response the wrapped service returns
//! - Count successful overrides
//!
//! # Design Decisions
//! - Routing depends on the effective method, so the layer must wrap the
//!   whole `Router` (`layer.layer(router)`), not be added with `Router::layer`.
//!   The same holds for `from_fn_with_state(engine, method_override_middleware)`
//! - The request is never rejected; errors come only from the inner service

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, Response};
use axum::middleware::Next;
use tower::{Layer, Service};

use crate::http::request::HttpRequestView;
use crate::http::response::VaryFields;
use crate::method_override::{MethodOverride, Outcome};
use crate::observability::metrics;

/// Applies a [`MethodOverride`] to every request.
#[derive(Debug, Clone)]
pub struct MethodOverrideLayer {
    engine: MethodOverride,
}

impl MethodOverrideLayer {
    pub fn new(engine: MethodOverride) -> Self {
        Self { engine }
    }
}

impl<S> Layer<S> for MethodOverrideLayer {
    type Service = MethodOverrideService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MethodOverrideService {
            inner,
            engine: self.engine.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MethodOverrideService<S> {
    inner: S,
    engine: MethodOverride,
}

/// Resolve the override in place and return the `Vary` fields it recorded.
fn resolve_request<B>(engine: &MethodOverride, request: &mut Request<B>) -> VaryFields {
    let mut vary = VaryFields::new();
    let outcome = {
        let mut view = HttpRequestView::new(request);
        engine.resolve(&mut view, &mut vary)
    };

    if let Outcome::Overridden { from, to } = &outcome {
        metrics::record_override(from, to);
    }
    vary
}

/// Function middleware form of [`MethodOverrideLayer`].
///
/// ```ignore
/// let app = axum::middleware::from_fn_with_state(engine, method_override_middleware)
///     .layer(router);
/// ```
pub async fn method_override_middleware(
    State(engine): State<MethodOverride>,
    mut request: Request<Body>,
    next: Next,
) -> Response<Body> {
    let vary = resolve_request(&engine, &mut request);
    let mut response = next.run(request).await;
    vary.apply(response.headers_mut());
    response
}

impl<S, B, ResBody> Service<Request<B>> for MethodOverrideService<S>
where
    S: Service<Request<B>, Response = Response<ResBody>>,
    S::Future: Send + 'static,
    S::Error: 'static,
    ResBody: 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<B>) -> Self::Future {
        let vary = resolve_request(&self.engine, &mut request);
        let future = self.inner.call(request);
        Box::pin(async move {
            let mut response = future.await?;
            vary.apply(response.headers_mut());
            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::VARY;
    use axum::http::{HeaderValue, Method};
    use axum::routing::post;
    use axum::Router;
    use std::convert::Infallible;
    use tower::{service_fn, ServiceExt};

    use crate::http::request::RequestOriginalMethodExt;

    async fn echo(req: Request<Body>) -> Result<Response<Body>, Infallible> {
        let body = format!("{} {}", req.original_method(), req.method());
        Ok(Response::new(Body::from(body)))
    }

    async fn body_text(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_layer_overrides_and_sets_vary() {
        let service = MethodOverrideLayer::new(MethodOverride::default()).layer(service_fn(echo));

        let request = Request::builder()
            .method(Method::POST)
            .header("X-HTTP-Method-Override", "delete")
            .body(Body::empty())
            .unwrap();
        let response = service.oneshot(request).await.unwrap();

        assert_eq!(
            response.headers().get(VARY).unwrap(),
            "X-HTTP-Method-Override"
        );
        assert_eq!(body_text(response).await, "POST DELETE");
    }

    #[tokio::test]
    async fn test_layer_preserves_existing_vary() {
        let inner = service_fn(|_req: Request<Body>| async {
            let mut response = Response::new(Body::empty());
            response
                .headers_mut()
                .insert(VARY, "Accept-Encoding".parse().unwrap());
            Ok::<_, Infallible>(response)
        });
        let service = MethodOverrideLayer::new(MethodOverride::default()).layer(inner);

        let request = Request::builder()
            .method(Method::POST)
            .body(Body::empty())
            .unwrap();
        let response = service.oneshot(request).await.unwrap();

        assert_eq!(
            response.headers().get(VARY).unwrap(),
            "Accept-Encoding, X-HTTP-Method-Override"
        );
    }

    #[tokio::test]
    async fn test_layer_query_source_leaves_vary_alone() {
        let engine = MethodOverride::new("_method").unwrap();
        let service = MethodOverrideLayer::new(engine).layer(service_fn(echo));

        let request = Request::builder()
            .method(Method::POST)
            .uri("/?_method=PUT")
            .body(Body::empty())
            .unwrap();
        let response = service.oneshot(request).await.unwrap();

        assert!(response.headers().get(VARY).is_none());
        assert_eq!(body_text(response).await, "POST PUT");
    }

    #[tokio::test]
    async fn test_layer_keeps_leading_token_before_non_ascii_bytes() {
        let service = MethodOverrideLayer::new(MethodOverride::default()).layer(service_fn(echo));

        let request = Request::builder()
            .method(Method::POST)
            .header(
                "X-HTTP-Method-Override",
                HeaderValue::from_bytes(b"DELETE, caf\xe9").unwrap(),
            )
            .body(Body::empty())
            .unwrap();
        let response = service.oneshot(request).await.unwrap();

        assert_eq!(body_text(response).await, "POST DELETE");
    }

    #[tokio::test]
    async fn test_from_fn_middleware_wraps_router() {
        let router = Router::new().route(
            "/resource",
            post(|| async { "create" }).delete(|| async { "delete" }),
        );
        let app = axum::middleware::from_fn_with_state(
            MethodOverride::default(),
            method_override_middleware,
        )
        .layer(router);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/resource")
            .header("X-HTTP-Method-Override", "delete")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(
            response.headers().get(VARY).unwrap(),
            "X-HTTP-Method-Override"
        );
        assert_eq!(body_text(response).await, "delete");

        let request = Request::builder()
            .method(Method::POST)
            .uri("/resource")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(body_text(response).await, "create");
    }
}
