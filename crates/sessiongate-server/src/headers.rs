// ABOUTME: Response shaper that stamps hardening and CORS headers on every response.
// ABOUTME: Wraps the auth gate so even 401 responses carry the full header set.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{HeaderMap, HeaderValue, Request, Response, StatusCode, header};
use axum::response::IntoResponse;
use tower::{Layer, Service};

const ALLOW_HEADERS: &str =
    "Accept, Content-Type, Content-Length, Accept-Encoding, X-CSRF-Token, Authorization";
const ALLOW_METHODS: &str = "POST, GET, OPTIONS, PUT, DELETE";

/// Insert the hardening and CORS headers into `headers`.
pub fn apply(headers: &mut HeaderMap, allow_origin: &HeaderValue) {
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::X_XSS_PROTECTION,
        HeaderValue::from_static("1; mode=block"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("same-origin"),
    );

    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin.clone());
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
}

/// CORS preflight: 204 with no body. The shaper layer supplies the headers.
pub async fn preflight() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

#[derive(Clone)]
pub struct SecurityHeadersLayer {
    allow_origin: HeaderValue,
}

impl SecurityHeadersLayer {
    pub fn new(allow_origin: HeaderValue) -> Self {
        Self { allow_origin }
    }
}

impl<S> Layer<S> for SecurityHeadersLayer {
    type Service = SecurityHeaders<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SecurityHeaders {
            inner,
            allow_origin: self.allow_origin.clone(),
        }
    }
}

#[derive(Clone)]
pub struct SecurityHeaders<S> {
    inner: S,
    allow_origin: HeaderValue,
}

impl<S> Service<Request<Body>> for SecurityHeaders<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let mut inner = self.inner.clone();
        let allow_origin = self.allow_origin.clone();
        Box::pin(async move {
            let mut resp = inner.call(req).await?;
            apply(resp.headers_mut(), &allow_origin);
            Ok(resp)
        })
    }
}
