//! Request logging middleware configuration

use axum::body::Body;
use http::{Request, Response};
use std::time::Duration;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnRequest, TraceLayer};
use tracing::{info_span, Span};

type MakeSpanFn = fn(&Request<Body>) -> Span;
type OnResponseFn = fn(&Response<Body>, Duration, &Span);

pub fn logging_layer(
) -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, MakeSpanFn, DefaultOnRequest, OnResponseFn>
{
    TraceLayer::new_for_http()
        .make_span_with(make_request_span as MakeSpanFn)
        .on_response(log_response as OnResponseFn)
}

fn make_request_span(request: &Request<Body>) -> Span {
    info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
    )
}

fn log_response(response: &Response<Body>, latency: Duration, _span: &Span) {
    let status = response.status();
    let latency_ms = latency.as_millis() as u64;

    if status.is_success() {
        tracing::info!(
            status = status.as_u16(),
            latency_ms,
            "request completed successfully"
        );
    } else if status.is_client_error() {
        tracing::warn!(status = status.as_u16(), latency_ms, "client error response");
    } else {
        tracing::error!(status = status.as_u16(), latency_ms, "server error response");
    }
}
