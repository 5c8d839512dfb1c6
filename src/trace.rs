//! Access logging for page-level requests.
//!
//! Bundle assets under `/static/` and health probes get no span and are never
//! reported as failures.

use std::{fmt, time::Duration};

use axum::http::{Request, Response};
use tower_http::{
    LatencyUnit,
    classify::{
        ClassifiedResponse, ClassifyResponse, MakeClassifier, NeverClassifyEos, StatusInRangeAsFailures, StatusInRangeFailureClass,
    },
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, MakeSpan, OnRequest, OnResponse, TraceLayer},
};
use tracing::{Level, Span};

pub(super) fn access_log_layer() -> TraceLayer<AccessClassifier, AccessSpan, AccessLog, AccessLog> {
    TraceLayer::new(AccessClassifier)
        .make_span_with(AccessSpan)
        .on_request(AccessLog)
        .on_response(AccessLog)
}

fn is_quiet_path(path: &str) -> bool {
    path.starts_with("/static/") || path == "/health"
}

#[derive(Clone, Copy, Debug)]
pub(super) struct AccessSpan;

impl<B> MakeSpan<B> for AccessSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        if is_quiet_path(request.uri().path()) {
            Span::none()
        } else {
            DefaultMakeSpan::new().level(Level::INFO).make_span(request)
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(super) struct AccessLog;

impl<B> OnRequest<B> for AccessLog {
    fn on_request(&mut self, request: &Request<B>, span: &Span) {
        if !span.is_disabled() {
            DefaultOnRequest::new().level(Level::INFO).on_request(request, span);
        }
    }
}

impl<B> OnResponse<B> for AccessLog {
    fn on_response(self, response: &Response<B>, latency: Duration, span: &Span) {
        if !span.is_disabled() {
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis)
                .on_response(response, latency, span);
        }
    }
}

/// Decides per request whether 4xx/5xx responses count as failures.
#[derive(Clone, Copy, Debug)]
pub(super) struct AccessClassifier;

impl MakeClassifier for AccessClassifier {
    type Classifier = PathClassifier;
    type FailureClass = StatusInRangeFailureClass;
    type ClassifyEos = NeverClassifyEos<StatusInRangeFailureClass>;

    fn make_classifier<B>(&self, request: &Request<B>) -> PathClassifier {
        PathClassifier {
            quiet: is_quiet_path(request.uri().path()),
            statuses: StatusInRangeAsFailures::new(400..=599),
        }
    }
}

#[derive(Clone, Debug)]
pub(super) struct PathClassifier {
    quiet: bool,
    statuses: StatusInRangeAsFailures,
}

impl ClassifyResponse for PathClassifier {
    type FailureClass = StatusInRangeFailureClass;
    type ClassifyEos = NeverClassifyEos<StatusInRangeFailureClass>;

    fn classify_response<B>(self, response: &Response<B>) -> ClassifiedResponse<Self::FailureClass, Self::ClassifyEos> {
        if self.quiet {
            ClassifiedResponse::Ready(Ok(()))
        } else {
            self.statuses.classify_response(response)
        }
    }

    fn classify_error<E>(self, error: &E) -> Self::FailureClass
    where
        E: fmt::Display + 'static,
    {
        self.statuses.classify_error(error)
    }
}
