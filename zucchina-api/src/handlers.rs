//! API request handlers

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http_body_util::Full;
use hyper::{Response, StatusCode};

use zucchina_core::{codec, Fetch};

use crate::server::AppState;

/// Number of referenced documents that could not be fetched while expanding
pub const EXPANSION_FAILURES: HeaderName = HeaderName::from_static("x-expansion-failures");

/// Build a plain-text response
pub fn text_response(status: StatusCode, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    response
}

/// Handle GET /health
pub fn health_check() -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(br#"{"status":"healthy"}"#)));
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

/// Handle GET /:token
pub async fn render_document(state: &AppState, token: &str, country: &str) -> Response<Full<Bytes>> {
    let location = match codec::decode(token) {
        Ok(location) => location,
        Err(e) => {
            tracing::debug!("Rejecting token {}: {}", token, e);
            return text_response(StatusCode::BAD_REQUEST, format!("Invalid token: {}", e));
        }
    };

    tracing::info!("📄 Rendering {} for country {}", location, country);

    let source = match state.fetcher.fetch(&location).await {
        Ok(source) => source,
        Err(e) => {
            tracing::warn!("❌ Failed to fetch source document: {}", e);
            return text_response(StatusCode::BAD_GATEWAY, format!("Failed to fetch source document: {}", e));
        }
    };

    let url = state.config.document_url(token);
    let (text, report) = zucchina_config::process(&source, &url, &*state.fetcher).await;

    if !report.is_complete() {
        tracing::warn!(
            "⚠️ {} of {} referenced document(s) could not be fetched for {}",
            report.failures.len(),
            report.fetched,
            location
        );
    }

    let mut response = text_response(StatusCode::OK, text);
    response
        .headers_mut()
        .insert(EXPANSION_FAILURES, HeaderValue::from(report.failures.len()));
    response
}
