//! HTTP-facing errors for the classgeo server.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use classgeo_core::RefreshError;

/// Failures surfaced to HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// Regeneration failed at some pipeline stage.
    #[error(transparent)]
    Refresh(#[from] RefreshError),

    /// Every tier fell through without a response.
    #[error("service unavailable: no cache tier produced a response")]
    Exhausted,
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.to_string(),
        )
            .into_response()
    }
}
