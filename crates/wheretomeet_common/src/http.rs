// --- File: crates/wheretomeet_common/src/http.rs ---
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::error::{HttpStatusCode, WhereToMeetError};

pub mod client;

/// Extension trait for WhereToMeetError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for WhereToMeetError {
    /// Non-200 bodies are a plain-text reason string, never JSON.
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status_code.is_server_error() {
            error!(status = status_code.as_u16(), "{}", self);
        } else {
            warn!(status = status_code.as_u16(), "{}", self);
        }

        (
            status_code,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.to_string(),
        )
            .into_response()
    }
}

impl IntoResponse for WhereToMeetError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::not_found;

    #[tokio::test]
    async fn error_bodies_are_plain_text() {
        let response = not_found("Meeting not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Not found: Meeting not found");
    }
}
