//! Maps use-case failures to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domains::{translate, DomainError, TokenError, Translation};
use serde_json::json;
use tracing::error;

const SERVER_FAILURE_MESSAGE: &str = "terjadi kegagalan pada server kami";

#[derive(Debug)]
pub enum ApiError {
    Domain(DomainError),
    /// Missing, malformed, or rejected bearer token.
    Unauthenticated(&'static str),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => Self::Unauthenticated("access token tidak valid"),
            TokenError::Expired => Self::Unauthenticated("access token kedaluwarsa"),
        }
    }
}

fn fail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "status": "fail", "message": message }))).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthenticated(message) => fail(StatusCode::UNAUTHORIZED, message),
            ApiError::Domain(err) => match translate(err) {
                Translation::Mapped(client) => {
                    let status = StatusCode::from_u16(client.category.status_code())
                        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                    fail(status, client.message)
                }
                Translation::Unmapped(err) => {
                    error!(error = ?err, "unhandled failure");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({ "status": "error", "message": SERVER_FAILURE_MESSAGE })),
                    )
                        .into_response()
                }
            },
        }
    }
}
