//! Bearer-token guard for the write routes.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::{error::ApiError, AppState};

const MISSING_TOKEN: &str = "Missing authentication";

/// Verifies `Authorization: Bearer <token>` and stores the resulting
/// [`domains::Credentials`] in the request extensions.
pub async fn require_access_token(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(ApiError::Unauthenticated(MISSING_TOKEN))?;

    let credentials = state.tokens.verify(token)?;
    debug!(user_id = %credentials.id, path = %req.uri().path(), "authenticated request");

    req.extensions_mut().insert(credentials);
    Ok(next.run(req).await)
}
