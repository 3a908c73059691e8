use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use domains::{AddCommentPayload, Credentials};
use serde::Deserialize;
use serde_json::{json, Value};

use super::lenient_payload;
use crate::{error::ApiError, AppState};

#[derive(Debug, Default, Deserialize)]
struct PostCommentBody {
    content: Option<Value>,
}

/// `POST /threads/{thread_id}/comments`
pub async fn post_comment(
    State(state): State<AppState>,
    Extension(user): Extension<Credentials>,
    Path(thread_id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let PostCommentBody { content } = lenient_payload(&body);
    let added = state
        .comments
        .add_comment(AddCommentPayload {
            owner_id: Some(Value::String(user.id)),
            owner_username: Some(Value::String(user.username)),
            thread_id: Some(Value::String(thread_id)),
            content,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "data": { "addedComment": added } })),
    ))
}

/// `DELETE /threads/{thread_id}/comments/{comment_id}`
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(user): Extension<Credentials>,
    Path((thread_id, comment_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    state
        .comments
        .delete_comment(&user.id, &thread_id, &comment_id)
        .await?;
    Ok(Json(json!({ "status": "success" })))
}
