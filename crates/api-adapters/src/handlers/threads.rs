use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use domains::{AddThreadPayload, Credentials};
use serde::Deserialize;
use serde_json::{json, Value};

use super::lenient_payload;
use crate::{error::ApiError, AppState};

#[derive(Debug, Default, Deserialize)]
struct PostThreadBody {
    title: Option<Value>,
    body: Option<Value>,
}

/// `POST /threads`
pub async fn post_thread(
    State(state): State<AppState>,
    Extension(user): Extension<Credentials>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let PostThreadBody { title, body } = lenient_payload(&body);
    let added = state
        .threads
        .add_thread(AddThreadPayload {
            owner_id: Some(Value::String(user.id)),
            owner_username: Some(Value::String(user.username)),
            title,
            body,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "data": { "addedThread": added } })),
    ))
}

/// `GET /threads/{thread_id}`
pub async fn get_thread_detail(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let detail = state.threads.get_thread_detail(&thread_id).await?;
    let summary = detail.thread;

    Ok(Json(json!({
        "status": "success",
        "data": {
            "thread": {
                "id": summary.id,
                "title": summary.title,
                "body": summary.body,
                "date": summary.date,
                "username": summary.username,
                "comments": detail.comments,
            }
        }
    })))
}
