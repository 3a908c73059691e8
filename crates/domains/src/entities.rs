//! # Entity Validators
//!
//! Raw payloads keep every field as the JSON value the client sent, so shape
//! errors can be told apart: a field that is absent or falsy is
//! `MISSING_PROPERTY`, a field that is present but not a string is
//! `WRONG_TYPE`. Presence is checked across all fields before types.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Scope, ValidationError};

/// Untyped thread-creation input.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddThreadPayload {
    pub owner_id: Option<Value>,
    pub owner_username: Option<Value>,
    pub title: Option<Value>,
    pub body: Option<Value>,
}

/// Untyped comment-creation input.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentPayload {
    pub owner_id: Option<Value>,
    pub owner_username: Option<Value>,
    pub thread_id: Option<Value>,
    pub content: Option<Value>,
}

/// A validated thread-creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddThread {
    pub owner_id: String,
    pub owner_username: String,
    pub title: String,
    pub body: String,
}

/// A validated comment-creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddComment {
    pub owner_id: String,
    pub owner_username: String,
    pub thread_id: String,
    pub content: String,
}

impl TryFrom<AddThreadPayload> for AddThread {
    type Error = ValidationError;

    fn try_from(payload: AddThreadPayload) -> Result<Self, Self::Error> {
        let scope = Scope::AddThread;
        let AddThreadPayload {
            owner_id,
            owner_username,
            title,
            body,
        } = payload;

        require_present(scope, [&owner_id, &owner_username, &title, &body])?;

        Ok(Self {
            owner_id: into_string(scope, owner_id)?,
            owner_username: into_string(scope, owner_username)?,
            title: into_string(scope, title)?,
            body: into_string(scope, body)?,
        })
    }
}

impl TryFrom<AddCommentPayload> for AddComment {
    type Error = ValidationError;

    fn try_from(payload: AddCommentPayload) -> Result<Self, Self::Error> {
        let scope = Scope::AddComment;
        let AddCommentPayload {
            owner_id,
            owner_username,
            thread_id,
            content,
        } = payload;

        require_present(scope, [&owner_id, &owner_username, &thread_id, &content])?;

        Ok(Self {
            owner_id: into_string(scope, owner_id)?,
            owner_username: into_string(scope, owner_username)?,
            thread_id: into_string(scope, thread_id)?,
            content: into_string(scope, content)?,
        })
    }
}

/// Rejects a blank identifier taken from a request path.
pub fn require_id(scope: Scope, id: &str) -> Result<(), ValidationError> {
    if id.is_empty() {
        return Err(ValidationError::missing(scope));
    }
    Ok(())
}

fn require_present<const N: usize>(
    scope: Scope,
    fields: [&Option<Value>; N],
) -> Result<(), ValidationError> {
    if fields.iter().all(|field| is_truthy(field)) {
        Ok(())
    } else {
        Err(ValidationError::missing(scope))
    }
}

fn into_string(scope: Scope, field: Option<Value>) -> Result<String, ValidationError> {
    match field {
        Some(Value::String(s)) => Ok(s),
        _ => Err(ValidationError::wrong_type(scope)),
    }
}

/// `null`, `false`, `0` and `""` count as absent.
fn is_truthy(field: &Option<Value>) -> bool {
    match field {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}
