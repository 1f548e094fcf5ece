//! Request payload shape checks.
//!
//! Payload fields are kept as raw JSON so that presence and type failures are
//! reported as [`Error::MissingFields`] rather than as deserialization errors.
//! A field counts as present only when it is a non-empty string, except
//! `completed`, which must be a JSON boolean.

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::{Error, Result};

/// Untyped note payload as delivered by the transport.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotePayload {
    #[serde(default)]
    pub id: Option<JsonValue>,
    #[serde(default)]
    pub user: Option<JsonValue>,
    #[serde(default)]
    pub title: Option<JsonValue>,
    #[serde(default)]
    pub text: Option<JsonValue>,
    #[serde(default)]
    pub completed: Option<JsonValue>,
}

/// Validated create input. `username` is resolved to a user id by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateNote {
    pub username: String,
    pub title: String,
    pub text: String,
    pub completed: bool,
}

/// Validated update input. The payload's `user` is required but not carried:
/// ownership never changes on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateNote {
    pub id: String,
    pub title: String,
    pub text: String,
    pub completed: bool,
}

/// Validated delete input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteNote {
    pub id: String,
}

/// PostgreSQL TEXT cannot hold NUL, so such strings count as absent.
fn non_empty_str(value: Option<&JsonValue>) -> Option<String> {
    match value {
        Some(JsonValue::String(s)) if !s.is_empty() && !s.contains('\0') => Some(s.clone()),
        _ => None,
    }
}

fn strict_bool(value: Option<&JsonValue>) -> Option<bool> {
    value.and_then(JsonValue::as_bool)
}

impl NotePayload {
    /// Check the fields required by Create.
    pub fn to_create(&self) -> Result<CreateNote> {
        let username = non_empty_str(self.user.as_ref());
        let title = non_empty_str(self.title.as_ref());
        let text = non_empty_str(self.text.as_ref());
        let completed = strict_bool(self.completed.as_ref());

        match (username, title, text, completed) {
            (Some(username), Some(title), Some(text), Some(completed)) => Ok(CreateNote {
                username,
                title,
                text,
                completed,
            }),
            _ => Err(Error::MissingFields),
        }
    }

    /// Check the fields required by Update.
    pub fn to_update(&self) -> Result<UpdateNote> {
        let id = non_empty_str(self.id.as_ref());
        let user = non_empty_str(self.user.as_ref());
        let title = non_empty_str(self.title.as_ref());
        let text = non_empty_str(self.text.as_ref());
        let completed = strict_bool(self.completed.as_ref());

        match (id, user, title, text, completed) {
            (Some(id), Some(_), Some(title), Some(text), Some(completed)) => Ok(UpdateNote {
                id,
                title,
                text,
                completed,
            }),
            _ => Err(Error::MissingFields),
        }
    }

    /// Check the field required by Delete.
    pub fn to_delete(&self) -> Result<DeleteNote> {
        non_empty_str(self.id.as_ref())
            .map(|id| DeleteNote { id })
            .ok_or(Error::MissingNoteId)
    }
}
