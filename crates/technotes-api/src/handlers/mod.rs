//! HTTP handlers for technotes-api.

pub mod health;
pub mod notes;

pub use health::health_check;
pub use notes::{create_note, delete_note, list_notes, update_note};
