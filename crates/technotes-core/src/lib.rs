//! # technotes-core
//!
//! Core types, traits, and note operations for technotes.
//!
//! This crate holds the data model, the store traits that backends
//! implement, the payload checks, and [`NoteService`], which applies the
//! validation and conflict rules before each mutation.

pub mod error;
pub mod input;
pub mod logging;
pub mod memory;
pub mod models;
pub mod service;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, ErrorKind, Result};
pub use input::{CreateNote, DeleteNote, NotePayload, UpdateNote};
pub use memory::MemoryStore;
pub use models::*;
pub use service::NoteService;
pub use traits::*;
