// src/domain/mod.rs
pub mod error;
pub mod note;
pub mod validation;

pub use error::DomainError;
pub use note::{DeleteConfirmation, NewNotePayload, Note, NoteTag, NotesPage, UnknownTag};
