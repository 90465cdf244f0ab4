// src/application/mod.rs
pub mod app;
pub mod debounce;
pub mod modal;
pub mod note_form;
pub mod note_service;
pub mod pagination;
pub mod query_cache;
pub mod runner;

pub use app::{App, AppSettings, Effect, Event, Notification, ViewModel};
pub use note_service::{ListNotesParams, NoteService};
pub use runner::{perform, settle};
