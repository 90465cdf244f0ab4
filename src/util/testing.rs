// src/util/testing.rs

use anyhow::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::env;
use std::rc::Rc;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::{ListNotesParams, NoteService};
use crate::application::pagination::total_pages_for;
use crate::domain::{DeleteConfirmation, DomainError, NewNotePayload, Note, NotesPage};

// Common test environment variables
pub const TEST_ENV_VARS: &[&str] = &["RUST_LOG", "NOTEHUB_TOKEN", "NOTEHUB_BASE_URL"];

#[derive(Default)]
struct MockState {
    notes: Vec<Note>,
    next_id: u64,
    pages: HashMap<(String, u32), Result<NotesPage, DomainError>>,
    list_failure: Option<DomainError>,
    create_error: Option<DomainError>,
    delete_errors: HashMap<u64, DomainError>,
    list_requests: Vec<ListNotesParams>,
    created: Vec<NewNotePayload>,
    deleted: Vec<u64>,
}

/// In-memory stand-in for the NoteHub API.
///
/// Without configuration it behaves like a tiny server: list filters the stored
/// notes by title/content and paginates them, create assigns the next id, delete
/// removes or reports `NotFound`. Canned pages and errors override that.
/// Clones share state, so a test can keep a handle while the app owns another.
///
/// # Examples
///
/// ```
/// use notehub::util::testing::MockNoteService;
/// use notehub::domain::{Note, NoteTag};
///
/// let mock = MockNoteService::builder()
///     .with_note(Note {
///         id: 1,
///         title: "Standup".to_string(),
///         content: "Daily sync".to_string(),
///         tag: NoteTag::Meeting,
///         is_archived: false,
///     })
///     .build();
/// assert_eq!(mock.list_calls(), 0);
/// ```
#[derive(Clone, Default)]
pub struct MockNoteService {
    state: Rc<RefCell<MockState>>,
}

impl MockNoteService {
    pub fn builder() -> MockNoteServiceBuilder {
        MockNoteServiceBuilder::new()
    }

    pub fn list_calls(&self) -> usize {
        self.state.borrow().list_requests.len()
    }

    pub fn list_requests(&self) -> Vec<ListNotesParams> {
        self.state.borrow().list_requests.clone()
    }

    pub fn created(&self) -> Vec<NewNotePayload> {
        self.state.borrow().created.clone()
    }

    pub fn deleted_ids(&self) -> Vec<u64> {
        self.state.borrow().deleted.clone()
    }

    /// Make every following list call fail, or succeed again with `None`.
    pub fn set_list_failure(&self, error: Option<DomainError>) {
        self.state.borrow_mut().list_failure = error;
    }
}

impl NoteService for MockNoteService {
    async fn list_notes(&self, params: &ListNotesParams) -> Result<NotesPage, DomainError> {
        let mut state = self.state.borrow_mut();
        state.list_requests.push(params.clone());

        if let Some(error) = &state.list_failure {
            return Err(error.clone());
        }
        let search = params.search_filter().unwrap_or_default().to_string();
        if let Some(canned) = state.pages.get(&(search.clone(), params.page)) {
            return canned.clone();
        }

        let needle = search.to_lowercase();
        let matching: Vec<Note> = state
            .notes
            .iter()
            .filter(|n| {
                needle.is_empty()
                    || n.title.to_lowercase().contains(&needle)
                    || n.content.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        let per_page = params.per_page.max(1) as usize;
        let skip = (params.page.max(1) as usize - 1) * per_page;
        Ok(NotesPage {
            total_pages: total_pages_for(matching.len() as u64, params.per_page),
            notes: matching.into_iter().skip(skip).take(per_page).collect(),
        })
    }

    async fn create_note(&self, payload: &NewNotePayload) -> Result<Note, DomainError> {
        let mut state = self.state.borrow_mut();
        if let Some(error) = &state.create_error {
            return Err(error.clone());
        }
        state.created.push(payload.clone());
        state.next_id += 1;
        let note = Note {
            id: state.next_id,
            title: payload.title.clone(),
            content: payload.content.clone().unwrap_or_default(),
            tag: payload.tag,
            is_archived: false,
        };
        state.notes.insert(0, note.clone());
        Ok(note)
    }

    async fn delete_note(&self, id: u64) -> Result<DeleteConfirmation, DomainError> {
        let mut state = self.state.borrow_mut();
        if let Some(error) = state.delete_errors.get(&id) {
            return Err(error.clone());
        }
        let before = state.notes.len();
        state.notes.retain(|n| n.id != id);
        if state.notes.len() == before {
            return Err(DomainError::NotFound(id));
        }
        state.deleted.push(id);
        Ok(DeleteConfirmation {
            message: Some(format!("Note {id} deleted")),
        })
    }
}

/// Builder for MockNoteService
///
/// Provides a fluent interface for configuring mock behavior.
pub struct MockNoteServiceBuilder {
    state: MockState,
}

impl MockNoteServiceBuilder {
    pub fn new() -> Self {
        Self {
            state: MockState::default(),
        }
    }

    /// Store a note that list/delete operate on
    pub fn with_note(mut self, note: Note) -> Self {
        self.state.next_id = self.state.next_id.max(note.id);
        self.state.notes.push(note);
        self
    }

    /// Fixed answer for one (search, page) request
    pub fn with_page(mut self, search: &str, page: u32, result: NotesPage) -> Self {
        self.state
            .pages
            .insert((search.trim().to_string(), page), Ok(result));
        self
    }

    /// Fixed failure for one (search, page) request
    pub fn with_list_error(mut self, search: &str, page: u32, error: DomainError) -> Self {
        self.state
            .pages
            .insert((search.trim().to_string(), page), Err(error));
        self
    }

    pub fn with_create_error(mut self, error: DomainError) -> Self {
        self.state.create_error = Some(error);
        self
    }

    pub fn with_delete_error(mut self, id: u64, error: DomainError) -> Self {
        self.state.delete_errors.insert(id, error);
        self
    }

    pub fn build(self) -> MockNoteService {
        MockNoteService {
            state: Rc::new(RefCell::new(self.state)),
        }
    }
}

impl Default for MockNoteServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    for (name, value) in active_env_vars() {
        debug!(name, value = value.as_deref().unwrap_or("<unset>"), "Test environment");
    }
    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    // Create a filter for noisy modules
    let noisy_modules = ["hyper", "hyper_util", "reqwest", "rustls", "mio"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    // Set up the subscriber with environment filter
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    // Build and set the subscriber
    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Values of the variables that change how tests and the client behave.
/// A token is masked so it never lands in test output.
pub fn active_env_vars() -> Vec<(&'static str, Option<String>)> {
    TEST_ENV_VARS
        .iter()
        .map(|name| {
            let value = env::var(name).ok().map(|value| {
                if *name == "NOTEHUB_TOKEN" {
                    "***".to_string()
                } else {
                    value
                }
            });
            (*name, value)
        })
        .collect()
}
