// src/application/app.rs
//
// The list screen as a state machine. `handle` takes an event (user input, timer
// tick, or a completed request) and returns the requests to start. It never
// performs I/O, so the same code runs under the interactive shell, the one-shot
// commands, and the tests.
use crate::application::debounce::Debouncer;
use crate::application::modal::{ModalAction, ModalEvent, NoteModal, SharedScreen};
use crate::application::note_form::{Field, FormView, SubmitBlocked};
use crate::application::note_service::ListNotesParams;
use crate::application::pagination::PageCursor;
use crate::application::query_cache::{
    FetchTicket, QueryCache, QueryKey, QueryObserver, QueryState, NOTES_NAMESPACE,
};
use crate::constants::{DEFAULT_PER_PAGE, SEARCH_DEBOUNCE, STALE_TIME};
use crate::domain::{DeleteConfirmation, DomainError, NewNotePayload, Note, NotesPage};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub per_page: u32,
    pub stale_time: Duration,
    pub debounce: Duration,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            stale_time: STALE_TIME,
            debounce: SEARCH_DEBOUNCE,
        }
    }
}

#[derive(Debug)]
pub enum Event {
    SearchInput(String),
    /// Time passed; lets the search debouncer fire.
    Tick,
    GoToPage(u32),
    NextPage,
    PrevPage,
    Refresh,
    OpenModal,
    Modal(ModalEvent),
    FormEdit(Field, String),
    SubmitForm,
    RequestDelete(u64),
    ConfirmDelete(bool),
    NotesLoaded(FetchTicket, Result<NotesPage, DomainError>),
    NoteCreated(Result<Note, DomainError>),
    NoteDeleted(u64, Result<DeleteConfirmation, DomainError>),
}

/// A request the caller must perform and report back as an [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchNotes(FetchTicket, ListNotesParams),
    CreateNote(NewNotePayload),
    DeleteNote(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Info(String),
    Error(String),
}

/// Everything the presenter needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub search: String,
    pub page: u32,
    pub total_pages: u32,
    pub notes: Option<Vec<Note>>,
    pub is_loading: bool,
    pub is_fetching: bool,
    pub is_placeholder: bool,
    pub error: Option<String>,
    pub deleting: Vec<u64>,
    pub confirm_delete: Option<u64>,
    pub modal: Option<FormView>,
    pub scroll_locked: bool,
}

pub struct App {
    settings: AppSettings,
    search_input: String,
    search: Debouncer<String>,
    cursor: PageCursor,
    cache: QueryCache<NotesPage>,
    observer: QueryObserver<NotesPage>,
    list: QueryState<NotesPage>,
    observed: Option<QueryKey>,
    screen: SharedScreen,
    modal: Option<NoteModal>,
    deleting: BTreeSet<u64>,
    confirm_delete: Option<u64>,
    notifications: Vec<Notification>,
}

impl App {
    pub fn new(settings: AppSettings, screen: SharedScreen) -> Self {
        Self::with_query(settings, screen, "", 1)
    }

    /// Start on a given search and page without waiting for the debouncer.
    pub fn with_query(settings: AppSettings, screen: SharedScreen, search: &str, page: u32) -> Self {
        let search = search.trim().to_string();
        Self {
            search: Debouncer::new(search.clone(), settings.debounce),
            search_input: search,
            cursor: PageCursor::starting_at(page),
            cache: QueryCache::new(settings.stale_time),
            observer: QueryObserver::new(),
            list: QueryState {
                data: None,
                is_placeholder: false,
                is_loading: false,
                is_fetching: false,
                error: None,
            },
            observed: None,
            screen,
            modal: None,
            deleting: BTreeSet::new(),
            confirm_delete: None,
            notifications: Vec::new(),
            settings,
        }
    }

    /// First read of the initial key.
    pub fn start(&mut self, now: Instant) -> Vec<Effect> {
        self.sync(now)
    }

    pub fn handle(&mut self, event: Event, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();

        match event {
            Event::SearchInput(value) => {
                self.search_input = value.clone();
                self.cursor.reset();
                self.search.input(value, now);
            }
            Event::Tick => {
                if let Some(search) = self.search.poll(now) {
                    debug!(%search, "Search settled");
                }
            }
            Event::GoToPage(page) => {
                let total = self.total_pages();
                self.cursor.go_to(page, total);
            }
            Event::NextPage => {
                let total = self.total_pages();
                self.cursor.next(total);
            }
            Event::PrevPage => {
                let total = self.total_pages();
                self.cursor.prev(total);
            }
            Event::Refresh => {
                let key = self.current_key();
                self.cache.refetch(&key);
            }
            Event::OpenModal => {
                if self.modal.is_none() {
                    self.modal = Some(NoteModal::open(&self.screen));
                }
            }
            Event::Modal(modal_event) => {
                let close = self
                    .modal
                    .as_ref()
                    .is_some_and(|m| m.handle(modal_event) == ModalAction::Close);
                if close {
                    self.modal = None;
                }
            }
            Event::FormEdit(field, value) => {
                if let Some(modal) = self.modal.as_mut() {
                    let form = modal.form_mut();
                    form.change(field, value);
                    form.blur(field);
                }
            }
            Event::SubmitForm => {
                if let Some(modal) = self.modal.as_mut() {
                    match modal.form_mut().submit() {
                        Ok(payload) => effects.push(Effect::CreateNote(payload)),
                        Err(SubmitBlocked::Pending) => debug!("Submit ignored while pending"),
                        Err(SubmitBlocked::Invalid(errors)) => {
                            debug!(?errors, "Submit blocked by validation")
                        }
                    }
                }
            }
            Event::RequestDelete(id) => {
                if self.deleting.contains(&id) {
                    debug!(id, "Delete already in progress");
                } else {
                    self.confirm_delete = Some(id);
                }
            }
            Event::ConfirmDelete(confirmed) => {
                if let Some(id) = self.confirm_delete.take() {
                    if confirmed {
                        self.deleting.insert(id);
                        effects.push(Effect::DeleteNote(id));
                    }
                }
            }
            Event::NotesLoaded(ticket, result) => {
                if let Err(err) = &result {
                    warn!(key = ?ticket.key(), %err, "Failed to load notes");
                }
                self.cache
                    .complete(&ticket, result.map(NotesPage::normalized), now);
            }
            Event::NoteCreated(result) => self.on_created(result),
            Event::NoteDeleted(id, result) => self.on_deleted(id, result),
        }

        effects.extend(self.sync(now));
        effects
    }

    fn on_created(&mut self, result: Result<Note, DomainError>) {
        let awaiting = self
            .modal
            .as_ref()
            .is_some_and(|m| m.form().is_pending());
        match result {
            Ok(note) => {
                info!(id = note.id, title = %note.title, "Created note");
                self.cache.invalidate(NOTES_NAMESPACE);
                if awaiting {
                    self.modal = None;
                }
                self.notifications
                    .push(Notification::Info(format!("Created note #{}", note.id)));
            }
            Err(err) => {
                error!(%err, "Failed to create note");
                if let Some(modal) = self.modal.as_mut().filter(|_| awaiting) {
                    modal.form_mut().finish_submit(Err(&err));
                }
                self.notifications
                    .push(Notification::Error(format!("Failed to create note: {err}")));
            }
        }
    }

    fn on_deleted(&mut self, id: u64, result: Result<DeleteConfirmation, DomainError>) {
        self.deleting.remove(&id);
        match result {
            Ok(confirmation) => {
                info!(id, message = ?confirmation.message, "Deleted note");
                self.cache.invalidate(NOTES_NAMESPACE);
                self.notifications
                    .push(Notification::Info(format!("Deleted note #{id}")));
            }
            Err(err) => {
                error!(id, %err, "Failed to delete note");
                self.notifications
                    .push(Notification::Error(format!("Failed to delete note: {err}")));
            }
        }
    }

    /// Re-read the current key and start a fetch when the cache asks for one.
    /// Coming back to a key that failed earlier counts as a retry.
    fn sync(&mut self, now: Instant) -> Vec<Effect> {
        let key = self.current_key();
        if self.observed.as_ref() != Some(&key) {
            self.cache.mark_visited(&key);
            self.observed = Some(key.clone());
        }
        let read = self.cache.read(&key, now);
        self.list = self.observer.observe(read.state);

        read.fetch
            .map(|ticket| {
                let params = ListNotesParams {
                    page: key.page(),
                    per_page: self.settings.per_page,
                    search: key.search().to_string(),
                };
                Effect::FetchNotes(ticket, params)
            })
            .into_iter()
            .collect()
    }

    pub fn current_key(&self) -> QueryKey {
        QueryKey::notes(self.search.current(), self.cursor.page())
    }

    pub fn page(&self) -> u32 {
        self.cursor.page()
    }

    /// Page count of whatever is on screen, one when nothing is.
    pub fn total_pages(&self) -> u32 {
        self.list
            .data
            .as_ref()
            .map_or(1, |data| data.total_pages.max(1))
    }

    /// Next instant a [`Event::Tick`] is due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal.is_some()
    }

    #[cfg(test)]
    pub fn is_deleting(&self, id: u64) -> bool {
        self.deleting.contains(&id)
    }

    pub fn awaiting_confirmation(&self) -> Option<u64> {
        self.confirm_delete
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn view(&self) -> ViewModel {
        ViewModel {
            search: self.search_input.clone(),
            page: self.cursor.page(),
            total_pages: self.total_pages(),
            notes: self.list.data.as_ref().map(|data| data.notes.clone()),
            is_loading: self.list.is_loading,
            is_fetching: self.list.is_fetching,
            is_placeholder: self.list.is_placeholder,
            error: self.list.error.as_ref().map(ToString::to_string),
            deleting: self.deleting.iter().copied().collect(),
            confirm_delete: self.confirm_delete,
            modal: self.modal.as_ref().map(|m| m.form().view()),
            scroll_locked: self.screen.borrow().is_scroll_locked(),
        }
    }
}
