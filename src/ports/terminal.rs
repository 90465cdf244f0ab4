// src/ports/terminal.rs
use crate::application::note_form::FormView;
use crate::application::pagination::{page_window, PageLabel};
use crate::application::{Notification, ViewModel};
use crate::constants::{CONTENT_PREVIEW_CHARS, PAGE_RANGE_DISPLAYED};
use crate::domain::Note;
use crate::util::text::{is_multiline, preview};
use std::fmt::Write;
use tracing::instrument;

pub const EMPTY_MESSAGE: &str = "No notes found. Try adjusting your search.";
pub const LOADING_MESSAGE: &str = "Loading notes...";
pub const CONFIRM_DELETE_PROMPT: &str = "Are you sure you want to delete this note?";

/// Renders the list screen and the create-note modal as plain text.
#[derive(Debug, Default)]
pub struct TerminalPresenter;

impl TerminalPresenter {
    pub fn new() -> Self {
        Self
    }

    #[instrument(level = "trace", skip(self, view))]
    pub fn render(&self, view: &ViewModel) -> String {
        let mut out = String::new();

        let search = if view.search.trim().is_empty() {
            "(all notes)"
        } else {
            view.search.as_str()
        };
        let _ = writeln!(out, "Search: {search}");
        if view.total_pages > 1 {
            let _ = writeln!(out, "Pages: {}", self.render_pagination(view.page, view.total_pages));
        }
        let _ = writeln!(out, "[new] Create note +");
        out.push_str("----\n");

        if view.is_loading {
            let _ = writeln!(out, "{LOADING_MESSAGE}");
        }
        if let Some(error) = &view.error {
            let _ = writeln!(out, "Error: {error}");
        }
        if view.is_placeholder || (view.is_fetching && view.notes.is_some()) {
            let _ = writeln!(out, "(updating…)");
        }

        match view.notes.as_deref() {
            Some([]) if !view.is_placeholder => {
                let _ = writeln!(out, "{EMPTY_MESSAGE}");
            }
            Some(notes) => {
                for note in notes {
                    out.push_str(&self.render_list_item(note, view.deleting.contains(&note.id)));
                }
            }
            None => {}
        }

        if let Some(id) = view.confirm_delete {
            let _ = writeln!(out, "{CONFIRM_DELETE_PROMPT} (#{id}) [y/N]");
        }
        if let Some(form) = &view.modal {
            out.push_str(&self.render_form(form));
        }
        out
    }

    /// `1 … 4 [5] 6 … 20`
    pub fn render_pagination(&self, page: u32, total_pages: u32) -> String {
        page_window(page, total_pages, PAGE_RANGE_DISPLAYED)
            .into_iter()
            .map(|label| match label {
                PageLabel::Page(n) => n.to_string(),
                PageLabel::Current(n) => format!("[{n}]"),
                PageLabel::Gap => "…".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn render_list_item(&self, note: &Note, deleting: bool) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "#{:<6} {}", note.id, note.title);
        let content = preview(&note.content, CONTENT_PREVIEW_CHARS);
        if !content.is_empty() {
            let more = if is_multiline(&note.content) { " …" } else { "" };
            let _ = writeln!(out, "        {content}{more}");
        }
        let status = if deleting { "  deleting…" } else { "" };
        let _ = writeln!(out, "        [{}]{status}", note.tag);
        out
    }

    pub fn render_form(&self, form: &FormView) -> String {
        let mut out = String::new();
        out.push_str("==== New note ====\n");
        for field in &form.fields {
            let _ = writeln!(out, "{:<8} {}", format!("{}:", field.field.label()), field.value);
            if let Some(error) = field.error {
                let _ = writeln!(out, "         ! {error}");
            }
        }
        if let Some(error) = &form.submit_error {
            let _ = writeln!(out, "! {error}");
        }
        let submit = if form.is_pending { "creating…" } else { "[submit] Create" };
        let _ = writeln!(out, "{submit}   [esc] Cancel");
        out
    }

    /// Full detail of one note, used after a create.
    pub fn render_note(&self, note: &Note) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "#{} {}", note.id, note.title);
        if !note.content.is_empty() {
            let _ = writeln!(out, "{}", note.content);
        }
        let archived = if note.is_archived { " (archived)" } else { "" };
        let _ = writeln!(out, "[{}]{archived}", note.tag);
        out
    }

    pub fn render_notification(&self, notification: &Notification) -> String {
        match notification {
            Notification::Info(message) => format!("✓ {message}"),
            Notification::Error(message) => format!("✗ {message}"),
        }
    }
}
