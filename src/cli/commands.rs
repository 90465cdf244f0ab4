// src/cli/commands.rs
//
// One-shot subcommands. Each takes its reader/writer so tests can drive it.
use crate::application::modal::Screen;
use crate::application::note_form::{Field, NoteForm, SubmitBlocked};
use crate::application::{settle, App, AppSettings, NoteService};
use crate::domain::{DomainError, NoteTag};
use crate::ports::terminal::{TerminalPresenter, CONFIRM_DELETE_PROMPT};
use anyhow::{anyhow, Context, Result};
use std::io::{BufRead, Write};
use std::time::Instant;
use tracing::{debug, info};

/// Fetch one page and print it. A failed fetch is printed and returned as error.
pub async fn list<S, W>(
    service: &S,
    settings: AppSettings,
    search: &str,
    page: u32,
    out: &mut W,
) -> Result<()>
where
    S: NoteService,
    W: Write,
{
    let mut app = App::with_query(settings, Screen::new().shared(), search, page);
    let effects = app.start(Instant::now());
    settle(&mut app, service, effects).await;

    let view = app.view();
    write!(out, "{}", TerminalPresenter::new().render(&view)).context("Failed to write output")?;

    match view.error {
        Some(error) => Err(anyhow!(error)),
        None => Ok(()),
    }
}

/// Validate locally, then create. Nothing is sent when validation fails.
pub async fn create<S, W>(
    service: &S,
    title: &str,
    content: Option<&str>,
    tag: NoteTag,
    out: &mut W,
) -> Result<()>
where
    S: NoteService,
    W: Write,
{
    let mut form = NoteForm::new();
    form.change(Field::Title, title);
    form.change(Field::Content, content.unwrap_or_default());
    form.change(Field::Tag, tag.as_str());

    let payload = match form.submit() {
        Ok(payload) => payload,
        Err(SubmitBlocked::Invalid(errors)) => {
            let details = errors
                .iter()
                .map(|(field, message)| format!("{}: {message}", field.label()))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(DomainError::Validation(details).into());
        }
        Err(SubmitBlocked::Pending) => return Err(anyhow!("A submission is already pending")),
    };

    debug!(?payload, "Creating note");
    let note = service.create_note(&payload).await?;
    info!(id = note.id, "Created note");
    write!(out, "{}", TerminalPresenter::new().render_note(&note))
        .context("Failed to write output")?;
    Ok(())
}

/// Delete after an interactive confirmation unless `assume_yes`.
pub async fn delete<S, R, W>(
    service: &S,
    note_id: u64,
    assume_yes: bool,
    input: &mut R,
    out: &mut W,
) -> Result<()>
where
    S: NoteService,
    R: BufRead,
    W: Write,
{
    if !assume_yes {
        write!(out, "{CONFIRM_DELETE_PROMPT} (#{note_id}) [y/N] ")
            .and_then(|_| out.flush())
            .context("Failed to write prompt")?;
        let mut answer = String::new();
        input
            .read_line(&mut answer)
            .context("Failed to read confirmation")?;
        if !is_yes(&answer) {
            writeln!(out, "Cancelled").context("Failed to write output")?;
            return Ok(());
        }
    }

    let confirmation = service.delete_note(note_id).await?;
    info!(note_id, "Deleted note");
    match confirmation.message {
        Some(message) => writeln!(out, "Deleted note #{note_id}: {message}"),
        None => writeln!(out, "Deleted note #{note_id}"),
    }
    .context("Failed to write output")?;
    Ok(())
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Note, NotesPage};
    use crate::util::testing::MockNoteService;

    fn note(id: u64, title: &str) -> Note {
        Note {
            id,
            title: title.to_string(),
            content: String::new(),
            tag: NoteTag::Meeting,
            is_archived: false,
        }
    }

    #[tokio::test]
    async fn given_search_and_page_when_listing_then_renders_requested_page() {
        let service = MockNoteService::builder()
            .with_page(
                "meeting",
                2,
                NotesPage {
                    notes: vec![note(7, "Retro")],
                    total_pages: 3,
                },
            )
            .build();
        let mut out = Vec::new();

        list(&service, AppSettings::default(), "meeting", 2, &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Pages: 1 [2] 3"));
        assert!(text.contains("Retro"));
        let requests = service.list_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].search, "meeting");
        assert_eq!(requests[0].page, 2);
    }

    #[tokio::test]
    async fn given_failing_api_when_listing_then_error_returned() {
        let service = MockNoteService::builder()
            .with_list_error("", 1, DomainError::Api {
                status: 401,
                message: "Unauthorized".into(),
            })
            .build();
        let mut out = Vec::new();

        let result = list(&service, AppSettings::default(), "", 1, &mut out).await;

        assert!(result.is_err());
        assert!(String::from_utf8(out).unwrap().contains("Error: API error (401)"));
    }

    #[tokio::test]
    async fn given_empty_title_when_creating_then_no_request_sent() {
        let service = MockNoteService::builder().build();
        let mut out = Vec::new();

        let err = create(&service, "", None, NoteTag::Todo, &mut out)
            .await
            .unwrap_err();

        assert_eq!(
            err.downcast_ref::<DomainError>(),
            Some(&DomainError::Validation("Title: Required".into()))
        );
        assert!(service.created().is_empty());
    }

    #[tokio::test]
    async fn given_valid_note_when_creating_then_prints_created_note() {
        let service = MockNoteService::builder().build();
        let mut out = Vec::new();

        create(&service, "Groceries", Some("milk"), NoteTag::Shopping, &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("#1 Groceries"));
        assert!(text.contains("[Shopping]"));
        assert_eq!(service.created()[0].content.as_deref(), Some("milk"));
    }

    #[tokio::test]
    async fn given_declined_prompt_when_deleting_then_nothing_sent() {
        let service = MockNoteService::builder().with_note(note(42, "x")).build();
        let mut input = "n\n".as_bytes();
        let mut out = Vec::new();

        delete(&service, 42, false, &mut input, &mut out).await.unwrap();

        assert!(service.deleted_ids().is_empty());
        assert!(String::from_utf8(out).unwrap().contains("Cancelled"));
    }

    #[tokio::test]
    async fn given_confirmed_prompt_when_deleting_then_note_removed() {
        let service = MockNoteService::builder().with_note(note(42, "x")).build();
        let mut input = "y\n".as_bytes();
        let mut out = Vec::new();

        delete(&service, 42, false, &mut input, &mut out).await.unwrap();

        assert_eq!(service.deleted_ids(), vec![42]);
    }

    #[tokio::test]
    async fn given_missing_note_when_deleting_then_not_found_error() {
        let service = MockNoteService::builder().build();
        let mut out = Vec::new();

        let err = delete(&service, 9, true, &mut "".as_bytes(), &mut out)
            .await
            .unwrap_err();

        assert_eq!(
            err.downcast_ref::<DomainError>(),
            Some(&DomainError::NotFound(9))
        );
    }
}
