// src/application/runner.rs
use crate::application::app::{App, Effect, Event};
use crate::application::note_service::NoteService;
use std::time::Instant;
use tracing::{debug, instrument};

/// Carry out one effect against `service` and turn the outcome into an event.
#[instrument(level = "debug", skip(service))]
pub async fn perform<S: NoteService>(service: &S, effect: Effect) -> Event {
    match effect {
        Effect::FetchNotes(ticket, params) => {
            let result = service.list_notes(&params).await;
            Event::NotesLoaded(ticket, result)
        }
        Effect::CreateNote(payload) => Event::NoteCreated(service.create_note(&payload).await),
        Effect::DeleteNote(id) => Event::NoteDeleted(id, service.delete_note(id).await),
    }
}

/// Run effects one after another, feeding each outcome back into `app`, until
/// nothing is left to do. Used by the one-shot commands.
pub async fn settle<S: NoteService>(app: &mut App, service: &S, effects: Vec<Effect>) {
    let mut queue = std::collections::VecDeque::from(effects);
    while let Some(effect) = queue.pop_front() {
        let event = perform(service, effect).await;
        let follow_up = app.handle(event, Instant::now());
        debug!(count = follow_up.len(), "Follow-up effects");
        queue.extend(follow_up);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::app::AppSettings;
    use crate::application::modal::Screen;
    use crate::domain::{Note, NoteTag, NotesPage};
    use crate::util::testing::MockNoteService;

    fn note(id: u64) -> Note {
        Note {
            id,
            title: format!("Note {id}"),
            content: String::new(),
            tag: NoteTag::Work,
            is_archived: false,
        }
    }

    #[tokio::test]
    async fn given_started_app_when_settled_then_first_page_loaded() {
        let service = MockNoteService::builder()
            .with_page(
                "",
                1,
                NotesPage {
                    notes: vec![note(1), note(2)],
                    total_pages: 1,
                },
            )
            .build();
        let mut app = App::new(AppSettings::default(), Screen::new().shared());

        let effects = app.start(Instant::now());
        settle(&mut app, &service, effects).await;

        assert_eq!(app.view().notes.map(|n| n.len()), Some(2));
        assert_eq!(service.list_calls(), 1);
    }

    #[tokio::test]
    async fn given_delete_effect_when_performed_then_service_called_with_id() {
        let service = MockNoteService::builder().build();

        let event = perform(&service, Effect::DeleteNote(42)).await;

        assert!(matches!(event, Event::NoteDeleted(42, Ok(_))));
        assert_eq!(service.deleted_ids(), vec![42]);
    }
}
