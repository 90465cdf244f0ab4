// src/application/note_service.rs
use crate::domain::{DeleteConfirmation, DomainError, NewNotePayload, Note, NotesPage};

/// Parameters of one list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListNotesParams {
    pub page: u32,
    pub per_page: u32,
    pub search: String,
}

impl ListNotesParams {
    /// The search term to send, or `None` when it should be left off the request.
    pub fn search_filter(&self) -> Option<&str> {
        let trimmed = self.search.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Remote notes API. Implementations are cheap to clone so a copy can be moved
/// into each in-flight request.
#[allow(async_fn_in_trait)]
pub trait NoteService: Clone {
    async fn list_notes(&self, params: &ListNotesParams) -> Result<NotesPage, DomainError>;

    /// The server assigns the id and sets `is_archived` to false.
    async fn create_note(&self, payload: &NewNotePayload) -> Result<Note, DomainError>;

    async fn delete_note(&self, id: u64) -> Result<DeleteConfirmation, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", None)]
    #[case("   ", None)]
    #[case(" meeting ", Some("meeting"))]
    fn given_search_when_building_filter_then_omits_blank(
        #[case] search: &str,
        #[case] expected: Option<&str>,
    ) {
        let params = ListNotesParams {
            page: 1,
            per_page: 12,
            search: search.to_string(),
        };
        assert_eq!(params.search_filter(), expected);
    }
}
