// src/domain/note.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of tags a note can carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteTag {
    #[default]
    Todo,
    Work,
    Personal,
    Meeting,
    Shopping,
}

impl NoteTag {
    pub const ALL: [NoteTag; 5] = [
        NoteTag::Todo,
        NoteTag::Work,
        NoteTag::Personal,
        NoteTag::Meeting,
        NoteTag::Shopping,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "Todo",
            Self::Work => "Work",
            Self::Personal => "Personal",
            Self::Meeting => "Meeting",
            Self::Shopping => "Shopping",
        }
    }
}

impl fmt::Display for NoteTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTag(pub String);

impl fmt::Display for UnknownTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tag: {}", self.0)
    }
}

impl std::error::Error for UnknownTag {}

impl FromStr for NoteTag {
    type Err = UnknownTag;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownTag(wanted.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub tag: NoteTag,
    #[serde(default)]
    pub is_archived: bool,
}

/// Body of a create request. `content` is left out of the JSON when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewNotePayload {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub tag: NoteTag,
}

/// One page of the note list for a (search, page) combination.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesPage {
    pub notes: Vec<Note>,
    pub total_pages: u32,
}

impl NotesPage {
    /// Clamp the server's page count so an empty result still reports one page.
    pub fn normalized(mut self) -> Self {
        self.total_pages = self.total_pages.max(1);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeleteConfirmation {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Todo", NoteTag::Todo)]
    #[case("work", NoteTag::Work)]
    #[case(" PERSONAL ", NoteTag::Personal)]
    #[case("Meeting", NoteTag::Meeting)]
    #[case("shopping", NoteTag::Shopping)]
    fn given_known_tag_text_when_parsing_then_returns_tag(
        #[case] input: &str,
        #[case] expected: NoteTag,
    ) {
        assert_eq!(input.parse::<NoteTag>().unwrap(), expected);
    }

    #[test]
    fn given_unknown_tag_text_when_parsing_then_fails() {
        let err = "Urgent".parse::<NoteTag>().unwrap_err();
        assert_eq!(err, UnknownTag("Urgent".to_string()));
    }

    #[test]
    fn given_server_json_when_decoding_note_then_maps_camel_case_fields() {
        let json = r#"{
            "id": 42,
            "title": "Standup",
            "content": "Daily sync",
            "tag": "Meeting",
            "isArchived": false,
            "createdAt": "2025-01-01T00:00:00Z"
        }"#;

        let note: Note = serde_json::from_str(json).unwrap();

        assert_eq!(note.id, 42);
        assert_eq!(note.tag, NoteTag::Meeting);
        assert!(!note.is_archived);
    }

    #[test]
    fn given_unknown_tag_in_json_when_decoding_note_then_fails() {
        let json = r#"{"id": 1, "title": "x", "content": "", "tag": "Urgent", "isArchived": false}"#;
        assert!(serde_json::from_str::<Note>(json).is_err());
    }

    #[test]
    fn given_payload_without_content_when_serializing_then_omits_field() {
        let payload = NewNotePayload {
            title: "Buy milk".to_string(),
            content: None,
            tag: NoteTag::Shopping,
        };

        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json, serde_json::json!({"title": "Buy milk", "tag": "Shopping"}));
    }

    #[test]
    fn given_zero_total_pages_when_normalizing_then_reports_one_page() {
        let page = NotesPage {
            notes: vec![],
            total_pages: 0,
        };
        assert_eq!(page.normalized().total_pages, 1);
    }
}
