// src/domain/validation.rs
//
// Field rules for new notes. Lengths count chars, not bytes.
use crate::domain::NoteTag;

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 50;
pub const CONTENT_MAX_CHARS: usize = 500;

pub const MSG_REQUIRED: &str = "Required";
pub const MSG_TITLE_MIN: &str = "Min 3 characters";
pub const MSG_TITLE_MAX: &str = "Max 50 characters";
pub const MSG_CONTENT_MAX: &str = "Max 500 characters";
pub const MSG_TAG_INVALID: &str = "Tag must be one of: Todo, Work, Personal, Meeting, Shopping";

pub fn validate_title(title: &str) -> Result<(), &'static str> {
    let len = title.chars().count();
    if len == 0 {
        Err(MSG_REQUIRED)
    } else if len < TITLE_MIN_CHARS {
        Err(MSG_TITLE_MIN)
    } else if len > TITLE_MAX_CHARS {
        Err(MSG_TITLE_MAX)
    } else {
        Ok(())
    }
}

pub fn validate_content(content: &str) -> Result<(), &'static str> {
    if content.chars().count() > CONTENT_MAX_CHARS {
        Err(MSG_CONTENT_MAX)
    } else {
        Ok(())
    }
}

/// Tags arrive as free text from the terminal, so the check parses as well.
pub fn validate_tag(tag: &str) -> Result<NoteTag, &'static str> {
    if tag.trim().is_empty() {
        return Err(MSG_REQUIRED);
    }
    tag.parse::<NoteTag>().map_err(|_| MSG_TAG_INVALID)
}

/// Empty or whitespace-only content is sent as absent.
pub fn normalize_content(content: &str) -> Option<String> {
    if content.trim().is_empty() {
        None
    } else {
        Some(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, Err(MSG_REQUIRED))]
    #[case(2, Err(MSG_TITLE_MIN))]
    #[case(3, Ok(()))]
    #[case(50, Ok(()))]
    #[case(51, Err(MSG_TITLE_MAX))]
    fn given_title_of_length_when_validating_then_applies_bounds(
        #[case] len: usize,
        #[case] expected: Result<(), &'static str>,
    ) {
        let title = "a".repeat(len);
        assert_eq!(validate_title(&title), expected);
    }

    #[test]
    fn given_multibyte_title_when_validating_then_counts_chars() {
        // 3 chars, 9 bytes
        assert_eq!(validate_title("日本語"), Ok(()));
    }

    #[rstest]
    #[case(0, Ok(()))]
    #[case(500, Ok(()))]
    #[case(501, Err(MSG_CONTENT_MAX))]
    fn given_content_of_length_when_validating_then_caps_at_500(
        #[case] len: usize,
        #[case] expected: Result<(), &'static str>,
    ) {
        assert_eq!(validate_content(&"x".repeat(len)), expected);
    }

    #[test]
    fn given_blank_tag_when_validating_then_required() {
        assert_eq!(validate_tag("  "), Err(MSG_REQUIRED));
    }

    #[test]
    fn given_unknown_tag_when_validating_then_lists_allowed_values() {
        assert_eq!(validate_tag("Urgent"), Err(MSG_TAG_INVALID));
    }

    #[test]
    fn given_whitespace_content_when_normalizing_then_absent() {
        assert_eq!(normalize_content("   \n"), None);
        assert_eq!(normalize_content(" hi "), Some(" hi ".to_string()));
    }
}
