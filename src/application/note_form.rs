// src/application/note_form.rs
use crate::domain::validation::{
    normalize_content, validate_content, validate_tag, validate_title,
};
use crate::domain::{DomainError, NewNotePayload, NoteTag};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Content,
    Tag,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Title, Field::Content, Field::Tag];

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Content => "Content",
            Self::Tag => "Tag",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct FieldState {
    value: String,
    touched: bool,
    error: Option<&'static str>,
}

/// Why a submit did not produce a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitBlocked {
    /// A previous submission has not completed yet.
    Pending,
    /// At least one field failed validation; errors are now visible.
    Invalid(Vec<(Field, &'static str)>),
}

/// What the form shows for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub field: Field,
    pub value: String,
    pub error: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub fields: Vec<FieldView>,
    pub is_pending: bool,
    pub submit_error: Option<String>,
}

/// Create-note form: fields are validated on every change, and an error is only
/// shown once the field has been touched (blurred or submitted).
#[derive(Debug, Clone)]
pub struct NoteForm {
    title: FieldState,
    content: FieldState,
    tag: FieldState,
    pending: bool,
    submit_error: Option<String>,
}

impl NoteForm {
    pub fn new() -> Self {
        let mut form = Self {
            title: FieldState::default(),
            content: FieldState::default(),
            tag: FieldState {
                value: NoteTag::default().to_string(),
                ..FieldState::default()
            },
            pending: false,
            submit_error: None,
        };
        for field in Field::ALL {
            form.revalidate(field);
        }
        form
    }

    fn state(&self, field: Field) -> &FieldState {
        match field {
            Field::Title => &self.title,
            Field::Content => &self.content,
            Field::Tag => &self.tag,
        }
    }

    fn state_mut(&mut self, field: Field) -> &mut FieldState {
        match field {
            Field::Title => &mut self.title,
            Field::Content => &mut self.content,
            Field::Tag => &mut self.tag,
        }
    }

    fn revalidate(&mut self, field: Field) {
        let value = self.state(field).value.as_str();
        let error = match field {
            Field::Title => validate_title(value).err(),
            Field::Content => validate_content(value).err(),
            Field::Tag => validate_tag(value).err(),
        };
        self.state_mut(field).error = error;
    }

    pub fn change(&mut self, field: Field, value: impl Into<String>) {
        self.state_mut(field).value = value.into();
        self.revalidate(field);
    }

    pub fn blur(&mut self, field: Field) {
        self.state_mut(field).touched = true;
    }

    pub fn value(&self, field: Field) -> &str {
        &self.state(field).value
    }

    /// The error to display, `None` while the field is untouched.
    pub fn visible_error(&self, field: Field) -> Option<&'static str> {
        let state = self.state(field);
        state.touched.then_some(state.error).flatten()
    }

    #[cfg(test)]
    pub fn is_valid(&self) -> bool {
        Field::ALL.iter().all(|f| self.state(*f).error.is_none())
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    #[cfg(test)]
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    /// Touch every field and, when valid and idle, hand out the payload and enter
    /// the pending state.
    pub fn submit(&mut self) -> Result<NewNotePayload, SubmitBlocked> {
        if self.pending {
            return Err(SubmitBlocked::Pending);
        }
        for field in Field::ALL {
            self.blur(field);
        }

        let errors: Vec<_> = Field::ALL
            .iter()
            .filter_map(|f| self.state(*f).error.map(|e| (*f, e)))
            .collect();
        if !errors.is_empty() {
            return Err(SubmitBlocked::Invalid(errors));
        }

        let tag = validate_tag(&self.tag.value)
            .map_err(|e| SubmitBlocked::Invalid(vec![(Field::Tag, e)]))?;
        self.pending = true;
        self.submit_error = None;
        Ok(NewNotePayload {
            title: self.title.value.clone(),
            content: normalize_content(&self.content.value),
            tag,
        })
    }

    /// Leave the pending state. A failure stays visible on the form for a retry.
    pub fn finish_submit(&mut self, outcome: Result<(), &DomainError>) {
        self.pending = false;
        self.submit_error = outcome.err().map(|err| err.to_string());
    }

    pub fn view(&self) -> FormView {
        FormView {
            fields: Field::ALL
                .iter()
                .map(|f| FieldView {
                    field: *f,
                    value: self.value(*f).to_string(),
                    error: self.visible_error(*f),
                })
                .collect(),
            is_pending: self.pending,
            submit_error: self.submit_error.clone(),
        }
    }
}

impl Default for NoteForm {
    fn default() -> Self {
        Self::new()
    }
}
