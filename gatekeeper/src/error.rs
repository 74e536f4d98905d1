use std::fmt;
use thiserror::Error;

/// One rejected form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every problem found while validating one form, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(pub Vec<FieldError>);

impl FormErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", joined.join("; "))
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Task {0} has already been reviewed")]
    AlreadyReviewed(String),

    #[error("Please provide a rejection reason")]
    MissingReason,

    #[error("Please select at least one {0}")]
    EmptySelection(&'static str),

    #[error("{identity} is not a member of {group}")]
    NotAMember { group: String, identity: String },

    #[error("Invalid form: {0}")]
    InvalidForm(FormErrors),

    #[error("Listing error: {0}")]
    Listing(#[from] shared::Error),

    #[error("CSV error: {0}")]
    Interchange(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CommandError {
    pub(crate) fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        CommandError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

impl From<csv::Error> for CommandError {
    fn from(err: csv::Error) -> Self {
        CommandError::Interchange(err.to_string())
    }
}

impl From<FormErrors> for CommandError {
    fn from(errors: FormErrors) -> Self {
        CommandError::InvalidForm(errors)
    }
}
