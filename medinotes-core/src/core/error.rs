//! Error types for the Medinotes core library.

use thiserror::Error;

/// All errors that can occur within the Medinotes core library.
///
/// Missing fields and failed validation are deliberately absent: a missing
/// field resolves to a default and validation reports through [`Validation`](crate::Validation).
#[derive(Debug, Error)]
pub enum MedinotesError {
    /// A template was requested under a tag that has not been registered.
    #[error("Unknown template type: {tag}. Valid types are: {}", valid.join(", "))]
    UnknownTemplateType { tag: String, valid: Vec<String> },

    /// A template definition was rejected at registration time.
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A template definition or snapshot could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias that pins the error type to [`MedinotesError`].
pub type Result<T> = std::result::Result<T, MedinotesError>;

impl MedinotesError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::UnknownTemplateType { tag, valid } => {
                format!("Unknown note type '{tag}' (choose one of: {})", valid.join(", "))
            }
            Self::InvalidTemplate(msg) => format!("Template rejected: {msg}"),
            Self::Io(e) => format!("File error: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
        }
    }
}
