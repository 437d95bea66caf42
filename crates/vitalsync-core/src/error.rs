//! Error types for core data operations.

use thiserror::Error;

/// Errors raised by the knowledge store and the data model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A document was submitted without a title.
    #[error("document title must not be empty")]
    EmptyTitle,

    /// A document was submitted without content.
    #[error("document content must not be empty")]
    EmptyContent,

    /// A document with the same id is already stored.
    #[error("document '{0}' already exists")]
    DuplicateId(String),

    /// A category label did not match any known category.
    #[error("unknown category '{0}' (expected one of: Lab Report, Diet Plan, Workout Routine, Medical History, Other)")]
    UnknownCategory(String),

    /// A view name did not match any known view.
    #[error("unknown view '{0}' (expected one of: dashboard, chat, knowledge, tracker)")]
    UnknownView(String),
}
