//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{ReportError, SectionError, SectionName};
use storage::repository::StorageError;

/// Errors emitted by `SectionCatalog`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("section already exists: {0}")]
    AlreadyExists(SectionName),
    #[error("section does not exist: {0}")]
    NotFound(String),
    #[error("section is used by the active run: {0}")]
    InUse(SectionName),
    #[error("failed to load section {name}: {source}")]
    Load {
        name: String,
        #[source]
        source: StorageError,
    },
    #[error(transparent)]
    Section(#[from] SectionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the test and marathon state machines.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no test is active")]
    TestInactive,
    #[error("no marathon is active")]
    MarathonInactive,
    #[error("section does not exist: {0}")]
    UnknownSection(String),
    #[error("section has no questions or answers: {0}")]
    EmptySection(SectionName),
    #[error("no sections selected for marathon")]
    EmptySelection,
    #[error("already at the last question")]
    AtLastQuestion,
    #[error("already at the first question")]
    AtFirstQuestion,
    #[error("question index {index} is out of range (total {total})")]
    OutOfRange { index: usize, total: usize },
    #[error("question {number} of section {section} has no option marked {{ans}}")]
    MissingCorrectAnswer { section: SectionName, number: usize },
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Errors surfaced by `QuizManager`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl QuizError {
    /// Navigation refused at a boundary; not worth surfacing to the user.
    #[must_use]
    pub fn is_boundary(&self) -> bool {
        matches!(
            self,
            QuizError::Session(
                SessionError::AtLastQuestion
                    | SessionError::AtFirstQuestion
                    | SessionError::OutOfRange { .. }
            )
        )
    }
}
