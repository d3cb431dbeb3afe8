use thiserror::Error;

use crate::model::{ReportError, SectionError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Section(#[from] SectionError),
    #[error(transparent)]
    Report(#[from] ReportError),
}
