use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::model::SectionName;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReportError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("correct answers ({correct}) exceed total questions ({total})")]
    CorrectExceedsTotal { correct: usize, total: usize },
}

/// What a finished run covered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunKind {
    Test { section: SectionName },
    Marathon { sections: Vec<SectionName> },
}

/// Final score of a single-section test or a marathon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizReport {
    kind: RunKind,
    correct: usize,
    total: usize,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl QuizReport {
    /// # Errors
    ///
    /// Returns `ReportError::InvalidTimeRange` if `completed_at` is before `started_at`.
    /// Returns `ReportError::CorrectExceedsTotal` if the counts are inconsistent.
    pub fn new(
        kind: RunKind,
        correct: usize,
        total: usize,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, ReportError> {
        if completed_at < started_at {
            return Err(ReportError::InvalidTimeRange);
        }
        if correct > total {
            return Err(ReportError::CorrectExceedsTotal { correct, total });
        }

        Ok(Self {
            kind,
            correct,
            total,
            started_at,
            completed_at,
        })
    }

    #[must_use]
    pub fn kind(&self) -> &RunKind {
        &self.kind
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.completed_at - self.started_at
    }

    /// Share of correct answers in percent; 0 for an empty run.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 * 100.0 / self.total as f64
    }
}
