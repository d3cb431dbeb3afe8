use chrono::{DateTime, Utc};
use rand::Rng;

use quiz_core::model::{QuizReport, RunKind, Scoreboard, Section, SectionName};

use super::choices::single_section_choices;
use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── SINGLE-SECTION TEST ───────────────────────────────────────────────────────
//

/// In-memory test over one section.
///
/// Holds a snapshot of the section taken at start, a cursor, and one
/// status slot per question.
#[derive(Debug, Clone)]
pub struct TestSession {
    section: Section,
    current: usize,
    score: Scoreboard,
    started_at: DateTime<Utc>,
}

impl TestSession {
    /// Start at question 0 with an empty score.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptySection` if the section has no questions or answers.
    pub fn new(section: Section, started_at: DateTime<Utc>) -> Result<Self, SessionError> {
        if section.is_empty() {
            return Err(SessionError::EmptySection(section.name().clone()));
        }

        let score = Scoreboard::new(section.question_count());
        Ok(Self {
            section,
            current: 0,
            score,
            started_at,
        })
    }

    #[must_use]
    pub fn section(&self) -> &Section {
        &self.section
    }

    #[must_use]
    pub fn section_name(&self) -> &SectionName {
        self.section.name()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.section.question_count()
    }

    #[must_use]
    pub fn score(&self) -> &Scoreboard {
        &self.score
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            current: self.current,
            total: self.total(),
            answered: self.score.answered(),
            correct: self.score.correct(),
        }
    }

    #[must_use]
    pub fn question(&self) -> Option<&str> {
        self.section.question(self.current)
    }

    #[must_use]
    pub fn correct_answer(&self) -> Option<&str> {
        self.section.answer(self.current)
    }

    pub fn choices<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        single_section_choices(&self.section, self.current, rng)
    }

    /// Score `answer` against the current question and return whether it was right.
    pub fn check(&mut self, answer: &str) -> bool {
        let correct = self.correct_answer() == Some(answer);
        self.score.record(self.current, correct);
        correct
    }

    /// # Errors
    ///
    /// Returns `SessionError::AtLastQuestion` on the last question.
    pub fn next(&mut self) -> Result<usize, SessionError> {
        if self.current + 1 >= self.total() {
            return Err(SessionError::AtLastQuestion);
        }
        self.current += 1;
        Ok(self.current)
    }

    /// # Errors
    ///
    /// Returns `SessionError::AtFirstQuestion` on the first question.
    pub fn previous(&mut self) -> Result<usize, SessionError> {
        if self.current == 0 {
            return Err(SessionError::AtFirstQuestion);
        }
        self.current -= 1;
        Ok(self.current)
    }

    /// # Errors
    ///
    /// Returns `SessionError::OutOfRange` if `index` is not a question of this section.
    pub fn go_to(&mut self, index: usize) -> Result<usize, SessionError> {
        let total = self.total();
        if index >= total {
            return Err(SessionError::OutOfRange { index, total });
        }
        self.current = index;
        Ok(self.current)
    }

    pub fn reset(&mut self) {
        self.current = 0;
        self.score.reset(self.total());
    }

    /// Build the final report for this run.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Report` if `completed_at` precedes the start.
    pub fn finish(&self, completed_at: DateTime<Utc>) -> Result<QuizReport, SessionError> {
        Ok(QuizReport::new(
            RunKind::Test {
                section: self.section.name().clone(),
            },
            self.score.correct(),
            self.total(),
            self.started_at,
            completed_at,
        )?)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
