use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::model::answer::{AnswerOption, parse_marathon_line};
use crate::model::ids::SectionName;

/// Number of answer lines a section carries per question.
pub const CHOICES_PER_QUESTION: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SectionError {
    #[error("section name cannot be empty")]
    EmptyName,

    #[error("{questions} questions need {expected} answers, found {answers}")]
    AnswerCountMismatch {
        questions: usize,
        answers: usize,
        expected: usize,
    },
}

//
// ─── SOURCE ────────────────────────────────────────────────────────────────────
//

/// Files a section was imported from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSource {
    pub questions_file: PathBuf,
    pub answers_file: PathBuf,
}

impl SectionSource {
    #[must_use]
    pub fn new(questions_file: impl Into<PathBuf>, answers_file: impl Into<PathBuf>) -> Self {
        Self {
            questions_file: questions_file.into(),
            answers_file: answers_file.into(),
        }
    }

    #[must_use]
    pub fn questions_file(&self) -> &Path {
        &self.questions_file
    }

    #[must_use]
    pub fn answers_file(&self) -> &Path {
        &self.answers_file
    }
}

//
// ─── SECTION ───────────────────────────────────────────────────────────────────
//

/// A named set of questions with their answer lines.
///
/// Answers come in two encodings that share the same file:
/// - single-section tests treat `answers[i]` as the answer to `questions[i]`
///   and draw distractors from the whole pool;
/// - marathons group four `"<N>. text"` lines per question and mark the
///   correct one with `{ans}`.
///
/// Either way a section holds exactly four answer lines per question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: SectionName,
    source: SectionSource,
    questions: Vec<String>,
    answers: Vec<String>,
}

impl Section {
    /// Builds a section from loaded question and answer lines.
    ///
    /// # Errors
    ///
    /// Returns `SectionError::AnswerCountMismatch` unless there are exactly
    /// `CHOICES_PER_QUESTION` answers per question.
    pub fn new(
        name: SectionName,
        source: SectionSource,
        questions: Vec<String>,
        answers: Vec<String>,
    ) -> Result<Self, SectionError> {
        let expected = questions.len().saturating_mul(CHOICES_PER_QUESTION);
        if answers.len() != expected {
            return Err(SectionError::AnswerCountMismatch {
                questions: questions.len(),
                answers: answers.len(),
                expected,
            });
        }

        Ok(Self {
            name,
            source,
            questions,
            answers,
        })
    }

    #[must_use]
    pub fn name(&self) -> &SectionName {
        &self.name
    }

    #[must_use]
    pub fn source(&self) -> &SectionSource {
        &self.source
    }

    #[must_use]
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// True when there is nothing to ask.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty() || self.answers.is_empty()
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&str> {
        self.questions.get(index).map(String::as_str)
    }

    /// Correct answer of a single-section test (flat encoding).
    #[must_use]
    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(index).map(String::as_str)
    }

    /// Options listed for question `index` (0-based) in marathon encoding,
    /// in file order.
    #[must_use]
    pub fn marathon_options(&self, index: usize) -> Vec<AnswerOption> {
        let number = index + 1;
        self.answers
            .iter()
            .filter_map(|line| parse_marathon_line(line, number))
            .collect()
    }

    /// Text of the first option marked correct for question `index`.
    #[must_use]
    pub fn marathon_correct_answer(&self, index: usize) -> Option<String> {
        self.marathon_options(index)
            .into_iter()
            .find(AnswerOption::is_correct)
            .map(AnswerOption::into_text)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    fn marathon_section() -> Section {
        Section::new(
            SectionName::new("Capitals").unwrap(),
            SectionSource::new("q.txt", "a.txt"),
            lines(&["Capital of France?", "Capital of Spain?"]),
            lines(&[
                "1. optA {ans}",
                "1. optB",
                "1. optC",
                "1. optD",
                "2. optA",
                "2. optB {ans}",
                "2. optC",
                "2. optD",
            ]),
        )
        .unwrap()
    }

    #[test]
    fn rejects_answer_count_other_than_four_per_question() {
        let err = Section::new(
            SectionName::new("Bad").unwrap(),
            SectionSource::new("q.txt", "a.txt"),
            lines(&["Q1", "Q2"]),
            lines(&["A1", "A2"]),
        )
        .unwrap_err();

        assert_eq!(
            err,
            SectionError::AnswerCountMismatch {
                questions: 2,
                answers: 2,
                expected: 8,
            }
        );
    }

    #[test]
    fn empty_section_is_valid_but_empty() {
        let section = Section::new(
            SectionName::new("Empty").unwrap(),
            SectionSource::new("q.txt", "a.txt"),
            Vec::new(),
            Vec::new(),
        )
        .unwrap();
        assert!(section.is_empty());
    }

    #[test]
    fn marathon_answer_is_found_per_question() {
        let section = marathon_section();
        assert_eq!(section.marathon_correct_answer(0).as_deref(), Some("optA"));
        assert_eq!(section.marathon_correct_answer(1).as_deref(), Some("optB"));
        assert_eq!(section.marathon_correct_answer(2), None);
    }

    #[test]
    fn marathon_options_keep_file_order() {
        let section = marathon_section();
        let texts: Vec<_> = section
            .marathon_options(1)
            .iter()
            .map(|o| o.text().to_owned())
            .collect();
        assert_eq!(texts, ["optA", "optB", "optC", "optD"]);
    }

    #[test]
    fn flat_answer_is_indexed_by_question() {
        let section = marathon_section();
        assert_eq!(section.answer(1), Some("1. optB"));
        assert_eq!(section.question(1), Some("Capital of Spain?"));
        assert_eq!(section.question(2), None);
    }
}
