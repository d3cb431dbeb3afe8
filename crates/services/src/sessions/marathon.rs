use chrono::{DateTime, Utc};
use rand::Rng;

use quiz_core::model::{QuizReport, RunKind, Scoreboard, Section, SectionName};

use super::choices::marathon_choices;
use super::progress::SessionProgress;
use crate::error::SessionError;

/// Sequential run across several sections, one global status slot per question.
///
/// The cursor is a (section, question) pair; the global index is the sum of
/// the question counts of earlier sections plus the in-section index.
#[derive(Debug, Clone)]
pub struct MarathonSession {
    sections: Vec<Section>,
    section: usize,
    question: usize,
    score: Scoreboard,
    started_at: DateTime<Utc>,
}

impl MarathonSession {
    /// # Errors
    ///
    /// Returns `SessionError::EmptySelection` if no sections are given,
    /// `SessionError::EmptySection` if any of them has nothing to ask.
    pub fn new(sections: Vec<Section>, started_at: DateTime<Utc>) -> Result<Self, SessionError> {
        if sections.is_empty() {
            return Err(SessionError::EmptySelection);
        }
        if let Some(empty) = sections.iter().find(|s| s.is_empty()) {
            return Err(SessionError::EmptySection(empty.name().clone()));
        }

        let total = sections.iter().map(Section::question_count).sum();
        Ok(Self {
            sections,
            section: 0,
            question: 0,
            score: Scoreboard::new(total),
            started_at,
        })
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    pub fn section_names(&self) -> Vec<SectionName> {
        self.sections.iter().map(|s| s.name().clone()).collect()
    }

    #[must_use]
    pub fn uses_section(&self, name: &str) -> bool {
        self.sections.iter().any(|s| s.name().as_str() == name)
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn current_section(&self) -> &Section {
        &self.sections[self.section]
    }

    #[must_use]
    pub fn current_section_index(&self) -> usize {
        self.section
    }

    /// In-section question index.
    #[must_use]
    pub fn question_index(&self) -> usize {
        self.question
    }

    #[must_use]
    pub fn global_index(&self) -> usize {
        self.sections[..self.section]
            .iter()
            .map(Section::question_count)
            .sum::<usize>()
            + self.question
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.score.total()
    }

    #[must_use]
    pub fn score(&self) -> &Scoreboard {
        &self.score
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            current: self.global_index(),
            total: self.total(),
            answered: self.score.answered(),
            correct: self.score.correct(),
        }
    }

    #[must_use]
    pub fn question(&self) -> Option<&str> {
        self.current_section().question(self.question)
    }

    /// # Errors
    ///
    /// Returns `SessionError::MissingCorrectAnswer` if no option of the
    /// current question carries the marker.
    pub fn correct_answer(&self) -> Result<String, SessionError> {
        let section = self.current_section();
        section
            .marathon_correct_answer(self.question)
            .ok_or_else(|| SessionError::MissingCorrectAnswer {
                section: section.name().clone(),
                number: self.question + 1,
            })
    }

    pub fn choices<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        marathon_choices(self.current_section(), self.question, rng)
    }

    /// Score `answer` against the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::MissingCorrectAnswer` if the question has no
    /// marked option; nothing is recorded in that case.
    pub fn check(&mut self, answer: &str) -> Result<bool, SessionError> {
        let correct = self.correct_answer()? == answer;
        self.score.record(self.global_index(), correct);
        Ok(correct)
    }

    /// Move forward, crossing into the next section when needed.
    ///
    /// Returns the new global index, or `None` when the cursor is already on
    /// the last question of the last section.
    pub fn next(&mut self) -> Option<usize> {
        if self.question + 1 < self.current_section().question_count() {
            self.question += 1;
        } else if self.section + 1 < self.sections.len() {
            self.section += 1;
            self.question = 0;
        } else {
            return None;
        }
        Some(self.global_index())
    }

    /// # Errors
    ///
    /// Returns `SessionError::AtFirstQuestion` on the first question of the first section.
    pub fn previous(&mut self) -> Result<usize, SessionError> {
        if self.question > 0 {
            self.question -= 1;
        } else if self.section > 0 {
            self.section -= 1;
            self.question = self.current_section().question_count().saturating_sub(1);
        } else {
            return Err(SessionError::AtFirstQuestion);
        }
        Ok(self.global_index())
    }

    /// # Errors
    ///
    /// Returns `SessionError::OutOfRange` if `index` is not below the total.
    pub fn go_to(&mut self, index: usize) -> Result<usize, SessionError> {
        let total = self.total();
        if index >= total {
            return Err(SessionError::OutOfRange { index, total });
        }

        let mut remaining = index;
        for (position, section) in self.sections.iter().enumerate() {
            let count = section.question_count();
            if remaining < count {
                self.section = position;
                self.question = remaining;
                return Ok(index);
            }
            remaining -= count;
        }
        Err(SessionError::OutOfRange { index, total })
    }

    pub fn reset(&mut self) {
        self.section = 0;
        self.question = 0;
        let total = self.total();
        self.score.reset(total);
    }

    /// # Errors
    ///
    /// Returns `SessionError::Report` if `completed_at` precedes the start.
    pub fn finish(&self, completed_at: DateTime<Utc>) -> Result<QuizReport, SessionError> {
        Ok(QuizReport::new(
            RunKind::Marathon {
                sections: self.section_names(),
            },
            self.score.correct(),
            self.total(),
            self.started_at,
            completed_at,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::SectionSource;
    use quiz_core::time::fixed_now;

    /// Section whose answer for question N is `"<name>-N"`.
    fn section(name: &str, questions: usize) -> Section {
        let qs = (1..=questions).map(|i| format!("{name} Q{i}")).collect();
        let mut answers = Vec::new();
        for n in 1..=questions {
            answers.push(format!("{n}. {name}-{n} {{ans}}"));
            for k in 1..4 {
                answers.push(format!("{n}. wrong{k}"));
            }
        }
        Section::new(
            SectionName::new(name).unwrap(),
            SectionSource::new("q", "a"),
            qs,
            answers,
        )
        .unwrap()
    }

    fn marathon() -> MarathonSession {
        MarathonSession::new(vec![section("A", 2), section("B", 3)], fixed_now()).unwrap()
    }

    #[test]
    fn start_validates_selection() {
        let err = MarathonSession::new(Vec::new(), fixed_now()).unwrap_err();
        assert!(matches!(err, SessionError::EmptySelection));

        let err = MarathonSession::new(vec![section("A", 1), section("E", 0)], fixed_now())
            .unwrap_err();
        assert!(matches!(err, SessionError::EmptySection(name) if name.as_str() == "E"));
    }

    #[test]
    fn next_crosses_sections_and_stops_at_the_end() {
        let mut run = marathon();
        assert_eq!(run.total(), 5);

        assert_eq!(run.next(), Some(1));
        assert_eq!(run.next(), Some(2));
        assert_eq!(run.current_section().name().as_str(), "B");
        assert_eq!(run.question_index(), 0);
        assert_eq!(run.next(), Some(3));
        assert_eq!(run.next(), Some(4));
        assert_eq!(run.next(), None);
        assert_eq!(run.global_index(), 4);
    }

    #[test]
    fn previous_crosses_back_to_last_question() {
        let mut run = marathon();
        run.go_to(2).unwrap();

        assert_eq!(run.previous().unwrap(), 1);
        assert_eq!(run.current_section().name().as_str(), "A");
        assert_eq!(run.question_index(), 1);
        assert_eq!(run.previous().unwrap(), 0);
        assert!(matches!(run.previous(), Err(SessionError::AtFirstQuestion)));
    }

    #[test]
    fn go_to_resolves_section_and_bounds() {
        let mut run = marathon();

        assert_eq!(run.go_to(3).unwrap(), 3);
        assert_eq!(run.current_section_index(), 1);
        assert_eq!(run.question_index(), 1);

        assert!(matches!(
            run.go_to(5),
            Err(SessionError::OutOfRange { index: 5, total: 5 })
        ));
        assert_eq!(run.global_index(), 3);
    }

    #[test]
    fn check_uses_marked_option_and_global_slot() {
        let mut run = marathon();
        run.go_to(2).unwrap();

        assert!(run.check("B-1").unwrap());
        assert!(run.check("B-1").unwrap());
        assert_eq!(run.score().correct(), 1);
        assert!(run.score().status(2).unwrap().is_answered());
        assert!(!run.score().status(0).unwrap().is_answered());
    }

    #[test]
    fn missing_marker_is_an_error() {
        let section = Section::new(
            SectionName::new("NoMark").unwrap(),
            SectionSource::new("q", "a"),
            vec!["Q".into()],
            vec!["1. a".into(), "1. b".into(), "1. c".into(), "1. d".into()],
        )
        .unwrap();
        let mut run = MarathonSession::new(vec![section], fixed_now()).unwrap();

        let err = run.check("a").unwrap_err();
        assert!(matches!(err, SessionError::MissingCorrectAnswer { number: 1, .. }));
        assert_eq!(run.score().answered(), 0);
    }

    #[test]
    fn reset_returns_to_start() {
        let mut run = marathon();
        run.check("A-1").unwrap();
        run.go_to(4).unwrap();

        run.reset();

        assert_eq!(run.global_index(), 0);
        assert_eq!(run.score().correct(), 0);
        assert_eq!(run.score().statuses().len(), 5);
    }

    #[test]
    fn finish_reports_every_section() {
        let mut run = marathon();
        run.check("A-1").unwrap();

        let report = run.finish(fixed_now()).unwrap();
        assert_eq!(report.correct(), 1);
        assert_eq!(report.total(), 5);
        assert!(matches!(report.kind(), RunKind::Marathon { sections } if sections.len() == 2));
    }
}
