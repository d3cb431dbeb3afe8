use serde::{Deserialize, Serialize};

/// Outcome recorded for one question slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QuestionStatus {
    #[default]
    Unanswered,
    Correct,
    Incorrect,
}

impl QuestionStatus {
    #[must_use]
    pub fn from_correct(correct: bool) -> Self {
        if correct { Self::Correct } else { Self::Incorrect }
    }

    /// Numeric form used by status strips: 0 unanswered, 1 correct, -1 incorrect.
    #[must_use]
    pub fn as_i8(self) -> i8 {
        match self {
            QuestionStatus::Unanswered => 0,
            QuestionStatus::Correct => 1,
            QuestionStatus::Incorrect => -1,
        }
    }

    #[must_use]
    pub fn is_answered(self) -> bool {
        !matches!(self, QuestionStatus::Unanswered)
    }
}

/// Per-question statuses plus the running correct count of a run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Scoreboard {
    statuses: Vec<QuestionStatus>,
    correct: usize,
}

impl Scoreboard {
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            statuses: vec![QuestionStatus::Unanswered; total],
            correct: 0,
        }
    }

    /// Records an answer for `slot`.
    ///
    /// The correct count only grows when the slot was still unanswered, so
    /// re-answering a question never counts twice. The slot always keeps the
    /// latest outcome. Returns whether the count grew.
    pub fn record(&mut self, slot: usize, correct: bool) -> bool {
        let Some(status) = self.statuses.get_mut(slot) else {
            return false;
        };
        let counted = correct && !status.is_answered();
        if counted {
            self.correct += 1;
        }
        *status = QuestionStatus::from_correct(correct);
        counted
    }

    /// Clears every slot and the count, resizing to `total`.
    pub fn reset(&mut self, total: usize) {
        self.statuses.clear();
        self.statuses.resize(total, QuestionStatus::Unanswered);
        self.correct = 0;
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.statuses.len()
    }

    #[must_use]
    pub fn answered(&self) -> usize {
        self.statuses.iter().filter(|s| s.is_answered()).count()
    }

    #[must_use]
    pub fn statuses(&self) -> &[QuestionStatus] {
        &self.statuses
    }

    #[must_use]
    pub fn status(&self, slot: usize) -> Option<QuestionStatus> {
        self.statuses.get(slot).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_correct_answer_counts_once() {
        let mut board = Scoreboard::new(3);
        assert!(board.record(1, true));
        assert!(!board.record(1, true));
        assert_eq!(board.correct(), 1);
        assert_eq!(board.status(1), Some(QuestionStatus::Correct));
    }

    #[test]
    fn correct_after_wrong_keeps_count_but_updates_status() {
        let mut board = Scoreboard::new(2);
        assert!(!board.record(0, false));
        assert!(!board.record(0, true));
        assert_eq!(board.correct(), 0);
        assert_eq!(board.status(0), Some(QuestionStatus::Correct));
        assert_eq!(board.answered(), 1);
    }

    #[test]
    fn out_of_range_slot_is_ignored() {
        let mut board = Scoreboard::new(1);
        assert!(!board.record(5, true));
        assert_eq!(board.correct(), 0);
    }

    #[test]
    fn reset_resizes_and_clears() {
        let mut board = Scoreboard::new(2);
        board.record(0, true);
        board.reset(4);
        assert_eq!(board.total(), 4);
        assert_eq!(board.correct(), 0);
        assert!(board.statuses().iter().all(|s| !s.is_answered()));
    }

    #[test]
    fn numeric_form_matches_status_strip() {
        let values: Vec<i8> = [
            QuestionStatus::Unanswered,
            QuestionStatus::Correct,
            QuestionStatus::Incorrect,
        ]
        .iter()
        .map(|s| s.as_i8())
        .collect();
        assert_eq!(values, [0, 1, -1]);
    }
}
