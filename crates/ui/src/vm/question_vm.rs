use std::fmt;

use quiz_core::model::QuestionStatus;
use services::{QuizManager, SessionProgress};

/// Which run a console screen is driving.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    Test,
    Marathon,
}

/// One question screen: heading, prompt, numbered choices and score line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub heading: String,
    pub section: String,
    pub prompt: String,
    pub choices: Vec<String>,
    pub score_line: String,
    pub status_strip: String,
    pub last: bool,
}

impl QuestionVm {
    /// Snapshot the current question of `mode`, drawing fresh shuffled choices.
    ///
    /// Returns `None` when that run is not active.
    pub fn current(manager: &mut QuizManager, mode: RunMode) -> Option<Self> {
        match mode {
            RunMode::Test => Self::for_test(manager),
            RunMode::Marathon => Self::for_marathon(manager),
        }
    }

    fn for_test(manager: &mut QuizManager) -> Option<Self> {
        let progress = manager.test_progress()?;
        let section = manager.current_section()?.to_string();
        let prompt = manager.current_question()?.to_owned();
        let choices = manager.current_choices();
        Some(Self {
            heading: question_heading(progress.current, progress.total),
            section,
            prompt,
            choices,
            score_line: progress_line(&progress),
            status_strip: status_strip(manager.statuses(), progress.current),
            last: progress.is_last(),
        })
    }

    fn for_marathon(manager: &mut QuizManager) -> Option<Self> {
        let progress = manager.marathon_progress()?;
        let section = manager.marathon_section_name()?.to_string();
        let prompt = manager.current_marathon_question()?.to_owned();
        let choices = manager.current_marathon_choices();
        Some(Self {
            heading: question_heading(progress.current, progress.total),
            section,
            prompt,
            choices,
            score_line: progress_line(&progress),
            status_strip: status_strip(manager.marathon_statuses(), progress.current),
            last: progress.is_last(),
        })
    }

    /// Choice text for a 1-based menu number.
    #[must_use]
    pub fn choice(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|i| self.choices.get(i))
            .map(String::as_str)
    }
}

impl fmt::Display for QuestionVm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.heading, self.section)?;
        writeln!(f, "{}", if self.last { " (last)" } else { "" })?;
        writeln!(f, "{}", self.status_strip)?;
        writeln!(f)?;
        writeln!(f, "{}", self.prompt)?;
        for (i, choice) in self.choices.iter().enumerate() {
            writeln!(f, "  {}) {choice}", i + 1)?;
        }
        write!(f, "{}", self.score_line)
    }
}

#[must_use]
pub fn question_heading(index: usize, total: usize) -> String {
    format!("Question {} of {total}", index + 1)
}

#[must_use]
pub fn score_line(correct: usize) -> String {
    format!("Correct answers: {correct}")
}

/// Score line with the count of questions still open.
#[must_use]
pub fn progress_line(progress: &SessionProgress) -> String {
    format!("{} ({} unanswered)", score_line(progress.correct), progress.remaining())
}

/// One mark per question (`+` correct, `-` incorrect, `.` open), current one bracketed.
#[must_use]
pub fn status_strip(statuses: &[QuestionStatus], current: usize) -> String {
    statuses
        .iter()
        .enumerate()
        .map(|(i, status)| {
            let mark = match status {
                QuestionStatus::Correct => '+',
                QuestionStatus::Incorrect => '-',
                QuestionStatus::Unanswered => '.',
            };
            if i == current {
                format!("[{mark}]")
            } else {
                mark.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_is_one_based() {
        assert_eq!(question_heading(0, 5), "Question 1 of 5");
        assert_eq!(question_heading(4, 5), "Question 5 of 5");
    }

    #[test]
    fn strip_marks_current_slot() {
        let statuses = [
            QuestionStatus::Correct,
            QuestionStatus::Incorrect,
            QuestionStatus::Unanswered,
        ];
        assert_eq!(status_strip(&statuses, 2), "+ - [.]");
    }

    #[test]
    fn progress_line_counts_open_questions() {
        let progress = SessionProgress {
            current: 1,
            total: 4,
            answered: 3,
            correct: 2,
        };
        assert_eq!(progress_line(&progress), "Correct answers: 2 (1 unanswered)");
    }

    #[test]
    fn last_question_is_flagged_in_heading() {
        let vm = QuestionVm {
            heading: question_heading(2, 3),
            section: "Rivers".into(),
            prompt: "Q".into(),
            choices: vec![],
            score_line: score_line(0),
            status_strip: String::new(),
            last: true,
        };
        assert!(vm.to_string().starts_with("Question 3 of 3 [Rivers] (last)\n"));
    }

    #[test]
    fn choice_numbers_start_at_one() {
        let vm = QuestionVm {
            heading: question_heading(0, 1),
            section: "S".into(),
            prompt: "Q".into(),
            choices: vec!["a".into(), "b".into()],
            score_line: score_line(0),
            status_strip: String::new(),
            last: true,
        };
        assert_eq!(vm.choice(1), Some("a"));
        assert_eq!(vm.choice(0), None);
        assert_eq!(vm.choice(3), None);
    }
}
