use std::fmt;

use quiz_core::model::{QuizReport, RunKind};

use crate::vm::time_fmt::{format_datetime, format_elapsed};

/// Final score screen of a test or marathon.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultVm {
    pub title: String,
    pub score_line: String,
    pub elapsed_str: String,
    pub completed_at_str: String,
}

impl From<&QuizReport> for ResultVm {
    fn from(report: &QuizReport) -> Self {
        let title = match report.kind() {
            RunKind::Test { section } => format!("Test finished: {section}"),
            RunKind::Marathon { sections } => {
                let names: Vec<_> = sections.iter().map(ToString::to_string).collect();
                format!("Marathon finished: {}", names.join(", "))
            }
        };
        Self {
            title,
            score_line: format!(
                "{} correct of {} ({:.1}%)",
                report.correct(),
                report.total(),
                report.percentage()
            ),
            elapsed_str: format_elapsed(report.elapsed()),
            completed_at_str: format_datetime(report.completed_at()),
        }
    }
}

impl fmt::Display for ResultVm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.score_line)?;
        write!(f, "Time: {} (finished {})", self.elapsed_str, self.completed_at_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::model::SectionName;
    use quiz_core::time::fixed_now;

    #[test]
    fn percentage_has_one_decimal() {
        let report = QuizReport::new(
            RunKind::Test {
                section: SectionName::new("Rivers").unwrap(),
            },
            2,
            3,
            fixed_now(),
            fixed_now() + Duration::seconds(75),
        )
        .unwrap();

        let vm = ResultVm::from(&report);
        assert_eq!(vm.title, "Test finished: Rivers");
        assert_eq!(vm.score_line, "2 correct of 3 (66.7%)");
        assert_eq!(vm.elapsed_str, "1m 15s");
    }

    #[test]
    fn empty_run_is_zero_percent() {
        let report = QuizReport::new(
            RunKind::Marathon {
                sections: vec![SectionName::new("A").unwrap(), SectionName::new("B").unwrap()],
            },
            0,
            0,
            fixed_now(),
            fixed_now(),
        )
        .unwrap();

        let vm = ResultVm::from(&report);
        assert_eq!(vm.title, "Marathon finished: A, B");
        assert_eq!(vm.score_line, "0 correct of 0 (0.0%)");
    }
}
