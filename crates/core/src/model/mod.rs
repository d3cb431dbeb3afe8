mod answer;
mod ids;
mod report;
mod section;
mod status;

pub use answer::{AnswerOption, CORRECT_MARKER, parse_marathon_line};
pub use ids::SectionName;
pub use report::{QuizReport, ReportError, RunKind};
pub use section::{CHOICES_PER_QUESTION, Section, SectionError, SectionSource};
pub use status::{QuestionStatus, Scoreboard};
