use std::fmt;

use quiz_core::model::Section;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionListItemVm {
    pub name: String,
    pub questions: usize,
    pub questions_file: String,
    pub answers_file: String,
}

impl From<&Section> for SectionListItemVm {
    fn from(section: &Section) -> Self {
        Self {
            name: section.name().to_string(),
            questions: section.question_count(),
            questions_file: section.source().questions_file().display().to_string(),
            answers_file: section.source().answers_file().display().to_string(),
        }
    }
}

impl fmt::Display for SectionListItemVm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} questions) {} | {}",
            self.name, self.questions, self.questions_file, self.answers_file
        )
    }
}

#[must_use]
pub fn map_section_list<'a>(sections: impl IntoIterator<Item = &'a Section>) -> Vec<SectionListItemVm> {
    sections.into_iter().map(SectionListItemVm::from).collect()
}

/// Full listing of one section: every question followed by its answer lines.
#[must_use]
pub fn section_detail_lines(section: &Section) -> Vec<String> {
    let mut lines = vec![SectionListItemVm::from(section).to_string()];
    for (i, question) in section.questions().iter().enumerate() {
        lines.push(format!("{}. {question}", i + 1));
        let start = i * quiz_core::model::CHOICES_PER_QUESTION;
        let end = start + quiz_core::model::CHOICES_PER_QUESTION;
        for answer in section.answers().get(start..end).unwrap_or_default() {
            lines.push(format!("     {answer}"));
        }
    }
    lines
}
