/// Inline tag marking the correct option in a marathon answers file.
pub const CORRECT_MARKER: &str = "{ans}";

/// One multiple-choice option decoded from a marathon answer line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    text: String,
    is_correct: bool,
}

impl AnswerOption {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}

/// Decodes a marathon answer line such as `"3. Paris {ans}"`.
///
/// The line belongs to question `question_number` (1-based) when it starts
/// with `"<question_number>."`. That prefix and the correctness marker are
/// stripped and the remaining text is trimmed.
///
/// Returns `None` for lines of other questions.
#[must_use]
pub fn parse_marathon_line(line: &str, question_number: usize) -> Option<AnswerOption> {
    let prefix = format!("{question_number}.");
    let rest = line.strip_prefix(prefix.as_str())?;
    let is_correct = rest.contains(CORRECT_MARKER);
    let text = rest.replace(CORRECT_MARKER, "").trim().to_owned();
    Some(AnswerOption { text, is_correct })
}
