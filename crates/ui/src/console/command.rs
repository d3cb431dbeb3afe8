/// One line of console input during a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Pick a choice by its 1-based menu number.
    Answer(usize),
    Next,
    Previous,
    /// Jump to a 1-based question number.
    GoTo(usize),
    Reset,
    End,
    Help,
}

impl Command {
    /// # Errors
    ///
    /// Returns a short message describing why the line was not understood.
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err("empty input; type h for help".to_owned());
        };
        let arg = words.next();
        if words.next().is_some() {
            return Err(format!("too many arguments: {line}"));
        }

        if let Ok(number) = head.parse::<usize>() {
            return match arg {
                None if number > 0 => Ok(Self::Answer(number)),
                None => Err("choices start at 1".to_owned()),
                Some(_) => Err(format!("unexpected argument after {number}")),
            };
        }

        let command = match (head.to_ascii_lowercase().as_str(), arg) {
            ("n" | "next", None) => Self::Next,
            ("p" | "prev" | "previous", None) => Self::Previous,
            ("r" | "reset", None) => Self::Reset,
            ("e" | "end" | "q" | "quit", None) => Self::End,
            ("h" | "help" | "?", None) => Self::Help,
            ("g" | "goto", Some(arg)) => match arg.parse::<usize>() {
                Ok(number) if number > 0 => Self::GoTo(number),
                _ => return Err(format!("not a question number: {arg}")),
            },
            ("g" | "goto", None) => return Err("goto needs a question number".to_owned()),
            _ => return Err(format!("unknown command: {line}")),
        };
        Ok(command)
    }
}

pub const HELP: &str = "\
  <number>   answer with that choice
  n          next question
  p          previous question
  g <number> go to question
  r          reset the run
  e          end the run and show the score
  h          this help";
