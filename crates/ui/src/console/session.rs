use std::io::{self, Write};
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use quiz_core::model::QuizReport;
use services::{EventReceiver, MarathonAdvance, QuizError, QuizEvent, QuizManager};

use super::command::{Command, HELP};
use crate::vm::{QuestionVm, ResultVm, RunMode};

/// Delay before moving on after a correct marathon answer.
pub const DEFAULT_ADVANCE_DELAY: Duration = Duration::from_secs(1);

/// Line-oriented front end for one active test or marathon.
///
/// Redraws on `QuestionChanged`, prints `Error` events, and returns the
/// final report once the run ends (by command, by running off the end of a
/// marathon, or at end of input).
pub struct ConsoleSession<'a, R, W> {
    manager: &'a mut QuizManager,
    events: EventReceiver,
    mode: RunMode,
    lines: Lines<R>,
    out: W,
    advance_delay: Duration,
    screen: Option<QuestionVm>,
}

impl<'a, R, W> ConsoleSession<'a, R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(manager: &'a mut QuizManager, mode: RunMode, input: R, out: W) -> Self {
        let events = manager.subscribe();
        Self {
            manager,
            events,
            mode,
            lines: input.lines(),
            out,
            advance_delay: DEFAULT_ADVANCE_DELAY,
            screen: None,
        }
    }

    #[must_use]
    pub fn with_advance_delay(mut self, delay: Duration) -> Self {
        self.advance_delay = delay;
        self
    }

    /// Drive the run until it ends.
    ///
    /// Returns `None` if the run was not active to begin with or could not
    /// be finished.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` if reading input or writing output fails.
    pub async fn run(mut self) -> io::Result<Option<QuizReport>> {
        if !self.is_active() {
            return Ok(None);
        }
        self.render()?;

        loop {
            self.prompt()?;
            let Some(line) = self.lines.next_line().await? else {
                writeln!(self.out)?;
                return self.finish();
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let command = match Command::parse(line) {
                Ok(command) => command,
                Err(message) => {
                    writeln!(self.out, "{message}")?;
                    continue;
                }
            };

            if let Some(report) = self.dispatch(command).await? {
                self.drain_events()?;
                return Ok(Some(report));
            }
            if !self.drain_events()? {
                return Ok(None);
            }
        }
    }

    async fn dispatch(&mut self, command: Command) -> io::Result<Option<QuizReport>> {
        match command {
            Command::Answer(number) => self.answer(number).await,
            Command::Next => match self.mode {
                RunMode::Test => {
                    let moved = self.manager.next_question().map(|_| ());
                    self.navigation(moved)?;
                    Ok(None)
                }
                RunMode::Marathon => self.advance_marathon(),
            },
            Command::Previous => {
                let moved = match self.mode {
                    RunMode::Test => self.manager.previous_question(),
                    RunMode::Marathon => self.manager.previous_marathon_question(),
                };
                self.navigation(moved.map(|_| ()))?;
                Ok(None)
            }
            Command::GoTo(number) => {
                let index = number - 1;
                let moved = match self.mode {
                    RunMode::Test => self.manager.go_to_question(index),
                    RunMode::Marathon => self.manager.go_to_marathon_question(index),
                };
                self.navigation(moved.map(|_| ()))?;
                Ok(None)
            }
            Command::Reset => {
                match self.mode {
                    RunMode::Test => self.manager.reset_test(),
                    RunMode::Marathon => self.manager.reset_marathon(),
                }
                Ok(None)
            }
            Command::End => self.finish(),
            Command::Help => {
                writeln!(self.out, "{HELP}")?;
                Ok(None)
            }
        }
    }

    async fn answer(&mut self, number: usize) -> io::Result<Option<QuizReport>> {
        let Some(choice) = self
            .screen
            .as_ref()
            .and_then(|screen| screen.choice(number))
            .map(str::to_owned)
        else {
            writeln!(self.out, "no choice {number}")?;
            return Ok(None);
        };

        let (expected, checked) = match self.mode {
            RunMode::Test => (
                self.manager.current_answer().map(str::to_owned),
                self.manager.check_answer(&choice),
            ),
            RunMode::Marathon => (
                self.manager.current_marathon_answer(),
                self.manager.check_marathon_answer(&choice),
            ),
        };
        let Ok(correct) = checked else {
            // Published as an Error event.
            return Ok(None);
        };

        if correct {
            writeln!(self.out, "Correct!")?;
        } else {
            writeln!(
                self.out,
                "Wrong. Correct answer: {}",
                expected.unwrap_or_default()
            )?;
        }
        let correct_count = match self.mode {
            RunMode::Test => self.manager.correct_answers(),
            RunMode::Marathon => self.manager.marathon_correct_answers(),
        };
        writeln!(self.out, "{}", crate::vm::score_line(correct_count))?;

        if correct && self.mode == RunMode::Marathon {
            self.out.flush()?;
            tokio::time::sleep(self.advance_delay).await;
            return self.advance_marathon();
        }
        Ok(None)
    }

    fn advance_marathon(&mut self) -> io::Result<Option<QuizReport>> {
        match self.manager.next_marathon_question() {
            Ok(MarathonAdvance::Moved { .. }) => Ok(None),
            Ok(MarathonAdvance::Finished(report)) => {
                self.show_result(&report)?;
                Ok(Some(report))
            }
            Err(_) => Ok(None),
        }
    }

    fn navigation(&mut self, moved: Result<(), QuizError>) -> io::Result<()> {
        match moved {
            // Other failures arrive as Error events.
            Err(err) if err.is_boundary() => writeln!(self.out, "{err}"),
            _ => Ok(()),
        }
    }

    fn finish(&mut self) -> io::Result<Option<QuizReport>> {
        let ended = match self.mode {
            RunMode::Test => self.manager.end_test(),
            RunMode::Marathon => self.manager.end_marathon(),
        };
        match ended {
            Ok(report) => {
                self.show_result(&report)?;
                Ok(Some(report))
            }
            Err(_) => Ok(None),
        }
    }

    /// Print pending events; returns whether the run is still active.
    fn drain_events(&mut self) -> io::Result<bool> {
        let events = services::drain(&mut self.events);
        let mut redraw = false;
        for event in events {
            match event {
                QuizEvent::Error { message } => writeln!(self.out, "error: {message}")?,
                QuizEvent::QuestionChanged { .. } => redraw = true,
                _ => {}
            }
        }

        let active = self.is_active();
        if active && redraw {
            self.render()?;
        }
        Ok(active)
    }

    fn render(&mut self) -> io::Result<()> {
        self.screen = QuestionVm::current(self.manager, self.mode);
        if let Some(screen) = &self.screen {
            writeln!(self.out)?;
            writeln!(self.out, "{screen}")?;
        }
        Ok(())
    }

    fn prompt(&mut self) -> io::Result<()> {
        write!(self.out, "> ")?;
        self.out.flush()
    }

    fn show_result(&mut self, report: &QuizReport) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", ResultVm::from(report))
    }

    fn is_active(&self) -> bool {
        match self.mode {
            RunMode::Test => self.manager.is_test_active(),
            RunMode::Marathon => self.manager.is_marathon_active(),
        }
    }
}
