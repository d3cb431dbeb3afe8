use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

/// Quiz sections, single-section tests and multi-section marathons.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Section index file
    #[arg(long, env = "QUIZ_INDEX", default_value = "sections.json", global = true)]
    pub index: PathBuf,

    /// Log file (appended)
    #[arg(long, env = "QUIZ_LOG_FILE", default_value = "quiz.log", global = true)]
    pub log_file: PathBuf,

    /// Log filter directive, e.g. `debug` or `services=trace`
    #[arg(long, env = "QUIZ_LOG", default_value = "info", global = true)]
    pub log_level: String,

    /// Pause after a correct marathon answer, in milliseconds
    #[arg(long, env = "QUIZ_ADVANCE_MS", default_value_t = 1000, global = true)]
    pub advance_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    #[must_use]
    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_ms)
    }
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// List sections
    List,
    /// Print every question and answer line of a section
    Show { name: String },
    /// Import a section from a questions file and an answers file
    Add {
        name: String,
        questions: PathBuf,
        answers: PathBuf,
    },
    /// Rename a section and reload it from files
    Edit {
        old_name: String,
        new_name: String,
        questions: PathBuf,
        answers: PathBuf,
    },
    /// Remove a section from the index (files are kept)
    Remove { name: String },
    /// Write a section back out as a questions file and an answers file
    Export {
        name: String,
        questions_out: PathBuf,
        answers_out: PathBuf,
    },
    /// Take a test over one section
    Test { name: String },
    /// Run through several sections in order
    Marathon {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Write demo sections into a directory and register them
    Seed { dir: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_marathon_with_global_flags() {
        let cli = Cli::try_parse_from([
            "quiz",
            "marathon",
            "Capitals",
            "Elements",
            "--index",
            "data/idx.json",
            "--advance-ms",
            "0",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Command::Marathon {
                names: vec!["Capitals".into(), "Elements".into()]
            }
        );
        assert_eq!(cli.index, PathBuf::from("data/idx.json"));
        assert_eq!(cli.advance_delay(), Duration::ZERO);
    }

    #[test]
    fn marathon_needs_a_section() {
        assert!(Cli::try_parse_from(["quiz", "marathon"]).is_err());
    }

    #[test]
    fn add_takes_three_positionals() {
        let cli = Cli::try_parse_from(["quiz", "add", "Geo", "q.txt", "a.txt"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Add {
                name: "Geo".into(),
                questions: "q.txt".into(),
                answers: "a.txt".into(),
            }
        );
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
