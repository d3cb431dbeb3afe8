use std::error::Error;
use std::io;
use std::path::Path;
use std::time::Duration;

use tokio::io::BufReader;

use quiz_core::model::SectionSource;
use services::QuizManager;
use storage::repository::LineRepository;
use ui::vm::{ResultVm, map_section_list, section_detail_lines};
use ui::{ConsoleSession, RunMode};

use crate::config::Command;

/// Demo sections written by `seed`: name, file stem, questions, marathon-encoded answers.
const DEMO_SECTIONS: &[(&str, &str, &[&str], &[&str])] = &[
    (
        "Capitals",
        "capitals",
        &["Capital of France?", "Capital of Japan?", "Capital of Canada?"],
        &[
            "1. Paris {ans}",
            "1. Lyon",
            "1. Marseille",
            "1. Nice",
            "2. Osaka",
            "2. Tokyo {ans}",
            "2. Kyoto",
            "2. Nagoya",
            "3. Toronto",
            "3. Vancouver",
            "3. Montreal",
            "3. Ottawa {ans}",
        ],
    ),
    (
        "Elements",
        "elements",
        &["Symbol for gold?", "Symbol for sodium?"],
        &[
            "1. Ag",
            "1. Au {ans}",
            "1. Gd",
            "1. Go",
            "2. So",
            "2. Sd",
            "2. Na {ans}",
            "2. S",
        ],
    ),
];

/// Execute one subcommand against an opened manager.
///
/// # Errors
///
/// Returns the first failure from the manager, the storage layer or the console.
pub async fn execute(
    command: Command,
    manager: &mut QuizManager,
    lines: &dyn LineRepository,
    advance_delay: Duration,
) -> Result<(), Box<dyn Error>> {
    match command {
        Command::List => {
            let items = map_section_list(manager.sections());
            if items.is_empty() {
                println!("no sections");
            }
            for item in items {
                println!("{item}");
            }
        }
        Command::Show { name } => {
            let section = manager
                .section(&name)
                .ok_or_else(|| format!("section does not exist: {name}"))?;
            for line in section_detail_lines(section) {
                println!("{line}");
            }
        }
        Command::Add {
            name,
            questions,
            answers,
        } => {
            let added = manager.add_section(&name, SectionSource::new(questions, answers))?;
            println!("added {added}");
        }
        Command::Edit {
            old_name,
            new_name,
            questions,
            answers,
        } => {
            let edited =
                manager.edit_section(&old_name, &new_name, SectionSource::new(questions, answers))?;
            println!("updated {edited}");
        }
        Command::Remove { name } => {
            let removed = manager.remove_section(&name)?;
            println!("removed {removed}");
        }
        Command::Export {
            name,
            questions_out,
            answers_out,
        } => {
            manager.export_section(&name, &questions_out, &answers_out)?;
            println!(
                "exported {name} to {} and {}",
                questions_out.display(),
                answers_out.display()
            );
        }
        Command::Test { name } => {
            manager.start_section_test(&name)?;
            run_console(manager, RunMode::Test, advance_delay).await?;
        }
        Command::Marathon { names } => {
            manager.start_marathon(names.as_slice())?;
            run_console(manager, RunMode::Marathon, advance_delay).await?;
        }
        Command::Seed { dir } => {
            for name in seed(manager, lines, &dir)? {
                println!("added {name}");
            }
        }
    }
    Ok(())
}

async fn run_console(
    manager: &mut QuizManager,
    mode: RunMode,
    advance_delay: Duration,
) -> io::Result<()> {
    let input = BufReader::new(tokio::io::stdin());
    let report = ConsoleSession::new(manager, mode, input, io::stdout())
        .with_advance_delay(advance_delay)
        .run()
        .await?;
    if let Some(report) = report {
        tracing::info!(
            correct = report.correct(),
            total = report.total(),
            "{}",
            ResultVm::from(&report).title
        );
    }
    Ok(())
}

/// Write the demo files into `dir` and register any demo section not yet present.
///
/// # Errors
///
/// Returns an error if a file cannot be written or a section cannot be added.
pub fn seed(
    manager: &mut QuizManager,
    lines: &dyn LineRepository,
    dir: &Path,
) -> Result<Vec<String>, Box<dyn Error>> {
    let mut added = Vec::new();
    for (name, stem, questions, answers) in DEMO_SECTIONS {
        if manager.section(name).is_some() {
            continue;
        }
        let questions_file = dir.join(format!("{stem}_questions.txt"));
        let answers_file = dir.join(format!("{stem}_answers.txt"));
        lines.write_lines(&questions_file, &to_lines(questions))?;
        lines.write_lines(&answers_file, &to_lines(answers))?;

        let name = manager.add_section(name, SectionSource::new(questions_file, answers_file))?;
        added.push(name.to_string());
    }
    Ok(added)
}

fn to_lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}
