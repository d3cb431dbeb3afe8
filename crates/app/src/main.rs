mod commands;
mod config;
mod logging;

use clap::Parser;
use services::{Clock, LogContext, QuizManager};
use storage::repository::Storage;

use crate::config::Cli;

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Held for the whole run; dropping it flushes and detaches the log file.
    let _log_guard = logging::init(&cli.log_file, &cli.log_level)?;
    tracing::info!(index = %cli.index.display(), "starting");

    let storage = Storage::filesystem(&cli.index);
    let mut manager = QuizManager::open(&storage, Clock::system(), LogContext::new("quiz_manager"))?;

    let advance_delay = cli.advance_delay();
    let result = commands::execute(cli.command, &mut manager, storage.lines.as_ref(), advance_delay).await;

    tracing::info!(ok = result.is_ok(), "shutting down");
    result
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
