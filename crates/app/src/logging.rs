use std::error::Error;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the subscriber for this thread: everything passing `filter` goes
/// to `log_file`, warnings and errors also go to stderr.
///
/// Logging stops when the returned guard is dropped.
///
/// # Errors
///
/// Returns an error if `filter` is not a valid directive or the log file
/// cannot be opened.
pub fn init(log_file: &Path, filter: &str) -> Result<DefaultGuard, Box<dyn Error>> {
    let filter = EnvFilter::try_new(filter)?;

    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .with(
            fmt::layer()
                .with_writer(std::io::stderr.with_max_level(Level::WARN))
                .without_time()
                .with_target(false),
        );

    Ok(subscriber.set_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_records_to_the_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("quiz.log");

        {
            let _guard = init(&path, "info").unwrap();
            tracing::info!(section = "Capitals", "section loaded");
            tracing::debug!("filtered out");
        }

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("section loaded"));
        assert!(text.contains("section=\"Capitals\""));
        assert!(!text.contains("filtered out"));
    }

    #[test]
    fn rejects_bad_filter() {
        let dir = tempfile::tempdir().unwrap();
        assert!(init(&dir.path().join("quiz.log"), "quiz=loudest").is_err());
    }
}
