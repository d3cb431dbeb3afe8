use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::repository::{LineRepository, SectionIndexRepository, Storage};

mod index_file;
mod line_file;

/// Filesystem-backed repository: a JSON index plus plain-text content files.
///
/// Content file paths are used as given; relative paths resolve against the
/// process working directory, the same as paths typed by the user.
#[derive(Debug, Clone)]
pub struct FsRepository {
    index_path: PathBuf,
}

impl FsRepository {
    #[must_use]
    pub fn new(index_path: impl Into<PathBuf>) -> Self {
        Self {
            index_path: index_path.into(),
        }
    }

    #[must_use]
    pub fn index_path(&self) -> &Path {
        &self.index_path
    }
}

impl Storage {
    /// Build a `Storage` whose index lives at `index_path`.
    #[must_use]
    pub fn filesystem(index_path: impl Into<PathBuf>) -> Self {
        let repo = FsRepository::new(index_path);
        let index: Arc<dyn SectionIndexRepository> = Arc::new(repo.clone());
        let lines: Arc<dyn LineRepository> = Arc::new(repo);
        Self { index, lines }
    }
}
