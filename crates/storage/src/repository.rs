use quiz_core::model::{SectionName, SectionSource};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            return Self::NotFound {
                path: path.to_path_buf(),
            };
        }
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

//
// ─── INDEX RECORDS ─────────────────────────────────────────────────────────────
//

/// Persisted shape of one section in the index file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexRecord {
    pub questions_file: PathBuf,
    pub answers_file: PathBuf,
}

impl IndexRecord {
    #[must_use]
    pub fn from_source(source: &SectionSource) -> Self {
        Self {
            questions_file: source.questions_file.clone(),
            answers_file: source.answers_file.clone(),
        }
    }

    #[must_use]
    pub fn into_source(self) -> SectionSource {
        SectionSource::new(self.questions_file, self.answers_file)
    }
}

/// Index entry that was present in the file but could not be read as an
/// `IndexRecord`. It is dropped on the next save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    pub name: String,
    pub reason: String,
}

/// Section name to content-file mapping.
///
/// Serializes as a flat JSON object:
/// `{ "<name>": { "questionsFile": "...", "answersFile": "..." } }`.
///
/// Deserialization is per entry: a value that is not a valid record lands in
/// `rejected()` instead of failing the whole index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SectionIndex {
    entries: BTreeMap<String, IndexRecord>,
    #[serde(skip)]
    rejected: Vec<RejectedEntry>,
}

impl<'de> Deserialize<'de> for SectionIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        let mut index = Self::new();
        for (name, value) in raw {
            match serde_json::from_value::<IndexRecord>(value) {
                Ok(record) => {
                    index.entries.insert(name, record);
                }
                Err(e) => index.rejected.push(RejectedEntry {
                    name,
                    reason: e.to_string(),
                }),
            }
        }
        Ok(index)
    }
}

impl SectionIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &SectionName, source: &SectionSource) {
        self.entries
            .insert(name.as_str().to_owned(), IndexRecord::from_source(source));
    }

    pub fn remove(&mut self, name: &str) -> Option<IndexRecord> {
        self.entries.remove(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&IndexRecord> {
        self.entries.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexRecord)> {
        self.entries.iter().map(|(name, record)| (name.as_str(), record))
    }

    /// Entries skipped while reading the index.
    #[must_use]
    pub fn rejected(&self) -> &[RejectedEntry] {
        &self.rejected
    }
}

impl<'a> FromIterator<(&'a SectionName, &'a SectionSource)> for SectionIndex {
    fn from_iter<T: IntoIterator<Item = (&'a SectionName, &'a SectionSource)>>(iter: T) -> Self {
        let mut index = Self::new();
        for (name, source) in iter {
            index.insert(name, source);
        }
        index
    }
}

/// Splits file text into content lines: each line trimmed, blank lines dropped.
#[must_use]
pub fn content_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

/// Repository contract for the section index.
pub trait SectionIndexRepository: Send + Sync {
    /// Read the whole index. A missing index is an empty one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the index exists but cannot be read or parsed.
    fn load_index(&self) -> Result<SectionIndex, StorageError>;

    /// Replace the stored index.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the index cannot be written.
    fn save_index(&self, index: &SectionIndex) -> Result<(), StorageError>;
}

/// Repository contract for newline-delimited question and answer files.
pub trait LineRepository: Send + Sync {
    /// Read content lines (trimmed, blanks skipped).
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the file is missing, or other storage errors.
    fn read_lines(&self, path: &Path) -> Result<Vec<String>, StorageError>;

    /// Write one entry per line.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the file cannot be written.
    fn write_lines(&self, path: &Path, lines: &[String]) -> Result<(), StorageError>;
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

/// In-memory index and files for tests and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    index: Arc<Mutex<SectionIndex>>,
    files: Arc<Mutex<HashMap<PathBuf, Vec<String>>>>,
    index_read_only: Arc<Mutex<bool>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `contents` at `path`, normalized the way files are read.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the store lock is poisoned.
    pub fn put_file(&self, path: impl Into<PathBuf>, contents: &str) -> Result<(), StorageError> {
        let mut guard = self
            .files
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        guard.insert(path.into(), content_lines(contents));
        Ok(())
    }

    /// Make further index writes fail, to exercise error paths.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the store lock is poisoned.
    pub fn set_index_read_only(&self, read_only: bool) -> Result<(), StorageError> {
        let mut guard = self
            .index_read_only
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        *guard = read_only;
        Ok(())
    }
}

impl SectionIndexRepository for InMemoryRepository {
    fn load_index(&self) -> Result<SectionIndex, StorageError> {
        let guard = self
            .index
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(guard.clone())
    }

    fn save_index(&self, index: &SectionIndex) -> Result<(), StorageError> {
        let read_only = *self
            .index_read_only
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        if read_only {
            return Err(StorageError::Unavailable("index is read-only".into()));
        }
        let mut guard = self
            .index
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        *guard = index.clone();
        Ok(())
    }
}

impl LineRepository for InMemoryRepository {
    fn read_lines(&self, path: &Path) -> Result<Vec<String>, StorageError> {
        let guard = self
            .files
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        guard.get(path).cloned().ok_or_else(|| StorageError::NotFound {
            path: path.to_path_buf(),
        })
    }

    fn write_lines(&self, path: &Path, lines: &[String]) -> Result<(), StorageError> {
        let mut guard = self
            .files
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        guard.insert(path.to_path_buf(), lines.to_vec());
        Ok(())
    }
}

/// Aggregates the index and content repositories behind trait objects.
#[derive(Clone)]
pub struct Storage {
    pub index: Arc<dyn SectionIndexRepository>,
    pub lines: Arc<dyn LineRepository>,
}

impl Storage {
    /// Wrap an existing in-memory repository, keeping a handle for test setup.
    #[must_use]
    pub fn from_memory(repo: InMemoryRepository) -> Self {
        let index: Arc<dyn SectionIndexRepository> = Arc::new(repo.clone());
        let lines: Arc<dyn LineRepository> = Arc::new(repo);
        Self { index, lines }
    }
}
