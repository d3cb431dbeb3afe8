use std::fs;

use super::FsRepository;
use crate::repository::{SectionIndex, SectionIndexRepository, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

impl SectionIndexRepository for FsRepository {
    fn load_index(&self) -> Result<SectionIndex, StorageError> {
        let path = self.index_path();
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SectionIndex::new());
            }
            Err(e) => return Err(StorageError::io(path, e)),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(SectionIndex::new());
        }
        serde_json::from_slice(&bytes).map_err(ser)
    }

    fn save_index(&self, index: &SectionIndex) -> Result<(), StorageError> {
        let path = self.index_path();
        let mut json = serde_json::to_string_pretty(index).map_err(ser)?;
        json.push('\n');

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }

        // Write beside the target, then swap, so readers never see half an index.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| StorageError::io(&tmp, e))?;
        fs::rename(&tmp, path).map_err(|e| StorageError::io(path, e))
    }
}
