use std::fs;
use std::path::Path;

use super::FsRepository;
use crate::repository::{LineRepository, StorageError, content_lines};

impl LineRepository for FsRepository {
    fn read_lines(&self, path: &Path) -> Result<Vec<String>, StorageError> {
        let bytes = fs::read(path).map_err(|e| StorageError::io(path, e))?;
        Ok(content_lines(&String::from_utf8_lossy(&bytes)))
    }

    fn write_lines(&self, path: &Path, lines: &[String]) -> Result<(), StorageError> {
        let mut text = String::new();
        for line in lines {
            text.push_str(line);
            text.push('\n');
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }
        fs::write(path, text).map_err(|e| StorageError::io(path, e))
    }
}
