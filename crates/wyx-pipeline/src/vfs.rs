//! File system boundary for the parse job.
//!
//! Reading source text is the only I/O the job performs, and it all goes
//! through this trait so tests can run against an in-memory tree.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{Error, Result};

pub trait FileSystem: Send + Sync {
    /// Reads a file as text. Invalid UTF-8 sequences are replaced with the
    /// replacement character rather than failing; the tokenizer accepts
    /// any sequence of chars.
    fn read_file_text(&self, path: &Path) -> Result<String>;

    fn exists(&self, path: &Path) -> bool;
}

/// The real file system.
#[derive(Debug, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn read_file_text(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// In-memory file tree for tests.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: RwLock<HashMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.files.write().unwrap().insert(path.into(), text.into());
    }

    pub fn remove_file(&self, path: &Path) {
        self.files.write().unwrap().remove(path);
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_file_text(&self, path: &Path) -> Result<String> {
        self.files
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| Error::FileNotFound { path: path.to_path_buf() })
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.read().unwrap().contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_fs_round_trip() {
        let fs = MemoryFileSystem::new();
        fs.add_file("/src/a.wyx", "class A { }");
        assert!(fs.exists(Path::new("/src/a.wyx")));
        assert_eq!(fs.read_file_text(Path::new("/src/a.wyx")).unwrap(), "class A { }");
        fs.remove_file(Path::new("/src/a.wyx"));
        assert!(!fs.exists(Path::new("/src/a.wyx")));
    }

    #[test]
    fn missing_file_is_an_error() {
        let fs = MemoryFileSystem::new();
        let err = fs.read_file_text(Path::new("/nope.wyx")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn os_fs_replaces_invalid_utf8() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"class A { // \xFF\xFE\n}").unwrap();
        file.flush().unwrap();
        let text = OsFileSystem.read_file_text(file.path()).unwrap();
        assert!(text.contains('\u{FFFD}'));
        assert!(text.starts_with("class A"));
    }
}
