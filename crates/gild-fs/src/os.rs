use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::traits::FileSystem;

/// Host filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsFileSystem;

impl OsFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for OsFileSystem {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        std::fs::read(path).with_context(|| format!("open {}", path.display()))
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        std::fs::write(path, bytes).with_context(|| format!("write {}", path.display()))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path).with_context(|| format!("mkdir {}", path.display()))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path).with_context(|| format!("read dir {}", path.display()))? {
            entries.push(entry?.path());
        }
        entries.sort();
        Ok(entries)
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::remove_dir_all(path).with_context(|| format!("remove {}", path.display()))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_and_reads_back() {
        let dir = tempdir().unwrap();
        let fs = OsFileSystem::new();
        let nested = dir.path().join("a").join("b");
        fs.create_dir_all(&nested).unwrap();
        fs.write(&nested.join("x.yaml"), b"kind: Pod\n").unwrap();
        assert_eq!(fs.read(&nested.join("x.yaml")).unwrap(), b"kind: Pod\n");
        assert!(fs.is_dir(&nested));
        assert_eq!(fs.read_dir(&nested).unwrap(), vec![nested.join("x.yaml")]);
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        let err = OsFileSystem::new().read(&missing).unwrap_err();
        assert!(format!("{err:#}").contains("nope.yaml"));
    }
}
