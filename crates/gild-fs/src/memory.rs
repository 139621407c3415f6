use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, bail, Result};

use crate::traits::FileSystem;

/// In-memory filesystem for tests. Paths are taken as given (no normalisation),
/// so callers should stick to absolute, clean paths.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    inner: Mutex<BTreeMap<PathBuf, Entry>>,
}

#[derive(Clone, Debug)]
enum Entry {
    File(Vec<u8>),
    Dir,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test helper: seed a file, creating its parents.
    pub fn with_file(self, path: impl AsRef<Path>, bytes: impl AsRef<[u8]>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent)?;
        }
        self.write(path, bytes.as_ref())?;
        Ok(self)
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<PathBuf, Entry>>> {
        self.inner.lock().map_err(|_| anyhow!("memory filesystem lock poisoned"))
    }

    fn mkdir_all(entries: &mut BTreeMap<PathBuf, Entry>, path: &Path) -> Result<()> {
        for dir in path.ancestors() {
            if dir.as_os_str().is_empty() {
                continue;
            }
            match entries.get(dir) {
                Some(Entry::File(_)) => bail!("mkdir {}: not a directory", dir.display()),
                Some(Entry::Dir) => {}
                None => {
                    entries.insert(dir.to_path_buf(), Entry::Dir);
                }
            }
        }
        Ok(())
    }
}

impl FileSystem for MemoryFileSystem {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        match self.lock()?.get(path) {
            Some(Entry::File(bytes)) => Ok(bytes.clone()),
            Some(Entry::Dir) => Err(anyhow!("read {}: is a directory", path.display())),
            None => Err(anyhow!("open {}: file does not exist", path.display())),
        }
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let mut entries = self.lock()?;
        if let Some(Entry::Dir) = entries.get(path) {
            bail!("write {}: is a directory", path.display());
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            match entries.get(parent) {
                Some(Entry::Dir) => {}
                Some(Entry::File(_)) => bail!("write {}: parent is not a directory", path.display()),
                None => bail!("write {}: parent directory does not exist", path.display()),
            }
        }
        entries.insert(path.to_path_buf(), Entry::File(bytes.to_vec()));
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let mut entries = self.lock()?;
        Self::mkdir_all(&mut entries, path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let entries = self.lock()?;
        match entries.get(path) {
            Some(Entry::Dir) => {}
            Some(Entry::File(_)) => bail!("read dir {}: not a directory", path.display()),
            None => bail!("read dir {}: file does not exist", path.display()),
        }
        Ok(entries.keys().filter(|p| p.parent() == Some(path)).cloned().collect())
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        let mut entries = self.lock()?;
        entries.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().map(|e| e.contains_key(path)).unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.lock().map(|e| matches!(e.get(path), Some(Entry::Dir))).unwrap_or(false)
    }
}
