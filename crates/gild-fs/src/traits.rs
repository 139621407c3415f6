use std::path::{Path, PathBuf};

/// Every read and write of a test case run goes through this seam, so a run can
/// be driven entirely in memory.
pub trait FileSystem: Send + Sync {
    fn read(&self, path: &Path) -> anyhow::Result<Vec<u8>>;

    /// Writes `bytes`, replacing any existing file. The parent directory must exist.
    fn write(&self, path: &Path, bytes: &[u8]) -> anyhow::Result<()>;

    fn create_dir_all(&self, path: &Path) -> anyhow::Result<()>;

    /// Direct children of a directory, sorted by path.
    fn read_dir(&self, path: &Path) -> anyhow::Result<Vec<PathBuf>>;

    fn remove_dir_all(&self, path: &Path) -> anyhow::Result<()>;

    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;
}
