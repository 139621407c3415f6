use std::path::Path;

use anyhow::{anyhow, Result};

use crate::traits::FileSystem;

/// Copy a file, or a directory tree, from `src` to `dest`.
pub fn copy_path(fs: &dyn FileSystem, src: &Path, dest: &Path) -> Result<()> {
    if !fs.is_dir(src) {
        let bytes = fs.read(src)?;
        return fs.write(dest, &bytes);
    }

    fs.create_dir_all(dest)?;
    for child in fs.read_dir(src)? {
        let name = child.file_name().ok_or_else(|| anyhow!("no file name in {}", child.display()))?;
        copy_path(fs, &child, &dest.join(name))?;
    }
    tracing::debug!(src = %src.display(), dest = %dest.display(), "copied directory");
    Ok(())
}
