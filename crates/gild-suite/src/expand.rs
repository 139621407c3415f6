use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use gild_core::PathExpander;

/// Expands `~` and `$VAR`, then resolves relative paths against the directory
/// holding the suite file.
#[derive(Clone, Copy, Debug, Default)]
pub struct SuitePathExpander;

impl PathExpander for SuitePathExpander {
    fn expand(&self, base: &Path, path: &str) -> Result<PathBuf> {
        if path.trim().is_empty() {
            bail!("path is empty");
        }
        let expanded = shellexpand::full(path).with_context(|| format!("expand {path}"))?;
        let p = PathBuf::from(expanded.as_ref());
        if p.is_absolute() {
            return Ok(p);
        }
        let dir = base.parent().unwrap_or_else(|| Path::new(""));
        Ok(dir.join(p))
    }
}
