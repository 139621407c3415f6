use std::path::{Path, PathBuf};

use anyhow::Result;

/// Resolves a path written in a suite file against that file's location.
pub trait PathExpander: Send + Sync {
    fn expand(&self, base: &Path, path: &str) -> Result<PathBuf>;
}

impl<F> PathExpander for F
where
    F: Fn(&Path, &str) -> Result<PathBuf> + Send + Sync,
{
    fn expand(&self, base: &Path, path: &str) -> Result<PathBuf> {
        self(base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_expanders() {
        let join = |base: &Path, path: &str| -> Result<PathBuf> { Ok(base.parent().unwrap_or(base).join(path)) };
        let expander: &dyn PathExpander = &join;
        let out = expander.expand(Path::new("/suite/test.yaml"), "golden.yaml").unwrap();
        assert_eq!(out, PathBuf::from("/suite/golden.yaml"));
    }
}
