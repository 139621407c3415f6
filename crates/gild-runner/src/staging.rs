use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use gild_core::{InputCategory, StagedInput};
use gild_fs::{copy_path, FileSystem};
use tracing::debug;

/// Copies test case inputs into `<case>/inputs/<category>/`.
pub struct InputStager<'a> {
    fs: &'a dyn FileSystem,
    inputs_dir: PathBuf,
}

impl<'a> InputStager<'a> {
    pub fn new(fs: &'a dyn FileSystem, inputs_dir: impl Into<PathBuf>) -> Self {
        Self { fs, inputs_dir: inputs_dir.into() }
    }

    /// Copy a file or directory to `<inputs>/<category>/<base name of src>`.
    pub fn copy_input(&self, src: &Path, category: InputCategory) -> Result<StagedInput> {
        let category_dir = self.inputs_dir.join(category.as_str());
        self.fs
            .create_dir_all(&category_dir)
            .with_context(|| format!("failed to create {category} directory"))?;

        let name = src.file_name().ok_or_else(|| anyhow!("failed to copy {category}: no file name in {}", src.display()))?;
        let dest = category_dir.join(name);
        copy_path(self.fs, src, &dest).with_context(|| format!("failed to copy {category}"))?;

        debug!(%category, dest = %dest.display(), "staged input");
        Ok(StagedInput { source: src.to_path_buf(), destination: dest, category })
    }

    /// Copy `src` to exactly `dest`, creating parent directories. For callers that
    /// pick the destination name themselves.
    pub fn copy_to_path(&self, src: &Path, dest: &Path) -> Result<PathBuf> {
        if let Some(parent) = dest.parent() {
            self.fs
                .create_dir_all(parent)
                .with_context(|| format!("failed to create directory for {}", dest.display()))?;
        }
        copy_path(self.fs, src, dest).with_context(|| format!("failed to copy to {}", dest.display()))?;

        debug!(dest = %dest.display(), "copied");
        Ok(dest.to_path_buf())
    }

    /// Stage CRD files and directories under `<inputs>/crds/`, renaming
    /// same-named sources so none overwrites another.
    pub fn stage_crds(&self, sources: &[PathBuf]) -> Result<Vec<StagedInput>> {
        let names = unique_base_names(Some(sources)).unwrap_or_default();
        let crds_dir = self.inputs_dir.join(InputCategory::Crds.as_str());
        sources
            .iter()
            .zip(names)
            .map(|(src, name)| {
                let dest = self.copy_to_path(src, &crds_dir.join(name))?;
                Ok(StagedInput { source: src.clone(), destination: dest, category: InputCategory::Crds })
            })
            .collect()
    }
}

/// A distinct base name per path, same length and order: `aws/xrd.yaml` and
/// `gcp/xrd.yaml` become `xrd.yaml` and `xrd_1.yaml`. `None` stays `None`.
pub fn unique_base_names<P: AsRef<Path>>(paths: Option<&[P]>) -> Option<Vec<String>> {
    let paths = paths?;
    let mut seen: HashMap<String, usize> = HashMap::new();
    let names = paths
        .iter()
        .map(|p| {
            let base = base_name(p.as_ref());
            let (stem, ext) = split_ext(&base);
            let n = seen.entry(stem.to_string()).or_insert(0);
            let name = if *n > 0 { format!("{stem}_{n}{ext}") } else { base.clone() };
            *n += 1;
            name
        })
        .collect();
    Some(names)
}

fn base_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.to_string_lossy().into_owned(),
    }
}

// The extension starts at the last dot of the base name, so `.hidden` is all extension.
fn split_ext(base: &str) -> (&str, &str) {
    match base.rfind('.') {
        Some(i) => base.split_at(i),
        None => (base, ""),
    }
}
