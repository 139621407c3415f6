use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gild_core::{AssertionResult, InputCategory, StagedInput};
use gild_fs::FileSystem;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct InputRecord {
    pub category: InputCategory,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub sha256: String,
}

/// What one test case run staged, produced and concluded.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunManifest {
    pub run_id: String,
    pub case: String,
    pub inputs: Vec<InputRecord>,
    pub patched: Option<PathBuf>,
    pub render: Option<PathBuf>,
    pub results: Vec<AssertionResult>,
    pub error: Option<String>,
}

impl RunManifest {
    pub fn new(run_id: impl Into<String>, case: impl Into<String>) -> Self {
        Self { run_id: run_id.into(), case: case.into(), ..Default::default() }
    }

    pub fn record_input(&mut self, fs: &dyn FileSystem, staged: &StagedInput) -> Result<()> {
        let sha256 = digest_path(fs, &staged.destination)?;
        self.inputs.push(InputRecord {
            category: staged.category,
            source: staged.source.clone(),
            destination: staged.destination.clone(),
            sha256,
        });
        Ok(())
    }

    pub fn write_to(&self, fs: &dyn FileSystem, case_dir: &Path) -> Result<PathBuf> {
        let path = case_dir.join(MANIFEST_FILE);
        let bytes = serde_json::to_vec_pretty(self)?;
        fs.create_dir_all(case_dir)?;
        fs.write(&path, &bytes).with_context(|| format!("write manifest {}", path.display()))?;
        Ok(path)
    }
}

/// Hex sha256 of a file, or of a directory tree (relative paths and contents, in path order).
pub fn digest_path(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    let mut hasher = Sha256::new();
    hash_into(fs, path, path, &mut hasher).with_context(|| format!("digest {}", path.display()))?;
    Ok(hex::encode(hasher.finalize()))
}

fn hash_into(fs: &dyn FileSystem, root: &Path, path: &Path, hasher: &mut Sha256) -> Result<()> {
    if !fs.is_dir(path) {
        if path != root {
            let rel = path.strip_prefix(root).unwrap_or(path);
            hasher.update(rel.to_string_lossy().as_bytes());
            hasher.update([0u8]);
        }
        hasher.update(fs.read(path)?);
        return Ok(());
    }
    for child in fs.read_dir(path)? {
        hash_into(fs, root, &child, hasher)?;
    }
    Ok(())
}
