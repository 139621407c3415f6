use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gild_core::AssertionResult;
use serde::Deserialize;

use crate::resolve::ResolvedArtifacts;

pub type Document = serde_yaml::Value;

/// A parsed YAML stream plus the path it came from, as handed to the diff capability.
#[derive(Clone, Debug, PartialEq)]
pub struct InputFile {
    pub location: PathBuf,
    pub documents: Vec<Document>,
}

impl InputFile {
    pub fn parse(location: &Path, bytes: &[u8]) -> Result<Self> {
        Ok(Self { location: location.to_path_buf(), documents: load_documents(bytes)? })
    }
}

/// Parse a multi-document YAML stream. Empty documents (a bare `---`) are dropped.
pub fn load_documents(bytes: &[u8]) -> Result<Vec<Document>> {
    let mut documents = Vec::new();
    for (i, de) in serde_yaml::Deserializer::from_slice(bytes).enumerate() {
        let doc = Document::deserialize(de).with_context(|| format!("document {}", i + 1))?;
        if !doc.is_null() {
            documents.push(doc);
        }
    }
    Ok(documents)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetailKind {
    Addition,
    Removal,
    Modification,
    OrderChange,
    DocumentAddition,
    DocumentRemoval,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Detail {
    pub kind: DetailKind,
    pub from: Option<Document>,
    pub to: Option<Document>,
}

/// All differences found at one path of one document.
#[derive(Clone, Debug, PartialEq)]
pub struct DiffEntry {
    /// `apiVersion/kind/name` label of the document, when it has one.
    pub document: Option<String>,
    /// Slash separated location inside the document, `/` for the root.
    pub path: String,
    pub details: Vec<Detail>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DiffReport {
    pub from: PathBuf,
    pub to: PathBuf,
    pub diffs: Vec<DiffEntry>,
}

impl DiffReport {
    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }
}

/// Semantic comparison of two YAML streams.
pub trait StructuralDiff: Send + Sync {
    fn compare(&self, from: &InputFile, to: &InputFile) -> Result<DiffReport>;
    fn write_report(&self, report: &DiffReport, out: &mut dyn std::io::Write) -> Result<()>;
}

/// Run the structural capability over resolved artifacts and fold the outcome
/// into a single result.
pub fn structural_result(diff: &dyn StructuralDiff, name: &str, artifacts: &ResolvedArtifacts) -> AssertionResult {
    let from = match InputFile::parse(&artifacts.expected_path, &artifacts.expected) {
        Ok(f) => f,
        Err(e) => return AssertionResult::error(name, format!("load expected: {e:#}")),
    };
    let to = match InputFile::parse(&artifacts.actual_path, &artifacts.actual) {
        Ok(f) => f,
        Err(e) => return AssertionResult::error(name, format!("load actual: {e:#}")),
    };

    let report = match diff.compare(&from, &to) {
        Ok(r) => r,
        Err(e) => return AssertionResult::error(name, format!("dyff compare: {e:#}")),
    };
    if report.is_empty() {
        return AssertionResult::pass(name, "files match");
    }

    let mut buf = Vec::new();
    if let Err(e) = diff.write_report(&report, &mut buf) {
        return AssertionResult::error(name, format!("dyff report: {e:#}"));
    }
    AssertionResult::fail(name, String::from_utf8_lossy(&buf).into_owned())
}
