use std::collections::HashSet;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use gild_core::{AssertionKind, AssertionSpec, PatchConfig};
use gild_fs::FileSystem;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Suite {
    pub tests: Vec<TestCase>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub inputs: Inputs,
    #[serde(default)]
    pub patches: PatchConfig,
    #[serde(default)]
    pub assertions: Assertions,
}

/// Paths are relative to the suite file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Inputs {
    #[serde(default)]
    pub xr: Option<String>,
    #[serde(default)]
    pub claim: Option<String>,
    #[serde(default)]
    pub composition: Option<String>,
    #[serde(default)]
    pub functions: Option<String>,
    #[serde(default)]
    pub crds: Vec<String>,
    #[serde(default)]
    pub extra_resources: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Assertions {
    #[serde(default)]
    pub diff: Vec<GoldenFile>,
    #[serde(default)]
    pub dyff: Vec<GoldenFile>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoldenFile {
    pub name: String,
    pub expected: String,
    #[serde(default)]
    pub resource: Option<String>,
}

impl Assertions {
    fn files(&self, kind: AssertionKind) -> &[GoldenFile] {
        match kind {
            AssertionKind::ByteExact => &self.diff,
            AssertionKind::Structural => &self.dyff,
        }
    }

    /// Specs of one kind, in suite order.
    pub fn specs(&self, kind: AssertionKind) -> Vec<AssertionSpec> {
        self.files(kind)
            .iter()
            .map(|g| AssertionSpec { name: g.name.clone(), expected: g.expected.clone(), resource: g.resource.clone(), kind })
            .collect()
    }
}

pub fn load_suite(fs: &dyn FileSystem, path: &Path) -> Result<Suite> {
    let bytes = fs.read(path).with_context(|| format!("read suite: {}", path.display()))?;
    let suite: Suite = serde_yaml::from_slice(&bytes).with_context(|| format!("parse suite yaml: {}", path.display()))?;
    validate_suite(&suite)?;
    Ok(suite)
}

pub fn validate_suite(suite: &Suite) -> Result<()> {
    if suite.tests.is_empty() {
        return Err(anyhow!("suite must include at least one test"));
    }
    let mut seen = HashSet::new();
    for case in &suite.tests {
        if case.name.trim().is_empty() {
            return Err(anyhow!("test case missing name"));
        }
        if !seen.insert(case.name.as_str()) {
            return Err(anyhow!("duplicate test case name {:?}", case.name));
        }
        validate_test_case(case).with_context(|| format!("test case {:?}", case.name))?;
    }
    Ok(())
}

fn validate_test_case(case: &TestCase) -> Result<()> {
    match (&case.inputs.xr, &case.inputs.claim) {
        (Some(_), Some(_)) => return Err(anyhow!("inputs.xr and inputs.claim are mutually exclusive")),
        (None, None) => return Err(anyhow!("inputs must include xr or claim")),
        _ => {}
    }
    // Names only need to be unique per engine; diff and dyff report separately.
    for kind in AssertionKind::ALL {
        let mut names = HashSet::new();
        for g in case.assertions.files(kind) {
            if g.name.trim().is_empty() {
                return Err(anyhow!("{} assertion missing name", kind));
            }
            if g.expected.trim().is_empty() {
                return Err(anyhow!("{} assertion {:?} missing expected", kind, g.name));
            }
            if !names.insert(g.name.as_str()) {
                return Err(anyhow!("duplicate {} assertion name {:?}", kind, g.name));
            }
        }
    }
    Ok(())
}
