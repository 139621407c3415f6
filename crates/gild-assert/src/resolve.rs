use std::path::{Path, PathBuf};

use gild_core::{AssertionResult, AssertionSpec, PathExpander, RenderOutputs};
use gild_fs::FileSystem;

/// Everything an assertion needs from the test case run. Shared read-only by all
/// assertions of the case.
pub struct AssertionContext<'a> {
    pub fs: &'a dyn FileSystem,
    pub outputs: &'a RenderOutputs,
    pub suite_file: &'a Path,
    pub expander: &'a dyn PathExpander,
}

/// Golden file and render output of one assertion, both read into memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedArtifacts {
    pub expected_path: PathBuf,
    pub actual_path: PathBuf,
    pub expected: Vec<u8>,
    pub actual: Vec<u8>,
}

impl<'a> AssertionContext<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        outputs: &'a RenderOutputs,
        suite_file: &'a Path,
        expander: &'a dyn PathExpander,
    ) -> Self {
        Self { fs, outputs, suite_file, expander }
    }

    /// Resolve and read both sides of `spec`.
    ///
    /// Any operational problem comes back as an `Error` result the caller appends
    /// and moves past; the expected file is always read before the actual one.
    pub fn resolve(&self, spec: &AssertionSpec) -> Result<ResolvedArtifacts, AssertionResult> {
        let expected_path = self
            .expander
            .expand(self.suite_file, &spec.expected)
            .map_err(|e| AssertionResult::error(&spec.name, format!("invalid expected path: {e:#}")))?;

        let actual_path = match spec.selector() {
            None => self.outputs.render.clone(),
            Some(resource) => self.outputs.rendered.get(resource).cloned().ok_or_else(|| {
                AssertionResult::error(&spec.name, format!("resource {resource:?} not found in render output"))
            })?,
        };

        let expected = self
            .fs
            .read(&expected_path)
            .map_err(|e| AssertionResult::error(&spec.name, format!("read expected file: {e:#}")))?;
        let actual = self
            .fs
            .read(&actual_path)
            .map_err(|e| AssertionResult::error(&spec.name, format!("read actual file: {e:#}")))?;

        Ok(ResolvedArtifacts { expected_path, actual_path, expected, actual })
    }
}
