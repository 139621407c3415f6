use gild_core::{AssertionKind, AssertionResult};

use crate::line_diff::format_unified_diff;
use crate::resolve::ResolvedArtifacts;
use crate::structural::{structural_result, StructuralDiff};

/// One way of comparing expected against actual. Engines never fail; every
/// outcome is an [`AssertionResult`].
pub trait ComparisonEngine: Send + Sync {
    fn kind(&self) -> AssertionKind;
    fn compare(&self, name: &str, artifacts: &ResolvedArtifacts) -> AssertionResult;
}

/// Byte-for-byte equality, explained with a unified diff on mismatch.
#[derive(Clone, Copy, Debug, Default)]
pub struct ByteExactEngine {
    pub colorize: bool,
}

impl ByteExactEngine {
    pub fn new(colorize: bool) -> Self {
        Self { colorize }
    }
}

impl ComparisonEngine for ByteExactEngine {
    fn kind(&self) -> AssertionKind {
        AssertionKind::ByteExact
    }

    fn compare(&self, name: &str, artifacts: &ResolvedArtifacts) -> AssertionResult {
        if artifacts.expected == artifacts.actual {
            return AssertionResult::pass(name, "files match");
        }
        let diff = format_unified_diff(
            &artifacts.expected_path,
            &artifacts.actual_path,
            &artifacts.expected,
            &artifacts.actual,
            self.colorize,
        );
        AssertionResult::fail(name, diff)
    }
}

pub struct StructuralEngine {
    diff: Box<dyn StructuralDiff>,
}

impl StructuralEngine {
    pub fn new(diff: Box<dyn StructuralDiff>) -> Self {
        Self { diff }
    }
}

impl ComparisonEngine for StructuralEngine {
    fn kind(&self) -> AssertionKind {
        AssertionKind::Structural
    }

    fn compare(&self, name: &str, artifacts: &ResolvedArtifacts) -> AssertionResult {
        structural_result(self.diff.as_ref(), name, artifacts)
    }
}
