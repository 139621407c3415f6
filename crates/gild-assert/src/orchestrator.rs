use gild_core::{AssertionKind, AssertionResult, AssertionSpec};
use tracing::debug;

use crate::engine::ComparisonEngine;
use crate::resolve::AssertionContext;

/// Routes assertion specs to the engine registered for their kind.
#[derive(Default)]
pub struct Orchestrator {
    engines: Vec<Box<dyn ComparisonEngine>>,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `engine`, replacing any engine already registered for its kind.
    pub fn with_engine(mut self, engine: Box<dyn ComparisonEngine>) -> Self {
        self.engines.retain(|e| e.kind() != engine.kind());
        self.engines.push(engine);
        self
    }

    pub fn engine(&self, kind: AssertionKind) -> Option<&dyn ComparisonEngine> {
        self.engines.iter().find(|e| e.kind() == kind).map(|e| e.as_ref())
    }

    /// One result per spec, in spec order. A failing or erroring spec never
    /// stops the ones after it.
    pub fn evaluate(&self, ctx: &AssertionContext<'_>, specs: &[AssertionSpec]) -> Vec<AssertionResult> {
        specs.iter().map(|spec| self.evaluate_one(ctx, spec)).collect()
    }

    /// Evaluate every kind in [`AssertionKind::ALL`] order and concatenate.
    pub fn evaluate_all(&self, ctx: &AssertionContext<'_>, specs: &[AssertionSpec]) -> Vec<AssertionResult> {
        let mut results = Vec::with_capacity(specs.len());
        for kind in AssertionKind::ALL {
            let of_kind: Vec<AssertionSpec> = specs.iter().filter(|s| s.kind == kind).cloned().collect();
            results.extend(self.evaluate(ctx, &of_kind));
        }
        results
    }

    fn evaluate_one(&self, ctx: &AssertionContext<'_>, spec: &AssertionSpec) -> AssertionResult {
        let result = match self.engine(spec.kind) {
            None => AssertionResult::error(&spec.name, format!("no comparison engine registered for {}", spec.kind)),
            Some(engine) => match ctx.resolve(spec) {
                Ok(artifacts) => engine.compare(&spec.name, &artifacts),
                Err(res) => res,
            },
        };
        debug!(kind = %spec.kind, name = %spec.name, status = ?result.status, "assertion evaluated");
        result
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::engine::ByteExactEngine;
    use crate::line_diff::{ANSI_BOLD, ANSI_GREEN, ANSI_RED};
    use crate::testing::*;
    use gild_core::{RenderOutputs, Status};
    use gild_fs::MemoryFileSystem;

    fn byte_exact(colorize: bool) -> Orchestrator {
        Orchestrator::new().with_engine(Box::new(ByteExactEngine::new(colorize)))
    }

    fn diff_spec(name: &str, expected: &str) -> AssertionSpec {
        AssertionSpec::new(name, expected, AssertionKind::ByteExact)
    }

    fn fs_with(expected: &str, actual: &str) -> MemoryFileSystem {
        MemoryFileSystem::new()
            .with_file(GOLDEN_PATH, expected)
            .unwrap()
            .with_file(ACTUAL_PATH, actual)
            .unwrap()
    }

    #[test]
    fn test_diff_pass() {
        let fs = fs_with("a\n", "a\n");
        let outputs = full_render();
        let ctx = AssertionContext::new(&fs, &outputs, Path::new(SUITE_FILE), &expand_path);

        let results = byte_exact(false).evaluate(&ctx, &[diff_spec("same", "golden.yaml")]);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, Status::Pass);
        assert_eq!(results[0].message, "files match");
    }

    #[test]
    fn test_diff_fail() {
        let fs = fs_with("expected\n", "actual\n");
        let outputs = full_render();
        let ctx = AssertionContext::new(&fs, &outputs, Path::new(SUITE_FILE), &expand_path);

        let results = byte_exact(false).evaluate(&ctx, &[diff_spec("differ", "golden.yaml")]);
        assert_eq!(results[0].status, Status::Fail);
        let msg = &results[0].message;
        assert!(msg.contains("--- "));
        assert!(msg.contains("+++ "));
        assert!(msg.contains("expected"));
        assert!(msg.contains("actual"));
    }

    #[test]
    fn test_diff_with_resource() {
        let fs = MemoryFileSystem::new()
            .with_file("/suite/golden-pod.yaml", "kind: Pod\n")
            .unwrap()
            .with_file("/out/Pod_foo.yaml", "kind: Pod\n")
            .unwrap();
        let mut outputs = full_render();
        outputs.rendered.insert("Pod/foo".into(), PathBuf::from("/out/Pod_foo.yaml"));
        let ctx = AssertionContext::new(&fs, &outputs, Path::new(SUITE_FILE), &expand_path);

        let spec = diff_spec("pod", "golden-pod.yaml").with_resource("Pod/foo");
        let results = byte_exact(false).evaluate(&ctx, &[spec]);
        assert_eq!(results[0].status, Status::Pass);
    }

    #[test]
    fn test_resource_missing_from_empty_index() {
        let fs = fs_with("x", "x");
        let outputs = RenderOutputs { render: PathBuf::from(ACTUAL_PATH), rendered: Default::default() };
        let ctx = AssertionContext::new(&fs, &outputs, Path::new(SUITE_FILE), &expand_path);

        let spec = diff_spec("missing", "golden.yaml").with_resource("Pod/nonexistent");
        let results = byte_exact(false).evaluate(&ctx, &[spec]);
        assert_eq!(results[0].status, Status::Error);
        assert!(results[0].message.contains("not found in render output"));
    }

    #[test]
    fn test_expander_failure_is_error() {
        let fs = fs_with("x", "x");
        let outputs = full_render();
        let ctx = AssertionContext::new(&fs, &outputs, Path::new(SUITE_FILE), &expand_fail);

        let results = byte_exact(false).evaluate(&ctx, &[diff_spec("bad", "golden.yaml")]);
        assert_eq!(results[0].status, Status::Error);
        assert!(results[0].message.contains("invalid expected path"));
    }

    #[test]
    fn test_colorize() {
        let fs = fs_with("expected\n", "actual\n");
        let outputs = full_render();
        let ctx = AssertionContext::new(&fs, &outputs, Path::new(SUITE_FILE), &expand_path);
        let specs = [diff_spec("differ", "golden.yaml")];

        let colored = &byte_exact(true).evaluate(&ctx, &specs)[0].message;
        assert!(colored.contains(ANSI_RED));
        assert!(colored.contains(ANSI_GREEN));
        assert!(colored.contains(ANSI_BOLD));

        let plain = &byte_exact(false).evaluate(&ctx, &specs)[0].message;
        assert!(!plain.contains('\x1b'));
    }

    #[test]
    fn test_continues_after_failure_in_order() {
        let fs = fs_with("a\n", "b\n").with_file("/suite/same.yaml", "b\n").unwrap();
        let outputs = full_render();
        let ctx = AssertionContext::new(&fs, &outputs, Path::new(SUITE_FILE), &expand_path);
        let specs = [
            diff_spec("fails", "golden.yaml"),
            diff_spec("errors", "nonexistent.yaml"),
            diff_spec("passes", "same.yaml"),
        ];

        let results = byte_exact(false).evaluate(&ctx, &specs);
        let got: Vec<(&str, Status)> = results.iter().map(|r| (r.name.as_str(), r.status)).collect();
        assert_eq!(got, vec![("fails", Status::Fail), ("errors", Status::Error), ("passes", Status::Pass)]);
    }

    #[test]
    fn test_unregistered_kind() {
        let fs = fs_with("a\n", "a\n");
        let outputs = full_render();
        let ctx = AssertionContext::new(&fs, &outputs, Path::new(SUITE_FILE), &expand_path);
        let spec = AssertionSpec::new("semantic", "golden.yaml", AssertionKind::Structural);

        let results = byte_exact(false).evaluate(&ctx, &[spec]);
        assert_eq!(results[0].status, Status::Error);
        assert_eq!(results[0].message, "no comparison engine registered for dyff");
    }

    #[test]
    fn test_evaluate_all_groups_by_kind() {
        let fs = fs_with("a\n", "a\n");
        let outputs = full_render();
        let ctx = AssertionContext::new(&fs, &outputs, Path::new(SUITE_FILE), &expand_path);
        let specs = [
            AssertionSpec::new("structural", "golden.yaml", AssertionKind::Structural),
            diff_spec("exact", "golden.yaml"),
        ];

        let results = byte_exact(false).evaluate_all(&ctx, &specs);
        assert_eq!(results[0].name, "exact");
        assert_eq!(results[1].name, "structural");
    }

    #[test]
    fn test_with_engine_replaces_same_kind() {
        let orch = byte_exact(true).with_engine(Box::new(ByteExactEngine::new(false)));
        assert_eq!(orch.engines.len(), 1);
        assert!(orch.engine(AssertionKind::ByteExact).is_some());
        assert!(orch.engine(AssertionKind::Structural).is_none());
    }
}
