use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gild_assert::{AssertionContext, ByteExactEngine, Orchestrator, StructuralEngine};
use gild_core::{AssertionKind, AssertionResult, AssertionSpec, InputCategory, PathExpander, Status};
use gild_fs::FileSystem;
use gild_patch::{PatchCapabilities, PatchPipeline, PatchSource};
use gild_structural::TreeDiff;
use gild_suite::{load_suite, SuitePathExpander, TestCase};
use tracing::{info, warn};
use uuid::Uuid;

use crate::manifest::RunManifest;
use crate::render::{RenderRequest, Renderer};
use crate::staging::InputStager;

#[derive(Clone, Debug)]
pub struct RunOptions {
    pub output_root: PathBuf,
    /// Keep the run directory even when everything passed.
    pub keep: bool,
    pub colorize: bool,
}

/// Outcome of one test case: its assertion results, or the error that stopped it
/// before assertions could run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestCaseReport {
    pub name: String,
    pub results: Vec<AssertionResult>,
    pub error: Option<String>,
    pub manifest: Option<PathBuf>,
}

impl TestCaseReport {
    pub fn status(&self) -> Status {
        if self.error.is_some() || self.results.iter().any(|r| r.status == Status::Error) {
            Status::Error
        } else if self.results.iter().any(|r| r.status == Status::Fail) {
            Status::Fail
        } else {
            Status::Pass
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuiteReport {
    pub run_id: String,
    pub suite: PathBuf,
    pub run_dir: PathBuf,
    pub cases: Vec<TestCaseReport>,
    /// Whether `run_dir` was left on disk.
    pub kept: bool,
}

impl SuiteReport {
    pub fn failed(&self) -> bool {
        self.cases.iter().any(|c| c.status() != Status::Pass)
    }

    /// (passed, failed, errored) test case counts.
    pub fn counts(&self) -> (usize, usize, usize) {
        self.cases.iter().fold((0, 0, 0), |(p, f, e), c| match c.status() {
            Status::Pass => (p + 1, f, e),
            Status::Fail => (p, f + 1, e),
            Status::Error => (p, f, e + 1),
        })
    }
}

pub struct Runner {
    fs: Box<dyn FileSystem>,
    renderer: Box<dyn Renderer>,
    expander: Box<dyn PathExpander>,
    orchestrator: Orchestrator,
    patch_caps: PatchCapabilities,
    options: RunOptions,
}

impl Runner {
    /// A runner with the stock comparison engines and patch capabilities.
    pub fn new(fs: Box<dyn FileSystem>, renderer: Box<dyn Renderer>, options: RunOptions) -> Self {
        let orchestrator = Orchestrator::new()
            .with_engine(Box::new(ByteExactEngine::new(options.colorize)))
            .with_engine(Box::new(StructuralEngine::new(Box::new(TreeDiff))));
        Self {
            fs,
            renderer,
            expander: Box::new(SuitePathExpander),
            orchestrator,
            patch_caps: gild_xr::default_capabilities(),
            options,
        }
    }

    pub fn with_expander(mut self, expander: Box<dyn PathExpander>) -> Self {
        self.expander = expander;
        self
    }

    pub fn with_orchestrator(mut self, orchestrator: Orchestrator) -> Self {
        self.orchestrator = orchestrator;
        self
    }

    pub fn with_patch_capabilities(mut self, caps: PatchCapabilities) -> Self {
        self.patch_caps = caps;
        self
    }

    pub fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    /// Run every test case of the suite at `suite_path`. Only an unreadable or
    /// invalid suite is an error; test case problems land in the report.
    pub fn run_suite(&self, suite_path: &Path) -> Result<SuiteReport> {
        let suite = load_suite(self.fs(), suite_path)?;
        let run_id = Uuid::new_v4().to_string();
        let run_dir = self.options.output_root.join(&run_id);
        info!(suite = %suite_path.display(), run_id = %run_id, cases = suite.tests.len(), "running suite");

        let dirs = case_dir_names(suite.tests.iter().map(|c| c.name.as_str()));
        let cases = suite
            .tests
            .iter()
            .zip(&dirs)
            .map(|(case, dir)| self.run_test_case(suite_path, &run_id, &run_dir.join(dir), case))
            .collect();

        let mut report = SuiteReport { run_id, suite: suite_path.to_path_buf(), run_dir, cases, kept: true };
        if !self.options.keep && !report.failed() && self.fs.exists(&report.run_dir) {
            self.fs.remove_dir_all(&report.run_dir)?;
            report.kept = false;
        }
        Ok(report)
    }

    /// Run one test case inside `case_dir`, which the caller must not share with
    /// any other case.
    pub fn run_test_case(&self, suite_path: &Path, run_id: &str, case_dir: &Path, case: &TestCase) -> TestCaseReport {
        let mut manifest = RunManifest::new(run_id, &case.name);

        let outcome = self.execute(suite_path, case_dir, case, &mut manifest);
        let (results, error) = match outcome {
            Ok(results) => (results, None),
            Err(e) => {
                warn!(case = %case.name, error = %format!("{e:#}"), "test case failed to run");
                (Vec::new(), Some(format!("{e:#}")))
            }
        };
        manifest.results = results.clone();
        manifest.error = error.clone();

        let manifest_path = match manifest.write_to(self.fs(), case_dir) {
            Ok(p) => Some(p),
            Err(e) => {
                warn!(case = %case.name, error = %format!("{e:#}"), "could not write run manifest");
                None
            }
        };

        let report = TestCaseReport { name: case.name.clone(), results, error, manifest: manifest_path };
        info!(case = %case.name, status = ?report.status(), "test case done");
        report
    }

    fn execute(
        &self,
        suite_path: &Path,
        case_dir: &Path,
        case: &TestCase,
        manifest: &mut RunManifest,
    ) -> Result<Vec<AssertionResult>> {
        let fs = self.fs();
        let stager = InputStager::new(fs, case_dir.join("inputs"));
        let expand = |p: &str| self.expander.expand(suite_path, p).with_context(|| format!("expand {p:?}"));
        let mut stage = |src: &str, category: InputCategory| -> Result<PathBuf> {
            let staged = stager.copy_input(&expand(src)?, category)?;
            manifest.record_input(fs, &staged)?;
            Ok(staged.destination)
        };

        let source = match (&case.inputs.xr, &case.inputs.claim) {
            (Some(xr), _) => PatchSource::Xr(stage(xr.as_str(), InputCategory::Xr)?),
            (None, Some(claim)) => PatchSource::Claim(stage(claim.as_str(), InputCategory::Claim)?),
            (None, None) => anyhow::bail!("inputs must include xr or claim"),
        };
        let composition = case.inputs.composition.as_deref().map(|p| stage(p, InputCategory::Composition)).transpose()?;
        let functions = case.inputs.functions.as_deref().map(|p| stage(p, InputCategory::Functions)).transpose()?;
        let extra_resources =
            case.inputs.extra_resources.as_deref().map(|p| stage(p, InputCategory::ExtraResources)).transpose()?;

        let mut patches = case.patches.clone();
        if let Some(xrd) = &case.patches.xrd {
            patches.xrd = Some(stage(xrd.to_string_lossy().as_ref(), InputCategory::Xrd)?);
        }

        let crd_sources = case.inputs.crds.iter().map(|p| expand(p.as_str())).collect::<Result<Vec<_>>>()?;
        let crds: Vec<PathBuf> = stager
            .stage_crds(&crd_sources)?
            .into_iter()
            .map(|staged| {
                manifest.record_input(fs, &staged)?;
                Ok(staged.destination)
            })
            .collect::<Result<_>>()?;

        let object = match &source {
            PatchSource::Xr(xr) if patches.is_empty() => xr.clone(),
            _ => {
                let pipeline = PatchPipeline::new(fs, &self.patch_caps, case_dir.join("patched"));
                let patched = pipeline.run(&source, &patches).context("patch")?;
                manifest.patched = Some(patched.clone());
                patched
            }
        };

        let render_dir = case_dir.join("render");
        let req = RenderRequest {
            case: &case.name,
            object: &object,
            composition: composition.as_deref(),
            functions: functions.as_deref(),
            crds: &crds,
            extra_resources: extra_resources.as_deref(),
            output_dir: &render_dir,
        };
        let outputs = self.renderer.render(fs, &req).context("render")?;
        manifest.render = Some(outputs.render.clone());

        let specs: Vec<AssertionSpec> =
            AssertionKind::ALL.iter().flat_map(|kind| case.assertions.specs(*kind)).collect();
        let ctx = AssertionContext::new(fs, &outputs, suite_path, self.expander.as_ref());
        Ok(self.orchestrator.evaluate_all(&ctx, &specs))
    }
}

/// Test case names are free text; keep directory names portable and inside the run.
fn dir_name(case: &str) -> String {
    let name: String = case
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect();
    if name.chars().all(|c| c == '.') {
        return name.replace('.', "_") + "_";
    }
    name
}

/// One distinct directory name per test case, in suite order. A name already
/// taken gets the first free `_<n>` suffix.
fn case_dir_names<'a>(cases: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut taken = HashSet::new();
    cases
        .into_iter()
        .map(|case| {
            let base = dir_name(case);
            let mut name = base.clone();
            let mut n = 1;
            while !taken.insert(name.clone()) {
                name = format!("{base}_{n}");
                n += 1;
            }
            name
        })
        .collect()
}
