use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use gild_core::RenderOutputs;
use gild_fs::{copy_path, FileSystem};

/// Everything the render engine gets for one test case, all paths already staged.
#[derive(Clone, Debug)]
pub struct RenderRequest<'a> {
    pub case: &'a str,
    /// The XR to render, after patching.
    pub object: &'a Path,
    pub composition: Option<&'a Path>,
    pub functions: Option<&'a Path>,
    pub crds: &'a [PathBuf],
    pub extra_resources: Option<&'a Path>,
    /// Where the engine writes its output.
    pub output_dir: &'a Path,
}

/// The composition render engine.
pub trait Renderer: Send + Sync {
    fn render(&self, fs: &dyn FileSystem, req: &RenderRequest<'_>) -> Result<RenderOutputs>;
}

/// Replays render outputs recorded ahead of time, keyed by test case name:
///
/// ```yaml
/// basic:
///   render: out/basic/render.yaml
///   rendered:
///     Deployment/web: out/basic/Deployment_web.yaml
/// ```
///
/// Relative paths resolve against the outputs file. Recorded files are copied
/// into the request's output directory so a kept run is self-contained.
#[derive(Clone, Debug, Default)]
pub struct PrerenderedOutputs {
    cases: BTreeMap<String, RenderOutputs>,
}

impl PrerenderedOutputs {
    pub fn new(cases: BTreeMap<String, RenderOutputs>) -> Self {
        Self { cases }
    }

    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let bytes = fs.read(path).with_context(|| format!("read render outputs: {}", path.display()))?;
        let mut cases: BTreeMap<String, RenderOutputs> =
            serde_yaml::from_slice(&bytes).with_context(|| format!("parse render outputs: {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for outputs in cases.values_mut() {
            outputs.render = base.join(&outputs.render);
            for p in outputs.rendered.values_mut() {
                *p = base.join(&*p);
            }
        }
        Ok(Self { cases })
    }

    pub fn cases(&self) -> impl Iterator<Item = &str> {
        self.cases.keys().map(String::as_str)
    }
}

impl Renderer for PrerenderedOutputs {
    fn render(&self, fs: &dyn FileSystem, req: &RenderRequest<'_>) -> Result<RenderOutputs> {
        let recorded = self
            .cases
            .get(req.case)
            .ok_or_else(|| anyhow!("no recorded render outputs for test case {:?}", req.case))?;

        fs.create_dir_all(req.output_dir)?;
        let render = req.output_dir.join("render.yaml");
        copy_path(fs, &recorded.render, &render).context("copy recorded render")?;

        let mut rendered = BTreeMap::new();
        for (resource, src) in &recorded.rendered {
            let dest = req.output_dir.join(format!("{}.yaml", resource.replace('/', "_")));
            copy_path(fs, src, &dest).with_context(|| format!("copy recorded resource {resource}"))?;
            rendered.insert(resource.clone(), dest);
        }
        tracing::debug!(case = req.case, resources = rendered.len(), "replayed recorded render");
        Ok(RenderOutputs { render, rendered })
    }
}
