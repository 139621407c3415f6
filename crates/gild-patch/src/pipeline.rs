use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use gild_core::PatchConfig;
use gild_fs::FileSystem;
use serde_yaml::Value;
use tracing::debug;

use crate::capability::PatchCapabilities;
use crate::error::{InPhase, PatchError, PatchPhase};

pub const CONVERTED_FILE: &str = "xr.yaml";
pub const PATCHED_FILE: &str = "patched-xr.yaml";

/// Object a patch run starts from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatchSource {
    Claim(PathBuf),
    Xr(PathBuf),
}

/// Claim conversion and patching for one test case. Writes only into `output_dir`.
pub struct PatchPipeline<'a> {
    fs: &'a dyn FileSystem,
    caps: &'a PatchCapabilities,
    output_dir: PathBuf,
}

impl<'a> PatchPipeline<'a> {
    pub fn new(fs: &'a dyn FileSystem, caps: &'a PatchCapabilities, output_dir: impl Into<PathBuf>) -> Self {
        Self { fs, caps, output_dir: output_dir.into() }
    }

    /// Validate, convert when starting from a claim, then patch.
    pub fn run(&self, source: &PatchSource, config: &PatchConfig) -> Result<PathBuf, PatchError> {
        config.validate().map_err(|e| PatchError::new(PatchPhase::Validate, e))?;
        let xr = match source {
            PatchSource::Claim(claim) => self.convert_claim(claim)?,
            PatchSource::Xr(xr) => xr.clone(),
        };
        self.patch(&xr, config)
    }

    /// Convert the claim at `claim` and write the result to `<output_dir>/xr.yaml`.
    pub fn convert_claim(&self, claim: &Path) -> Result<PathBuf, PatchError> {
        let bytes = self.fs.read(claim).context("failed to read claim file").in_phase(PatchPhase::Convert)?;
        let claim = parse_object(&bytes).context("failed to parse claim YAML").in_phase(PatchPhase::Convert)?;

        let kind = claim.get("kind").and_then(Value::as_str);
        debug!(claim = ?kind, "converting claim");
        let xr = self.caps.converter.convert(&claim).context("failed to convert claim to XR").in_phase(PatchPhase::Convert)?;

        let path = self.output_dir.join(CONVERTED_FILE);
        let out = marshal(&xr).in_phase(PatchPhase::Convert)?;
        self.write(&path, &out).context("failed to write XR to temporary file").in_phase(PatchPhase::Convert)?;
        debug!(path = %path.display(), "wrote converted XR");
        Ok(path)
    }

    /// Apply XRD defaults and the connection secret to the object at `xr`, writing
    /// `<output_dir>/patched-xr.yaml`. Nothing is read or written if `config` is invalid.
    pub fn patch(&self, xr_path: &Path, config: &PatchConfig) -> Result<PathBuf, PatchError> {
        config.validate().map_err(|e| PatchError::new(PatchPhase::Validate, e))?;

        let bytes = self.fs.read(xr_path).context("failed to read XR file").in_phase(PatchPhase::Load)?;
        let mut xr = parse_object(&bytes).context("failed to parse XR YAML").in_phase(PatchPhase::Load)?;

        if let Some(xrd_path) = &config.xrd {
            debug!(xrd = %xrd_path.display(), "applying XRD defaults");
            let bytes = self.fs.read(xrd_path).context("failed to read XRD file").in_phase(PatchPhase::Default)?;
            let xrd = parse_object(&bytes).context("failed to parse XRD YAML").in_phase(PatchPhase::Default)?;
            let api_version = xr.get("apiVersion").and_then(Value::as_str).unwrap_or_default().to_string();
            self.caps
                .defaults
                .apply_defaults(&mut xr, &api_version, &xrd)
                .context("failed to apply XRD defaults")
                .in_phase(PatchPhase::Default)?;
        }

        if config.has_connection_secret() {
            debug!("adding connection secret");
            self.caps
                .secrets
                .add_connection_secret(&mut xr, &config.connection_secret_name, &config.connection_secret_namespace)
                .context("failed to add connection secret")
                .in_phase(PatchPhase::Secret)?;
        }

        let path = self.output_dir.join(PATCHED_FILE);
        let out = marshal(&xr).in_phase(PatchPhase::Persist)?;
        self.write(&path, &out).context("failed to write patched XR to temporary file").in_phase(PatchPhase::Persist)?;
        debug!(path = %path.display(), "wrote patched XR");
        Ok(path)
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.fs.create_dir_all(&self.output_dir)?;
        self.fs.write(path, bytes)
    }
}

/// Parse a single YAML object. Anything but a mapping is rejected.
fn parse_object(bytes: &[u8]) -> Result<Value> {
    let value: Value = serde_yaml::from_slice(bytes)?;
    if !value.is_mapping() {
        return Err(anyhow!("expected a YAML mapping"));
    }
    Ok(value)
}

/// YAML with a leading document marker.
fn marshal(object: &Value) -> Result<Vec<u8>> {
    let yaml = serde_yaml::to_string(object).context("failed to marshal XR to YAML")?;
    Ok(format!("---\n{yaml}").into_bytes())
}
