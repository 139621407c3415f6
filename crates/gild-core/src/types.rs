use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{errors::PatchConfigError, model::*};

/// One golden-file assertion of a test case.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssertionSpec {
    pub name: String,
    /// Golden file, relative to the suite file.
    pub expected: String,
    /// `Kind/name` key into [`RenderOutputs::rendered`]; absent compares the full render.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    pub kind: AssertionKind,
}

impl AssertionSpec {
    pub fn new(name: impl Into<String>, expected: impl Into<String>, kind: AssertionKind) -> Self {
        Self { name: name.into(), expected: expected.into(), resource: None, kind }
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// The selector, treating an empty string the same as no selector.
    pub fn selector(&self) -> Option<&str> {
        self.resource.as_deref().filter(|r| !r.is_empty())
    }
}

/// What the render engine produced for one test case.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderOutputs {
    pub render: PathBuf,
    #[serde(default)]
    pub rendered: BTreeMap<String, PathBuf>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssertionResult {
    pub name: String,
    pub status: Status,
    pub message: String,
}

impl AssertionResult {
    pub fn new(name: impl Into<String>, status: Status, message: impl Into<String>) -> Self {
        Self { name: name.into(), status, message: message.into() }
    }

    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, Status::Pass, message)
    }

    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, Status::Fail, message)
    }

    pub fn error(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, Status::Error, message)
    }
}

/// Patches applied to the XR before rendering.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct PatchConfig {
    /// XRD whose schema defaults are applied.
    #[serde(default)]
    pub xrd: Option<PathBuf>,
    /// Unset, explicitly enabled or explicitly disabled.
    #[serde(default)]
    pub connection_secret: Option<bool>,
    #[serde(default)]
    pub connection_secret_name: String,
    #[serde(default)]
    pub connection_secret_namespace: String,
}

impl PatchConfig {
    /// Name and namespace may only be given once `connection-secret` is set explicitly.
    pub fn validate(&self) -> Result<(), PatchConfigError> {
        let has_fields = !self.connection_secret_name.is_empty() || !self.connection_secret_namespace.is_empty();
        if has_fields && self.connection_secret.is_none() {
            return Err(PatchConfigError::ConnectionSecretUnset);
        }
        Ok(())
    }

    pub fn has_connection_secret(&self) -> bool {
        self.connection_secret == Some(true)
    }

    pub fn is_empty(&self) -> bool {
        self.xrd.is_none()
            && self.connection_secret.is_none()
            && self.connection_secret_name.is_empty()
            && self.connection_secret_namespace.is_empty()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StagedInput {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub category: InputCategory,
}
