use anyhow::{anyhow, Result};
use gild_patch::ClaimConverter;
use serde_yaml::{Mapping, Value};

use crate::object::str_field;

pub const LABEL_CLAIM_NAME: &str = "crossplane.io/claim-name";
pub const LABEL_CLAIM_NAMESPACE: &str = "crossplane.io/claim-namespace";

// Fields that only mean something on the namespaced claim.
const CLAIM_ONLY_SPEC_FIELDS: [&str; 3] = ["compositeDeletePolicy", "resourceRef", "writeConnectionSecretToRef"];

/// Converts a claim into its composite resource the way the control plane would,
/// minus the generated name suffix: the XR keeps the claim's name so renders stay stable.
#[derive(Clone, Debug, Default)]
pub struct ClaimToXr {
    kind: Option<String>,
}

impl ClaimToXr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `kind` instead of the `X<ClaimKind>` convention.
    pub fn with_kind(kind: impl Into<String>) -> Self {
        Self { kind: Some(kind.into()) }
    }
}

impl ClaimConverter for ClaimToXr {
    fn convert(&self, claim: &Value) -> Result<Value> {
        let api_version = str_field(claim, &["apiVersion"]).ok_or_else(|| anyhow!("claim has no apiVersion"))?;
        let claim_kind = str_field(claim, &["kind"]).ok_or_else(|| anyhow!("claim has no kind"))?;
        let name = str_field(claim, &["metadata", "name"]).ok_or_else(|| anyhow!("claim has no metadata.name"))?;
        let namespace = str_field(claim, &["metadata", "namespace"]).unwrap_or("default");

        let kind = match &self.kind {
            Some(k) => k.clone(),
            None => format!("X{claim_kind}"),
        };

        let mut metadata = Mapping::new();
        metadata.insert("name".into(), name.into());
        let mut labels = claim
            .get("metadata")
            .and_then(|m| m.get("labels"))
            .and_then(Value::as_mapping)
            .cloned()
            .unwrap_or_default();
        labels.insert(LABEL_CLAIM_NAME.into(), name.into());
        labels.insert(LABEL_CLAIM_NAMESPACE.into(), namespace.into());
        metadata.insert("labels".into(), Value::Mapping(labels));
        if let Some(annotations) = claim.get("metadata").and_then(|m| m.get("annotations")) {
            metadata.insert("annotations".into(), annotations.clone());
        }

        let mut reference = Mapping::new();
        reference.insert("apiVersion".into(), api_version.into());
        reference.insert("kind".into(), claim_kind.into());
        reference.insert("name".into(), name.into());
        reference.insert("namespace".into(), namespace.into());

        let mut spec = claim.get("spec").and_then(Value::as_mapping).cloned().unwrap_or_default();
        for field in CLAIM_ONLY_SPEC_FIELDS {
            spec.remove(field);
        }
        spec.insert("claimRef".into(), Value::Mapping(reference));

        tracing::debug!(claim = %claim_kind, xr = %kind, "claim converted");
        let mut xr = Mapping::new();
        xr.insert("apiVersion".into(), api_version.into());
        xr.insert("kind".into(), kind.into());
        xr.insert("metadata".into(), Value::Mapping(metadata));
        xr.insert("spec".into(), Value::Mapping(spec));
        Ok(Value::Mapping(xr))
    }
}
