use anyhow::{anyhow, Context, Result};
use gild_patch::DefaultsInjector;
use serde::Deserialize;
use serde_yaml::Value;

/// The parts of a CompositeResourceDefinition defaulting reads.
#[derive(Clone, Debug, Deserialize)]
pub struct Xrd {
    pub spec: XrdSpec,
}

#[derive(Clone, Debug, Deserialize)]
pub struct XrdSpec {
    pub group: String,
    #[serde(default)]
    pub versions: Vec<XrdVersion>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct XrdVersion {
    pub name: String,
    #[serde(default)]
    pub schema: Option<XrdSchema>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct XrdSchema {
    #[serde(rename = "openAPIV3Schema")]
    pub open_api_v3_schema: Value,
}

impl Xrd {
    pub fn version(&self, api_version: &str) -> Option<&XrdVersion> {
        self.spec.versions.iter().find(|v| format!("{}/{}", self.spec.group, v.name) == api_version)
    }
}

/// Fills `default` values from the XRD's OpenAPI schema into fields the object leaves unset.
#[derive(Clone, Copy, Debug, Default)]
pub struct XrdDefaults;

impl DefaultsInjector for XrdDefaults {
    fn apply_defaults(&self, object: &mut Value, api_version: &str, xrd: &Value) -> Result<()> {
        let xrd: Xrd = serde_yaml::from_value(xrd.clone()).context("decode XRD")?;
        let version = xrd
            .version(api_version)
            .ok_or_else(|| anyhow!("XRD {} has no version matching {api_version:?}", xrd.spec.group))?;
        match &version.schema {
            Some(schema) => apply_schema_defaults(object, &schema.open_api_v3_schema),
            None => tracing::debug!(version = %version.name, "XRD version has no schema; nothing to default"),
        }
        Ok(())
    }
}

/// Walk `schema` alongside `value`. A missing property with a `default` is filled
/// in; intermediate objects without a default are not created.
pub fn apply_schema_defaults(value: &mut Value, schema: &Value) {
    if let (Some(map), Some(properties)) = (value.as_mapping_mut(), schema.get("properties").and_then(Value::as_mapping)) {
        for (key, prop_schema) in properties {
            if !map.contains_key(key) {
                match prop_schema.get("default") {
                    Some(default) => {
                        map.insert(key.clone(), default.clone());
                    }
                    None => continue,
                }
            }
            if let Some(child) = map.get_mut(key) {
                apply_schema_defaults(child, prop_schema);
            }
        }
    }

    if let (Some(items), Some(item_schema)) = (value.as_sequence_mut(), schema.get("items")) {
        for item in items {
            apply_schema_defaults(item, item_schema);
        }
    }
}
