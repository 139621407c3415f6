use anyhow::{anyhow, Result};
use gild_patch::ConnectionSecretInjector;
use serde_yaml::{Mapping, Value};

use crate::object::{as_object_mut, mapping_entry, str_field};

pub const DEFAULT_SECRET_NAMESPACE: &str = "crossplane-system";

/// Sets `spec.writeConnectionSecretToRef`. An empty name becomes
/// `<metadata.name>-connection`, an empty namespace `crossplane-system`.
#[derive(Clone, Copy, Debug, Default)]
pub struct WriteConnectionSecretToRef;

impl ConnectionSecretInjector for WriteConnectionSecretToRef {
    fn add_connection_secret(&self, object: &mut Value, name: &str, namespace: &str) -> Result<()> {
        let name = if name.is_empty() {
            let object_name = str_field(object, &["metadata", "name"])
                .ok_or_else(|| anyhow!("object has no metadata.name to derive a secret name from"))?;
            format!("{object_name}-connection")
        } else {
            name.to_string()
        };
        let namespace = if namespace.is_empty() { DEFAULT_SECRET_NAMESPACE } else { namespace };

        let mut reference = Mapping::new();
        reference.insert("name".into(), name.into());
        reference.insert("namespace".into(), namespace.into());

        let spec = mapping_entry(as_object_mut(object)?, "spec")?;
        spec.insert("writeConnectionSecretToRef".into(), Value::Mapping(reference));
        Ok(())
    }
}
