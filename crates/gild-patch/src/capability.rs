use anyhow::Result;
use serde_yaml::Value;

/// Turns a namespaced claim into the cluster-scoped object it stands for.
pub trait ClaimConverter: Send + Sync {
    fn convert(&self, claim: &Value) -> Result<Value>;
}

/// Fills schema defaults from an XRD into an object of the given `apiVersion`.
pub trait DefaultsInjector: Send + Sync {
    fn apply_defaults(&self, object: &mut Value, api_version: &str, xrd: &Value) -> Result<()>;
}

/// Adds a connection-secret reference. Empty `name` / `namespace` mean "use the default".
pub trait ConnectionSecretInjector: Send + Sync {
    fn add_connection_secret(&self, object: &mut Value, name: &str, namespace: &str) -> Result<()>;
}

/// The three transformation capabilities one pipeline needs.
pub struct PatchCapabilities {
    pub converter: Box<dyn ClaimConverter>,
    pub defaults: Box<dyn DefaultsInjector>,
    pub secrets: Box<dyn ConnectionSecretInjector>,
}
