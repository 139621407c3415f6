pub mod claim;
pub mod defaults;
pub mod object;
pub mod secret;

pub use claim::*;
pub use defaults::*;
pub use secret::*;

use gild_patch::PatchCapabilities;

/// The stock converter, defaults injector and secret injector.
pub fn default_capabilities() -> PatchCapabilities {
    PatchCapabilities {
        converter: Box::new(ClaimToXr::new()),
        defaults: Box::new(XrdDefaults),
        secrets: Box::new(WriteConnectionSecretToRef),
    }
}
