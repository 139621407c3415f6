use std::fmt;

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatchPhase {
    Validate,
    Convert,
    /// Reading the object to patch.
    Load,
    Default,
    Secret,
    Persist,
}

impl PatchPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchPhase::Validate => "validate",
            PatchPhase::Convert => "convert",
            PatchPhase::Load => "load",
            PatchPhase::Default => "default",
            PatchPhase::Secret => "secret",
            PatchPhase::Persist => "persist",
        }
    }
}

impl fmt::Display for PatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First failure of a patch run, tagged with the phase it happened in.
#[derive(Debug, Error)]
#[error("{phase}: {source:#}")]
pub struct PatchError {
    pub phase: PatchPhase,
    #[source]
    pub source: anyhow::Error,
}

impl PatchError {
    pub fn new(phase: PatchPhase, source: impl Into<anyhow::Error>) -> Self {
        Self { phase, source: source.into() }
    }
}

/// Tag any `anyhow` failure with a phase.
pub(crate) trait InPhase<T> {
    fn in_phase(self, phase: PatchPhase) -> Result<T, PatchError>;
}

impl<T> InPhase<T> for anyhow::Result<T> {
    fn in_phase(self, phase: PatchPhase) -> Result<T, PatchError> {
        self.map_err(|e| PatchError::new(phase, e))
    }
}
