use std::fmt;

use serde::{Deserialize, Serialize};

/// Comparison engine an assertion is routed to.
/// Suite files name these `diff` (byte exact) and `dyff` (structural).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AssertionKind {
    ByteExact,
    Structural,
}

impl AssertionKind {
    pub const ALL: [AssertionKind; 2] = [AssertionKind::ByteExact, AssertionKind::Structural];

    pub fn suite_key(&self) -> &'static str {
        match self {
            AssertionKind::ByteExact => "diff",
            AssertionKind::Structural => "dyff",
        }
    }
}

impl fmt::Display for AssertionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suite_key())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pass,
    Fail,
    /// Comparison could not run (bad path, missing resource, unreadable file, ...).
    Error,
}

impl Status {
    pub fn symbol(&self) -> &'static str {
        match self {
            Status::Pass => "[✓]",
            Status::Fail => "[x]",
            Status::Error => "[!]",
        }
    }
}

/// Subdirectory label used when staging a caller-supplied input.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum InputCategory {
    Xr,
    Claim,
    Composition,
    Functions,
    Crds,
    ExtraResources,
    Xrd,
}

impl InputCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputCategory::Xr => "xr",
            InputCategory::Claim => "claim",
            InputCategory::Composition => "composition",
            InputCategory::Functions => "functions",
            InputCategory::Crds => "crds",
            InputCategory::ExtraResources => "extra-resources",
            InputCategory::Xrd => "xrd",
        }
    }
}

impl fmt::Display for InputCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
