use serde::{Deserialize, Serialize};
use std::fmt;

/// Magnitude of semantic change implied by a set of pull requests.
///
/// Variants are declared from lowest to highest so that `Ord` (and therefore
/// `Iterator::max`) picks the most significant level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IncrementLevel {
    None,
    Patch,
    Minor,
    Major,
}

impl fmt::Display for IncrementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IncrementLevel::None => "NONE",
            IncrementLevel::Patch => "PATCH",
            IncrementLevel::Minor => "MINOR",
            IncrementLevel::Major => "MAJOR",
        };
        f.write_str(name)
    }
}
