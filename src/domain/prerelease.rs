//! Pre-release labels and sequence numbering
//!
//! A pre-release produced by this workflow is a kind (alpha, beta, rc or a custom
//! label) followed by a dotted counter, e.g. `beta.3`. Tags found in history may
//! carry anything semver allows, so parsing keeps unrecognised text verbatim.

use serde::Serialize;
use std::fmt;

/// Pre-release kind requested for the next version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreReleaseKind {
    /// Operator supplied label
    Custom(String),
    /// Release candidate
    ReleaseCandidate,
    /// Beta pre-release
    Beta,
    /// Alpha pre-release
    Alpha,
}

impl PreReleaseKind {
    /// Pick the single kind to apply when several are requested.
    ///
    /// Resolution order: custom label, then rc, then beta, then alpha. An empty
    /// custom label counts as absent.
    pub fn select(custom: Option<&str>, rc: bool, beta: bool, alpha: bool) -> Option<Self> {
        match custom.filter(|label| !label.is_empty()) {
            Some(label) => Some(PreReleaseKind::Custom(label.to_string())),
            None if rc => Some(PreReleaseKind::ReleaseCandidate),
            None if beta => Some(PreReleaseKind::Beta),
            None if alpha => Some(PreReleaseKind::Alpha),
            None => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PreReleaseKind::Custom(label) => label,
            PreReleaseKind::ReleaseCandidate => "rc",
            PreReleaseKind::Beta => "beta",
            PreReleaseKind::Alpha => "alpha",
        }
    }

    /// Highest sequence already used by a `<base_label>-<kind>.<n>` tag
    ///
    /// The tag must match the base label exactly (an optional leading `v` is
    /// tolerated), so `4.2.40-alpha.9` never counts towards `4.2.4`.
    pub fn latest_sequence<'a, I>(&self, base_label: &str, tag_names: I) -> Option<u64>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let prefix = format!("{}-{}.", base_label, self.as_str());

        tag_names
            .into_iter()
            .filter_map(|name| {
                name.strip_prefix('v')
                    .unwrap_or(name)
                    .strip_prefix(prefix.as_str())
            })
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .filter_map(|digits| digits.parse::<u64>().ok())
            .max()
    }

    /// Build the pre-release for `base_label`, continuing after the highest
    /// existing sequence or starting at 1.
    pub fn next_pre_release<'a, I>(&self, base_label: &str, tag_names: I) -> PreRelease
    where
        I: IntoIterator<Item = &'a str>,
    {
        let sequence = self
            .latest_sequence(base_label, tag_names)
            .map_or(1, |latest| latest.saturating_add(1));
        PreRelease::new(self.as_str(), Some(sequence))
    }
}

impl fmt::Display for PreReleaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pre-release component of a version, e.g. `alpha.2`
///
/// `sequence` is only split off when the text ends in a canonical dotted
/// number; otherwise the whole text stays in `identifier`, which keeps
/// labels such as `rc.01` or `alpha1` byte-for-byte intact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PreRelease {
    pub identifier: String,
    pub sequence: Option<u64>,
}

impl PreRelease {
    pub fn new(identifier: impl Into<String>, sequence: Option<u64>) -> Self {
        PreRelease {
            identifier: identifier.into(),
            sequence,
        }
    }

    /// Split raw pre-release text into identifier and trailing sequence
    pub fn parse(text: &str) -> Self {
        if let Some((identifier, digits)) = text.rsplit_once('.') {
            if is_canonical_number(digits) {
                if let Ok(sequence) = digits.parse::<u64>() {
                    return PreRelease::new(identifier, Some(sequence));
                }
            }
        }
        PreRelease::new(text, None)
    }
}

fn is_canonical_number(digits: &str) -> bool {
    !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'))
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier)?;
        if let Some(sequence) = self.sequence {
            write!(f, ".{}", sequence)?;
        }
        Ok(())
    }
}
