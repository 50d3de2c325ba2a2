use crate::domain::prerelease::PreRelease;
use crate::error::{PrSemverError, Result};
use regex::Regex;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Semver tag with or without pre-release and/or build metadata.
/// Numeric components carry no leading zeros.
const SEMVER_TAG_PATTERN: &str =
    r"^v?(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)([-+].+)?$";

/// Semver tag without pre-release, with or without build metadata
const SEMVER_BASE_PATTERN: &str = r"^v?(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(\+.+)?$";

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(SEMVER_TAG_PATTERN).expect("semver tag pattern is valid"))
}

fn base_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(SEMVER_BASE_PATTERN).expect("semver base pattern is valid"))
}

/// Returns true if `text` looks like a semver tag (`v1.2.3`, `1.2.3-beta.1+ci`, ...)
pub fn is_semver_tag(text: &str) -> bool {
    tag_regex().is_match(text)
}

/// Returns true if `text` is a semver tag eligible to serve as a release base,
/// i.e. it carries no pre-release component. Build metadata alone is allowed.
pub fn is_base_tag(text: &str) -> bool {
    base_regex().is_match(text)
}

/// Semantic version as modelled by tags produced by this workflow
///
/// The canonical label is always derived from the structured fields, so it can
/// never drift from them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Semver {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre_release: Option<PreRelease>,
    pub build_metadata: Option<String>,
}

impl Semver {
    /// Create a plain release version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Semver {
            major,
            minor,
            patch,
            pre_release: None,
            build_metadata: None,
        }
    }

    /// Parse a version from tag text, accepting an optional leading `v`
    ///
    /// The pre-release is the text after `-` up to the first `+`, the build
    /// metadata everything after that `+`. Both are kept verbatim.
    pub fn parse(text: &str) -> Result<Self> {
        let captures = tag_regex()
            .captures(text)
            .ok_or_else(|| PrSemverError::invalid_version(text))?;

        let number = |index: usize| -> Result<u64> {
            captures[index]
                .parse::<u64>()
                .map_err(|_| PrSemverError::invalid_version(text))
        };

        let mut version = Semver::new(number(1)?, number(2)?, number(3)?);

        if let Some(suffix) = captures.get(4).map(|m| m.as_str()) {
            if let Some(rest) = suffix.strip_prefix('-') {
                match rest.split_once('+') {
                    Some((pre, meta)) => {
                        version.pre_release = Some(PreRelease::parse(pre));
                        version.build_metadata = Some(meta.to_string());
                    }
                    None => version.pre_release = Some(PreRelease::parse(rest)),
                }
            } else if let Some(meta) = suffix.strip_prefix('+') {
                version.build_metadata = Some(meta.to_string());
            }
        }

        Ok(version)
    }

    /// Canonical `major.minor.patch[-preRelease][+buildMetadata]` label
    pub fn label(&self) -> String {
        self.to_string()
    }

    /// `major.minor.patch` without any suffix
    pub fn base_label(&self) -> String {
        format!("{}.{}.{}", self.major, self.minor, self.patch)
    }

    /// The raw `-pre+meta` suffix, empty for a plain release
    pub fn suffix(&self) -> String {
        let mut suffix = String::new();
        if let Some(pre) = &self.pre_release {
            suffix.push('-');
            suffix.push_str(&pre.to_string());
        }
        if let Some(meta) = &self.build_metadata {
            suffix.push('+');
            suffix.push_str(meta);
        }
        suffix
    }

    /// Compare major, minor and patch numerically, ignoring any suffix
    pub fn compare_base(&self, other: &Semver) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
    }

    /// Same numbers with every suffix dropped
    pub fn without_suffix(&self) -> Semver {
        Semver::new(self.major, self.minor, self.patch)
    }
}

impl fmt::Display for Semver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}{}",
            self.major,
            self.minor,
            self.patch,
            self.suffix()
        )
    }
}

impl FromStr for Semver {
    type Err = PrSemverError;

    fn from_str(s: &str) -> Result<Self> {
        Semver::parse(s)
    }
}

impl Serialize for Semver {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Semver", 6)?;
        state.serialize_field("label", &self.label())?;
        state.serialize_field("major", &self.major)?;
        state.serialize_field("minor", &self.minor)?;
        state.serialize_field("patch", &self.patch)?;
        state.serialize_field("preRelease", &self.pre_release)?;
        state.serialize_field("buildMetadata", &self.build_metadata)?;
        state.end()
    }
}

/// Sort versions highest first.
///
/// Numbers are compared numerically. Equal numbers fall back to a descending
/// byte-wise comparison of the raw suffix, so `1.0.0-beta` sorts before
/// `1.0.0-alpha`, and any suffixed version sorts before the plain release.
pub fn sort_versions(versions: &mut [Semver]) {
    versions.sort_by(|a, b| {
        b.compare_base(a)
            .then_with(|| b.suffix().as_str().cmp(a.suffix().as_str()))
    });
}
