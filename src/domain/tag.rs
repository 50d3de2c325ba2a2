use crate::domain::version::{is_base_tag, Semver};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Merge commits created by the hosting service start with this text
const MERGE_MESSAGE_PATTERN: &str = r"(?i)^merge pull request #(\d+)";

fn merge_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(MERGE_MESSAGE_PATTERN).expect("merge message pattern is valid"))
}

/// Id of the pull request whose merge produced a commit with this message
pub fn merged_pull_request_id(message: &str) -> Option<u64> {
    merge_regex()
        .captures(message)
        .and_then(|captures| captures[1].parse::<u64>().ok())
}

/// A tag from the hosting service's history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub display_name: String,
    pub commit_hash: String,
    pub commit_message: Option<String>,
    pub commit_timestamp: Option<DateTime<Utc>>,
    pub semver: Option<Semver>,
}

impl Tag {
    /// Create a tag without commit details or parsed version
    pub fn new(display_name: impl Into<String>, commit_hash: impl Into<String>) -> Self {
        Tag {
            display_name: display_name.into(),
            commit_hash: commit_hash.into(),
            commit_message: None,
            commit_timestamp: None,
            semver: None,
        }
    }

    /// True when the tag has no pre-release and can serve as a release base
    pub fn is_base(&self) -> bool {
        is_base_tag(&self.display_name)
    }

    /// Pull request id parsed from the tagged commit's merge message
    pub fn merged_pull_request_id(&self) -> Option<u64> {
        self.commit_message
            .as_deref()
            .and_then(merged_pull_request_id)
    }
}

/// Outcome of walking the tag history newest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseTagResolution {
    /// Newest tag without a pre-release, if any
    pub base_tag: Option<Tag>,
    /// Every semver tag seen up to and including the base, newest first
    pub chain: Vec<Tag>,
    /// Pull request merged by the base tag's commit
    pub excluded_pull_request_id: Option<u64>,
}

impl BaseTagResolution {
    /// Version to increment from; `0.0.0` when there is no prior release
    pub fn base_version(&self) -> Semver {
        self.base_tag
            .as_ref()
            .and_then(|tag| tag.semver.clone())
            .unwrap_or_default()
    }

    /// Pull requests updated at or before this instant were part of the base release
    pub fn cutoff(&self) -> Option<DateTime<Utc>> {
        self.base_tag.as_ref().and_then(|tag| tag.commit_timestamp)
    }

    /// Newest semver tag in the chain
    pub fn latest(&self) -> Option<&Tag> {
        self.chain.first()
    }

    pub fn is_first_release(&self) -> bool {
        self.base_tag.is_none()
    }

    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.chain.iter().map(|tag| tag.display_name.as_str())
    }
}
