//! Hosting service abstraction layer
//!
//! This module provides a trait-based abstraction over the three read
//! operations version resolution needs from a source-control hosting
//! service, allowing for a real HTTP implementation and an in-memory one for
//! testing.
//!
//! # Overview
//!
//! The primary abstraction is the [HostingService] trait. The concrete
//! implementations include:
//!
//! - [bitbucket::BitbucketClient]: Bitbucket Server REST API over `reqwest`
//! - [mock::MockService]: In-memory implementation for testing
//!
//! All list operations are paged. Callers keep requesting pages from
//! [Page::next_page_start] until [Page::has_more] returns false.
//!
//! ```rust
//! # use pr_semver::service::{HostingService, MockService};
//! # fn example() -> pr_semver::Result<()> {
//! let mut service = MockService::new();
//! service.add_tag("v1.0.0", "abc123");
//! let page = service.list_tags(0, 20)?;
//! assert_eq!(page.values[0].display_id, "v1.0.0");
//! # Ok(())
//! # }
//! ```

pub mod bitbucket;
pub mod mock;

pub use bitbucket::BitbucketClient;
pub use mock::{MockService, ServiceCall};

use crate::error::{PrSemverError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One page of a paged listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub values: Vec<T>,
    #[serde(default)]
    pub is_last_page: bool,
    #[serde(default)]
    pub next_page_start: Option<u64>,
}

impl<T> Page<T> {
    /// True when another page can be requested
    pub fn has_more(&self) -> bool {
        !self.is_last_page && self.next_page_start.is_some()
    }
}

/// Tag as listed by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagEntry {
    pub display_id: String,
    pub latest_commit: String,
}

impl TagEntry {
    pub fn new(display_id: impl Into<String>, latest_commit: impl Into<String>) -> Self {
        TagEntry {
            display_id: display_id.into(),
            latest_commit: latest_commit.into(),
        }
    }
}

/// Branch reference attached to a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefEntry {
    pub id: String,
}

/// Pull request as listed by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestEntry {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    /// Milliseconds since the Unix epoch
    pub updated_date: i64,
    pub from_ref: RefEntry,
}

impl PullRequestEntry {
    pub fn new(
        id: u64,
        title: impl Into<String>,
        updated_date: i64,
        from_ref: impl Into<String>,
    ) -> Self {
        PullRequestEntry {
            id,
            title: title.into(),
            updated_date,
            from_ref: RefEntry { id: from_ref.into() },
        }
    }

    pub fn updated_at(&self) -> Result<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.updated_date).ok_or_else(|| {
            PrSemverError::remote(format!(
                "Pull request #{} has an out-of-range updatedDate: {}",
                self.id, self.updated_date
            ))
        })
    }
}

/// Commit details needed to place a tag in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitEntry {
    #[serde(default)]
    pub message: Option<String>,
    /// Milliseconds since the Unix epoch
    #[serde(default)]
    pub author_timestamp: Option<i64>,
}

impl CommitEntry {
    pub fn authored_at(&self) -> Option<DateTime<Utc>> {
        self.author_timestamp
            .and_then(DateTime::<Utc>::from_timestamp_millis)
    }
}

/// Pull request state filter; only merged pull requests count towards a release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PullRequestState {
    #[default]
    Merged,
}

impl PullRequestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PullRequestState::Merged => "MERGED",
        }
    }
}

/// Read operations against a source-control hosting service
///
/// All operations are idempotent reads. Implementations must be `Send + Sync`
/// and map transport failures to [crate::error::PrSemverError] without
/// retrying; a failed call aborts the whole resolution.
pub trait HostingService: Send + Sync {
    /// List tags newest first, starting at `start`
    fn list_tags(&self, start: u64, limit: u32) -> Result<Page<TagEntry>>;

    /// List pull requests targeting `branch`, most recently updated first
    ///
    /// # Arguments
    /// * `branch` - Full ref of the target branch, e.g. `refs/heads/master`
    /// * `state` - State filter, normally [PullRequestState::Merged]
    fn list_pull_requests(
        &self,
        branch: &str,
        state: PullRequestState,
        start: u64,
        limit: u32,
    ) -> Result<Page<PullRequestEntry>>;

    /// Fetch message and author timestamp of a commit
    fn get_commit(&self, hash: &str) -> Result<CommitEntry>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_deserialize() {
        let json = r#"{
            "size": 2,
            "limit": 2,
            "isLastPage": false,
            "values": [
                {"id": "refs/tags/v1.1.0", "displayId": "v1.1.0", "latestCommit": "aaa"},
                {"id": "refs/tags/v1.0.0", "displayId": "v1.0.0", "latestCommit": "bbb"}
            ],
            "start": 0,
            "nextPageStart": 2
        }"#;
        let page: Page<TagEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(page.values.len(), 2);
        assert_eq!(page.values[1], TagEntry::new("v1.0.0", "bbb"));
        assert_eq!(page.next_page_start, Some(2));
        assert!(page.has_more());
    }

    #[test]
    fn test_last_page_without_next_start() {
        let page: Page<TagEntry> =
            serde_json::from_str(r#"{"isLastPage": true, "values": []}"#).unwrap();
        assert!(!page.has_more());
        assert!(page.next_page_start.is_none());
    }

    #[test]
    fn test_pull_request_page_deserialize() {
        let json = r#"{
            "isLastPage": true,
            "values": [
                {"id": 3, "title": "Patch: x", "updatedDate": 1000, "fromRef": {"id": "refs/heads/x"}}
            ]
        }"#;
        let page: Page<PullRequestEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(page.values, vec![PullRequestEntry::new(3, "Patch: x", 1000, "refs/heads/x")]);
        assert!(!page.has_more());
    }

    #[test]
    fn test_pull_request_deserialize() {
        let json = r#"{
            "id": 17,
            "title": "Minor: add exports",
            "state": "MERGED",
            "updatedDate": 1714564800000,
            "fromRef": {"id": "refs/heads/feature/exports", "displayId": "feature/exports"},
            "toRef": {"id": "refs/heads/master"}
        }"#;
        let pr: PullRequestEntry = serde_json::from_str(json).unwrap();
        assert_eq!(pr.id, 17);
        assert_eq!(pr.from_ref.id, "refs/heads/feature/exports");
        assert_eq!(pr.updated_at().unwrap().timestamp(), 1_714_564_800);
    }

    #[test]
    fn test_commit_deserialize() {
        let json = r#"{
            "id": "abc",
            "message": "Merge pull request #17 in PRJ/repo",
            "authorTimestamp": 1714564800000
        }"#;
        let commit: CommitEntry = serde_json::from_str(json).unwrap();
        assert_eq!(commit.authored_at().unwrap().timestamp(), 1_714_564_800);
        assert!(commit.message.unwrap().starts_with("Merge pull request"));
    }

    #[test]
    fn test_commit_without_fields() {
        let commit: CommitEntry = serde_json::from_str(r#"{"id": "abc"}"#).unwrap();
        assert!(commit.message.is_none());
        assert!(commit.authored_at().is_none());
    }

    #[test]
    fn test_state_as_str() {
        assert_eq!(PullRequestState::default().as_str(), "MERGED");
    }
}
