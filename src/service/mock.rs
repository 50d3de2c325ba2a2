use crate::error::{PrSemverError, Result};
use crate::service::{
    CommitEntry, HostingService, Page, PullRequestEntry, PullRequestState, TagEntry,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// A request received by [MockService]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    ListTags { start: u64, limit: u32 },
    ListPullRequests { branch: String, start: u64, limit: u32 },
    GetCommit { hash: String },
}

/// In-memory hosting service for testing without network access
///
/// Tags and pull requests are served in insertion order, which callers treat
/// as newest first. Every request is recorded so tests can assert how far
/// pagination went.
pub struct MockService {
    tags: Vec<TagEntry>,
    commits: HashMap<String, CommitEntry>,
    pull_requests: HashMap<String, Vec<PullRequestEntry>>,
    calls: Mutex<Vec<ServiceCall>>,
}

impl MockService {
    /// Create a new empty mock service
    pub fn new() -> Self {
        MockService {
            tags: Vec::new(),
            commits: HashMap::new(),
            pull_requests: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Append a tag; add newest tags first
    pub fn add_tag(&mut self, name: impl Into<String>, commit_hash: impl Into<String>) {
        self.tags.push(TagEntry::new(name, commit_hash));
    }

    /// Register a commit with its message and author timestamp in milliseconds
    pub fn add_commit(
        &mut self,
        hash: impl Into<String>,
        message: impl Into<String>,
        author_timestamp: i64,
    ) {
        self.commits.insert(
            hash.into(),
            CommitEntry {
                message: Some(message.into()),
                author_timestamp: Some(author_timestamp),
            },
        );
    }

    /// Append a pull request merged into `branch`; add most recently updated first
    pub fn add_pull_request(&mut self, branch: impl Into<String>, entry: PullRequestEntry) {
        self.pull_requests.entry(branch.into()).or_default().push(entry);
    }

    /// Every request received so far, in order
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn record(&self, call: ServiceCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

fn page_of<T: Clone>(items: &[T], start: u64, limit: u32) -> Page<T> {
    let len = items.len();
    let begin = usize::try_from(start).unwrap_or(len).min(len);
    let end = begin.saturating_add(limit as usize).min(len);
    let is_last_page = end >= len;
    Page {
        values: items[begin..end].to_vec(),
        is_last_page,
        next_page_start: if is_last_page { None } else { Some(end as u64) },
    }
}

impl HostingService for MockService {
    fn list_tags(&self, start: u64, limit: u32) -> Result<Page<TagEntry>> {
        self.record(ServiceCall::ListTags { start, limit });
        Ok(page_of(&self.tags, start, limit))
    }

    fn list_pull_requests(
        &self,
        branch: &str,
        _state: PullRequestState,
        start: u64,
        limit: u32,
    ) -> Result<Page<PullRequestEntry>> {
        self.record(ServiceCall::ListPullRequests {
            branch: branch.to_string(),
            start,
            limit,
        });
        let entries = self
            .pull_requests
            .get(branch)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        Ok(page_of(entries, start, limit))
    }

    fn get_commit(&self, hash: &str) -> Result<CommitEntry> {
        self.record(ServiceCall::GetCommit {
            hash: hash.to_string(),
        });
        self.commits
            .get(hash)
            .cloned()
            .ok_or_else(|| PrSemverError::remote(format!("Commit not found: {}", hash)))
    }
}
