//! Progress reporting for version resolution
//!
//! The resolver never prints. It reports what it is doing through a
//! [ProgressObserver] supplied by the caller; the CLI forwards events to
//! `tracing`, tests usually collect them or ignore them.

use crate::domain::{IncrementLevel, Semver};
use std::fmt;
use tracing::{debug, info};

/// Why collection of pull requests on the root branch stopped early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutoffReason {
    /// The pull request merged by the base tag's commit was reached
    ExcludedPullRequest,
    /// A pull request updated at or before the base tag's commit was reached
    Timestamp,
}

impl fmt::Display for CutoffReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CutoffReason::ExcludedPullRequest => f.write_str("merged by base tag"),
            CutoffReason::Timestamp => f.write_str("updated before base tag"),
        }
    }
}

/// Something the resolver did
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent<'a> {
    TagPageFetched {
        start: u64,
        count: usize,
        is_last_page: bool,
    },
    TagSkipped {
        name: &'a str,
    },
    CommitFetched {
        tag: &'a str,
        hash: &'a str,
    },
    BaseTagResolved {
        name: &'a str,
        excluded_pull_request_id: Option<u64>,
    },
    NoBaseTag {
        chain_length: usize,
    },
    PullRequestPageFetched {
        branch: &'a str,
        depth: u32,
        start: u64,
        count: usize,
    },
    CutoffReached {
        branch: &'a str,
        pull_request_id: u64,
        reason: CutoffReason,
    },
    CycleSkipped {
        branch: &'a str,
        depth: u32,
    },
    Classified {
        pull_requests: usize,
        level: IncrementLevel,
    },
    Incremented {
        current: &'a Semver,
        next: &'a Semver,
    },
}

/// Receives progress events from the resolver
pub trait ProgressObserver {
    fn on_event(&self, event: &ProgressEvent<'_>);
}

impl<F> ProgressObserver for F
where
    F: Fn(&ProgressEvent<'_>),
{
    fn on_event(&self, event: &ProgressEvent<'_>) {
        self(event)
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_event(&self, _event: &ProgressEvent<'_>) {}
}

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn on_event(&self, event: &ProgressEvent<'_>) {
        match event {
            ProgressEvent::TagPageFetched {
                start,
                count,
                is_last_page,
            } => debug!(start, count, is_last_page, "Fetched tag page"),
            ProgressEvent::TagSkipped { name } => debug!(tag = %name, "Skipping non-semver tag"),
            ProgressEvent::CommitFetched { tag, hash } => {
                debug!(tag = %tag, commit = %hash, "Fetched tagged commit")
            }
            ProgressEvent::BaseTagResolved {
                name,
                excluded_pull_request_id,
            } => info!(
                tag = %name,
                excluded_pull_request_id = ?excluded_pull_request_id,
                "Resolved base tag"
            ),
            ProgressEvent::NoBaseTag { chain_length } => {
                info!(chain_length, "No release tag found, starting from 0.0.0")
            }
            ProgressEvent::PullRequestPageFetched {
                branch,
                depth,
                start,
                count,
            } => debug!(branch = %branch, depth, start, count, "Fetched pull request page"),
            ProgressEvent::CutoffReached {
                branch,
                pull_request_id,
                reason,
            } => debug!(
                branch = %branch,
                pull_request_id,
                reason = %reason,
                "Reached already released pull request"
            ),
            ProgressEvent::CycleSkipped { branch, depth } => {
                info!(branch = %branch, depth, "Branch already being walked, not descending")
            }
            ProgressEvent::Classified {
                pull_requests,
                level,
            } => info!(pull_requests, level = %level, "Classified pull requests"),
            ProgressEvent::Incremented { current, next } => {
                info!(current = %current, next = %next, "Computed next version")
            }
        }
    }
}
