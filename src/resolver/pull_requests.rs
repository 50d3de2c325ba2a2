use crate::domain::PullRequest;
use crate::error::{PrSemverError, Result};
use crate::observer::{CutoffReason, ProgressEvent, ProgressObserver};
use crate::service::{HostingService, PullRequestState};
use chrono::{DateTime, Utc};

/// Marks where already released pull requests begin on the root branch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cutoff {
    /// Pull requests updated at or before this instant are released
    pub timestamp: Option<DateTime<Utc>>,
    /// Pull request merged by the base tag's commit
    pub excluded_pull_request_id: Option<u64>,
}

impl Cutoff {
    /// Why `id` updated at `updated_at` is already part of the base release, if it is
    pub fn reached(&self, id: u64, updated_at: DateTime<Utc>) -> Option<CutoffReason> {
        if self.excluded_pull_request_id == Some(id) {
            return Some(CutoffReason::ExcludedPullRequest);
        }
        match self.timestamp {
            Some(timestamp) if updated_at <= timestamp => Some(CutoffReason::Timestamp),
            _ => None,
        }
    }
}

/// Collects merged pull requests into a tree, following source branches
///
/// The root branch is depth 0. Pull requests found at a depth below
/// `max_depth` get the pull requests merged into their own source branch as
/// children; at `max_depth` children are always empty. The cutoff only
/// applies to the root branch: anything merged into a feature branch is
/// treated as unreleased work.
pub struct PullRequestCollector<'a, S: HostingService + ?Sized> {
    service: &'a S,
    observer: &'a dyn ProgressObserver,
    max_depth: u32,
    page_size: u32,
    child_page_size: u32,
}

impl<'a, S: HostingService + ?Sized> PullRequestCollector<'a, S> {
    pub fn new(service: &'a S, observer: &'a dyn ProgressObserver, max_depth: u32) -> Self {
        PullRequestCollector {
            service,
            observer,
            max_depth,
            page_size: 30,
            child_page_size: 20,
        }
    }

    /// Page sizes for the root branch and for source branches
    pub fn with_page_sizes(mut self, page_size: u32, child_page_size: u32) -> Self {
        self.page_size = page_size;
        self.child_page_size = child_page_size;
        self
    }

    /// Collect the pull request tree merged into `branch` since `cutoff`
    pub fn collect(&self, branch: &str, cutoff: Cutoff) -> Result<Vec<PullRequest>> {
        let mut path = Vec::new();
        self.collect_branch(branch, 0, Some(cutoff), &mut path)
    }

    fn collect_branch(
        &self,
        branch: &str,
        depth: u32,
        cutoff: Option<Cutoff>,
        path: &mut Vec<String>,
    ) -> Result<Vec<PullRequest>> {
        path.push(branch.to_string());

        let limit = if depth == 0 {
            self.page_size
        } else {
            self.child_page_size
        };
        let mut collected = Vec::new();
        let mut start = 0;

        'pages: loop {
            let page = self
                .service
                .list_pull_requests(branch, PullRequestState::Merged, start, limit)?;
            self.observer.on_event(&ProgressEvent::PullRequestPageFetched {
                branch,
                depth,
                start,
                count: page.values.len(),
            });

            for entry in &page.values {
                let updated_at = entry.updated_at()?;

                if let Some(reason) = cutoff.and_then(|c| c.reached(entry.id, updated_at)) {
                    self.observer.on_event(&ProgressEvent::CutoffReached {
                        branch,
                        pull_request_id: entry.id,
                        reason,
                    });
                    break 'pages;
                }

                let source_branch = &entry.from_ref.id;
                let children = if depth >= self.max_depth {
                    Vec::new()
                } else if path.iter().any(|walked| walked == source_branch) {
                    self.observer.on_event(&ProgressEvent::CycleSkipped {
                        branch: source_branch,
                        depth: depth + 1,
                    });
                    Vec::new()
                } else {
                    self.collect_branch(source_branch, depth + 1, None, path)?
                };

                collected.push(PullRequest {
                    id: entry.id,
                    title: entry.title.clone(),
                    updated_at,
                    source_branch_id: source_branch.clone(),
                    children,
                });
            }

            match page.next_page_start {
                Some(next) if page.has_more() => {
                    if next <= start {
                        return Err(PrSemverError::remote(format!(
                            "Pull request listing for {} did not advance past start {}",
                            branch, start
                        )));
                    }
                    start = next;
                }
                _ => break,
            }
        }

        path.pop();
        Ok(collected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;
    use crate::service::{MockService, PullRequestEntry, ServiceCall};
    use chrono::TimeZone;

    const ROOT: &str = "refs/heads/master";

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).unwrap()
    }

    fn entry(id: u64, seconds: i64, branch: &str) -> PullRequestEntry {
        PullRequestEntry::new(id, format!("Patch: change {}", id), seconds * 1000, branch)
    }

    #[test]
    fn test_cutoff_reached() {
        let cutoff = Cutoff {
            timestamp: Some(at(100)),
            excluded_pull_request_id: Some(7),
        };
        assert_eq!(cutoff.reached(1, at(101)), None);
        assert_eq!(cutoff.reached(1, at(100)), Some(CutoffReason::Timestamp));
        assert_eq!(cutoff.reached(1, at(99)), Some(CutoffReason::Timestamp));
        assert_eq!(
            cutoff.reached(7, at(500)),
            Some(CutoffReason::ExcludedPullRequest)
        );
        assert_eq!(Cutoff::default().reached(7, at(0)), None);
    }

    #[test]
    fn test_no_cutoff_collects_everything() {
        let mut service = MockService::new();
        for id in (1..=5).rev() {
            service.add_pull_request(ROOT, entry(id, id as i64, "refs/heads/f"));
        }
        let prs = PullRequestCollector::new(&service, &NoopObserver, 0)
            .with_page_sizes(2, 2)
            .collect(ROOT, Cutoff::default())
            .unwrap();
        assert_eq!(prs.iter().map(|p| p.id).collect::<Vec<_>>(), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_timestamp_cutoff_is_inclusive_and_stops_paging() {
        let mut service = MockService::new();
        service.add_pull_request(ROOT, entry(6, 600, "refs/heads/a"));
        service.add_pull_request(ROOT, entry(5, 500, "refs/heads/b"));
        service.add_pull_request(ROOT, entry(4, 400, "refs/heads/c"));
        service.add_pull_request(ROOT, entry(3, 300, "refs/heads/d"));
        service.add_pull_request(ROOT, entry(2, 200, "refs/heads/e"));

        let cutoff = Cutoff {
            timestamp: Some(at(400)),
            excluded_pull_request_id: None,
        };
        let prs = PullRequestCollector::new(&service, &NoopObserver, 0)
            .with_page_sizes(2, 2)
            .collect(ROOT, cutoff)
            .unwrap();

        assert_eq!(prs.iter().map(|p| p.id).collect::<Vec<_>>(), vec![6, 5]);
        let pages: Vec<ServiceCall> = service.calls();
        assert_eq!(
            pages,
            vec![
                ServiceCall::ListPullRequests {
                    branch: ROOT.to_string(),
                    start: 0,
                    limit: 2
                },
                ServiceCall::ListPullRequests {
                    branch: ROOT.to_string(),
                    start: 2,
                    limit: 2
                },
            ]
        );
    }

    #[test]
    fn test_excluded_id_stops_even_after_cutoff_time() {
        let mut service = MockService::new();
        service.add_pull_request(ROOT, entry(9, 900, "refs/heads/a"));
        service.add_pull_request(ROOT, entry(8, 800, "refs/heads/b"));
        service.add_pull_request(ROOT, entry(7, 700, "refs/heads/c"));

        let cutoff = Cutoff {
            timestamp: Some(at(100)),
            excluded_pull_request_id: Some(8),
        };
        let prs = PullRequestCollector::new(&service, &NoopObserver, 0)
            .collect(ROOT, cutoff)
            .unwrap();
        assert_eq!(prs.iter().map(|p| p.id).collect::<Vec<_>>(), vec![9]);
    }

    #[test]
    fn test_children_collected_below_max_depth_without_cutoff() {
        let mut service = MockService::new();
        service.add_pull_request(ROOT, entry(10, 1000, "refs/heads/feature/a"));
        // older than the cutoff, but merged into a feature branch
        service.add_pull_request("refs/heads/feature/a", entry(3, 30, "refs/heads/feature/a1"));
        service.add_pull_request("refs/heads/feature/a1", entry(1, 10, "refs/heads/deep"));

        let cutoff = Cutoff {
            timestamp: Some(at(500)),
            excluded_pull_request_id: None,
        };
        let prs = PullRequestCollector::new(&service, &NoopObserver, 1)
            .collect(ROOT, cutoff)
            .unwrap();

        assert_eq!(prs.len(), 1);
        assert_eq!(prs[0].children.len(), 1);
        assert_eq!(prs[0].children[0].id, 3);
        assert!(prs[0].children[0].children.is_empty());

        let branches: Vec<String> = service
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                ServiceCall::ListPullRequests { branch, .. } => Some(branch),
                _ => None,
            })
            .collect();
        assert_eq!(branches, vec![ROOT.to_string(), "refs/heads/feature/a".to_string()]);
    }

    #[test]
    fn test_depth_zero_never_descends() {
        let mut service = MockService::new();
        service.add_pull_request(ROOT, entry(10, 1000, "refs/heads/feature/a"));
        service.add_pull_request("refs/heads/feature/a", entry(3, 30, "refs/heads/x"));

        let prs = PullRequestCollector::new(&service, &NoopObserver, 0)
            .collect(ROOT, Cutoff::default())
            .unwrap();
        assert!(prs[0].children.is_empty());
        assert_eq!(service.calls().len(), 1);
    }

    #[test]
    fn test_cycle_is_not_walked_twice() {
        let mut service = MockService::new();
        service.add_pull_request(ROOT, entry(2, 200, "refs/heads/a"));
        service.add_pull_request("refs/heads/a", entry(1, 100, "refs/heads/b"));
        service.add_pull_request("refs/heads/b", entry(5, 50, "refs/heads/a"));

        let prs = PullRequestCollector::new(&service, &NoopObserver, 10)
            .collect(ROOT, Cutoff::default())
            .unwrap();

        let b = &prs[0].children[0].children;
        assert_eq!(b.len(), 1);
        assert_eq!(b[0].id, 5);
        assert!(b[0].children.is_empty());
    }
}
