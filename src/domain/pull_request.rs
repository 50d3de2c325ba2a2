use chrono::{DateTime, Utc};

/// A merged pull request and the pull requests merged into its source branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub id: u64,
    pub title: String,
    pub updated_at: DateTime<Utc>,
    /// Branch the pull request was raised from, e.g. `refs/heads/feature/x`
    pub source_branch_id: String,
    /// Empty at the depth bound
    pub children: Vec<PullRequest>,
}

/// Flatten a pull request forest depth first, parents before their children
pub fn flatten(pull_requests: &[PullRequest]) -> Vec<&PullRequest> {
    let mut result = Vec::new();
    flatten_into(pull_requests, &mut result);
    result
}

fn flatten_into<'a>(pull_requests: &'a [PullRequest], result: &mut Vec<&'a PullRequest>) {
    for pull_request in pull_requests {
        result.push(pull_request);
        flatten_into(&pull_request.children, result);
    }
}
