//! Pure formatting functions for UI output.
//!
//! Everything here builds strings; writing them out is left to the parent
//! module so the formatting can be tested directly.

use crate::domain::{PullRequest, Semver};
use crate::error::Result;
use crate::resolver::Resolution;

/// Text printed on stdout when there is nothing to release
pub const UNCHANGED: &str = "unchanged";

/// Render the final result for stdout.
///
/// Plain mode prints the next label or `unchanged`; JSON mode prints the next
/// version object or `{"unchanged":true}`.
pub fn render_outcome(resolution: &Resolution, json: bool) -> Result<String> {
    let rendered = match (resolution.is_unchanged(), json) {
        (true, false) => UNCHANGED.to_string(),
        (true, true) => serde_json::json!({ "unchanged": true }).to_string(),
        (false, false) => resolution.next.label(),
        (false, true) => serde_json::to_string(&resolution.next)?,
    };
    Ok(rendered)
}

/// `current -> next` summary line
pub fn format_transition(current: &Semver, next: &Semver) -> String {
    format!("{} -> {}", current, next)
}

/// One line per pull request, children indented four spaces per level
pub fn format_pull_request_tree(pull_requests: &[PullRequest]) -> Vec<String> {
    let mut lines = Vec::new();
    push_tree_lines(pull_requests, 0, &mut lines);
    lines
}

fn push_tree_lines(pull_requests: &[PullRequest], indent: usize, lines: &mut Vec<String>) {
    for pull_request in pull_requests {
        lines.push(format!(
            "{}#{} {}",
            "    ".repeat(indent),
            pull_request.id,
            pull_request.title
        ));
        push_tree_lines(&pull_request.children, indent + 1, lines);
    }
}
