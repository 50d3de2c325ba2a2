//! User interface module - console output and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Writing to the terminal
//!
//! Only the final result goes to stdout. Diagnostics go to stderr so the
//! output can be captured by scripts.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::domain::{PullRequest, Semver};

pub mod formatter;

pub use formatter::{format_pull_request_tree, format_transition, render_outcome, UNCHANGED};

/// Print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Print a boundary warning with a yellow marker.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Print the pull request tree the increment was derived from.
pub fn display_pull_request_tree(pull_requests: &[PullRequest]) {
    for line in format_pull_request_tree(pull_requests) {
        eprintln!("{}", line);
    }
}

/// Print the `current -> next` transition.
pub fn display_transition(current: &Semver, next: &Semver) {
    eprintln!("{} {}", style("→").yellow(), format_transition(current, next));
}

/// Print the final result on stdout.
pub fn display_outcome(rendered: &str) {
    println!("{}", rendered);
}
