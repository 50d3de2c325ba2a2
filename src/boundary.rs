use std::fmt;

/// Non-fatal conditions met while resolving a version near the edges of
/// the repository's history. These should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No release tag exists; the version starts from 0.0.0
    NoPriorRelease {
        pre_release_tags: usize,
        /// Newest pre-release tag seen, if any
        latest: Option<String>,
    },
    /// Nothing was merged since the base tag
    NoPullRequests { base: String },
    /// An explicit current version replaced the one found in tag history
    CurrentOverride {
        current: String,
        /// Base tag version, absent on a first release
        tagged: Option<String>,
    },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoPriorRelease {
                pre_release_tags,
                latest,
            } => match latest {
                Some(latest) if *pre_release_tags > 0 => write!(
                    f,
                    "No release tag found among {} pre-release tag(s) (newest '{}'), starting from 0.0.0",
                    pre_release_tags, latest
                ),
                _ => write!(f, "No release tag found, starting from 0.0.0"),
            },
            BoundaryWarning::NoPullRequests { base } => {
                write!(f, "No merged pull requests since '{}'", base)
            }
            BoundaryWarning::CurrentOverride { current, tagged } => match tagged {
                Some(tagged) => write!(
                    f,
                    "Using current version '{}' instead of tagged version '{}'",
                    current, tagged
                ),
                None => write!(
                    f,
                    "Using current version '{}' although no release tag exists",
                    current
                ),
            },
        }
    }
}
