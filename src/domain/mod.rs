//! Domain logic - pure versioning rules independent of the hosting service

pub mod increment;
pub mod prerelease;
pub mod pull_request;
pub mod tag;
pub mod version;

pub use increment::IncrementLevel;
pub use prerelease::{PreRelease, PreReleaseKind};
pub use pull_request::{flatten, PullRequest};
pub use tag::{BaseTagResolution, Tag};
pub use version::{is_base_tag, is_semver_tag, sort_versions, Semver};
