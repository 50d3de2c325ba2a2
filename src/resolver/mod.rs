//! Resolution engine for determining the next version from hosting history
//!
//! The tag chain is resolved first to establish the base version and the
//! cutoff, then merged pull requests are collected, classified and used to
//! increment the base.

pub mod incrementer;
pub mod pull_requests;
pub mod tag_chain;

pub use incrementer::{increment_version, IncrementOptions};
pub use pull_requests::{Cutoff, PullRequestCollector};
pub use tag_chain::TagChainResolver;

use crate::classifier::IncrementClassifier;
use crate::config::{normalize_branch, KeywordsConfig};
use crate::domain::{flatten, BaseTagResolution, IncrementLevel, PullRequest, Semver};
use crate::error::{PrSemverError, Result};
use crate::observer::{ProgressEvent, ProgressObserver};
use crate::service::HostingService;

/// Everything a single resolution needs besides the service
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveConfig {
    /// Root branch; short names are expanded to `refs/heads/<name>`
    pub branch: String,
    /// Levels of source branches to descend into
    pub depth: u32,
    /// Override for the base version; the tag chain is still walked
    pub current: Option<String>,
    pub options: IncrementOptions,
    pub keywords: KeywordsConfig,
    pub tag_page_size: u32,
    pub pull_request_page_size: u32,
    pub child_page_size: u32,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        ResolveConfig {
            branch: "master".to_string(),
            depth: 1,
            current: None,
            options: IncrementOptions::default(),
            keywords: KeywordsConfig::default(),
            tag_page_size: 20,
            pull_request_page_size: 30,
            child_page_size: 20,
        }
    }
}

/// Result of a version resolution
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub current: Semver,
    pub next: Semver,
    /// No release tag exists yet
    pub is_first_release: bool,
    pub level: IncrementLevel,
    pub tags: BaseTagResolution,
    /// Pull request tree the increment was derived from
    pub pull_requests: Vec<PullRequest>,
}

impl Resolution {
    /// True when there is nothing new to release
    pub fn is_unchanged(&self) -> bool {
        !self.is_first_release && self.current.label() == self.next.label()
    }
}

/// Resolve the next version for the configured branch.
///
/// Fails fast: any remote error, malformed tag, unclassifiable pull request
/// title or zero-major violation aborts the whole resolution. A blank branch
/// is rejected before any request is made.
pub fn resolve_next_version<S: HostingService + ?Sized>(
    service: &S,
    config: &ResolveConfig,
    observer: &dyn ProgressObserver,
) -> Result<Resolution> {
    let classifier = IncrementClassifier::new(&config.keywords)?;
    config.options.validate()?;
    if config.branch.trim().is_empty() {
        return Err(PrSemverError::invalid_option("Branch must not be empty"));
    }
    let overridden = config
        .current
        .as_deref()
        .map(Semver::parse)
        .transpose()?;

    let tags = TagChainResolver::new(service, observer, config.tag_page_size).resolve()?;
    let current = overridden.unwrap_or_else(|| tags.base_version());

    if config.options.zero_major_dev && current.major > 0 {
        return Err(PrSemverError::ZeroMajorViolation {
            current: current.label(),
        });
    }

    let cutoff = Cutoff {
        timestamp: tags.cutoff(),
        excluded_pull_request_id: tags.excluded_pull_request_id,
    };
    let pull_requests = PullRequestCollector::new(service, observer, config.depth)
        .with_page_sizes(config.pull_request_page_size, config.child_page_size)
        .collect(&normalize_branch(&config.branch), cutoff)?;

    let all = flatten(&pull_requests);
    let level = classifier.classify(all.iter().copied())?;
    observer.on_event(&ProgressEvent::Classified {
        pull_requests: all.len(),
        level,
    });

    let next = increment_version(&current, level, &config.options, tags.tag_names())?;
    observer.on_event(&ProgressEvent::Incremented {
        current: &current,
        next: &next,
    });

    Ok(Resolution {
        current,
        next,
        is_first_release: tags.is_first_release(),
        level,
        tags,
        pull_requests,
    })
}
