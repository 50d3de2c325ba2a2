//! Main workflow orchestration logic
//!
//! Keeps CLI argument parsing in main.rs separate from the resolution
//! workflow, so the workflow can be driven programmatically and tested
//! against an in-memory service.

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::error::{PrSemverError, Result};
use crate::observer::ProgressObserver;
use crate::resolver::{resolve_next_version, IncrementOptions, ResolveConfig, Resolution};
use crate::service::HostingService;

/// Arguments for the resolution workflow
///
/// Mirrors the CLI Args in a clap-free form. `None` means "use the
/// configuration file value".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunArgs {
    pub config_path: Option<String>,
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub branch: Option<String>,
    pub current: Option<String>,
    pub depth: Option<u32>,
    pub alpha: bool,
    pub beta: bool,
    pub rc: bool,
    pub pre: Option<String>,
    pub meta: Option<String>,
    pub dev: bool,
    pub json: bool,
    pub verbose: bool,
}

/// Connection details for the hosting service
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub url: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

fn pick(arg: &Option<String>, configured: &Option<String>) -> Option<String> {
    arg.as_ref()
        .or(configured.as_ref())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Combine CLI arguments with the configuration file, CLI first
pub fn resolve_credentials(args: &RunArgs, config: &Config) -> Result<Credentials> {
    let url = pick(&args.url, &config.service.url)
        .ok_or_else(|| PrSemverError::config("Bitbucket base url is missing"))?;
    let username = pick(&args.username, &config.service.username)
        .ok_or_else(|| PrSemverError::config("Bitbucket username is missing"))?;
    let password = args
        .password
        .as_ref()
        .or(config.service.password.as_ref())
        .filter(|value| !value.is_empty())
        .cloned()
        .ok_or_else(|| PrSemverError::config("Bitbucket password is missing"))?;

    Ok(Credentials {
        url,
        username,
        password,
    })
}

/// Build the resolver configuration from CLI arguments and file values
pub fn build_resolve_config(args: &RunArgs, config: &Config) -> ResolveConfig {
    ResolveConfig {
        branch: args
            .branch
            .clone()
            .unwrap_or_else(|| config.versioning.branch.clone()),
        depth: args.depth.unwrap_or(config.versioning.depth),
        current: args.current.clone(),
        options: IncrementOptions {
            pre: args.pre.clone(),
            rc: args.rc,
            beta: args.beta,
            alpha: args.alpha,
            meta: args.meta.clone(),
            zero_major_dev: args.dev || config.versioning.dev,
        },
        keywords: config.keywords.clone(),
        tag_page_size: config.service.tag_page_size,
        pull_request_page_size: config.service.pull_request_page_size,
        child_page_size: config.service.child_page_size,
    }
}

/// Main resolution workflow
///
/// Orchestrates the whole process:
/// 1. Merge CLI arguments over configuration
/// 2. Resolve the base tag and cutoff
/// 3. Collect and classify merged pull requests
/// 4. Increment the base version
///
/// # Arguments
///
/// * `service` - Hosting service to read history from
/// * `args` - Workflow arguments
/// * `config` - Loaded configuration
/// * `observer` - Receives progress events
pub fn run_workflow<S: HostingService + ?Sized>(
    service: &S,
    args: &RunArgs,
    config: &Config,
    observer: &dyn ProgressObserver,
) -> Result<Resolution> {
    let resolve_config = build_resolve_config(args, config);
    resolve_next_version(service, &resolve_config, observer)
}

/// Non-fatal notices worth showing for a finished resolution
pub fn boundary_warnings(args: &RunArgs, resolution: &Resolution) -> Vec<BoundaryWarning> {
    let mut warnings = Vec::new();

    if resolution.is_first_release {
        warnings.push(BoundaryWarning::NoPriorRelease {
            pre_release_tags: resolution.tags.chain.len(),
            latest: resolution
                .tags
                .latest()
                .map(|tag| tag.display_name.clone()),
        });
    }

    if args.current.is_some() {
        warnings.push(BoundaryWarning::CurrentOverride {
            current: resolution.current.label(),
            tagged: resolution
                .tags
                .base_tag
                .as_ref()
                .and_then(|tag| tag.semver.as_ref())
                .map(|tagged| tagged.label()),
        });
    }

    if resolution.pull_requests.is_empty() {
        let base = resolution
            .tags
            .base_tag
            .as_ref()
            .map(|tag| tag.display_name.clone())
            .unwrap_or_else(|| "the beginning of history".to_string());
        warnings.push(BoundaryWarning::NoPullRequests { base });
    }

    warnings
}
