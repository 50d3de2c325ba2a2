use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use pr_semver::cli::{self, RunArgs};
use pr_semver::config;
use pr_semver::observer::TracingObserver;
use pr_semver::service::BitbucketClient;
use pr_semver::ui;

#[derive(clap::Parser)]
#[command(
    name = "pr-semver",
    version,
    about = "Compute the next semantic version from merged pull request titles"
)]
struct Args {
    #[arg(
        long,
        env = "BITBUCKET_PROJECT_URL",
        help = "Repository url e.g. https://bitbucket.company.com/projects/foo/repos/bar"
    )]
    url: Option<String>,

    #[arg(short, long, env = "BITBUCKET_USER", help = "Bitbucket username")]
    username: Option<String>,

    #[arg(
        short,
        long,
        env = "BITBUCKET_PASSWORD",
        hide_env_values = true,
        help = "Bitbucket password"
    )]
    password: Option<String>,

    #[arg(
        short,
        long,
        help = "Root branch to scan for merged pull requests since the last release [default: master]"
    )]
    branch: Option<String>,

    #[arg(
        short,
        long,
        help = "Current version; if omitted it is taken from tag history"
    )]
    current: Option<String>,

    #[arg(long, help = "Add an alpha pre-release label")]
    alpha: bool,

    #[arg(long, help = "Add a beta pre-release label")]
    beta: bool,

    #[arg(long, help = "Add a release candidate pre-release label")]
    rc: bool,

    #[arg(long, value_name = "LABEL", help = "Add a custom pre-release label")]
    pre: Option<String>,

    #[arg(long, value_name = "LABEL", help = "Add build metadata")]
    meta: Option<String>,

    #[arg(long, help = "Print the result as JSON")]
    json: bool,

    #[arg(long, help = "Keep the major version at zero during initial development")]
    dev: bool,

    #[arg(
        short,
        long,
        help = "Levels of pull requests merged into source branches to walk [default: 1]"
    )]
    depth: Option<u32>,

    #[arg(short, long, help = "Enable verbose logging")]
    verbose: bool,

    #[arg(long, help = "Custom configuration file path")]
    config: Option<String>,
}

impl From<Args> for RunArgs {
    fn from(args: Args) -> Self {
        RunArgs {
            config_path: args.config,
            url: args.url,
            username: args.username,
            // keep compatibility with the older variable name
            password: args
                .password
                .or_else(|| std::env::var("BITBUCKET_PSWD").ok()),
            branch: args.branch,
            current: args.current,
            depth: args.depth,
            alpha: args.alpha,
            beta: args.beta,
            rc: args.rc,
            pre: args.pre,
            meta: args.meta,
            dev: args.dev,
            json: args.json,
            verbose: args.verbose,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "warn,pr_semver=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
}

fn run(args: RunArgs) -> Result<()> {
    let config = config::load_config(args.config_path.as_deref())
        .context("Error loading config")?;
    let credentials = cli::resolve_credentials(&args, &config)?;
    let service =
        BitbucketClient::new(&credentials.url, &credentials.username, &credentials.password)
            .context("Failed to create Bitbucket client")?;

    let resolution = cli::run_workflow(&service, &args, &config, &TracingObserver)?;

    for warning in cli::boundary_warnings(&args, &resolution) {
        ui::display_boundary_warning(&warning);
    }

    if args.verbose {
        ui::display_pull_request_tree(&resolution.pull_requests);
        ui::display_transition(&resolution.current, &resolution.next);
    }

    ui::display_outcome(&ui::render_outcome(&resolution, args.json)?);
    Ok(())
}

fn main() {
    let args = RunArgs::from(Args::parse());
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        process::exit(1);
    }
}
