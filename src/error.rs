use thiserror::Error;

/// Unified error type for pr-semver operations
#[derive(Error, Debug)]
pub enum PrSemverError {
    #[error("Invalid semver version: {0}")]
    InvalidVersionFormat(String),

    #[error("Pull request title did not contain a valid semver label: #{id} {title}")]
    InvalidPullRequestTitle { id: u64, title: String },

    #[error(
        "Zero-major development mode requested but current version {current} already has a non-zero major"
    )]
    ZeroMajorViolation { current: String },

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed service response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in pr-semver
pub type Result<T> = std::result::Result<T, PrSemverError>;

impl PrSemverError {
    /// Create a version format error for the offending text
    pub fn invalid_version(text: impl Into<String>) -> Self {
        PrSemverError::InvalidVersionFormat(text.into())
    }

    /// Create an invalid option error with context
    pub fn invalid_option(msg: impl Into<String>) -> Self {
        PrSemverError::InvalidOption(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        PrSemverError::Config(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        PrSemverError::Remote(msg.into())
    }
}
