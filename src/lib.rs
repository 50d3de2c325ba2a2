pub mod boundary;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod observer;
pub mod resolver;
pub mod service;
pub mod ui;

pub use error::{PrSemverError, Result};
pub use resolver::{resolve_next_version, ResolveConfig, Resolution};
