//! Command-line workflow support

pub mod orchestration;

pub use orchestration::{
    boundary_warnings, build_resolve_config, resolve_credentials, run_workflow, Credentials,
    RunArgs,
};
