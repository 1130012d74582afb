pub(crate) mod bootstrap;
mod config;
pub(crate) mod loop_runner;
mod scene;
mod script;
mod summary;

use std::env;
use std::io;
use std::path::PathBuf;

use engine::WorldError;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ExplorerError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to read config file {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parse config json{location}: {source}")]
    ParseConfig {
        location: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("validation failed at {path}: {message}")]
    InvalidConfig { path: String, message: String },
    #[error("failed to generate world: {0}")]
    World(#[from] WorldError),
    #[error("failed to encode run summary: {0}")]
    EncodeSummary(#[source] serde_json::Error),
    #[error("failed to write run summary to {path}: {source}")]
    WriteSummary {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
