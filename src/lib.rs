//! better-env - declarative environment variable manifests
//!
//! A project lists the names of the environment variables it expects in a
//! `.better-env` file at its root. This crate creates that file and reads it
//! back as an ordered list of declarations. Values are never stored here.

pub mod cli;
pub mod config;
pub mod logging;

pub use config::{
    ConfigInitializer, ConfigParseError, ConfigValidator, DeclarationList, InitError, InitOptions,
    CONFIG_FILE_NAME,
};

use std::path::PathBuf;

/// Result type alias for better-env operations
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to better-env operations
#[derive(thiserror::Error, Debug)]
pub enum BetterEnvError {
    #[error(transparent)]
    Init(#[from] InitError),

    #[error(transparent)]
    Parse(#[from] ConfigParseError),

    #[error("no .better-env found in {} or any parent directory", start.display())]
    ConfigNotFound { start: PathBuf },

    #[error("{count} declaration(s) failed validation")]
    ValidationFailed { count: usize },
}
