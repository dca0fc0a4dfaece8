//! Terminal host errors.

use std::io;

use arcade_shell::RegistryError;
use catalog_host::CatalogError;
use thiserror::Error;

/// Failures that stop the terminal before or outside command dispatch.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// Bad command-line arguments.
    #[error("{0}")]
    Usage(String),
    /// Unreadable or invalid configuration.
    #[error("config error: {0}")]
    Config(String),
    /// The catalog file could not be loaded.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    /// Built-in commands failed to register.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    /// Terminal I/O failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience result type for the terminal host.
pub type TerminalResult<T> = Result<T, TerminalError>;

impl TerminalError {
    /// Process exit code for the error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => 2,
            _ => 1,
        }
    }
}
