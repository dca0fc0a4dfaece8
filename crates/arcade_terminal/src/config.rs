//! Typed configuration loading for the terminal host.

use std::{
    fs,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use arcade_shell::ShellConfig;
use serde::{de::DeserializeOwned, Deserialize};

use crate::error::{TerminalError, TerminalResult};

/// Generic TOML-backed config loader.
///
/// Handles only file access and deserialization; callers validate the loaded value.
#[derive(Clone, Debug)]
pub struct ConfigLoader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> ConfigLoader<T>
where
    T: DeserializeOwned,
{
    /// Creates a loader for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    /// Loads and deserializes the file.
    ///
    /// Missing files, unreadable files, and TOML parse failures all surface as
    /// [`TerminalError::Config`].
    pub fn load(&self) -> TerminalResult<T> {
        let body = fs::read_to_string(&self.path).map_err(|err| {
            TerminalError::Config(format!("failed to read {}: {err}", self.path.display()))
        })?;
        toml::from_str(&body).map_err(|err| {
            TerminalError::Config(format!("failed to parse {}: {err}", self.path.display()))
        })
    }

    /// Config path on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Terminal configuration file.
///
/// ```toml
/// catalog = "demos/catalog.json"
/// prefs = ".arcade/prefs.json"
///
/// [shell]
/// user = "player"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// JSON catalog document.
    pub catalog: Option<PathBuf>,
    /// JSON preference map; preferences live in memory when unset.
    pub prefs: Option<PathBuf>,
    /// Session tunables.
    pub shell: ShellConfig,
}
