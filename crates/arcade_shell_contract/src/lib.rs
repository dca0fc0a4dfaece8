//! Shared command contracts used by the arcade shell engine and its terminal hosts.
//!
//! This crate is runtime-agnostic. It defines serializable command metadata, the uniform result
//! envelope every command returns, and the error taxonomy without depending on the catalog,
//! the session model, or any terminal I/O.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical command name such as `ls` or `favorites`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CommandName(String);

impl CommandName {
    /// Creates a command name from trusted caller input.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the name text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Inclusive positional-argument count bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgBounds {
    /// Minimum number of positional arguments.
    pub min: usize,
    /// Maximum number of positional arguments; `None` is unbounded.
    pub max: Option<usize>,
}

impl ArgBounds {
    /// Accepts exactly `count` arguments.
    pub const fn exactly(count: usize) -> Self {
        Self {
            min: count,
            max: Some(count),
        }
    }

    /// Accepts between `min` and `max` arguments.
    pub const fn between(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    /// Accepts `min` or more arguments.
    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    /// Returns whether `count` satisfies the bounds.
    pub fn contains(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}

/// Named option or flag specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOptionSpec {
    /// Long option name without leading `--`.
    pub name: String,
    /// Optional short option name without leading `-`.
    pub short: Option<char>,
    /// Short description.
    pub summary: String,
    /// Whether the option consumes a value (`--name=value`).
    pub takes_value: bool,
}

impl CommandOptionSpec {
    /// Presence-only option such as `--wide`.
    pub fn flag(name: &str, summary: &str) -> Self {
        Self {
            name: name.to_string(),
            short: None,
            summary: summary.to_string(),
            takes_value: false,
        }
    }

    /// Option that requires a value such as `--limit=<n>`.
    pub fn valued(name: &str, summary: &str) -> Self {
        Self {
            takes_value: true,
            ..Self::flag(name, summary)
        }
    }

    /// Attaches a single-letter alias.
    pub fn with_short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }
}

/// Help metadata for a registered command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpDoc {
    /// Summary sentence.
    pub summary: String,
    /// Usage string displayed in help and arity errors.
    pub usage: String,
}

/// Full command registration metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    /// Canonical command name.
    pub name: CommandName,
    /// Alternate names that resolve to this descriptor.
    pub aliases: Vec<String>,
    /// Accepted positional-argument counts.
    pub bounds: ArgBounds,
    /// Recognized options.
    pub options: Vec<CommandOptionSpec>,
    /// Help metadata.
    pub help: HelpDoc,
}

impl CommandDescriptor {
    /// Finds a recognized option by its long name.
    pub fn option(&self, name: &str) -> Option<&CommandOptionSpec> {
        self.options.iter().find(|option| option.name == name)
    }

    /// Finds a recognized option by its short letter.
    pub fn short_option(&self, short: char) -> Option<&CommandOptionSpec> {
        self.options.iter().find(|option| option.short == Some(short))
    }
}

/// Named side-effect requests the caller applies after a command completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideEffects {
    /// The session working directory changed.
    pub cwd_changed: bool,
    /// The host should consult the session's pending state (launch, logout).
    pub state_changed: bool,
    /// The host should clear its transcript.
    pub clear_screen: bool,
    /// The color scheme setting changed.
    pub reload_theme: bool,
    /// The prompt style setting changed.
    pub reload_prompt: bool,
    /// The font setting changed.
    pub reload_font: bool,
}

impl SideEffects {
    /// Returns whether no side effect is requested.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Structured shell error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShellErrorCode {
    /// User input violated command usage (arity, malformed flag value, malformed address).
    Usage,
    /// A command, path, collection, or game could not be found.
    NotFound,
    /// A collaborator failed while performing the command (for example a launch).
    Operational,
}

/// Error emitted by parsing, lookup, or command handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ShellError {
    /// Error category.
    pub code: ShellErrorCode,
    /// Human-readable message; may span several lines.
    pub message: String,
}

impl ShellError {
    /// Creates a new shell error.
    pub fn new(code: ShellErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Creates a usage error.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(ShellErrorCode::Usage, message)
    }

    /// Creates a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ShellErrorCode::NotFound, message)
    }

    /// Creates an operational error.
    pub fn operational(message: impl Into<String>) -> Self {
        Self::new(ShellErrorCode::Operational, message)
    }

    /// Converts the error into the envelope exit code.
    pub fn exit_code(&self) -> i32 {
        match self.code {
            ShellErrorCode::Usage | ShellErrorCode::NotFound => 1,
            ShellErrorCode::Operational => 2,
        }
    }
}

/// Uniform result envelope returned by every dispatched line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutcome {
    /// Output lines.
    pub stdout: Vec<String>,
    /// Error lines; always empty when `exit_code` is zero.
    pub stderr: Vec<String>,
    /// `0` success, `1` user error, `2` operational failure.
    pub exit_code: i32,
    /// Requests for the caller.
    pub side_effects: SideEffects,
}

impl CommandOutcome {
    /// Successful outcome with no output.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Successful outcome with the given output lines.
    pub fn lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stdout: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Failed outcome carrying the error message on stderr.
    pub fn failure(error: &ShellError) -> Self {
        Self {
            stdout: Vec::new(),
            stderr: error.message.lines().map(str::to_string).collect(),
            exit_code: error.exit_code(),
            side_effects: SideEffects::default(),
        }
    }

    /// Replaces the requested side effects.
    pub fn with_side_effects(mut self, side_effects: SideEffects) -> Self {
        self.side_effects = side_effects;
        self
    }

    /// Returns whether the command succeeded.
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

impl From<ShellError> for CommandOutcome {
    fn from(error: ShellError) -> Self {
        Self::failure(&error)
    }
}
