//! Interactive terminal host for the arcade shell.
//!
//! Wires a [`MemoryCatalog`] loaded from a JSON file, a preference store, and the system clock
//! into an [`arcade_shell::ShellSession`], then drives it from stdin.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod args;
pub mod config;
pub mod error;
pub mod prefs;
pub mod repl;

use std::{fs, io, rc::Rc};

use arcade_shell::ShellSession;
use catalog_host::{Clock, MemoryCatalog, MemoryPrefsStore, PrefsStore, SystemClock};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

pub use args::{usage, TerminalArgs};
pub use config::{ConfigLoader, TerminalConfig};
pub use error::{TerminalError, TerminalResult};
pub use prefs::FilePrefsStore;
pub use repl::{ExitReason, Terminal, CLEAR_SCREEN};

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "ARCADE_LOG";

/// Installs the stderr `tracing` subscriber.
///
/// Defaults to `warn`; `ARCADE_LOG` accepts any `EnvFilter` directive.
pub fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .try_init();
}

/// Resolves config and argument overrides into a terminal ready to run.
///
/// # Errors
///
/// Fails when the config file cannot be loaded, no catalog is configured, the catalog is invalid,
/// or the preference file cannot be opened.
pub fn build_terminal(args: &TerminalArgs) -> TerminalResult<Terminal> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::<TerminalConfig>::new(path).load()?,
        None => TerminalConfig::default(),
    };
    if let Some(catalog) = &args.catalog {
        config.catalog = Some(catalog.clone());
    }
    if let Some(prefs) = &args.prefs {
        config.prefs = Some(prefs.clone());
    }
    if let Some(user) = &args.user {
        config.shell.user = user.clone();
    }

    let catalog_path = config.catalog.ok_or_else(|| {
        TerminalError::Usage("no catalog given (use --catalog <path>)".to_string())
    })?;
    let raw = fs::read_to_string(&catalog_path).map_err(|err| {
        TerminalError::Config(format!("failed to read {}: {err}", catalog_path.display()))
    })?;
    let catalog = MemoryCatalog::from_json(&raw)?;
    tracing::info!(catalog = %catalog_path.display(), "catalog loaded");

    let store: Rc<dyn PrefsStore> = match &config.prefs {
        Some(path) => Rc::new(
            FilePrefsStore::open(path).map_err(|err| TerminalError::Config(err.to_string()))?,
        ),
        None => Rc::new(MemoryPrefsStore::default()),
    };
    let clock: Rc<dyn Clock> = Rc::new(SystemClock);
    let session = ShellSession::with_clock(config.shell, Rc::new(catalog), store, clock.clone())?;
    Ok(Terminal::new(session, clock))
}
