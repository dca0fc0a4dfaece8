//! Command-line arguments for the `arcade` binary.

use std::path::PathBuf;

use crate::error::{TerminalError, TerminalResult};

/// Parsed command-line arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminalArgs {
    /// `--config <path>`
    pub config: Option<PathBuf>,
    /// `--catalog <path>`; overrides the config file.
    pub catalog: Option<PathBuf>,
    /// `--prefs <path>`; overrides the config file.
    pub prefs: Option<PathBuf>,
    /// `--user <name>`; overrides the config file.
    pub user: Option<String>,
    /// `--help` was requested.
    pub help: bool,
}

impl TerminalArgs {
    /// Parses arguments, excluding the program name.
    ///
    /// Values are accepted as `--flag value` or `--flag=value`.
    pub fn parse<I>(args: I) -> TerminalResult<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => {
                    (flag.to_string(), Some(value.to_string()))
                }
                _ => (arg, None),
            };
            let mut value = |name: &str| -> TerminalResult<String> {
                inline
                    .clone()
                    .or_else(|| args.next())
                    .filter(|value| !value.is_empty())
                    .ok_or_else(|| TerminalError::Usage(format!("{name} requires a value")))
            };
            match flag.as_str() {
                "--config" | "-c" => parsed.config = Some(PathBuf::from(value("--config")?)),
                "--catalog" => parsed.catalog = Some(PathBuf::from(value("--catalog")?)),
                "--prefs" => parsed.prefs = Some(PathBuf::from(value("--prefs")?)),
                "--user" | "-u" => parsed.user = Some(value("--user")?),
                "--help" | "-h" | "help" => parsed.help = true,
                other => {
                    return Err(TerminalError::Usage(format!("unknown argument: {other}")));
                }
            }
        }
        Ok(parsed)
    }
}

/// Usage text printed for `--help` and argument errors.
pub fn usage() -> &'static str {
    "Usage: arcade [--config <path>] [--catalog <path>] [--prefs <path>] [--user <name>]\n\
     \n\
     Options:\n\
       -c, --config <path>   TOML config file\n\
           --catalog <path>  JSON game catalog (required here or in the config)\n\
           --prefs <path>    JSON preference file (default: in-memory)\n\
       -u, --user <name>     Session user name\n\
       -h, --help            Show this help\n\
     \n\
     Logging: set ARCADE_LOG (e.g. ARCADE_LOG=debug) to change the stderr log filter.\n"
}
