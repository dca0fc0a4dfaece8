//! Session configuration.

use serde::{Deserialize, Serialize};

/// Tunables for one shell session.
///
/// Every field has a default so hosts can deserialize partial TOML/JSON documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Logged-in user name; also selects the history key and the `/home/<user>` alias.
    pub user: String,
    /// Host name shown in the prompt.
    pub hostname: String,
    /// Maximum number of persisted history entries.
    pub history_limit: usize,
    /// Entries shown by `history` without arguments.
    pub history_display_default: usize,
    /// Delay before a requested reboot resets the session.
    pub reboot_delay_ms: u64,
    /// Games shown by `games` without `--limit`.
    pub games_default_limit: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            user: "guest".to_string(),
            hostname: "arcade".to_string(),
            history_limit: 500,
            history_display_default: 20,
            reboot_delay_ms: 1_000,
            games_default_limit: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_documents_fill_defaults() {
        let config: ShellConfig = toml::from_str("user = \"alice\"\nreboot_delay_ms = 250\n")
            .expect("parse config");
        assert_eq!(config.user, "alice");
        assert_eq!(config.reboot_delay_ms, 250);
        assert_eq!(config.history_limit, 500);
        assert_eq!(config.games_default_limit, 100);
    }
}
