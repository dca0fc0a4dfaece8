//! Per-session state and the host-facing [`ShellSession`].

use std::{cell::RefCell, rc::Rc};

use arcade_shell_contract::{CommandDescriptor, CommandOutcome};
use catalog_host::{Clock, GameCatalog, PrefsStore, SystemClock};
use serde::{Deserialize, Serialize};

use crate::{
    commands::{load_history, persist_history, register_builtin_commands},
    config::ShellConfig,
    dispatch::{dispatch, ShellContext},
    listing::ListedGame,
    registry::{CommandRegistry, RegistryError},
    scheduler::{TaskHandle, TaskScheduler},
    vfs::display_path,
};

/// One executed input line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The line as typed, trimmed.
    pub command: String,
    /// Unix milliseconds when it was submitted.
    pub timestamp: u64,
}

/// Host-level transition requested by the last command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingState {
    /// A game was launched and the host should hand over to it.
    GameRunning,
    /// The user logged out.
    LoggedOut,
}

/// Something that happened outside a command, reported by [`ShellSession::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A scheduled reboot reset the session.
    Rebooted,
}

pub(crate) struct SessionState {
    pub(crate) user: String,
    pub(crate) cwd: String,
    pub(crate) active_collection: Option<String>,
    pub(crate) last_listing: Vec<ListedGame>,
    pub(crate) history: Vec<HistoryEntry>,
    pub(crate) pending_state: Option<PendingState>,
    pub(crate) pending_reboot: Option<TaskHandle>,
    pub(crate) events: Vec<SessionEvent>,
}

impl SessionState {
    pub(crate) fn new(config: &ShellConfig) -> Self {
        Self {
            user: config.user.clone(),
            cwd: "/".to_string(),
            active_collection: None,
            last_listing: Vec::new(),
            history: Vec::new(),
            pending_state: None,
            pending_reboot: None,
            events: Vec::new(),
        }
    }

    /// Returns to the initial location with a fresh transcript, reloading persisted history.
    ///
    /// Hands back the finished reboot handle so the caller can drop it after releasing the
    /// state borrow.
    pub(crate) fn reset_after_reboot(&mut self, store: &dyn PrefsStore) -> Option<TaskHandle> {
        self.cwd = "/".to_string();
        self.active_collection = None;
        self.last_listing.clear();
        self.pending_state = None;
        self.history = load_history(store, &self.user);
        self.events.push(SessionEvent::Rebooted);
        tracing::info!(user = %self.user, "session rebooted");
        self.pending_reboot.take()
    }
}

/// One interactive shell session over a catalog and a preference store.
pub struct ShellSession {
    shell: ShellContext,
}

impl ShellSession {
    /// Creates a session driven by the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the built-in commands fail to register.
    pub fn new(
        config: ShellConfig,
        catalog: Rc<dyn GameCatalog>,
        store: Rc<dyn PrefsStore>,
    ) -> Result<Self, RegistryError> {
        Self::with_clock(config, catalog, store, Rc::new(SystemClock))
    }

    /// Creates a session that reads time from `clock`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the built-in commands fail to register.
    pub fn with_clock(
        config: ShellConfig,
        catalog: Rc<dyn GameCatalog>,
        store: Rc<dyn PrefsStore>,
        clock: Rc<dyn Clock>,
    ) -> Result<Self, RegistryError> {
        let registry = CommandRegistry::new();
        register_builtin_commands(&registry)?;

        let mut state = SessionState::new(&config);
        state.history = load_history(store.as_ref(), &config.user);
        tracing::info!(
            user = %config.user,
            history = state.history.len(),
            "shell session started"
        );

        Ok(Self {
            shell: ShellContext {
                state: Rc::new(RefCell::new(state)),
                catalog,
                store,
                clock,
                scheduler: TaskScheduler::new(),
                config: Rc::new(config),
                registry,
            },
        })
    }

    /// Records `line` in the history and dispatches it.
    pub fn execute(&self, line: &str) -> CommandOutcome {
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            self.record_history(trimmed);
        }
        dispatch(&self.shell, line)
    }

    fn record_history(&self, command: &str) {
        let entry = HistoryEntry {
            command: command.to_string(),
            timestamp: self.shell.now_ms(),
        };
        let (user, entries) = {
            let mut state = self.shell.state.borrow_mut();
            state.history.push(entry);
            let excess = state
                .history
                .len()
                .saturating_sub(self.shell.config.history_limit);
            state.history.drain(..excess);
            (state.user.clone(), state.history.clone())
        };
        persist_history(self.shell.store.as_ref(), &user, &entries);
    }

    /// Runs scheduled work that is due and drains the events it produced.
    pub fn tick(&self) -> Vec<SessionEvent> {
        let ran = self.shell.scheduler.run_due(self.shell.now_ms());
        if ran > 0 {
            tracing::debug!(ran, "ran scheduled session tasks");
        }
        std::mem::take(&mut self.shell.state.borrow_mut().events)
    }

    /// Earliest pending scheduled deadline, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        self.shell.scheduler.next_deadline()
    }

    /// Canonical cwd.
    pub fn cwd(&self) -> String {
        self.shell.cwd()
    }

    /// Display form of the cwd.
    pub fn display_cwd(&self) -> String {
        self.shell.display_cwd()
    }

    /// `user@host:path$ `
    pub fn prompt(&self) -> String {
        format!(
            "{}@{}:{}$ ",
            self.shell.user(),
            self.shell.config.hostname,
            self.display_cwd()
        )
    }

    /// Short name of the collection the cwd is in.
    pub fn active_collection(&self) -> Option<String> {
        self.shell.state.borrow().active_collection.clone()
    }

    /// Takes the transition requested by the last `launch` or `logout`.
    pub fn take_pending_state(&self) -> Option<PendingState> {
        self.shell.state.borrow_mut().pending_state.take()
    }

    /// Games addressable by bare index.
    pub fn last_listing(&self) -> Vec<ListedGame> {
        self.shell.last_listing()
    }

    /// In-memory history, oldest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.shell.state.borrow().history.clone()
    }

    /// Canonical descriptors sorted by name.
    pub fn descriptors(&self) -> Vec<CommandDescriptor> {
        self.shell.registry.descriptors()
    }

    /// Shared command registry; hosts may register extra commands.
    pub fn registry(&self) -> CommandRegistry {
        self.shell.registry.clone()
    }

    /// Home directory display for the current user, e.g. `/home/guest`.
    pub fn home(&self) -> String {
        display_path("/", &self.shell.user())
    }
}

#[cfg(test)]
mod tests {
    use catalog_host::{FixedClock, MemoryCatalog, MemoryPrefsStore};
    use pretty_assertions::assert_eq;

    use super::*;

    fn session(config: ShellConfig) -> (ShellSession, Rc<FixedClock>, MemoryPrefsStore) {
        let clock = Rc::new(FixedClock::new(1_000));
        let store = MemoryPrefsStore::default();
        let catalog = MemoryCatalog::from_json("{}").expect("catalog");
        let session = ShellSession::with_clock(
            config,
            Rc::new(catalog),
            Rc::new(store.clone()),
            clock.clone(),
        )
        .expect("session");
        (session, clock, store)
    }

    #[test]
    fn history_is_capped_and_persisted() {
        let config = ShellConfig {
            history_limit: 2,
            ..ShellConfig::default()
        };
        let (session, _, store) = session(config);
        session.execute("pwd");
        session.execute("   ");
        session.execute("whoami");
        session.execute("echo hi");

        let commands = session
            .history()
            .into_iter()
            .map(|entry| entry.command)
            .collect::<Vec<_>>();
        assert_eq!(commands, vec!["whoami", "echo hi"]);
        assert_eq!(load_history(&store, "guest").len(), 2);
    }

    #[test]
    fn history_is_reloaded_for_a_new_session() {
        let (first, _, store) = session(ShellConfig::default());
        first.execute("pwd");
        let second = ShellSession::new(
            ShellConfig::default(),
            Rc::new(MemoryCatalog::from_json("{}").expect("catalog")),
            Rc::new(store),
        )
        .expect("session");
        assert_eq!(second.history().len(), 1);
    }

    #[test]
    fn prompt_uses_display_path() {
        let (session, _, _) = session(ShellConfig::default());
        assert_eq!(session.prompt(), "guest@arcade:/home/guest$ ");
        assert_eq!(session.home(), "/home/guest");
    }

    #[test]
    fn reboot_resets_after_the_delay() {
        let (session, clock, _) = session(ShellConfig::default());
        session.execute("cd /collections");
        assert_eq!(session.cwd(), "/Collections");

        let outcome = session.execute("reboot");
        assert_eq!(outcome.stdout, vec!["System rebooting..."]);
        assert_eq!(session.next_deadline(), Some(2_000));

        clock.advance(999);
        assert!(session.tick().is_empty());
        assert_eq!(session.cwd(), "/Collections");

        clock.advance(1);
        assert_eq!(session.tick(), vec![SessionEvent::Rebooted]);
        assert_eq!(session.cwd(), "/");
        assert_eq!(session.next_deadline(), None);
    }

    #[test]
    fn logout_sets_pending_state_once() {
        let (session, _, _) = session(ShellConfig::default());
        let outcome = session.execute("logout");
        assert!(outcome.side_effects.state_changed);
        assert_eq!(session.take_pending_state(), Some(PendingState::LoggedOut));
        assert_eq!(session.take_pending_state(), None);
    }
}
