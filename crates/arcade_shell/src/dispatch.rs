//! Line dispatch: tokenize, resolve, validate, and run one command.

use std::{
    cell::RefCell,
    panic::{catch_unwind, AssertUnwindSafe},
    rc::Rc,
};

use arcade_shell_contract::{CommandDescriptor, CommandOutcome, ShellError};
use catalog_host::{Clock, GameCatalog, GameId, PrefsStore};
use shell_lexer::{parse_line, LexError, RawFlag};

use crate::{
    commands::help::command_help,
    config::ShellConfig,
    listing::ListedGame,
    namespace::CatalogView,
    options::{FlagSet, GameSelector},
    registry::CommandRegistry,
    resolve::GameResolver,
    scheduler::TaskScheduler,
    session::SessionState,
    vfs::display_path,
};

/// Collaborators and mutable session state shared by every handler of one session.
#[derive(Clone)]
pub struct ShellContext {
    pub(crate) state: Rc<RefCell<SessionState>>,
    pub(crate) catalog: Rc<dyn GameCatalog>,
    pub(crate) store: Rc<dyn PrefsStore>,
    pub(crate) clock: Rc<dyn Clock>,
    pub(crate) scheduler: TaskScheduler,
    pub(crate) config: Rc<ShellConfig>,
    pub(crate) registry: CommandRegistry,
}

impl ShellContext {
    /// Current user.
    pub fn user(&self) -> String {
        self.state.borrow().user.clone()
    }

    /// Canonical cwd.
    pub fn cwd(&self) -> String {
        self.state.borrow().cwd.clone()
    }

    /// Display form of the cwd.
    pub fn display_cwd(&self) -> String {
        let state = self.state.borrow();
        display_path(&state.cwd, &state.user)
    }

    /// Fresh catalog snapshot for one command.
    pub fn view(&self) -> CatalogView {
        CatalogView::capture(self.catalog.as_ref())
    }

    /// Games addressable by bare index.
    pub fn last_listing(&self) -> Vec<ListedGame> {
        self.state.borrow().last_listing.clone()
    }

    /// Replaces the games addressable by bare index.
    pub fn set_last_listing(&self, games: Vec<ListedGame>) {
        self.state.borrow_mut().last_listing = games;
    }

    /// Resolves a game selector against `view` and the last listing.
    ///
    /// # Errors
    ///
    /// Returns the selector's usage or not-found error, completed with `usage`.
    pub fn resolve_game(
        &self,
        view: &CatalogView,
        selector: &GameSelector,
        usage: &str,
    ) -> Result<GameId, ShellError> {
        let listing = self.last_listing();
        GameResolver::new(view, self.catalog.as_ref(), &listing)
            .resolve(selector)
            .map_err(|err| err.into_shell_error(usage))
    }

    /// Current time in unix milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}

/// One validated invocation handed to a handler.
pub struct CommandContext<'a> {
    /// Canonical descriptor.
    pub descriptor: &'a CommandDescriptor,
    /// Positional arguments.
    pub args: Vec<String>,
    /// Validated flags.
    pub flags: FlagSet,
    /// Session collaborators.
    pub shell: &'a ShellContext,
}

impl CommandContext<'_> {
    /// Positional argument at `index`.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// The command's usage line.
    pub fn usage(&self) -> &str {
        &self.descriptor.help.usage
    }
}

/// Runs one input line to completion and returns its envelope.
///
/// Never panics: handler panics are caught and reported as operational failures.
pub fn dispatch(shell: &ShellContext, line: &str) -> CommandOutcome {
    let parsed = match parse_line(line) {
        Ok(parsed) => parsed,
        Err(err) => return CommandOutcome::failure(&lex_error(err)),
    };
    let Some(word) = parsed.command else {
        return CommandOutcome::empty();
    };

    let Some(command) = shell.registry.resolve(&word) else {
        tracing::debug!(word = %word, "unknown command");
        return CommandOutcome::failure(&ShellError::not_found(format!(
            "{word}: command not found"
        )));
    };
    let descriptor = command.descriptor();
    tracing::debug!(
        command = descriptor.name.as_str(),
        args = parsed.args.len(),
        flags = parsed.flags.len(),
        "dispatching"
    );

    if parsed
        .flags
        .iter()
        .any(|flag| matches!(flag, RawFlag::Long { name } if name == "help"))
    {
        return CommandOutcome::lines(command_help(descriptor));
    }

    let flags = match FlagSet::parse(&parsed.flags, descriptor) {
        Ok(flags) => flags,
        Err(err) => return CommandOutcome::failure(&err),
    };
    if !descriptor.bounds.contains(parsed.args.len()) {
        return CommandOutcome::failure(&ShellError::usage(format!(
            "Usage: {}",
            descriptor.help.usage
        )));
    }

    let context = CommandContext {
        descriptor,
        args: parsed.args,
        flags,
        shell,
    };
    let handler = command.handler().clone();
    match catch_unwind(AssertUnwindSafe(|| handler(&context))) {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(err)) => {
            tracing::debug!(
                command = descriptor.name.as_str(),
                exit_code = err.exit_code(),
                "command failed"
            );
            CommandOutcome::failure(&err)
        }
        Err(payload) => {
            let detail = payload
                .downcast_ref::<&str>()
                .map(|message| (*message).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!(
                command = descriptor.name.as_str(),
                detail = %detail,
                "command panicked"
            );
            CommandOutcome::failure(&ShellError::operational(format!(
                "{}: internal error: {detail}",
                descriptor.name.as_str()
            )))
        }
    }
}

fn lex_error(err: LexError) -> ShellError {
    ShellError::usage(format!("syntax error: {err}"))
}
