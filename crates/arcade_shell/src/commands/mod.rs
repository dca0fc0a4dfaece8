//! Built-in command registrations.

pub mod help;
mod history;
mod library;
mod navigation;
mod play;
mod system;
mod theme;

use arcade_shell_contract::{
    ArgBounds, CommandDescriptor, CommandName, CommandOptionSpec, HelpDoc, ShellError,
};

use crate::registry::{CommandHandler, CommandRegistry, RegistryError};

pub(crate) use history::{load_history, persist_history};
pub use play::{LastContext, LAST_CONTEXT_KEY};

/// Descriptor plus handler, ready to register.
pub(crate) struct CommandRegistration {
    pub(crate) descriptor: CommandDescriptor,
    pub(crate) handler: CommandHandler,
}

/// Registers every built-in command.
///
/// # Errors
///
/// Returns [`RegistryError`] when a built-in name collides with one already registered.
pub fn register_builtin_commands(registry: &CommandRegistry) -> Result<(), RegistryError> {
    for registration in builtin_registrations() {
        registry.register(registration.descriptor, registration.handler)?;
    }
    Ok(())
}

fn builtin_registrations() -> Vec<CommandRegistration> {
    vec![
        help::help_registration(),
        system::clear_registration(),
        navigation::pwd_registration(),
        navigation::ls_registration(),
        navigation::head_registration(),
        navigation::tail_registration(),
        navigation::ll_registration(),
        navigation::cols_registration(),
        navigation::cd_registration(),
        navigation::use_registration(),
        system::whoami_registration(),
        system::logout_registration(),
        system::reboot_registration(),
        history::history_registration(),
        library::collections_registration(),
        library::games_registration(),
        library::info_registration(),
        play::launch_registration(),
        play::favorites_registration(),
        library::search_registration(),
        library::stats_registration(),
        system::echo_registration(),
        system::date_registration(),
        theme::theme_registration(),
    ]
}

fn descriptor(
    name: &str,
    aliases: &[&str],
    bounds: ArgBounds,
    options: Vec<CommandOptionSpec>,
    summary: &str,
    usage: &str,
) -> CommandDescriptor {
    CommandDescriptor {
        name: CommandName::new(name),
        aliases: aliases.iter().map(|alias| alias.to_string()).collect(),
        bounds,
        options,
        help: HelpDoc {
            summary: summary.to_string(),
            usage: usage.to_string(),
        },
    }
}

fn usage_error(message: impl Into<String>) -> ShellError {
    ShellError::usage(message)
}

fn not_found(message: impl Into<String>) -> ShellError {
    ShellError::not_found(message)
}

fn selector_options() -> Vec<CommandOptionSpec> {
    vec![
        CommandOptionSpec::valued("collection", "Namespace or collection for --index."),
        CommandOptionSpec::valued("index", "Index inside --collection."),
    ]
}
