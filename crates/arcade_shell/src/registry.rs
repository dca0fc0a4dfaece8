//! Command registry: canonical descriptors plus alias records.

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use arcade_shell_contract::{CommandDescriptor, CommandOutcome, ShellError};
use thiserror::Error;

use crate::dispatch::CommandContext;

/// Synchronous command handler.
pub type CommandHandler = Rc<dyn Fn(&CommandContext<'_>) -> Result<CommandOutcome, ShellError>>;

/// Wraps a closure as a [`CommandHandler`].
pub fn command_handler<F>(handler: F) -> CommandHandler
where
    F: Fn(&CommandContext<'_>) -> Result<CommandOutcome, ShellError> + 'static,
{
    Rc::new(handler)
}

/// Registration failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The name or alias is already taken by another command or alias.
    #[error("`{name}` is already registered")]
    NameTaken {
        /// Conflicting word.
        name: String,
    },
    /// A descriptor lists the same word twice among its name and aliases.
    #[error("`{name}` appears twice in the `{command}` registration")]
    DuplicateAlias {
        /// Repeated word.
        name: String,
        /// Command being registered.
        command: String,
    },
}

/// A canonical command and its handler.
pub struct RegisteredCommand {
    descriptor: CommandDescriptor,
    handler: CommandHandler,
}

impl RegisteredCommand {
    /// Returns the command metadata.
    pub fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    pub(crate) fn handler(&self) -> &CommandHandler {
        &self.handler
    }
}

enum RegistryEntry {
    Command(Rc<RegisteredCommand>),
    Alias { canonical: String },
}

#[derive(Default)]
struct RegistryState {
    entries: BTreeMap<String, RegistryEntry>,
}

/// Shared command registry owned by one shell session; clones share contents.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    state: Rc<RefCell<RegistryState>>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one command and an alias record for each of its aliases.
    ///
    /// Either every word is registered or, on error, none is.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the name or an alias collides.
    pub fn register(
        &self,
        descriptor: CommandDescriptor,
        handler: CommandHandler,
    ) -> Result<(), RegistryError> {
        let canonical = descriptor.name.as_str().to_string();
        let mut state = self.state.borrow_mut();

        let mut words = vec![canonical.as_str()];
        for alias in &descriptor.aliases {
            if words.contains(&alias.as_str()) {
                return Err(RegistryError::DuplicateAlias {
                    name: alias.clone(),
                    command: canonical.clone(),
                });
            }
            words.push(alias);
        }
        if let Some(taken) = words.iter().find(|word| state.entries.contains_key(**word)) {
            return Err(RegistryError::NameTaken {
                name: (*taken).to_string(),
            });
        }

        for alias in &descriptor.aliases {
            state.entries.insert(
                alias.clone(),
                RegistryEntry::Alias {
                    canonical: canonical.clone(),
                },
            );
        }
        state.entries.insert(
            canonical,
            RegistryEntry::Command(Rc::new(RegisteredCommand {
                descriptor,
                handler,
            })),
        );
        Ok(())
    }

    /// Resolves a command word, following alias records to the canonical command.
    pub fn resolve(&self, word: &str) -> Option<Rc<RegisteredCommand>> {
        let state = self.state.borrow();
        match state.entries.get(word)? {
            RegistryEntry::Command(command) => Some(command.clone()),
            RegistryEntry::Alias { canonical } => match state.entries.get(canonical)? {
                RegistryEntry::Command(command) => Some(command.clone()),
                RegistryEntry::Alias { .. } => None,
            },
        }
    }

    /// Returns canonical descriptors sorted by name; aliases are excluded.
    pub fn descriptors(&self) -> Vec<CommandDescriptor> {
        self.state
            .borrow()
            .entries
            .values()
            .filter_map(|entry| match entry {
                RegistryEntry::Command(command) => Some(command.descriptor.clone()),
                RegistryEntry::Alias { .. } => None,
            })
            .collect()
    }

    /// Returns whether `word` is a command name or alias.
    pub fn contains(&self, word: &str) -> bool {
        self.state.borrow().entries.contains_key(word)
    }
}
