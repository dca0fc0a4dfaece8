//! `help`: command index and per-command detail.

use arcade_shell_contract::{ArgBounds, CommandDescriptor, CommandOutcome};

use super::{descriptor, not_found, CommandRegistration};
use crate::{
    registry::command_handler,
    text::{pad_right, rule},
};

/// Detail lines for one command.
pub fn command_help(descriptor: &CommandDescriptor) -> Vec<String> {
    let mut lines = vec![format!("Command: {}", descriptor.name.as_str())];
    if !descriptor.aliases.is_empty() {
        lines.push(format!("Aliases: {}", descriptor.aliases.join(", ")));
    }
    lines.push(format!("Description: {}", descriptor.help.summary));
    lines.push(format!("Usage: {}", descriptor.help.usage));
    if !descriptor.options.is_empty() {
        lines.push("Options:".to_string());
        for option in &descriptor.options {
            let mut form = format!("--{}", option.name);
            if option.takes_value {
                form.push_str("=<value>");
            }
            if let Some(short) = option.short {
                form = format!("-{short}, {form}");
            }
            lines.push(format!("  {form:<26} {}", option.summary));
        }
    }
    lines
}

pub(crate) fn help_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: descriptor(
            "help",
            &["?", "man"],
            ArgBounds::between(0, 1),
            vec![],
            "Show help for commands",
            "help [command]",
        ),
        handler: command_handler(|ctx| {
            let registry = &ctx.shell.registry;
            if let Some(target) = ctx.arg(0) {
                let command = registry
                    .resolve(target)
                    .ok_or_else(|| not_found(format!("No help available for: {target}")))?;
                return Ok(CommandOutcome::lines(command_help(command.descriptor())));
            }

            let mut lines = vec!["Available commands:".to_string(), rule('=', 18)];
            for descriptor in registry.descriptors() {
                lines.push(format!(
                    "  {} - {}",
                    pad_right(descriptor.name.as_str(), 12),
                    descriptor.help.summary
                ));
            }
            lines.push(String::new());
            lines.push("Use 'help <command>' for more information.".to_string());
            Ok(CommandOutcome::lines(lines))
        }),
    }
}
