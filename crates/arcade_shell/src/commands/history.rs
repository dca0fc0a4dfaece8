//! `history` plus the persisted per-user command log it reads.

use arcade_shell_contract::{ArgBounds, CommandOptionSpec, CommandOutcome};
use catalog_host::{format_unix_ms, load_pref_with, save_pref_with, PrefsStore};

use super::{descriptor, CommandRegistration};
use crate::{
    options::HistoryOptions,
    registry::command_handler,
    session::HistoryEntry,
    text::{pad_right, plural, rule},
};

fn history_key(user: &str) -> String {
    format!("terminal_history_{user}")
}

/// Loads `user`'s persisted history; unreadable entries yield an empty log.
pub(crate) fn load_history(store: &dyn PrefsStore, user: &str) -> Vec<HistoryEntry> {
    match load_pref_with::<_, Vec<HistoryEntry>>(store, &history_key(user)) {
        Ok(entries) => entries.unwrap_or_default(),
        Err(err) => {
            tracing::warn!(user, error = %err, "failed to load command history");
            Vec::new()
        }
    }
}

/// Saves `user`'s history; failures are logged and otherwise ignored.
pub(crate) fn persist_history(store: &dyn PrefsStore, user: &str, entries: &[HistoryEntry]) {
    if let Err(err) = save_pref_with(store, &history_key(user), entries) {
        tracing::warn!(user, error = %err, "failed to persist command history");
    }
}

pub(crate) fn history_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: descriptor(
            "history",
            &["hist"],
            ArgBounds::between(0, 1),
            vec![
                CommandOptionSpec::valued("limit", "Number of entries to show."),
                CommandOptionSpec::flag("all", "Show every entry."),
                CommandOptionSpec::flag("clear", "Delete the stored history."),
            ],
            "Show or manage command history",
            "history [n] [--limit=<n>] [--all] [--clear]",
        ),
        handler: command_handler(|ctx| {
            let options = HistoryOptions::from_invocation(&ctx.args, &ctx.flags)?;
            let shell = ctx.shell;

            if options.clear {
                let user = {
                    let mut state = shell.state.borrow_mut();
                    state.history.clear();
                    state.user.clone()
                };
                if let Err(err) = shell.store.delete_pref(&history_key(&user)) {
                    tracing::warn!(user = %user, error = %err, "failed to delete command history");
                }
                return Ok(CommandOutcome::lines(["Command history cleared"]));
            }

            let history = shell.state.borrow().history.clone();
            if history.is_empty() {
                return Ok(CommandOutcome::lines(["No history available"]));
            }

            let total = history.len();
            // An explicit --limit beats --all, which beats the positional count.
            let show_all = options.all && ctx.flags.value("limit").is_none();
            let limit = if show_all {
                total
            } else {
                options
                    .limit
                    .unwrap_or(shell.config.history_display_default)
            };
            Ok(CommandOutcome::lines(render_history(&history, limit, options.all)))
        }),
    }
}

fn render_history(history: &[HistoryEntry], limit: usize, all: bool) -> Vec<String> {
    let total = history.len();
    let start = total.saturating_sub(limit);
    let showing = total - start;

    let mut lines = vec!["COMMAND HISTORY".to_string(), rule('=', 40)];
    if showing < total {
        lines.push(format!("Showing last {showing} of {total} commands"));
    } else {
        lines.push(format!("Showing all {total} commands"));
    }
    lines.push(rule('-', 40));
    for (offset, entry) in history[start..].iter().enumerate() {
        let number = format!("[{}]", start + offset + 1);
        lines.push(format!(
            "{} {} ({})",
            pad_right(&number, 6),
            entry.command,
            format_unix_ms(entry.timestamp, "%H:%M:%S")
        ));
    }
    lines.push(rule('-', 40));
    lines.push(format!("Total: {}", plural(total, "command")));
    if total > limit && !all {
        lines.push(String::new());
        lines.push(format!("Tip: Use 'history --all' to see all {total} commands"));
    }
    lines
}
