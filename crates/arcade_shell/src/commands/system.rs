//! Session-level commands: `clear`, `whoami`, `logout`, `reboot`, `echo`, `date`.

use std::rc::Rc;

use arcade_shell_contract::{ArgBounds, CommandOutcome, SideEffects};
use catalog_host::format_unix_ms;

use super::{descriptor, CommandRegistration};
use crate::{registry::command_handler, session::PendingState};

pub(crate) fn clear_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: descriptor(
            "clear",
            &["cls"],
            ArgBounds::exactly(0),
            vec![],
            "Clear the terminal screen",
            "clear",
        ),
        handler: command_handler(|_| {
            Ok(CommandOutcome::empty().with_side_effects(SideEffects {
                clear_screen: true,
                ..SideEffects::default()
            }))
        }),
    }
}

pub(crate) fn whoami_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: descriptor(
            "whoami",
            &[],
            ArgBounds::exactly(0),
            vec![],
            "Print current user",
            "whoami",
        ),
        handler: command_handler(|ctx| Ok(CommandOutcome::lines([ctx.shell.user()]))),
    }
}

pub(crate) fn logout_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: descriptor(
            "logout",
            &[],
            ArgBounds::exactly(0),
            vec![],
            "Log out current user",
            "logout",
        ),
        handler: command_handler(|ctx| {
            ctx.shell.state.borrow_mut().pending_state = Some(PendingState::LoggedOut);
            tracing::info!(user = %ctx.shell.user(), "logout requested");
            Ok(
                CommandOutcome::lines(["Logged out successfully"]).with_side_effects(SideEffects {
                    state_changed: true,
                    ..SideEffects::default()
                }),
            )
        }),
    }
}

pub(crate) fn reboot_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: descriptor(
            "reboot",
            &["restart"],
            ArgBounds::exactly(0),
            vec![],
            "Reboot the terminal system",
            "reboot",
        ),
        handler: command_handler(|ctx| {
            let shell = ctx.shell;
            let state = Rc::downgrade(&shell.state);
            let store = shell.store.clone();
            let handle = shell.scheduler.schedule_once(
                shell.now_ms(),
                shell.config.reboot_delay_ms,
                Box::new(move || {
                    let Some(state) = state.upgrade() else {
                        return;
                    };
                    // The reset drops the finished handle; keep it alive until the borrow ends.
                    let finished = state.borrow_mut().reset_after_reboot(store.as_ref());
                    drop(finished);
                }),
            );

            // A pending reset is cancelled when its handle is replaced.
            let previous = shell.state.borrow_mut().pending_reboot.replace(handle);
            if previous.is_some() {
                tracing::debug!("restarting pending reboot delay");
            }
            drop(previous);

            Ok(CommandOutcome::lines(["System rebooting..."]))
        }),
    }
}

pub(crate) fn echo_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: descriptor(
            "echo",
            &[],
            ArgBounds::at_least(1),
            vec![],
            "Echo arguments",
            "echo <text>",
        ),
        handler: command_handler(|ctx| Ok(CommandOutcome::lines([ctx.args.join(" ")]))),
    }
}

pub(crate) fn date_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: descriptor(
            "date",
            &[],
            ArgBounds::exactly(0),
            vec![],
            "Show current date and time",
            "date",
        ),
        handler: command_handler(|ctx| {
            let now = ctx.shell.now_ms();
            Ok(CommandOutcome::lines([
                format_unix_ms(now, "%a %b %d %Y"),
                format_unix_ms(now, "%H:%M:%S GMT+0000 (Coordinated Universal Time)"),
            ]))
        }),
    }
}
