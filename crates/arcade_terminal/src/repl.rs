//! Line-at-a-time terminal loop around a [`ShellSession`].

use std::{
    io::{BufRead, Write},
    rc::Rc,
    thread,
    time::Duration,
};

use arcade_shell::{PendingState, SessionEvent, ShellSession};
use arcade_shell_contract::CommandOutcome;
use catalog_host::Clock;

use crate::error::TerminalResult;

/// ANSI sequence that clears the screen and homes the cursor.
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Why the loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Input reached end of file.
    EndOfInput,
    /// The user ran `logout`.
    LoggedOut,
}

/// Terminal front end: renders outcomes and drives the session's scheduled work.
pub struct Terminal {
    session: ShellSession,
    clock: Rc<dyn Clock>,
}

impl Terminal {
    /// Wraps `session`; `clock` must be the clock the session was built with.
    pub fn new(session: ShellSession, clock: Rc<dyn Clock>) -> Self {
        Self { session, clock }
    }

    /// Underlying session.
    pub fn session(&self) -> &ShellSession {
        &self.session
    }

    /// Reads lines from `input` until end of file or logout.
    ///
    /// Command output goes to `out`, command errors to `err`.
    pub fn run<R, W, E>(&self, mut input: R, out: &mut W, err: &mut E) -> TerminalResult<ExitReason>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        writeln!(
            out,
            "Welcome, {}. Type 'help' for a list of commands.",
            self.session.home().rsplit('/').next().unwrap_or_default()
        )?;
        let mut line = String::new();
        loop {
            write!(out, "{}", self.session.prompt())?;
            out.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                return Ok(ExitReason::EndOfInput);
            }

            let outcome = self.session.execute(line.trim_end_matches(['\r', '\n']));
            render(&outcome, out, err)?;

            if outcome.side_effects.state_changed {
                match self.session.take_pending_state() {
                    Some(PendingState::LoggedOut) => {
                        tracing::info!("session logged out");
                        return Ok(ExitReason::LoggedOut);
                    }
                    Some(PendingState::GameRunning) => {
                        tracing::info!("game launched; shell stays interactive");
                    }
                    None => {}
                }
            }

            self.settle_scheduled(out)?;
        }
    }

    /// Waits for the next scheduled task, if any, and runs whatever is due.
    fn settle_scheduled<W: Write>(&self, out: &mut W) -> TerminalResult<()> {
        let Some(deadline) = self.session.next_deadline() else {
            return Ok(());
        };
        let now = self.clock.now_ms();
        if deadline > now {
            thread::sleep(Duration::from_millis(deadline - now));
        }
        for event in self.session.tick() {
            match event {
                SessionEvent::Rebooted => {
                    write!(out, "{CLEAR_SCREEN}")?;
                    writeln!(out, "System rebooted.")?;
                }
            }
        }
        Ok(())
    }
}

fn render<W, E>(outcome: &CommandOutcome, out: &mut W, err: &mut E) -> TerminalResult<()>
where
    W: Write,
    E: Write,
{
    if outcome.side_effects.clear_screen {
        write!(out, "{CLEAR_SCREEN}")?;
    }
    for line in &outcome.stdout {
        writeln!(out, "{line}")?;
    }
    for line in &outcome.stderr {
        writeln!(err, "{line}")?;
    }
    if outcome.side_effects.reload_theme
        || outcome.side_effects.reload_prompt
        || outcome.side_effects.reload_font
    {
        tracing::debug!(side_effects = ?outcome.side_effects, "appearance setting changed");
    }
    Ok(())
}
