//! `arcade` binary: an interactive shell over a JSON game catalog.

use std::env;
use std::io;
use std::process::ExitCode;

use arcade_terminal::{build_terminal, init_tracing, usage, TerminalArgs, TerminalError};

fn main() -> ExitCode {
    init_tracing();

    let args = match TerminalArgs::parse(env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("error: {err}");
            eprint!("{}", usage());
            return ExitCode::from(err.exit_code());
        }
    };
    if args.help {
        eprint!("{}", usage());
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(args: &TerminalArgs) -> Result<(), TerminalError> {
    let terminal = build_terminal(args)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    let reason = terminal.run(stdin.lock(), &mut stdout, &mut stderr)?;
    tracing::debug!(?reason, "terminal exited");
    Ok(())
}
