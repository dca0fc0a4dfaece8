use std::{
    fs,
    path::PathBuf,
    process,
    time::{SystemTime, UNIX_EPOCH},
};

use arcade_terminal::{build_terminal, ExitReason, TerminalArgs, TerminalError};
use pretty_assertions::assert_eq;

fn demos_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos")
}

fn temp_prefs() -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir()
        .join(format!("arcade_terminal_{}_{}", process::id(), now))
        .join("prefs.json")
}

fn run_script(args: &TerminalArgs, script: &str) -> (ExitReason, String, String) {
    let terminal = build_terminal(args).expect("build terminal");
    let mut out = Vec::new();
    let mut err = Vec::new();
    let reason = terminal
        .run(script.as_bytes(), &mut out, &mut err)
        .expect("run");
    (
        reason,
        String::from_utf8(out).expect("utf8"),
        String::from_utf8(err).expect("utf8"),
    )
}

#[test]
fn demo_catalog_lists_collections() {
    let args = TerminalArgs {
        catalog: Some(demos_dir().join("catalog.json")),
        user: Some("tester".to_string()),
        ..TerminalArgs::default()
    };
    let (reason, out, err) = run_script(
        &args,
        "ls /Collections\ncd /Collections/genesis\nls games\n",
    );
    assert_eq!(reason, ExitReason::EndOfInput);
    assert_eq!(err, "");
    assert!(out.contains("tester@arcade:/home/tester$ "));
    assert!(out.contains("snes"));
    assert!(out.contains("0- Sonic the Hedgehog\n1- Streets of Rage 2\n"));
}

#[test]
fn history_and_theme_persist_in_prefs_file() {
    let prefs = temp_prefs();
    let args = TerminalArgs {
        catalog: Some(demos_dir().join("catalog.json")),
        prefs: Some(prefs.clone()),
        user: Some("tester".to_string()),
        ..TerminalArgs::default()
    };
    run_script(&args, "whoami\ntheme set matrix\n");

    let (_, out, _) = run_script(&args, "history --all\ntheme current\n");
    assert!(out.contains("whoami"));
    assert!(out.contains("theme set matrix"));
    assert!(fs::read_to_string(&prefs)
        .expect("prefs file")
        .contains("terminal_history_tester"));

    if let Some(parent) = prefs.parent() {
        let _ = fs::remove_dir_all(parent);
    }
}

#[test]
fn missing_catalog_is_a_usage_error() {
    let err = build_terminal(&TerminalArgs::default())
        .err()
        .expect("no catalog configured");
    assert!(matches!(err, TerminalError::Usage(_)));
    assert_eq!(err.exit_code(), 2);
}
