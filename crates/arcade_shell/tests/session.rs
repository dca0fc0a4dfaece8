use std::rc::Rc;

use arcade_shell::{
    commands::{LastContext, LAST_CONTEXT_KEY},
    display_path, normalize_path, PendingState, SessionEvent, ShellConfig, ShellSession,
};
use arcade_shell_contract::CommandOutcome;
use catalog_host::{
    load_pref_with, FixedClock, GameCatalog, GameId, MemoryCatalog, MemoryPrefsStore, PrefsStore,
};
use pretty_assertions::assert_eq;

const CATALOG: &str = r#"{
    "games": [
        {"title": "Xfoo", "developer": "Nobody"},
        {"title": "Zelda", "developer": "Nintendo", "favorite": true, "launch": "zelda"},
        {"title": "Foo Bar", "genre": "Puzzle"},
        {"title": "Mario", "developer": "Nintendo", "favorite": true, "launch": "mario"},
        {"title": "foo"},
        {"title": "Metroid", "favorite": true, "play_time": 7200, "launch": "metroid"},
        {"title": "Contra", "play_time": 60}
    ],
    "collections": [
        {"name": "Super Nintendo", "short_name": "snes", "games": ["Mario", "Zelda", "Metroid"]},
        {"name": "Empty Shelf", "short_name": "shelf", "games": []}
    ]
}"#;

struct Harness {
    session: ShellSession,
    catalog: MemoryCatalog,
    store: MemoryPrefsStore,
    clock: Rc<FixedClock>,
}

impl Harness {
    fn new() -> Self {
        let clock = Rc::new(FixedClock::new(1_700_000_000_000));
        let document = serde_json::from_str(CATALOG).expect("catalog json");
        let catalog = MemoryCatalog::with_clock(document, clock.clone()).expect("catalog");
        let store = MemoryPrefsStore::default();
        let session = ShellSession::with_clock(
            ShellConfig {
                user: "alice".to_string(),
                ..ShellConfig::default()
            },
            Rc::new(catalog.clone()),
            Rc::new(store.clone()),
            clock.clone(),
        )
        .expect("session");
        Self {
            session,
            catalog,
            store,
            clock,
        }
    }

    fn run(&self, line: &str) -> CommandOutcome {
        self.session.execute(line)
    }

    fn ok(&self, line: &str) -> Vec<String> {
        let outcome = self.run(line);
        assert_eq!(outcome.exit_code, 0, "line={line:?} stderr={:?}", outcome.stderr);
        assert!(outcome.stderr.is_empty(), "line={line:?}");
        outcome.stdout
    }
}

#[test]
fn display_of_normalized_path_matches_display_of_path() {
    let cases = [
        "/",
        "~",
        "~/Favorites",
        "/home/alice/All-Games",
        "/Collections/snes/../snes/games/.",
        "Favorites/./",
    ];
    for path in cases {
        assert_eq!(
            display_path(&normalize_path(path, "/", "alice"), "alice"),
            display_path(path, "alice"),
            "path={path:?}"
        );
    }
}

#[test]
fn favorites_listing_then_bare_index_launches_the_shown_game() {
    let harness = Harness::new();
    assert_eq!(
        harness.ok("ls /Favorites"),
        vec!["0- Zelda", "1- Mario", "2- Metroid"]
    );

    let outcome = harness.run("launch 1");
    assert_eq!(outcome.stdout, vec!["Launching: Mario..."]);
    assert!(outcome.side_effects.state_changed);
    assert_eq!(harness.catalog.launch_log(), vec![GameId(3)]);
    assert_eq!(
        harness.session.take_pending_state(),
        Some(PendingState::GameRunning)
    );

    let context: LastContext = load_pref_with(&harness.store, LAST_CONTEXT_KEY)
        .expect("load context")
        .expect("context saved");
    assert_eq!(context.game, "Mario");
    assert_eq!(context.cwd, "/");
}

#[test]
fn address_form_uses_namespace_order() {
    let harness = Harness::new();
    let info = harness.ok("info @favorites:0");
    assert!(info.contains(&"Title: Zelda".to_string()));

    let info = harness.ok("info --collection=snes --index=2");
    assert!(info.contains(&"Title: Metroid".to_string()));

    let info = harness.ok("info Contra --collection=snes --index=2");
    assert!(info.contains(&"Title: Metroid".to_string()));
    assert!(!info.contains(&"Title: Contra".to_string()));

    let missing = harness.run("info @snes:9");
    assert_eq!(missing.exit_code, 1);
    assert_eq!(missing.stderr, vec!["Game index 9 not found in Super Nintendo"]);
}

#[test]
fn head_and_tail_windows_keep_dense_numbers() {
    let harness = Harness::new();
    assert_eq!(harness.ok("ls /MostPlayed --head=5"), vec!["0- Metroid", "1- Contra"]);
    assert_eq!(
        harness.ok("ls /All-Games --head=2"),
        vec![
            "0- Xfoo",
            "1- Zelda",
            "",
            "Showing first 2 of 7 items",
            "Use --tail=2 to see the last 2",
        ]
    );
    assert_eq!(
        harness.ok("tail 2 /All-Games"),
        vec![
            "5- Metroid",
            "6- Contra",
            "",
            "Showing last 2 of 7 items",
            "Use --head=2 to see the first 2",
        ]
    );

    // The tail listing is now the last listing; 6 resolves through it.
    assert!(harness.ok("info 6").contains(&"Title: Contra".to_string()));
}

#[test]
fn precise_search_ranks_by_relevance() {
    let harness = Harness::new();
    assert_eq!(
        harness.ok("search foo --field=title --precise"),
        vec![
            "Search results for: 'foo' (sorted by relevance)",
            "========================================",
            "[4] foo",
            "[2] Foo Bar",
            "[0] Xfoo (Nobody)",
            "",
            "Total: 3 games found",
        ]
    );
    let listed = harness
        .session
        .last_listing()
        .into_iter()
        .map(|listed| listed.index)
        .collect::<Vec<_>>();
    assert_eq!(listed, vec![4, 2, 0]);
}

#[test]
fn empty_collection_lists_as_empty_directory() {
    let harness = Harness::new();
    assert_eq!(
        harness.ok("ls /Collections/shelf/games"),
        vec!["(empty directory)"]
    );
}

#[test]
fn cd_to_missing_path_leaves_cwd_unchanged() {
    let harness = Harness::new();
    harness.ok("cd /Collections/snes");
    assert_eq!(harness.session.active_collection(), Some("snes".to_string()));

    let outcome = harness.run("cd /Nowhere");
    assert_eq!(outcome.exit_code, 1);
    assert_eq!(outcome.stderr, vec!["cd: No such directory: /Nowhere"]);
    assert_eq!(harness.session.cwd(), "/Collections/snes");
    assert_eq!(harness.ok("pwd"), vec!["/home/alice/Collections/snes/games"]);

    let outcome = harness.run("cd /All-Games/Mario");
    assert_eq!(outcome.stderr, vec!["cd: not a directory: /All-Games/Mario"]);
    assert_eq!(harness.session.cwd(), "/Collections/snes");
}

#[test]
fn favorites_add_on_existing_favorite_changes_nothing() {
    let harness = Harness::new();
    assert_eq!(
        harness.ok("favorites add Zelda"),
        vec!["Zelda is already in favorites"]
    );
    assert_eq!(
        harness.ok("fav add Contra"),
        vec!["Added to favorites: Contra"]
    );
    assert!(harness.catalog.games()[6].favorite);
    assert_eq!(
        harness.ok("f remove 6"),
        vec!["Removed from favorites: Contra"]
    );
    assert!(!harness.catalog.games()[6].favorite);

    let invalid = harness.run("favorites toggle Zelda");
    assert_eq!(invalid.exit_code, 1);
}

#[test]
fn help_lists_canonical_names_only() {
    let harness = Harness::new();
    let help = harness.ok("help");
    assert!(help.iter().any(|line| line.starts_with("  ls ")));
    for alias in ["dir", "cls", "goto", "hist", "coll", "fav", "find"] {
        assert!(
            !help.iter().any(|line| line.starts_with(&format!("  {alias} "))),
            "alias={alias:?}"
        );
    }

    let detail = harness.ok("man ls");
    assert_eq!(detail[0], "Command: ls");
    assert_eq!(detail[1], "Aliases: dir");
}

#[test]
fn colliding_alias_is_rejected() {
    let harness = Harness::new();
    let registry = harness.session.registry();
    let mut descriptor = registry.resolve("pwd").expect("pwd").descriptor().clone();
    descriptor.name = arcade_shell_contract::CommandName::new("where");
    descriptor.aliases = vec!["ls".to_string()];
    let result = registry.register(
        descriptor,
        arcade_shell::command_handler(|_| Ok(CommandOutcome::empty())),
    );
    assert!(result.is_err());
    assert!(!registry.contains("where"));
}

#[test]
fn second_reboot_cancels_the_first() {
    let harness = Harness::new();
    harness.ok("cd /Favorites");
    harness.ok("reboot");
    harness.clock.advance(600);
    harness.ok("restart");
    assert_eq!(
        harness.session.next_deadline(),
        Some(1_700_000_000_000 + 600 + 1_000)
    );

    harness.clock.advance(500);
    assert!(harness.session.tick().is_empty());
    assert_eq!(harness.session.cwd(), "/Favorites");

    harness.clock.advance(500);
    assert_eq!(harness.session.tick(), vec![SessionEvent::Rebooted]);
    assert_eq!(harness.session.cwd(), "/");
    assert!(harness.session.tick().is_empty());
}

#[test]
fn history_survives_and_clears() {
    let harness = Harness::new();
    harness.ok("pwd");
    harness.ok("whoami");
    let history = harness.ok("history 2");
    assert_eq!(history[2], "Showing last 2 of 3 commands");
    assert!(history[4].ends_with("whoami (22:13:20)"));

    assert_eq!(harness.ok("history --clear"), vec!["Command history cleared"]);
    assert_eq!(harness.store.load_pref("terminal_history_alice").ok().flatten(), None);
}
