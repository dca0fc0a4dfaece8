//! Virtual path normalization, resolution over the synthetic namespaces, and display mapping.

use catalog_host::GameId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::namespace::{CatalogView, Namespace};

const ALL_GAMES: &str = "All-Games";
const FAVORITES: &str = "Favorites";
const MOST_PLAYED: &str = "MostPlayed";
const LAST_PLAYED: &str = "LastPlayed";
const COLLECTIONS: &str = "Collections";
const GAMES_DIR: &str = "games";

/// Directory entry tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Plain directory.
    Directory,
    /// A collection directory under `/Collections`.
    Collection,
    /// A game leaf.
    Game,
    /// The favorites namespace.
    Favorite,
    /// The last-played namespace.
    LastPlayed,
    /// The most-played namespace.
    MostPlayed,
    /// Plain file.
    File,
    /// Any unrecognized tag.
    #[serde(other)]
    Unknown,
}

impl EntryKind {
    /// Fixed listing prefix for the kind.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Directory | Self::Collection | Self::Game | Self::File => "",
            Self::Favorite => "[FAV]  ",
            Self::LastPlayed => "[REC]  ",
            Self::MostPlayed => "[TOP]  ",
            Self::Unknown => "[???]  ",
        }
    }
}

/// One listed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Display name.
    pub name: String,
    /// Entry tag.
    pub kind: EntryKind,
    /// The game a `game` entry stands for.
    pub game: Option<GameId>,
    /// Nested entries of a container whose children are fixed by the catalog layout.
    ///
    /// Game namespaces leave this unset; their members are computed when the path is resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<DirectoryEntry>>,
}

impl DirectoryEntry {
    fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
            game: None,
            contents: None,
        }
    }

    fn with_contents(mut self, contents: Vec<DirectoryEntry>) -> Self {
        self.contents = Some(contents);
        self
    }

    fn game(name: impl Into<String>, id: GameId) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Game,
            game: Some(id),
            contents: None,
        }
    }
}

/// A successfully resolved path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Canonical path with canonical segment spelling.
    pub path: String,
    /// Tag of the resolved node.
    pub kind: EntryKind,
    /// Whether the node is a container.
    pub is_directory: bool,
    /// Last segment (`/` for root).
    pub name: String,
    /// Ordered contents when the node is a directory.
    pub contents: Option<Vec<DirectoryEntry>>,
    /// Namespace whose games the path lists or lies in, if any.
    pub namespace: Option<Namespace>,
    /// The game a leaf path names.
    pub game: Option<GameId>,
}

impl ResolvedPath {
    /// Entries of a directory; empty for leaves.
    pub fn entries(&self) -> &[DirectoryEntry] {
        self.contents.as_deref().unwrap_or_default()
    }
}

/// Resolution failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// A segment matched no entry.
    #[error("No such directory")]
    NoSuchDirectory {
        /// Normalized path that failed.
        path: String,
    },
}

/// Home alias for `user`.
pub fn home_dir(user: &str) -> String {
    format!("/home/{user}")
}

/// Normalizes `input` against `cwd`.
///
/// `~` and empty input map to `/`, `~/<rest>` maps to `/<rest>`, relative paths join onto `cwd`,
/// `.`/`..` and duplicate slashes collapse, and the `/home/<user>` prefix is stripped.
pub fn normalize_path(input: &str, cwd: &str, user: &str) -> String {
    let trimmed = input.trim();
    let joined = if trimmed.is_empty() || trimmed == "~" {
        "/".to_string()
    } else if let Some(rest) = trimmed.strip_prefix("~/") {
        format!("/{rest}")
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/{trimmed}", cwd.trim_end_matches('/'))
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let collapsed = format!("/{}", segments.join("/"));
    strip_home(&collapsed, user)
}

fn strip_home(path: &str, user: &str) -> String {
    let home = home_dir(user);
    if path == home {
        return "/".to_string();
    }
    match path.strip_prefix(&home) {
        Some(rest) if rest.starts_with('/') => rest.to_string(),
        _ => path.to_string(),
    }
}

/// User-facing form of a path.
///
/// Root becomes `/home/<user>`, `/Collections/<short>` and anything beneath it becomes
/// `/home/<user>/Collections/<short>/games`, and every other path gains the home prefix. The input
/// is normalized first, so `display_path(normalize_path(p)) == display_path(p)`.
pub fn display_path(path: &str, user: &str) -> String {
    let normalized = normalize_path(path, "/", user);
    let home = home_dir(user);
    if normalized == "/" {
        return home;
    }
    let mut segments = normalized.trim_start_matches('/').split('/');
    match (segments.next(), segments.next()) {
        (Some(first), Some(short)) if first.eq_ignore_ascii_case(COLLECTIONS) => {
            format!("{home}/{first}/{short}/{GAMES_DIR}")
        }
        _ => format!("{home}{normalized}"),
    }
}

/// Resolves virtual paths against one catalog view.
pub struct PathResolver<'a> {
    view: &'a CatalogView,
    user: &'a str,
}

enum Node {
    Root,
    Games(Namespace),
    CollectionsDir,
    CollectionDir(usize),
}

impl<'a> PathResolver<'a> {
    /// Creates a resolver for `user`'s home alias.
    pub fn new(view: &'a CatalogView, user: &'a str) -> Self {
        Self { view, user }
    }

    /// Resolves `input` relative to `cwd`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::NoSuchDirectory`] when any segment matches no entry.
    pub fn resolve(&self, input: &str, cwd: &str) -> Result<ResolvedPath, PathError> {
        let normalized = normalize_path(input, cwd, self.user);
        let missing = || PathError::NoSuchDirectory {
            path: normalized.clone(),
        };

        let mut node = Node::Root;
        let mut canonical = Vec::<String>::new();
        let mut segments = normalized.split('/').filter(|segment| !segment.is_empty());

        while let Some(segment) = segments.next() {
            node = match node {
                Node::Root => {
                    let (name, next) = root_child(segment).ok_or_else(missing)?;
                    canonical.push(name.to_string());
                    next
                }
                Node::CollectionsDir => {
                    let index = self
                        .view
                        .collection_by_short_name(segment)
                        .ok_or_else(missing)?;
                    canonical.push(self.view.collections()[index].short_name.clone());
                    Node::CollectionDir(index)
                }
                Node::CollectionDir(index) => {
                    if !segment.eq_ignore_ascii_case(GAMES_DIR) {
                        return Err(missing());
                    }
                    canonical.push(GAMES_DIR.to_string());
                    Node::Games(Namespace::Collection(index))
                }
                Node::Games(namespace) => {
                    let game = self
                        .view
                        .members(namespace)
                        .into_iter()
                        .filter_map(|id| self.view.game(id))
                        .find(|game| game.title.eq_ignore_ascii_case(segment))
                        .ok_or_else(missing)?;
                    if segments.next().is_some() {
                        return Err(missing());
                    }
                    canonical.push(game.title.clone());
                    return Ok(ResolvedPath {
                        path: format!("/{}", canonical.join("/")),
                        kind: EntryKind::Game,
                        is_directory: false,
                        name: game.title.clone(),
                        contents: None,
                        namespace: Some(namespace),
                        game: Some(game.id),
                    });
                }
            };
        }

        let path = format!("/{}", canonical.join("/"));
        let name = canonical.last().cloned().unwrap_or_else(|| "/".to_string());
        Ok(match node {
            Node::Root => {
                let entries = root_entries(self.collection_entries());
                self.directory(path, name, EntryKind::Directory, entries, None)
            }
            Node::CollectionsDir => {
                let entries = self.collection_entries();
                self.directory(path, name, EntryKind::Directory, entries, None)
            }
            Node::CollectionDir(index) => self.directory(
                path,
                name,
                EntryKind::Collection,
                vec![games_entry()],
                Some(Namespace::Collection(index)),
            ),
            Node::Games(namespace) => {
                let entries = self
                    .view
                    .members(namespace)
                    .into_iter()
                    .filter_map(|id| self.view.game(id))
                    .map(|game| DirectoryEntry::game(game.title.clone(), game.id))
                    .collect();
                self.directory(path, name, namespace_kind(namespace), entries, Some(namespace))
            }
        })
    }

    /// One `collection` entry per collection, each holding its `games` directory.
    fn collection_entries(&self) -> Vec<DirectoryEntry> {
        self.view
            .collections()
            .iter()
            .map(|collection| {
                DirectoryEntry::new(collection.short_name.clone(), EntryKind::Collection)
                    .with_contents(vec![games_entry()])
            })
            .collect()
    }

    fn directory(
        &self,
        path: String,
        name: String,
        kind: EntryKind,
        entries: Vec<DirectoryEntry>,
        namespace: Option<Namespace>,
    ) -> ResolvedPath {
        ResolvedPath {
            path,
            kind,
            is_directory: true,
            name,
            contents: Some(entries),
            namespace,
            game: None,
        }
    }
}

fn root_child(segment: &str) -> Option<(&'static str, Node)> {
    [
        (ALL_GAMES, Node::Games(Namespace::AllGames)),
        (FAVORITES, Node::Games(Namespace::Favorites)),
        (MOST_PLAYED, Node::Games(Namespace::MostPlayed)),
        (LAST_PLAYED, Node::Games(Namespace::LastPlayed)),
        (COLLECTIONS, Node::CollectionsDir),
    ]
    .into_iter()
    .find(|(name, _)| name.eq_ignore_ascii_case(segment))
}

fn games_entry() -> DirectoryEntry {
    DirectoryEntry::new(GAMES_DIR, EntryKind::Directory)
}

fn root_entries(collections: Vec<DirectoryEntry>) -> Vec<DirectoryEntry> {
    vec![
        DirectoryEntry::new(ALL_GAMES, EntryKind::Directory),
        DirectoryEntry::new(FAVORITES, EntryKind::Favorite),
        DirectoryEntry::new(MOST_PLAYED, EntryKind::MostPlayed),
        DirectoryEntry::new(LAST_PLAYED, EntryKind::LastPlayed),
        DirectoryEntry::new(COLLECTIONS, EntryKind::Directory).with_contents(collections),
    ]
}

fn namespace_kind(namespace: Namespace) -> EntryKind {
    match namespace {
        Namespace::AllGames => EntryKind::Directory,
        Namespace::Favorites => EntryKind::Favorite,
        Namespace::MostPlayed => EntryKind::MostPlayed,
        Namespace::LastPlayed => EntryKind::LastPlayed,
        Namespace::Collection(_) => EntryKind::Directory,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::namespace::fixtures;

    #[test]
    fn normalize_path_matches_expected_cases() {
        let cases = [
            ("", "/Favorites", "/"),
            ("~", "/Favorites", "/"),
            ("~/All-Games", "/", "/All-Games"),
            ("/home/alice", "/", "/"),
            ("/home/alice/Favorites", "/", "/Favorites"),
            ("/home/alicex", "/", "/home/alicex"),
            ("games", "/Collections/snes", "/Collections/snes/games"),
            ("..", "/Collections/snes/games", "/Collections/snes"),
            ("./../..//All-Games/", "/Collections/snes", "/All-Games"),
            ("/../../", "/", "/"),
        ];
        for (input, cwd, expected) in cases {
            assert_eq!(
                normalize_path(input, cwd, "alice"),
                expected,
                "input={input:?} cwd={cwd:?}"
            );
        }
    }

    #[test]
    fn display_path_maps_home_and_collections() {
        let cases = [
            ("/", "/home/alice"),
            ("/Favorites", "/home/alice/Favorites"),
            ("/Collections", "/home/alice/Collections"),
            ("/Collections/snes", "/home/alice/Collections/snes/games"),
            ("/Collections/snes/games", "/home/alice/Collections/snes/games"),
        ];
        for (input, expected) in cases {
            assert_eq!(display_path(input, "alice"), expected, "input={input:?}");
        }
    }

    #[test]
    fn display_of_normalized_path_equals_display_of_raw_path() {
        let inputs = [
            "",
            "~",
            "~/Favorites",
            "/home/alice",
            "/home/alice/Collections/nes",
            "/Collections/snes/games/../games",
            "/All-Games/./",
            "//MostPlayed",
        ];
        for input in inputs {
            let normalized = normalize_path(input, "/", "alice");
            assert_eq!(
                display_path(&normalized, "alice"),
                display_path(input, "alice"),
                "input={input:?}"
            );
        }
    }

    #[test]
    fn root_lists_fixed_namespaces() {
        let view = fixtures::view();
        let resolved = PathResolver::new(&view, "alice")
            .resolve("/", "/")
            .expect("resolve");
        assert!(resolved.is_directory);
        let names = resolved
            .entries()
            .iter()
            .map(|entry| (entry.name.as_str(), entry.kind))
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                ("All-Games", EntryKind::Directory),
                ("Favorites", EntryKind::Favorite),
                ("MostPlayed", EntryKind::MostPlayed),
                ("LastPlayed", EntryKind::LastPlayed),
                ("Collections", EntryKind::Directory),
            ]
        );
    }

    #[test]
    fn collection_containers_carry_nested_contents() {
        let view = fixtures::view();
        let resolver = PathResolver::new(&view, "alice");

        let root = resolver.resolve("/", "/").expect("resolve root");
        let collections = root
            .entries()
            .iter()
            .find(|entry| entry.name == "Collections")
            .and_then(|entry| entry.contents.clone())
            .expect("collections contents");
        assert_eq!(
            collections
                .iter()
                .map(|entry| (entry.name.as_str(), entry.kind))
                .collect::<Vec<_>>(),
            vec![("snes", EntryKind::Collection), ("nes", EntryKind::Collection)]
        );
        assert_eq!(collections[0].contents, Some(vec![games_entry()]));
        assert!(root
            .entries()
            .iter()
            .filter(|entry| entry.name != "Collections")
            .all(|entry| entry.contents.is_none()));

        let listed = resolver.resolve("/Collections", "/").expect("resolve collections");
        assert_eq!(listed.entries(), collections.as_slice());

        let encoded = serde_json::to_value(&collections[1]).expect("encode");
        assert_eq!(
            encoded,
            serde_json::json!({
                "name": "nes",
                "kind": "collection",
                "game": null,
                "contents": [{"name": "games", "kind": "directory", "game": null}]
            })
        );
    }

    #[test]
    fn segments_match_case_insensitively_with_canonical_spelling() {
        let view = fixtures::view();
        let resolver = PathResolver::new(&view, "alice");
        let resolved = resolver
            .resolve("collections/SNES/Games", "/")
            .expect("resolve");
        assert_eq!(resolved.path, "/Collections/snes/games");
        assert_eq!(resolved.namespace, Some(Namespace::Collection(0)));
        let titles = resolved
            .entries()
            .iter()
            .map(|entry| entry.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(titles, vec!["Echo", "Alpha"]);
    }

    #[test]
    fn favorites_directory_lists_favorite_games() {
        let view = fixtures::view();
        let resolved = PathResolver::new(&view, "alice")
            .resolve("/home/alice/favorites", "/")
            .expect("resolve");
        assert_eq!(resolved.path, "/Favorites");
        assert_eq!(resolved.kind, EntryKind::Favorite);
        assert_eq!(resolved.entries().len(), 3);
        assert!(resolved.entries().iter().all(|entry| entry.kind == EntryKind::Game));
    }

    #[test]
    fn game_title_resolves_to_leaf() {
        let view = fixtures::view();
        let resolved = PathResolver::new(&view, "alice")
            .resolve("charlie", "/MostPlayed")
            .expect("resolve");
        assert!(!resolved.is_directory);
        assert_eq!(resolved.kind, EntryKind::Game);
        assert_eq!(resolved.path, "/MostPlayed/Charlie");
        assert_eq!(resolved.game, Some(GameId(2)));
    }

    #[test]
    fn unknown_segments_fail() {
        let view = fixtures::view();
        let resolver = PathResolver::new(&view, "alice");
        for input in [
            "/Nowhere",
            "/Collections/genesis",
            "/Collections/snes/roms",
            "/All-Games/Alpha/extra",
            "/Favorites/Alpha",
        ] {
            let error = resolver.resolve(input, "/").expect_err("should fail");
            assert_eq!(error.to_string(), "No such directory", "input={input:?}");
        }
    }

    #[test]
    fn unknown_kind_tags_deserialize_to_unknown() {
        let kind: EntryKind = serde_json::from_str("\"symlink\"").expect("decode");
        assert_eq!(kind, EntryKind::Unknown);
        assert_eq!(kind.prefix(), "[???]  ");
    }
}
