//! Catalog data types shared by providers and the shell.

use serde::{Deserialize, Serialize};

/// Position of a game in the catalog's All-Games sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameId(pub usize);

impl GameId {
    /// Returns the All-Games index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// One catalog game and its play statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// All-Games position.
    pub id: GameId,
    /// Display title.
    pub title: String,
    /// Developer credit.
    pub developer: Option<String>,
    /// Publisher credit.
    pub publisher: Option<String>,
    /// Genre label.
    pub genre: Option<String>,
    /// Release year; `0` or unset means unknown.
    pub release_year: Option<u32>,
    /// Release month, 1-based.
    pub release_month: Option<u32>,
    /// Release day, 1-based.
    pub release_day: Option<u32>,
    /// Supported player count.
    pub players: u32,
    /// Rating in `0.0..=1.0`.
    pub rating: Option<f32>,
    /// Number of launches.
    pub play_count: u32,
    /// Accumulated play time in seconds.
    pub play_time: u64,
    /// Unix milliseconds of the most recent launch.
    pub last_played: Option<u64>,
    /// Favorite flag.
    pub favorite: bool,
    /// Long-form description.
    pub description: Option<String>,
    /// Short names of the collections containing this game, in collection order.
    pub collections: Vec<String>,
}

impl Game {
    /// Returns the release year when it denotes a real release.
    pub fn known_release_year(&self) -> Option<u32> {
        self.release_year.filter(|year| *year > 0)
    }

    /// Returns the last-played timestamp when it is set and positive.
    pub fn last_played_at(&self) -> Option<u64> {
        self.last_played.filter(|ms| *ms > 0)
    }
}

/// Named, ordered group of games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Display name.
    pub name: String,
    /// Unique lowercase identifier used in paths and `@short:index` addresses.
    pub short_name: String,
    /// Optional description.
    pub summary: Option<String>,
    /// Member games in collection order.
    pub games: Vec<GameId>,
}
