//! In-memory catalog provider loadable from JSON.

use std::{cell::RefCell, rc::Rc};

use serde::{Deserialize, Serialize};

use super::{
    model::{Collection, Game, GameId},
    CatalogError, GameCatalog,
};
use crate::time::{Clock, SystemClock};

/// Serialized game record in a catalog file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRecord {
    /// Display title.
    pub title: String,
    /// Developer credit.
    pub developer: Option<String>,
    /// Publisher credit.
    pub publisher: Option<String>,
    /// Genre label.
    pub genre: Option<String>,
    /// Release year.
    pub release_year: Option<u32>,
    /// Release month.
    pub release_month: Option<u32>,
    /// Release day.
    pub release_day: Option<u32>,
    /// Player count.
    pub players: u32,
    /// Rating in `0.0..=1.0`.
    pub rating: Option<f32>,
    /// Launch count.
    pub play_count: u32,
    /// Play time in seconds.
    pub play_time: u64,
    /// Unix milliseconds of the last launch.
    pub last_played: Option<u64>,
    /// Favorite flag.
    pub favorite: bool,
    /// Long-form description.
    pub description: Option<String>,
    /// Command the host runs to start the game; games without one fail to launch.
    pub launch: Option<String>,
}

/// Serialized collection record; members are referenced by exact title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionRecord {
    /// Display name.
    pub name: String,
    /// Unique short identifier.
    pub short_name: String,
    /// Optional description.
    pub summary: Option<String>,
    /// Member titles in collection order.
    pub games: Vec<String>,
}

/// Top-level catalog file document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogDocument {
    /// Games in catalog order.
    pub games: Vec<GameRecord>,
    /// Collections in catalog order.
    pub collections: Vec<CollectionRecord>,
}

struct CatalogState {
    games: Vec<Game>,
    launch_commands: Vec<Option<String>>,
    collections: Vec<Collection>,
    launches: Vec<GameId>,
}

/// In-memory [`GameCatalog`] shared by clones.
#[derive(Clone)]
pub struct MemoryCatalog {
    inner: Rc<RefCell<CatalogState>>,
    clock: Rc<dyn Clock>,
}

impl MemoryCatalog {
    /// Builds a catalog from a parsed document using the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Invalid`] when a collection short name is duplicated or a
    /// collection references an unknown title.
    pub fn from_document(document: CatalogDocument) -> Result<Self, CatalogError> {
        Self::with_clock(document, Rc::new(SystemClock))
    }

    /// Parses a JSON catalog document.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Invalid`] for malformed JSON or inconsistent references.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let document =
            serde_json::from_str(raw).map_err(|err| CatalogError::Invalid(err.to_string()))?;
        Self::from_document(document)
    }

    /// Builds a catalog whose launch timestamps come from `clock`.
    ///
    /// # Errors
    ///
    /// See [`MemoryCatalog::from_document`].
    pub fn with_clock(
        document: CatalogDocument,
        clock: Rc<dyn Clock>,
    ) -> Result<Self, CatalogError> {
        let mut games = Vec::with_capacity(document.games.len());
        let mut launch_commands = Vec::with_capacity(document.games.len());
        for (index, record) in document.games.into_iter().enumerate() {
            launch_commands.push(record.launch);
            games.push(Game {
                id: GameId(index),
                title: record.title,
                developer: record.developer,
                publisher: record.publisher,
                genre: record.genre,
                release_year: record.release_year,
                release_month: record.release_month,
                release_day: record.release_day,
                players: record.players,
                rating: record.rating,
                play_count: record.play_count,
                play_time: record.play_time,
                last_played: record.last_played,
                favorite: record.favorite,
                description: record.description,
                collections: Vec::new(),
            });
        }

        let mut collections: Vec<Collection> = Vec::with_capacity(document.collections.len());
        for record in document.collections {
            let short_name = record.short_name.to_lowercase();
            if collections.iter().any(|existing| existing.short_name == short_name) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate collection short name `{short_name}`"
                )));
            }
            let mut members = Vec::with_capacity(record.games.len());
            for title in &record.games {
                let Some(game) = games.iter_mut().find(|game| &game.title == title) else {
                    return Err(CatalogError::Invalid(format!(
                        "collection `{short_name}` references unknown game `{title}`"
                    )));
                };
                if !game.collections.contains(&short_name) {
                    game.collections.push(short_name.clone());
                }
                members.push(game.id);
            }
            collections.push(Collection {
                name: record.name,
                short_name,
                summary: record.summary,
                games: members,
            });
        }

        Ok(Self {
            inner: Rc::new(RefCell::new(CatalogState {
                games,
                launch_commands,
                collections,
                launches: Vec::new(),
            })),
            clock,
        })
    }

    /// Returns the ids launched so far, oldest first.
    pub fn launch_log(&self) -> Vec<GameId> {
        self.inner.borrow().launches.clone()
    }
}

impl GameCatalog for MemoryCatalog {
    fn games(&self) -> Vec<Game> {
        self.inner.borrow().games.clone()
    }

    fn collections(&self) -> Vec<Collection> {
        self.inner.borrow().collections.clone()
    }

    fn set_favorite(&self, id: GameId, favorite: bool) -> Result<(), CatalogError> {
        let mut state = self.inner.borrow_mut();
        let game = state
            .games
            .get_mut(id.index())
            .ok_or(CatalogError::UnknownGame(id.index()))?;
        game.favorite = favorite;
        Ok(())
    }

    fn launch(&self, id: GameId) -> Result<(), CatalogError> {
        let now = self.clock.now_ms();
        let mut state = self.inner.borrow_mut();
        let has_command = state
            .launch_commands
            .get(id.index())
            .ok_or(CatalogError::UnknownGame(id.index()))?
            .is_some();
        let game = state
            .games
            .get_mut(id.index())
            .ok_or(CatalogError::UnknownGame(id.index()))?;
        if !has_command {
            return Err(CatalogError::LaunchFailed {
                title: game.title.clone(),
                reason: "no launch command configured".to_string(),
            });
        }
        game.play_count = game.play_count.saturating_add(1);
        game.last_played = Some(now);
        tracing::info!(title = %game.title, "game launched");
        state.launches.push(id);
        Ok(())
    }
}
