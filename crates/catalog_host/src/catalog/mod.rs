//! Read-mostly game catalog contracts and the in-memory provider.

pub mod memory;
pub mod model;

use thiserror::Error;

use self::model::{Collection, Game, GameId};

/// Failures reported by a [`GameCatalog`] provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The id does not name a game in the catalog.
    #[error("unknown game id {0}")]
    UnknownGame(usize),
    /// The provider could not start the game.
    #[error("{reason}")]
    LaunchFailed {
        /// Game title.
        title: String,
        /// Provider-specific reason.
        reason: String,
    },
    /// Catalog source data is malformed.
    #[error("invalid catalog: {0}")]
    Invalid(String),
}

/// Host service exposing the game catalog.
///
/// Reads return point-in-time snapshots in catalog order; a game's [`GameId`] is its position in
/// [`GameCatalog::games`]. The only mutations are the favorite flag and the play statistics a
/// provider updates when it launches a game.
pub trait GameCatalog {
    /// Returns every game in catalog order.
    fn games(&self) -> Vec<Game>;

    /// Returns every collection in catalog order.
    fn collections(&self) -> Vec<Collection>;

    /// Finds a game by free-text title.
    ///
    /// The default matches an exact case-insensitive title first, then the first title that
    /// contains the query.
    fn find_game(&self, query: &str) -> Option<GameId> {
        find_by_title(&self.games(), query)
    }

    /// Sets or clears the favorite flag.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownGame`] for ids outside the catalog.
    fn set_favorite(&self, id: GameId, favorite: bool) -> Result<(), CatalogError>;

    /// Launches a game.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::LaunchFailed`] when the provider cannot start the game.
    fn launch(&self, id: GameId) -> Result<(), CatalogError>;
}

/// Title lookup shared by providers: exact case-insensitive match, then first substring match.
pub fn find_by_title(games: &[Game], query: &str) -> Option<GameId> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    games
        .iter()
        .find(|game| game.title.to_lowercase() == needle)
        .or_else(|| {
            games
                .iter()
                .find(|game| game.title.to_lowercase().contains(&needle))
        })
        .map(|game| game.id)
}
