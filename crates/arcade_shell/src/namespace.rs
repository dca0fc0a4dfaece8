//! Point-in-time catalog view and the synthetic game namespaces computed from it.

use catalog_host::{Collection, Game, GameCatalog, GameId};

/// Snapshot of the catalog taken once per command so every read inside it is consistent.
#[derive(Debug, Clone, Default)]
pub struct CatalogView {
    games: Vec<Game>,
    collections: Vec<Collection>,
}

impl CatalogView {
    /// Captures the provider's current games and collections.
    pub fn capture(catalog: &dyn GameCatalog) -> Self {
        Self {
            games: catalog.games(),
            collections: catalog.collections(),
        }
    }

    /// Builds a view from explicit data.
    pub fn new(games: Vec<Game>, collections: Vec<Collection>) -> Self {
        Self { games, collections }
    }

    /// All games in catalog order.
    pub fn games(&self) -> &[Game] {
        &self.games
    }

    /// All collections in catalog order.
    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    /// Looks up one game.
    pub fn game(&self, id: GameId) -> Option<&Game> {
        self.games.get(id.index())
    }

    /// Finds a collection by short name, then by display name (both case-insensitive).
    pub fn find_collection(&self, token: &str) -> Option<usize> {
        let token = token.to_lowercase();
        self.collections
            .iter()
            .position(|collection| collection.short_name.to_lowercase() == token)
            .or_else(|| {
                self.collections
                    .iter()
                    .position(|collection| collection.name.to_lowercase() == token)
            })
    }

    /// Finds a collection by short name only (case-insensitive).
    pub fn collection_by_short_name(&self, short_name: &str) -> Option<usize> {
        self.collections
            .iter()
            .position(|collection| collection.short_name.eq_ignore_ascii_case(short_name))
    }

    /// Display names of the collections containing `game`.
    pub fn collection_names_of(&self, game: &Game) -> Vec<String> {
        game.collections
            .iter()
            .map(|short| {
                self.collection_by_short_name(short)
                    .map(|index| self.collections[index].name.clone())
                    .unwrap_or_else(|| short.clone())
            })
            .collect()
    }

    /// Members of a namespace in that namespace's own order; position `i` is index `i`.
    pub fn members(&self, namespace: Namespace) -> Vec<GameId> {
        match namespace {
            Namespace::AllGames => self.games.iter().map(|game| game.id).collect(),
            Namespace::Favorites => self
                .games
                .iter()
                .filter(|game| game.favorite)
                .map(|game| game.id)
                .collect(),
            Namespace::MostPlayed => {
                let mut played = self
                    .games
                    .iter()
                    .filter(|game| game.play_time > 0)
                    .collect::<Vec<_>>();
                played.sort_by(|left, right| right.play_time.cmp(&left.play_time));
                played.into_iter().map(|game| game.id).collect()
            }
            Namespace::LastPlayed => {
                let mut recent = self
                    .games
                    .iter()
                    .filter_map(|game| game.last_played_at().map(|at| (at, game.id)))
                    .collect::<Vec<_>>();
                recent.sort_by(|left, right| right.0.cmp(&left.0));
                recent.into_iter().map(|(_, id)| id).collect()
            }
            Namespace::Collection(index) => self
                .collections
                .get(index)
                .map(|collection| collection.games.clone())
                .unwrap_or_default(),
        }
    }
}

/// A synthetic game namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Every game in catalog order.
    AllGames,
    /// Favorite games in catalog order.
    Favorites,
    /// Games with play time, most played first.
    MostPlayed,
    /// Games with a last-played time, most recent first.
    LastPlayed,
    /// A collection's own sequence, by position in the catalog's collection list.
    Collection(usize),
}

impl Namespace {
    /// Resolves a user token: the fixed aliases first, then a collection short name or display
    /// name (case-insensitive).
    pub fn from_token(view: &CatalogView, token: &str) -> Option<Self> {
        match token.to_lowercase().as_str() {
            "all" | "all-games" | "allgames" => Some(Self::AllGames),
            "favorites" | "fav" => Some(Self::Favorites),
            "mostplayed" | "most" => Some(Self::MostPlayed),
            "lastplayed" | "last" | "recent" => Some(Self::LastPlayed),
            _ => view.find_collection(token).map(Self::Collection),
        }
    }

    /// Label used in "not found in ..." messages.
    pub fn label(self, view: &CatalogView) -> String {
        match self {
            Self::AllGames => "all-games".to_string(),
            Self::Favorites => "favorites".to_string(),
            Self::MostPlayed => "mostplayed".to_string(),
            Self::LastPlayed => "lastplayed".to_string(),
            Self::Collection(index) => view
                .collections()
                .get(index)
                .map(|collection| collection.name.clone())
                .unwrap_or_default(),
        }
    }

    /// Human-readable title.
    pub fn title(self, view: &CatalogView) -> String {
        match self {
            Self::AllGames => "All Games".to_string(),
            Self::Favorites => "Favorites".to_string(),
            Self::MostPlayed => "Most Played".to_string(),
            Self::LastPlayed => "Last Played".to_string(),
            Self::Collection(_) => self.label(view),
        }
    }

    /// Short token that [`Namespace::from_token`] maps back to this namespace.
    pub fn token(self, view: &CatalogView) -> String {
        match self {
            Self::AllGames => "all".to_string(),
            Self::Favorites => "favorites".to_string(),
            Self::MostPlayed => "mostplayed".to_string(),
            Self::LastPlayed => "lastplayed".to_string(),
            Self::Collection(index) => view
                .collections()
                .get(index)
                .map(|collection| collection.short_name.clone())
                .unwrap_or_default(),
        }
    }

    /// Canonical virtual directory holding the namespace's games.
    pub fn path(self, view: &CatalogView) -> String {
        match self {
            Self::AllGames => "/All-Games".to_string(),
            Self::Favorites => "/Favorites".to_string(),
            Self::MostPlayed => "/MostPlayed".to_string(),
            Self::LastPlayed => "/LastPlayed".to_string(),
            Self::Collection(_) => format!("/Collections/{}/games", self.token(view)),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use catalog_host::{Collection, Game, GameId};

    use super::CatalogView;

    pub(crate) fn game(index: usize, title: &str) -> Game {
        Game {
            id: GameId(index),
            title: title.to_string(),
            developer: None,
            publisher: None,
            genre: None,
            release_year: None,
            release_month: None,
            release_day: None,
            players: 1,
            rating: None,
            play_count: 0,
            play_time: 0,
            last_played: None,
            favorite: false,
            description: None,
            collections: Vec::new(),
        }
    }

    /// Six games, two collections, three favorites, mixed play data.
    pub(crate) fn view() -> CatalogView {
        let mut games = vec![
            game(0, "Alpha"),
            game(1, "Bravo"),
            game(2, "Charlie"),
            game(3, "Delta"),
            game(4, "Echo"),
            game(5, "Foxtrot"),
        ];
        for index in [1, 3, 5] {
            games[index].favorite = true;
        }
        games[0].play_time = 100;
        games[2].play_time = 900;
        games[4].play_time = 100;
        games[2].last_played = Some(5_000);
        games[3].last_played = Some(9_000);
        games[5].last_played = Some(0);
        for index in [4, 0] {
            games[index].collections.push("snes".to_string());
        }
        games[2].collections.push("nes".to_string());
        CatalogView::new(
            games,
            vec![
                Collection {
                    name: "Super Nintendo".to_string(),
                    short_name: "snes".to_string(),
                    summary: None,
                    games: vec![GameId(4), GameId(0)],
                },
                Collection {
                    name: "Nintendo".to_string(),
                    short_name: "nes".to_string(),
                    summary: Some("8-bit".to_string()),
                    games: vec![GameId(2)],
                },
            ],
        )
    }
}
