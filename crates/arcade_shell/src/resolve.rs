//! Game identifier resolution: address form, selector flags, bare indices, and titles.

use arcade_shell_contract::ShellError;
use catalog_host::{GameCatalog, GameId};
use thiserror::Error;

use crate::{
    listing::ListedGame,
    namespace::{CatalogView, Namespace},
    options::GameSelector,
};

/// Why an identifier did not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Neither an identifier nor both selector flags were given.
    #[error("Not enough arguments")]
    MissingIdentifier,
    /// `@...` that is not exactly `@<collection>:<index>`.
    #[error("Invalid format. Use: @collection:index (e.g., @snes:5)")]
    InvalidAddress,
    /// Only one of `--collection` / `--index` was given.
    #[error("Both --collection and --index are required")]
    IncompleteSelector,
    /// Index that is not a non-negative integer.
    #[error("Invalid index: {0}")]
    InvalidIndex(String),
    /// Collection token matched nothing.
    #[error("Collection not found: {0}")]
    UnknownCollection(String),
    /// Index past the end of a namespace.
    #[error("Game index {index} not found in {namespace}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Namespace label.
        namespace: String,
    },
    /// Bare index absent from both the last listing and All-Games.
    #[error("Game index {index} not found. Valid range: {range}")]
    IndexNotListed {
        /// Requested index.
        index: usize,
        /// Human-readable valid range.
        range: String,
    },
    /// Title matched nothing.
    #[error("Game not found: {0}")]
    GameNotFound(String),
}

impl ResolveError {
    /// Maps into the shell taxonomy; `usage` completes the missing-identifier message.
    pub fn into_shell_error(self, usage: &str) -> ShellError {
        match self {
            Self::MissingIdentifier => {
                ShellError::usage(format!("Not enough arguments. Usage: {usage}"))
            }
            Self::IncompleteSelector => ShellError::usage(format!("{self}\nUsage: {usage}")),
            Self::InvalidAddress | Self::InvalidIndex(_) => ShellError::usage(self.to_string()),
            Self::UnknownCollection(_)
            | Self::IndexOutOfRange { .. }
            | Self::IndexNotListed { .. }
            | Self::GameNotFound(_) => ShellError::not_found(self.to_string()),
        }
    }
}

/// Resolves [`GameSelector`]s against one catalog snapshot and the session's last listing.
pub struct GameResolver<'a> {
    view: &'a CatalogView,
    catalog: &'a dyn GameCatalog,
    last_listing: &'a [ListedGame],
}

impl<'a> GameResolver<'a> {
    /// Creates a resolver.
    pub fn new(
        view: &'a CatalogView,
        catalog: &'a dyn GameCatalog,
        last_listing: &'a [ListedGame],
    ) -> Self {
        Self {
            view,
            catalog,
            last_listing,
        }
    }

    /// Resolves a selector. The first strategy whose shape matches decides the result.
    ///
    /// Strategies in order: `@collection:index`, both `--collection` and `--index`, a bare
    /// index, and finally a title.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] describing the failed strategy.
    pub fn resolve(&self, selector: &GameSelector) -> Result<GameId, ResolveError> {
        let identifier = selector.identifier.as_deref();
        if let Some(address) = identifier.and_then(|identifier| identifier.strip_prefix('@')) {
            return self.resolve_address(address);
        }
        match (
            identifier,
            selector.collection.as_deref(),
            selector.index.as_deref(),
        ) {
            (_, Some(collection), Some(index)) => self.resolve_in(collection, parse_index(index)?),
            (Some(identifier), _, _) => self.resolve_identifier(identifier),
            (None, Some(_), None) | (None, None, Some(_)) => Err(ResolveError::IncompleteSelector),
            (None, None, None) => Err(ResolveError::MissingIdentifier),
        }
    }

    fn resolve_address(&self, address: &str) -> Result<GameId, ResolveError> {
        let parts = address.split(':').collect::<Vec<_>>();
        let [collection, index] = parts.as_slice() else {
            return Err(ResolveError::InvalidAddress);
        };
        self.resolve_in(collection, parse_index(index)?)
    }

    fn resolve_identifier(&self, identifier: &str) -> Result<GameId, ResolveError> {
        if let Some(index) = round_trip_index(identifier) {
            return self.resolve_bare(index);
        }
        self.catalog
            .find_game(identifier)
            .ok_or_else(|| ResolveError::GameNotFound(identifier.to_string()))
    }

    fn resolve_in(&self, token: &str, index: usize) -> Result<GameId, ResolveError> {
        let namespace = Namespace::from_token(self.view, token)
            .ok_or_else(|| ResolveError::UnknownCollection(token.to_string()))?;
        self.view
            .members(namespace)
            .get(index)
            .copied()
            .ok_or_else(|| ResolveError::IndexOutOfRange {
                index,
                namespace: namespace.label(self.view),
            })
    }

    fn resolve_bare(&self, index: usize) -> Result<GameId, ResolveError> {
        if let Some(listed) = self.last_listing.iter().find(|listed| listed.index == index) {
            return Ok(listed.game);
        }
        if let Some(game) = self.view.games().get(index) {
            return Ok(game.id);
        }
        let range = if self.last_listing.is_empty() {
            match self.view.games().len() {
                0 => "none".to_string(),
                len => format!("0-{}", len - 1),
            }
        } else {
            let low = self.last_listing.iter().map(|listed| listed.index).min();
            let high = self.last_listing.iter().map(|listed| listed.index).max();
            match (low, high) {
                (Some(low), Some(high)) => format!("{low}-{high}"),
                _ => "none".to_string(),
            }
        };
        Err(ResolveError::IndexNotListed { index, range })
    }
}

fn parse_index(raw: &str) -> Result<usize, ResolveError> {
    if raw.is_empty() || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(ResolveError::InvalidIndex(raw.to_string()));
    }
    raw.parse::<usize>()
        .map_err(|_| ResolveError::InvalidIndex(raw.to_string()))
}

/// A bare index qualifies only when its decimal rendering reproduces the input (`"03"` does not).
fn round_trip_index(raw: &str) -> Option<usize> {
    raw.parse::<usize>()
        .ok()
        .filter(|index| index.to_string() == raw)
}

#[cfg(test)]
mod tests {
    use catalog_host::{CatalogError, Collection, Game};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::namespace::fixtures;

    struct ViewCatalog(CatalogView);

    impl GameCatalog for ViewCatalog {
        fn games(&self) -> Vec<Game> {
            self.0.games().to_vec()
        }

        fn collections(&self) -> Vec<Collection> {
            self.0.collections().to_vec()
        }

        fn set_favorite(&self, _id: GameId, _favorite: bool) -> Result<(), CatalogError> {
            Ok(())
        }

        fn launch(&self, _id: GameId) -> Result<(), CatalogError> {
            Ok(())
        }
    }

    fn resolve(identifier: &str, last_listing: &[ListedGame]) -> Result<GameId, ResolveError> {
        let view = fixtures::view();
        let catalog = ViewCatalog(view.clone());
        GameResolver::new(&view, &catalog, last_listing)
            .resolve(&GameSelector::identifier(identifier))
    }

    fn listed(index: usize, game: usize) -> ListedGame {
        ListedGame {
            index,
            title: format!("game {game}"),
            game: GameId(game),
        }
    }

    #[test]
    fn address_form_uses_namespace_indices() {
        let cases = [
            ("@favorites:0", GameId(1)),
            ("@fav:2", GameId(5)),
            ("@all:4", GameId(4)),
            ("@most:0", GameId(2)),
            ("@recent:1", GameId(2)),
            ("@SNES:0", GameId(4)),
            ("@nintendo:0", GameId(2)),
        ];
        for (identifier, expected) in cases {
            assert_eq!(resolve(identifier, &[]), Ok(expected), "identifier={identifier:?}");
        }
    }

    #[test]
    fn malformed_addresses_are_usage_errors() {
        let cases = [
            ("@snes", ResolveError::InvalidAddress),
            ("@snes:1:2", ResolveError::InvalidAddress),
            ("@snes:x", ResolveError::InvalidIndex("x".to_string())),
            ("@snes:-1", ResolveError::InvalidIndex("-1".to_string())),
            ("@snes:", ResolveError::InvalidIndex(String::new())),
        ];
        for (identifier, expected) in cases {
            let error = resolve(identifier, &[]).expect_err("should fail");
            assert_eq!(error, expected, "identifier={identifier:?}");
            assert_eq!(error.into_shell_error("info").exit_code(), 1);
        }
    }

    #[test]
    fn address_lookups_report_not_found() {
        assert_eq!(
            resolve("@genesis:0", &[]),
            Err(ResolveError::UnknownCollection("genesis".to_string()))
        );
        let error = resolve("@snes:7", &[]).expect_err("out of range");
        assert_eq!(error.to_string(), "Game index 7 not found in Super Nintendo");
    }

    #[test]
    fn bare_index_prefers_last_listing() {
        let listing = [listed(0, 1), listed(1, 3), listed(2, 5)];
        assert_eq!(resolve("1", &listing), Ok(GameId(3)));
        assert_eq!(resolve("4", &listing), Ok(GameId(4)));
        assert_eq!(resolve("1", &[]), Ok(GameId(1)));

        let error = resolve("9", &listing).expect_err("missing");
        assert_eq!(error.to_string(), "Game index 9 not found. Valid range: 0-2");
        let error = resolve("9", &[]).expect_err("missing");
        assert_eq!(error.to_string(), "Game index 9 not found. Valid range: 0-5");
    }

    #[test]
    fn non_round_trip_numbers_are_titles() {
        assert_eq!(
            resolve("03", &[]),
            Err(ResolveError::GameNotFound("03".to_string()))
        );
        assert_eq!(resolve("char", &[]), Ok(GameId(2)));
        assert_eq!(resolve("ECHO", &[]), Ok(GameId(4)));
    }

    #[test]
    fn selector_flags_need_both_values() {
        let view = fixtures::view();
        let catalog = ViewCatalog(view.clone());
        let resolver = GameResolver::new(&view, &catalog, &[]);

        let both = GameSelector {
            identifier: None,
            collection: Some("snes".to_string()),
            index: Some("1".to_string()),
        };
        assert_eq!(resolver.resolve(&both), Ok(GameId(0)));

        let only_collection = GameSelector {
            index: None,
            ..both.clone()
        };
        let error = resolver.resolve(&only_collection).expect_err("incomplete");
        assert_eq!(error, ResolveError::IncompleteSelector);

        let error = resolver
            .resolve(&GameSelector::default())
            .expect_err("missing")
            .into_shell_error("info [id]");
        assert_eq!(error.message, "Not enough arguments. Usage: info [id]");
    }

    #[test]
    fn selector_flags_take_precedence_over_plain_identifiers() {
        let view = fixtures::view();
        let catalog = ViewCatalog(view.clone());
        let resolver = GameResolver::new(&view, &catalog, &[]);
        let flags = GameSelector {
            identifier: None,
            collection: Some("snes".to_string()),
            index: Some("1".to_string()),
        };

        for identifier in ["Delta", "3"] {
            let selector = GameSelector {
                identifier: Some(identifier.to_string()),
                ..flags.clone()
            };
            assert_eq!(resolver.resolve(&selector), Ok(GameId(0)), "identifier={identifier:?}");
        }

        let address = GameSelector {
            identifier: Some("@fav:2".to_string()),
            ..flags.clone()
        };
        assert_eq!(resolver.resolve(&address), Ok(GameId(5)));

        let partial = GameSelector {
            identifier: Some("Delta".to_string()),
            index: None,
            ..flags
        };
        assert_eq!(resolver.resolve(&partial), Ok(GameId(3)));
    }
}
