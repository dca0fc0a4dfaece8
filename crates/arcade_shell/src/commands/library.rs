//! Read-only catalog commands: `collections`, `games`, `info`, `search`, `stats`.

use arcade_shell_contract::{ArgBounds, CommandOptionSpec, CommandOutcome};
use catalog_host::{format_unix_ms, Game};

use super::{descriptor, not_found, selector_options, CommandRegistration};
use crate::{
    listing::ListedGame,
    namespace::{CatalogView, Namespace},
    options::{positive_count, GameSelector, SearchField, SearchOptions},
    registry::command_handler,
    text::{age, detailed_age, hours_minutes, plural, rule, wrap_text},
};

const DESCRIPTION_WIDTH: usize = 70;
const DATE_FORMAT: &str = "%-m/%-d/%Y";
const TIME_FORMAT: &str = "%-I:%M:%S %p";

pub(crate) fn collections_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: descriptor(
            "collections",
            &["coll"],
            ArgBounds::exactly(0),
            vec![CommandOptionSpec::flag("short", "One line per collection.")],
            "List available collections",
            "collections [--short]",
        ),
        handler: command_handler(|ctx| {
            let view = ctx.shell.view();
            let short = ctx.flags.has("short");
            let mut lines = vec![
                format!("Available collections ({}):", view.collections().len()),
                rule('=', 40),
            ];
            for collection in view.collections() {
                if short {
                    lines.push(format!("{} - {}", collection.short_name, collection.name));
                    continue;
                }
                lines.push(String::new());
                lines.push(format!("Collection: {}", collection.name));
                lines.push(format!("  Short name: {}", collection.short_name));
                lines.push(format!("  Games: {}", collection.games.len()));
                if let Some(summary) = collection.summary.as_deref().filter(|s| !s.is_empty()) {
                    lines.push(format!("  Description: {summary}"));
                }
            }
            Ok(CommandOutcome::lines(lines))
        }),
    }
}

pub(crate) fn games_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: descriptor(
            "games",
            &["list", "g"],
            ArgBounds::exactly(0),
            vec![
                CommandOptionSpec::valued("collection", "Collection short name or display name."),
                CommandOptionSpec::valued("limit", "Maximum games shown."),
            ],
            "List games in a collection or all games",
            "games [--collection=<shortName>] [--limit=<n>]",
        ),
        handler: command_handler(|ctx| {
            let view = ctx.shell.view();
            let limit = match ctx.flags.value("limit") {
                Some(raw) => positive_count("limit", raw)?,
                None => ctx.shell.config.games_default_limit,
            };

            let (namespace, mut lines) = match ctx.flags.value("collection") {
                Some(token) => {
                    let index = view
                        .find_collection(token)
                        .ok_or_else(|| not_found(format!("Collection not found: {token}")))?;
                    let collection = &view.collections()[index];
                    let heading = format!(
                        "Games in collection: {} ({})",
                        collection.name, collection.short_name
                    );
                    (Namespace::Collection(index), vec![heading, rule('=', 60)])
                }
                None => (Namespace::AllGames, vec!["All Games".to_string(), rule('=', 60)]),
            };

            let members = view.members(namespace);
            let total = members.len();
            if total == 0 && namespace != Namespace::AllGames {
                lines.push("(no games in this collection)".to_string());
                ctx.shell.set_last_listing(Vec::new());
                return Ok(CommandOutcome::lines(lines));
            }

            let listed = members
                .into_iter()
                .take(limit)
                .filter_map(|id| view.game(id))
                .enumerate()
                .map(|(index, game)| ListedGame {
                    index,
                    title: game.title.clone(),
                    game: game.id,
                })
                .collect::<Vec<_>>();
            lines.extend(listed.iter().map(|entry| format!("{}- {}", entry.index, entry.title)));
            if total > limit {
                lines.push(String::new());
                lines.push(format!("... and {} more games", total - limit));
                lines.push(format!("Use --limit={total} to see all"));
            }
            lines.push(String::new());
            lines.push(format!("Total: {total} games (showing {})", listed.len()));

            ctx.shell.set_last_listing(listed);
            Ok(CommandOutcome::lines(lines))
        }),
    }
}

pub(crate) fn info_registration() -> CommandRegistration {
    let mut options = selector_options();
    options.push(
        CommandOptionSpec::flag("description", "Include the long description.").with_short('d'),
    );
    CommandRegistration {
        descriptor: descriptor(
            "info",
            &["show", "detail"],
            ArgBounds::between(0, 1),
            options,
            "Show game information",
            "info <game_title|index|@collection:index> [--collection=<n>] [--index=<n>] [-d|--description]",
        ),
        handler: command_handler(|ctx| {
            let view = ctx.shell.view();
            let selector = GameSelector::from_invocation(&ctx.args, 0, &ctx.flags);
            let id = ctx.shell.resolve_game(&view, &selector, ctx.usage())?;
            let game = view
                .game(id)
                .ok_or_else(|| not_found(format!("Game not found: {}", id.index())))?;
            Ok(CommandOutcome::lines(game_info(
                &view,
                game,
                ctx.flags.has("description"),
                ctx.shell.now_ms(),
            )))
        }),
    }
}

fn game_info(view: &CatalogView, game: &Game, with_description: bool, now_ms: u64) -> Vec<String> {
    let mut lines = vec![
        rule('=', 40),
        "GAME INFORMATION".to_string(),
        rule('=', 40),
        String::new(),
        format!("Title: {}", game.title),
    ];
    let credits = [
        ("Developer", &game.developer),
        ("Publisher", &game.publisher),
        ("Genre", &game.genre),
    ];
    for (label, value) in credits {
        if let Some(value) = value.as_deref().filter(|value| !value.is_empty()) {
            lines.push(format!("{label}: {value}"));
        }
    }
    if let Some(year) = game.known_release_year() {
        let mut parts = vec![year.to_string()];
        parts.extend(
            [game.release_month, game.release_day]
                .into_iter()
                .flatten()
                .filter(|part| *part > 0)
                .map(|part| part.to_string()),
        );
        lines.push(format!("Release: {}", parts.join("-")));
    }
    if game.players > 0 {
        lines.push(format!("Players: {}", game.players));
    }
    if let Some(rating) = game.rating.filter(|rating| *rating > 0.0) {
        lines.push(format!("Rating: {}%", (rating * 100.0).round() as u32));
    }
    if game.play_count > 0 {
        lines.push(format!("Play count: {}", game.play_count));
    }
    lines.push(format!("Play Time: {}", hours_minutes(game.play_time)));
    lines.push(match game.last_played_at() {
        Some(at) => format!(
            "Last Played: {} | {}",
            age(now_ms, at),
            format_unix_ms(at, DATE_FORMAT)
        ),
        None => "Last Played: Never".to_string(),
    });
    lines.push(format!(
        "Favorite: {}",
        if game.favorite { "yes" } else { "no" }
    ));

    if with_description {
        lines.push(String::new());
        lines.push("Description:".to_string());
        let wrapped = game
            .description
            .as_deref()
            .map(|text| wrap_text(text, DESCRIPTION_WIDTH))
            .unwrap_or_default();
        if wrapped.is_empty() {
            lines.push("  no description".to_string());
        } else {
            lines.extend(wrapped.into_iter().map(|line| format!("  {line}")));
        }
    }

    lines.push(String::new());
    lines.push("Collections:".to_string());
    let collections = view.collection_names_of(game);
    if collections.is_empty() {
        lines.push("  (no collections)".to_string());
    } else {
        lines.extend(collections.into_iter().map(|name| format!("  \u{2022} {name}")));
    }
    lines
}

pub(crate) fn search_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: descriptor(
            "search",
            &["find", "grep"],
            ArgBounds::exactly(1),
            vec![
                CommandOptionSpec::valued("field", "title, developer, genre, year, or all."),
                CommandOptionSpec::valued("limit", "Maximum results shown."),
                CommandOptionSpec::flag("precise", "Sort by relevance."),
            ],
            "Search games with advanced filtering",
            "search <term> [--field=title|developer|genre|year|all] [--limit=N] [--precise]",
        ),
        handler: command_handler(|ctx| {
            let options = SearchOptions::from_flags(&ctx.flags)?;
            let raw_term = ctx.arg(0).unwrap_or_default();
            let term = raw_term.to_lowercase();
            let view = ctx.shell.view();

            let mut hits = view
                .games()
                .iter()
                .filter_map(|game| {
                    let text = search_text(game, options.field).to_lowercase();
                    relevance(&text, &term).map(|score| (score, game))
                })
                .collect::<Vec<_>>();
            if options.precise {
                hits.sort_by(|left, right| right.0.cmp(&left.0));
            }

            let total = hits.len();
            let shown = options.limit.map_or(total, |limit| limit.min(total));
            let heading = if options.precise {
                format!("Search results for: '{term}' (sorted by relevance)")
            } else if options.limit.is_some() {
                format!("Search results for: '{term}' (showing {shown} of {total})")
            } else {
                format!("Search results for: '{term}'")
            };
            let mut lines = vec![heading, rule('=', 40)];

            if hits.is_empty() {
                lines.push("No games found".to_string());
                ctx.shell.set_last_listing(Vec::new());
                return Ok(CommandOutcome::lines(lines));
            }

            let mut listed = Vec::with_capacity(shown);
            for (_, game) in hits.iter().take(shown) {
                let mut line = format!("[{}] {}", game.id.index(), game.title);
                if let Some(developer) = game.developer.as_deref().filter(|d| !d.is_empty()) {
                    line.push_str(&format!(" ({developer})"));
                }
                if !game.collections.is_empty() {
                    line.push_str(&format!(" - {}", game.collections.join(", ")));
                }
                lines.push(line);
                listed.push(ListedGame {
                    index: game.id.index(),
                    title: game.title.clone(),
                    game: game.id,
                });
            }
            lines.push(String::new());
            lines.push(format!("Total: {} found", plural(total, "game")));
            if shown < total {
                lines.push(String::new());
                lines.push(format!("Use 'search {raw_term}' to see all {total} results"));
            }

            ctx.shell.set_last_listing(listed);
            Ok(CommandOutcome::lines(lines))
        }),
    }
}

fn search_text(game: &Game, field: SearchField) -> String {
    let year = game
        .known_release_year()
        .map(|year| year.to_string())
        .unwrap_or_default();
    match field {
        SearchField::Title => game.title.clone(),
        SearchField::Developer => game.developer.clone().unwrap_or_default(),
        SearchField::Genre => game.genre.clone().unwrap_or_default(),
        SearchField::Year => year,
        SearchField::All => format!(
            "{} {} {} {}",
            game.title,
            game.developer.as_deref().unwrap_or_default(),
            game.genre.as_deref().unwrap_or_default(),
            year
        ),
    }
}

/// Exact 100, prefix 80, word start 60, anywhere else 40; `None` when `term` does not occur.
fn relevance(text: &str, term: &str) -> Option<u8> {
    if !text.contains(term) {
        None
    } else if text == term {
        Some(100)
    } else if text.starts_with(term) {
        Some(80)
    } else if text.contains(&format!(" {term}")) {
        Some(60)
    } else {
        Some(40)
    }
}

pub(crate) fn stats_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: descriptor(
            "stats",
            &["stat", "statistics"],
            ArgBounds::exactly(0),
            vec![],
            "Show gaming statistics",
            "stats",
        ),
        handler: command_handler(|ctx| {
            let view = ctx.shell.view();
            Ok(CommandOutcome::lines(statistics(
                view.games(),
                &ctx.shell.user(),
                ctx.shell.now_ms(),
            )))
        }),
    }
}

fn statistics(games: &[Game], user: &str, now_ms: u64) -> Vec<String> {
    let total_play_time = games.iter().map(|game| game.play_time).sum::<u64>();
    let total_launches = games.iter().map(|game| u64::from(game.play_count)).sum::<u64>();
    let favorites = games.iter().filter(|game| game.favorite).count();
    let with_play_time = games.iter().filter(|game| game.play_time > 0).count();
    let played = games.iter().filter(|game| game.play_count > 0).count();
    let ratings = games
        .iter()
        .filter_map(|game| game.rating.filter(|rating| *rating > 0.0))
        .collect::<Vec<_>>();
    let last_played = games
        .iter()
        .filter_map(|game| game.last_played_at().map(|at| (at, game)))
        .fold(None::<(u64, &Game)>, |best, (at, game)| match best {
            Some((best_at, _)) if best_at >= at => best,
            _ => Some((at, game)),
        });

    let mut lines = vec![
        format!("GLOBAL STATISTICS - {user}"),
        rule('=', 40),
        String::new(),
        "Library:".to_string(),
        format!("  Total games: {}", games.len()),
        format!("  Favorite games: {favorites}"),
    ];
    if !ratings.is_empty() {
        let average = ratings.iter().sum::<f32>() / ratings.len() as f32;
        lines.push(format!("  Average rating: {}%", (average * 100.0).round() as u32));
        lines.push(format!("  Games rated: {}", ratings.len()));
    }

    lines.push(String::new());
    lines.push("Play Statistics:".to_string());
    lines.push(format!("  Games played: {played}"));
    lines.push(format!("  Total launches: {total_launches}"));
    lines.push(format!("  Total play time: {}", hours_minutes(total_play_time)));
    if with_play_time > 0 {
        let average = total_play_time / with_play_time as u64;
        lines.push(format!("  Average per game: {}", hours_minutes(average)));
    }

    if let Some((at, game)) = last_played {
        lines.push(String::new());
        lines.push("Last Played:".to_string());
        lines.push(format!("  Game: {}", game.title));
        lines.push(format!(
            "  Date: {} at {}",
            format_unix_ms(at, DATE_FORMAT),
            format_unix_ms(at, TIME_FORMAT)
        ));
        lines.push(format!("  Time ago: {}", detailed_age(now_ms, at)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::namespace::fixtures;

    #[test]
    fn relevance_ranks_exact_prefix_word_and_substring() {
        let cases = [
            ("foo", Some(100)),
            ("foo bar", Some(80)),
            ("the foo", Some(60)),
            ("xfoo", Some(40)),
            ("bar", None),
        ];
        for (text, expected) in cases {
            assert_eq!(relevance(text, "foo"), expected, "text={text:?}");
        }
    }

    #[test]
    fn info_lists_fields_and_collections() {
        let view = fixtures::view();
        let mut game = view.games()[0].clone();
        game.developer = Some("Studio".to_string());
        game.release_year = Some(1994);
        game.release_month = Some(3);
        game.rating = Some(0.857);
        game.last_played = Some(1_000);
        game.description = Some("A short tale.".to_string());

        let lines = game_info(&view, &game, true, 1_000 + 2 * 3_600_000);
        assert_eq!(
            lines,
            vec![
                "=".repeat(40),
                "GAME INFORMATION".to_string(),
                "=".repeat(40),
                String::new(),
                "Title: Alpha".to_string(),
                "Developer: Studio".to_string(),
                "Release: 1994-3".to_string(),
                "Players: 1".to_string(),
                "Rating: 86%".to_string(),
                "Play Time: 0h 1m".to_string(),
                "Last Played: 2 hours ago | 1/1/1970".to_string(),
                "Favorite: no".to_string(),
                String::new(),
                "Description:".to_string(),
                "  A short tale.".to_string(),
                String::new(),
                "Collections:".to_string(),
                "  \u{2022} Super Nintendo".to_string(),
            ]
        );
    }

    #[test]
    fn statistics_summarize_library_and_play() {
        let view = fixtures::view();
        let lines = statistics(view.games(), "alice", 9_000 + 3_600_000);
        assert_eq!(lines[0], "GLOBAL STATISTICS - alice");
        assert!(lines.contains(&"  Total games: 6".to_string()));
        assert!(lines.contains(&"  Favorite games: 3".to_string()));
        assert!(lines.contains(&"  Total play time: 0h 18m".to_string()));
        assert!(lines.contains(&"  Game: Delta".to_string()));
        assert!(lines.contains(&"  Time ago: 1 hour and 0 minutes".to_string()));
        assert!(!lines.iter().any(|line| line.starts_with("  Average rating")));
    }
}
