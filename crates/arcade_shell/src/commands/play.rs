//! `launch` and `favorites`.

use arcade_shell_contract::{ArgBounds, CommandOutcome, ShellError, SideEffects};
use catalog_host::{format_unix_ms, save_pref_with, GameId};
use serde::{Deserialize, Serialize};

use super::{descriptor, not_found, selector_options, usage_error, CommandRegistration};
use crate::{
    dispatch::ShellContext,
    listing::ListedGame,
    namespace::{CatalogView, Namespace},
    options::GameSelector,
    registry::command_handler,
    session::PendingState,
    text::rule,
};

/// Store key for the context saved on every launch.
pub const LAST_CONTEXT_KEY: &str = "terminal_last_context";

/// Where the user was when they last launched a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastContext {
    /// Canonical cwd at launch.
    pub cwd: String,
    /// Active collection short name, if any.
    pub collection: Option<String>,
    /// Launched title.
    pub game: String,
    /// ISO-8601 UTC launch time.
    pub timestamp: String,
}

pub(crate) fn launch_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: descriptor(
            "launch",
            &["run", "play"],
            ArgBounds::between(0, 1),
            selector_options(),
            "Launch a game by title, number, or from collection",
            "launch <game_title|index|@collection:index> [--collection=<name>] [--index=<n>]",
        ),
        handler: command_handler(|ctx| {
            let view = ctx.shell.view();
            let selector = GameSelector::from_invocation(&ctx.args, 0, &ctx.flags);
            let id = ctx.shell.resolve_game(&view, &selector, ctx.usage())?;
            launch_game(ctx.shell, &view, id)
        }),
    }
}

pub(crate) fn favorites_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: descriptor(
            "favorites",
            &["fav", "f"],
            ArgBounds::between(1, 2),
            vec![],
            "Manage favorite games",
            "favorites [add|remove|list|launch] <index|title>",
        ),
        handler: command_handler(|ctx| {
            let action = ctx.arg(0).unwrap_or_default();
            let view = ctx.shell.view();
            if action == "list" {
                return Ok(list_favorites(ctx.shell, &view));
            }
            if !matches!(action, "add" | "remove" | "launch" | "play" | "run") {
                return Err(usage_error("Invalid action. Use: add, remove, list, or launch"));
            }
            let Some(identifier) = ctx.arg(1) else {
                return Err(usage_error(format!(
                    "Game index or title required for action: {action}"
                )));
            };

            let id = ctx
                .shell
                .resolve_game(&view, &GameSelector::identifier(identifier), ctx.usage())?;
            let game = view
                .game(id)
                .ok_or_else(|| not_found(format!("Game not found: {identifier}")))?;

            match action {
                "add" if game.favorite => Ok(CommandOutcome::lines([format!(
                    "{} is already in favorites",
                    game.title
                )])),
                "remove" if !game.favorite => Ok(CommandOutcome::lines([format!(
                    "{} is not in favorites",
                    game.title
                )])),
                "add" | "remove" => {
                    let favorite = action == "add";
                    ctx.shell
                        .catalog
                        .set_favorite(id, favorite)
                        .map_err(|err| ShellError::operational(err.to_string()))?;
                    let verb = if favorite { "Added to" } else { "Removed from" };
                    Ok(CommandOutcome::lines([format!(
                        "{verb} favorites: {}",
                        game.title
                    )]))
                }
                _ => launch_game(ctx.shell, &view, id),
            }
        }),
    }
}

fn list_favorites(shell: &ShellContext, view: &CatalogView) -> CommandOutcome {
    let mut lines = vec!["Favorite games:".to_string(), rule('=', 60)];
    let listed = view
        .members(Namespace::Favorites)
        .into_iter()
        .filter_map(|id| view.game(id))
        .enumerate()
        .map(|(index, game)| ListedGame {
            index,
            title: game.title.clone(),
            game: game.id,
        })
        .collect::<Vec<_>>();

    if listed.is_empty() {
        lines.push("No favorite games yet".to_string());
    } else {
        lines.extend(listed.iter().map(|entry| format!("{}- {}", entry.index, entry.title)));
        lines.push(String::new());
        lines.push(format!("Total: {} game(s)", listed.len()));
    }
    shell.set_last_listing(listed);
    CommandOutcome::lines(lines)
}

/// Records the launch context, asks the catalog to start the game, and flags the state change.
fn launch_game(
    shell: &ShellContext,
    view: &CatalogView,
    id: GameId,
) -> Result<CommandOutcome, ShellError> {
    let title = view
        .game(id)
        .map(|game| game.title.clone())
        .ok_or_else(|| not_found(format!("Game not found: {}", id.index())))?;

    let context = {
        let state = shell.state.borrow();
        LastContext {
            cwd: state.cwd.clone(),
            collection: state.active_collection.clone(),
            game: title.clone(),
            timestamp: format_unix_ms(shell.now_ms(), "%Y-%m-%dT%H:%M:%S%.3fZ"),
        }
    };
    if let Err(err) = save_pref_with(shell.store.as_ref(), LAST_CONTEXT_KEY, &context) {
        tracing::warn!(error = %err, "failed to save launch context");
    }

    shell
        .catalog
        .launch(id)
        .map_err(|err| ShellError::operational(format!("Failed to launch game: {err}")))?;
    shell.state.borrow_mut().pending_state = Some(PendingState::GameRunning);
    Ok(
        CommandOutcome::lines([format!("Launching: {title}...")]).with_side_effects(SideEffects {
            state_changed: true,
            ..SideEffects::default()
        }),
    )
}
