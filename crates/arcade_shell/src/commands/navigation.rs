//! Virtual filesystem navigation: `pwd`, `cd`, `use`, and the listing commands.

use arcade_shell_contract::{
    ArgBounds, CommandOptionSpec, CommandOutcome, ShellError, SideEffects,
};

use super::{descriptor, not_found, CommandRegistration};
use crate::{
    dispatch::{CommandContext, ShellContext},
    listing::{render_leaf, render_listing, Layout, ListingOptions},
    namespace::Namespace,
    options::{positive_count, ListOptions, Window},
    registry::command_handler,
    text::rule,
    vfs::PathResolver,
};

const DEFAULT_WINDOW: usize = 10;
const LARGE_NAMESPACE: usize = 50;

pub(crate) fn pwd_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: descriptor(
            "pwd",
            &[],
            ArgBounds::exactly(0),
            vec![],
            "Print working directory",
            "pwd",
        ),
        handler: command_handler(|ctx| Ok(CommandOutcome::lines([ctx.shell.display_cwd()]))),
    }
}

pub(crate) fn ls_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: descriptor(
            "ls",
            &["dir"],
            ArgBounds::between(0, 1),
            vec![
                CommandOptionSpec::valued("limit", "Show the first N entries."),
                CommandOptionSpec::valued("head", "Show the first N entries."),
                CommandOptionSpec::valued("tail", "Show the last N entries."),
                CommandOptionSpec::flag("wide", "Four-column layout.").with_short('w'),
            ],
            "List directory contents",
            "ls [path] [--limit=N] [--head=N] [--tail=N] [--wide]",
        ),
        handler: command_handler(|ctx| {
            let options = ListOptions::from_flags(&ctx.flags)?;
            let layout = if options.wide {
                Layout::Wide
            } else {
                Layout::Single
            };
            list_directory(
                ctx.shell,
                "ls",
                ctx.arg(0),
                ListingOptions {
                    window: options.window,
                    layout,
                },
            )
        }),
    }
}

pub(crate) fn head_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: descriptor(
            "head",
            &[],
            ArgBounds::between(0, 2),
            vec![],
            "Show first N items of a directory",
            "head [n] [path]",
        ),
        handler: command_handler(|ctx| windowed(ctx, "head", Window::Head)),
    }
}

pub(crate) fn tail_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: descriptor(
            "tail",
            &[],
            ArgBounds::between(0, 2),
            vec![],
            "Show last N items of a directory",
            "tail [n] [path]",
        ),
        handler: command_handler(|ctx| windowed(ctx, "tail", Window::Tail)),
    }
}

pub(crate) fn ll_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: descriptor(
            "ll",
            &[],
            ArgBounds::between(0, 1),
            vec![],
            "List directory contents in wide format (columns)",
            "ll [path]",
        ),
        handler: command_handler(|ctx| {
            list_directory(
                ctx.shell,
                "ll",
                ctx.arg(0),
                ListingOptions {
                    window: Window::All,
                    layout: Layout::Wide,
                },
            )
        }),
    }
}

pub(crate) fn cols_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: descriptor(
            "cols",
            &[],
            ArgBounds::between(0, 1),
            vec![],
            "List directory contents in clean columns",
            "cols [path]",
        ),
        handler: command_handler(|ctx| {
            let outcome = list_directory(
                ctx.shell,
                "cols",
                ctx.arg(0),
                ListingOptions {
                    window: Window::All,
                    layout: Layout::SimpleColumns,
                },
            )?;
            // Names carry no numbers here, so nothing stays addressable by index.
            ctx.shell.set_last_listing(Vec::new());
            Ok(outcome)
        }),
    }
}

pub(crate) fn cd_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: descriptor(
            "cd",
            &["chdir"],
            ArgBounds::between(0, 1),
            vec![],
            "Change directory",
            "cd [path]",
        ),
        handler: command_handler(|ctx| {
            let target = ctx.arg(0).unwrap_or("/");
            let view = ctx.shell.view();
            let user = ctx.shell.user();
            let resolved = PathResolver::new(&view, &user)
                .resolve(target, &ctx.shell.cwd())
                .map_err(|err| not_found(format!("cd: {err}: {target}")))?;
            if !resolved.is_directory {
                return Err(not_found(format!("cd: not a directory: {target}")));
            }

            let active_collection = match resolved.namespace {
                Some(Namespace::Collection(index)) => view
                    .collections()
                    .get(index)
                    .map(|collection| collection.short_name.clone()),
                _ => None,
            };
            {
                let mut state = ctx.shell.state.borrow_mut();
                state.cwd = resolved.path;
                state.active_collection = active_collection;
            }
            Ok(CommandOutcome::empty().with_side_effects(SideEffects {
                cwd_changed: true,
                ..SideEffects::default()
            }))
        }),
    }
}

pub(crate) fn use_registration() -> CommandRegistration {
    CommandRegistration {
        descriptor: descriptor(
            "use",
            &["goto", "collection"],
            ArgBounds::exactly(1),
            vec![],
            "Navigate to a collection directory",
            "use <collection_name>",
        ),
        handler: command_handler(|ctx| {
            let token = ctx.arg(0).unwrap_or_default().to_lowercase();
            let view = ctx.shell.view();
            let Some(namespace) = Namespace::from_token(&view, &token) else {
                return Err(not_found(format!(
                    "Collection not found: {token}\n\nAvailable collections:\n  \u{2022} all, favorites, mostplayed, lastplayed\n  \u{2022} Use 'collections' to see all available collections"
                )));
            };

            let path = namespace.path(&view);
            let user = ctx.shell.user();
            PathResolver::new(&view, &user)
                .resolve(&path, "/")
                .map_err(|_| {
                    ShellError::operational(format!("Error accessing collection: {path}"))
                })?;

            let count = view.members(namespace).len();
            let short = namespace.token(&view);
            {
                let mut state = ctx.shell.state.borrow_mut();
                state.cwd = path.clone();
                state.active_collection = match namespace {
                    Namespace::Collection(_) => Some(short.clone()),
                    _ => None,
                };
            }

            let mut lines = vec![
                namespace.title(&view),
                rule('=', 40),
                format!("Games: {count}"),
                format!("Location: {path}"),
                String::new(),
                "Quick commands:".to_string(),
                "  ls              - List all games".to_string(),
                "  ls --limit=10   - Show first 10 games".to_string(),
                format!("  info @{short}:0    - Game info by index"),
                format!("  launch @{short}:0   - Launch game by index"),
            ];
            if count > LARGE_NAMESPACE {
                lines.push(String::new());
                lines.push("Tip: Use 'ls --limit=20' to avoid long lists".to_string());
            }
            Ok(CommandOutcome::lines(lines).with_side_effects(SideEffects {
                cwd_changed: true,
                ..SideEffects::default()
            }))
        }),
    }
}

/// Shared body of `head` and `tail`: `[n] [path]` with a default of ten entries.
fn windowed(
    ctx: &CommandContext<'_>,
    name: &str,
    window: fn(usize) -> Window,
) -> Result<CommandOutcome, ShellError> {
    let (count, path) = match ctx.args.as_slice() {
        [] => (DEFAULT_WINDOW, None),
        [single] if single.parse::<i64>().is_ok() => (positive_count(name, single)?, None),
        [single] => (DEFAULT_WINDOW, Some(single.as_str())),
        [count, path, ..] => (positive_count(name, count)?, Some(path.as_str())),
    };
    list_directory(
        ctx.shell,
        name,
        path,
        ListingOptions {
            window: window(count),
            layout: Layout::Single,
        },
    )
}

/// Resolves `path` (default: cwd), renders it, and records the visible games.
fn list_directory(
    shell: &ShellContext,
    command: &str,
    path: Option<&str>,
    options: ListingOptions,
) -> Result<CommandOutcome, ShellError> {
    let view = shell.view();
    let user = shell.user();
    let cwd = shell.cwd();
    let target = path.unwrap_or(&cwd);
    let resolved = PathResolver::new(&view, &user)
        .resolve(target, &cwd)
        .map_err(|err| not_found(format!("{command}: cannot access '{target}': {err}")))?;

    if !resolved.is_directory {
        return Ok(CommandOutcome::lines([render_leaf(
            resolved.kind,
            &resolved.name,
        )]));
    }

    let listing = render_listing(resolved.entries(), &options);
    shell.set_last_listing(listing.games);
    Ok(CommandOutcome::lines(listing.lines))
}
