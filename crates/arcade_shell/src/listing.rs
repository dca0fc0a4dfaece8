//! Directory listing: dense game numbering, head/tail windowing, and column layouts.

use catalog_host::GameId;
use serde::{Deserialize, Serialize};

use crate::{
    options::Window,
    text::pad_right,
    vfs::{DirectoryEntry, EntryKind},
};

const WIDE_COLUMNS: usize = 4;
const WIDE_CELL_WIDTH: usize = 27;
const EMPTY_DIRECTORY: &str = "(empty directory)";

/// One game visible in the most recent listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedGame {
    /// Index shown next to the title.
    pub index: usize,
    /// Title as displayed.
    pub title: String,
    /// Game the index stands for.
    pub game: GameId,
}

/// Line layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Layout {
    /// One entry per line.
    #[default]
    Single,
    /// Four fixed-width columns with game numbers.
    Wide,
    /// Four columns of bare names, sized to the longest name.
    SimpleColumns,
}

/// How to render a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListingOptions {
    /// Entries to show.
    pub window: Window,
    /// Line layout.
    pub layout: Layout,
}

/// Rendered listing plus the games it made addressable by index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Output lines.
    pub lines: Vec<String>,
    /// Visible games with their indices, in display order.
    pub games: Vec<ListedGame>,
}

/// Renders directory entries.
///
/// Games are numbered densely from 0 in directory order across the whole directory, so a tail
/// window shows the same numbers a full listing would.
pub fn render_listing(entries: &[DirectoryEntry], options: &ListingOptions) -> Listing {
    if entries.is_empty() {
        return Listing {
            lines: vec![EMPTY_DIRECTORY.to_string()],
            games: Vec::new(),
        };
    }

    let total = entries.len();
    let (start, end) = match options.window {
        Window::All => (0, total),
        Window::Head(count) => (0, count.min(total)),
        Window::Tail(count) => (total.saturating_sub(count), total),
    };

    let mut next_game = 0usize;
    let mut cells = Vec::with_capacity(end - start);
    let mut games = Vec::new();
    for (position, entry) in entries.iter().enumerate() {
        let game_index = match (entry.kind, entry.game) {
            (EntryKind::Game, Some(game)) => {
                let index = next_game;
                next_game += 1;
                Some((index, game))
            }
            _ => None,
        };
        if !(start..end).contains(&position) {
            continue;
        }
        if let Some((index, game)) = game_index {
            games.push(ListedGame {
                index,
                title: entry.name.clone(),
                game,
            });
        }
        cells.push(match (options.layout, game_index) {
            (Layout::SimpleColumns, _) => entry.name.clone(),
            (_, Some((index, _))) => format!("{index}- {}", entry.name),
            (_, None) => format!("{}{}", entry.kind.prefix(), entry.name),
        });
    }

    let mut lines = match options.layout {
        Layout::Single => cells,
        Layout::Wide => wide_columns(&cells),
        Layout::SimpleColumns => simple_columns(&cells),
    };

    let shown = end - start;
    if shown < total {
        lines.push(String::new());
        match options.window {
            Window::Head(count) => {
                lines.push(format!("Showing first {shown} of {total} items"));
                lines.push(format!("Use --tail={count} to see the last {count}"));
            }
            Window::Tail(count) => {
                lines.push(format!("Showing last {shown} of {total} items"));
                lines.push(format!("Use --head={count} to see the first {count}"));
            }
            Window::All => {}
        }
    }

    Listing { lines, games }
}

/// Single line for a non-directory target.
pub fn render_leaf(kind: EntryKind, name: &str) -> String {
    format!("{}{name}", kind.prefix())
}

/// Lays cells out in four columns, filling each column top to bottom before the next.
pub fn wide_columns(cells: &[String]) -> Vec<String> {
    column_rows(cells, WIDE_CELL_WIDTH)
}

/// Like [`wide_columns`] but sized to the longest cell plus two spaces.
pub fn simple_columns(cells: &[String]) -> Vec<String> {
    let width = cells
        .iter()
        .map(|cell| cell.chars().count())
        .max()
        .unwrap_or_default()
        + 2;
    column_rows(cells, width)
}

fn column_rows(cells: &[String], width: usize) -> Vec<String> {
    if cells.is_empty() {
        return Vec::new();
    }
    let per_column = cells.len().div_ceil(WIDE_COLUMNS);
    (0..per_column)
        .filter_map(|row| {
            let line = (0..WIDE_COLUMNS)
                .map(|column| {
                    cells
                        .get(row + column * per_column)
                        .map(|cell| pad_right(cell, width))
                        .unwrap_or_default()
                })
                .collect::<String>();
            let line = line.trim_end().to_string();
            (!line.is_empty()).then_some(line)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn game(index: usize, title: &str) -> DirectoryEntry {
        DirectoryEntry {
            name: title.to_string(),
            kind: EntryKind::Game,
            game: Some(GameId(index)),
            contents: None,
        }
    }

    fn dir(name: &str, kind: EntryKind) -> DirectoryEntry {
        DirectoryEntry {
            name: name.to_string(),
            kind,
            game: None,
            contents: None,
        }
    }

    fn games(count: usize) -> Vec<DirectoryEntry> {
        (0..count).map(|index| game(index + 10, &format!("G{index}"))).collect()
    }

    #[test]
    fn single_column_numbers_games_and_prefixes_namespaces() {
        let entries = vec![
            dir("All-Games", EntryKind::Directory),
            dir("Favorites", EntryKind::Favorite),
            game(4, "Echo"),
            dir("Odd", EntryKind::Unknown),
            game(0, "Alpha"),
        ];
        let listing = render_listing(&entries, &ListingOptions::default());
        assert_eq!(
            listing.lines,
            vec!["All-Games", "[FAV]  Favorites", "0- Echo", "[???]  Odd", "1- Alpha"]
        );
        assert_eq!(
            listing.games,
            vec![
                ListedGame {
                    index: 0,
                    title: "Echo".to_string(),
                    game: GameId(4)
                },
                ListedGame {
                    index: 1,
                    title: "Alpha".to_string(),
                    game: GameId(0)
                },
            ]
        );
    }

    #[test]
    fn head_window_shows_first_items_and_footer() {
        let options = ListingOptions {
            window: Window::Head(2),
            ..ListingOptions::default()
        };
        let listing = render_listing(&games(5), &options);
        assert_eq!(
            listing.lines,
            vec![
                "0- G0",
                "1- G1",
                "",
                "Showing first 2 of 5 items",
                "Use --tail=2 to see the last 2",
            ]
        );
        assert_eq!(listing.games.len(), 2);
    }

    #[test]
    fn tail_window_keeps_absolute_indices() {
        let options = ListingOptions {
            window: Window::Tail(2),
            ..ListingOptions::default()
        };
        let listing = render_listing(&games(5), &options);
        assert_eq!(
            listing.lines,
            vec![
                "3- G3",
                "4- G4",
                "",
                "Showing last 2 of 5 items",
                "Use --head=2 to see the first 2",
            ]
        );
        assert_eq!(
            listing.games.iter().map(|listed| listed.index).collect::<Vec<_>>(),
            vec![3, 4]
        );
    }

    #[test]
    fn oversized_window_shows_everything_without_footer() {
        for window in [Window::Head(5), Window::Tail(9)] {
            let options = ListingOptions {
                window,
                ..ListingOptions::default()
            };
            let listing = render_listing(&games(5), &options);
            assert_eq!(listing.lines.len(), 5, "window={window:?}");
        }
    }

    #[test]
    fn empty_directory_renders_placeholder() {
        let listing = render_listing(&[], &ListingOptions::default());
        assert_eq!(listing.lines, vec!["(empty directory)"]);
        assert!(listing.games.is_empty());
    }

    #[test]
    fn wide_layout_fills_columns_top_to_bottom() {
        let options = ListingOptions {
            layout: Layout::Wide,
            ..ListingOptions::default()
        };
        let listing = render_listing(&games(6), &options);
        assert_eq!(
            listing.lines,
            vec![
                format!("{}{}4- G4", pad_right("0- G0", 27), pad_right("2- G2", 27)),
                format!("{}{}5- G5", pad_right("1- G1", 27), pad_right("3- G3", 27)),
            ]
        );
    }

    #[test]
    fn simple_columns_use_longest_name() {
        let cells = ["a", "bbb", "cc", "d", "e"]
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        assert_eq!(simple_columns(&cells), vec!["a    cc   e", "bbb  d"]);
    }

    #[test]
    fn simple_columns_layout_omits_game_numbers() {
        let options = ListingOptions {
            layout: Layout::SimpleColumns,
            ..ListingOptions::default()
        };
        let listing = render_listing(&games(2), &options);
        assert_eq!(listing.lines, vec!["G0  G1"]);
    }

    #[test]
    fn leaves_render_with_prefix() {
        assert_eq!(render_leaf(EntryKind::Favorite, "Favorites"), "[FAV]  Favorites");
        assert_eq!(render_leaf(EntryKind::Game, "Alpha"), "Alpha");
    }
}
