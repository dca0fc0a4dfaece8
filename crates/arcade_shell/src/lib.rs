//! Line-oriented command shell over a read-only game catalog.
//!
//! A [`ShellSession`] owns the session state (cwd, active collection, last listing, history) and
//! a [`CommandRegistry`] of built-in commands. Each input line is tokenized, resolved by name or
//! alias, validated against the command's descriptor, and run to completion, yielding a uniform
//! [`CommandOutcome`](arcade_shell_contract::CommandOutcome).
//!
//! The catalog is presented as a virtual filesystem:
//!
//! ```text
//! /All-Games/<title>
//! /Favorites/<title>
//! /MostPlayed/<title>
//! /LastPlayed/<title>
//! /Collections/<short>/games/<title>
//! ```
//!
//! Games are addressed by title, by `@collection:index`, or by a bare index into the most recent
//! listing.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod commands;
pub mod config;
pub mod dispatch;
pub mod listing;
pub mod namespace;
pub mod options;
pub mod registry;
pub mod resolve;
pub mod scheduler;
pub mod session;
pub mod text;
pub mod vfs;

pub use commands::register_builtin_commands;
pub use config::ShellConfig;
pub use dispatch::{dispatch, CommandContext, ShellContext};
pub use listing::{render_listing, Layout, ListedGame, Listing, ListingOptions};
pub use namespace::{CatalogView, Namespace};
pub use registry::{command_handler, CommandHandler, CommandRegistry, RegistryError};
pub use resolve::{GameResolver, ResolveError};
pub use scheduler::{TaskHandle, TaskScheduler};
pub use session::{HistoryEntry, PendingState, SessionEvent, ShellSession};
pub use vfs::{display_path, normalize_path, DirectoryEntry, EntryKind, PathResolver, ResolvedPath};
