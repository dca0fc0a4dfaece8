//! Typed host-domain contracts and in-memory adapters consumed by the arcade shell.
//!
//! This crate is the boundary for everything the shell treats as an external collaborator: the
//! game catalog provider, the key-value preference store, and the wall clock. Concrete hosts can
//! supply their own implementations; the in-memory adapters back tests and the demo terminal.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod catalog;
pub mod storage;
pub mod time;

pub use catalog::memory::{CatalogDocument, CollectionRecord, GameRecord, MemoryCatalog};
pub use catalog::model::{Collection, Game, GameId};
pub use catalog::{find_by_title, CatalogError, GameCatalog};
pub use storage::prefs::{
    load_pref_with, save_pref_with, MemoryPrefsStore, NoopPrefsStore, PrefsStore, StoreError,
};
pub use time::{format_unix_ms, unix_time_ms_now, Clock, FixedClock, SystemClock};
