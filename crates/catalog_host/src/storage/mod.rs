//! Persisted session value storage.

pub mod prefs;
