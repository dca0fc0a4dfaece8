//! Preference storage backed by a single JSON map file.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use catalog_host::{PrefsStore, StoreError};

type PrefMap = BTreeMap<String, String>;

fn load_pref_map(path: &Path) -> Result<PrefMap, StoreError> {
    if !path.exists() {
        return Ok(PrefMap::new());
    }
    let raw = fs::read_to_string(path)
        .map_err(|err| StoreError::Backend(format!("failed to read {}: {err}", path.display())))?;
    if raw.trim().is_empty() {
        return Ok(PrefMap::new());
    }
    serde_json::from_str(&raw).map_err(|err| {
        StoreError::Backend(format!("failed to parse prefs map {}: {err}", path.display()))
    })
}

fn save_pref_map(path: &Path, map: &PrefMap) -> Result<(), StoreError> {
    let serialized = serde_json::to_string_pretty(map)
        .map_err(|err| StoreError::Backend(format!("failed to serialize prefs map: {err}")))?;
    fs::write(path, serialized)
        .map_err(|err| StoreError::Backend(format!("failed to write {}: {err}", path.display())))
}

fn validate_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty() {
        Err(StoreError::Backend("Preference key must not be empty".to_string()))
    } else {
        Ok(())
    }
}

/// [`PrefsStore`] that rewrites one JSON map file on every change.
#[derive(Debug, Clone)]
pub struct FilePrefsStore {
    file: PathBuf,
}

impl FilePrefsStore {
    /// Uses `file`, creating its parent directory.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the directory cannot be created.
    pub fn open(file: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let file = file.into();
        if let Some(parent) = file.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| {
                StoreError::Backend(format!(
                    "failed to create prefs dir {}: {err}",
                    parent.display()
                ))
            })?;
        }
        Ok(Self { file })
    }
}

impl PrefsStore for FilePrefsStore {
    fn load_pref(&self, key: &str) -> Result<Option<String>, StoreError> {
        validate_key(key)?;
        let map = load_pref_map(&self.file)?;
        Ok(map.get(key).cloned())
    }

    fn save_pref(&self, key: &str, raw_json: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        let mut map = load_pref_map(&self.file)?;
        map.insert(key.to_string(), raw_json.to_string());
        save_pref_map(&self.file, &map)
    }

    fn delete_pref(&self, key: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        let mut map = load_pref_map(&self.file)?;
        if map.remove(key).is_some() {
            save_pref_map(&self.file, &map)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        process,
        time::{SystemTime, UNIX_EPOCH},
    };

    use pretty_assertions::assert_eq;

    use super::*;

    fn temp_file_path() -> PathBuf {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir()
            .join(format!("arcade_prefs_{}_{}", process::id(), now))
            .join("prefs.json")
    }

    #[test]
    fn store_round_trips_and_deletes() {
        let path = temp_file_path();
        let store = FilePrefsStore::open(&path).expect("open store");
        assert_eq!(store.load_pref("theme").expect("load"), None);

        store.save_pref("theme", "\"matrix\"").expect("save");
        let reopened = FilePrefsStore::open(&path).expect("reopen");
        assert_eq!(
            reopened.load_pref("theme").expect("load"),
            Some("\"matrix\"".to_string())
        );

        reopened.delete_pref("theme").expect("delete");
        assert_eq!(store.load_pref("theme").expect("load"), None);

        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir_all(parent);
        }
    }

    #[test]
    fn empty_key_is_rejected() {
        let store = FilePrefsStore::open(temp_file_path()).expect("open store");
        assert!(store.save_pref("", "1").is_err());
    }

    #[test]
    fn corrupt_file_reports_backend_error() {
        let path = temp_file_path();
        let store = FilePrefsStore::open(&path).expect("open store");
        fs::write(&path, "{not json").expect("write corrupt");
        assert!(matches!(
            store.load_pref("theme"),
            Err(StoreError::Backend(_))
        ));
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir_all(parent);
        }
    }
}
