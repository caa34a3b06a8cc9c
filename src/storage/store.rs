//! JSON-file-backed user store.
//!
//! The whole mapping is held in memory and rewritten to disk after every
//! mutation. Storage failures are logged and swallowed so the bot keeps
//! serving from the in-memory state.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Timestamp format used in the backing file ("2025-01-31 14:02:59")
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date-only prefix of [`TIMESTAMP_FORMAT`]
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One user's profile and counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Telegram username, if the account has one
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    /// Set once on first /start, never changed afterwards
    pub join_date: String,
    /// Refreshed on every interaction
    pub last_active: String,
    /// Monotonically increasing download counter
    pub downloads: u64,
}

/// The persisted user-id → record mapping plus its backing file path.
///
/// Shared between the dispatcher and the web surface as a [`SharedStore`];
/// the mutex is what makes the read-modify-rewrite cycle atomic.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    users: BTreeMap<String, UserRecord>,
}

/// Store handle shared across tasks.
pub type SharedStore = Arc<Mutex<Store>>;

impl Store {
    /// Loads the store from `path`.
    ///
    /// A missing file or a parse failure yields an empty store; both
    /// conditions are logged and never surfaced to the caller.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let users = match fs_err::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(users) => users,
                Err(e) => {
                    log::error!("failed to parse user store {}: {}; starting empty", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("user store {} not found; starting empty", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                log::error!("failed to read user store: {}; starting empty", e);
                BTreeMap::new()
            }
        };

        Self { path, users }
    }

    /// Wraps the store for sharing between the dispatcher and the web server.
    pub fn into_shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    /// Serializes the whole mapping and overwrites the backing file.
    ///
    /// Failures are logged and swallowed; the in-memory state stays
    /// authoritative until the next successful write.
    pub fn save(&self) {
        let payload = match serde_json::to_string_pretty(&self.users) {
            Ok(payload) => payload,
            Err(e) => {
                log::error!("failed to serialize user store: {}", e);
                return;
            }
        };

        if let Err(e) = fs_err::write(&self.path, payload) {
            log::error!("failed to write user store: {}", e);
        }
    }

    /// Inserts or refreshes a user record, then saves.
    ///
    /// `join_date` is stamped on first sight and never touched again;
    /// `last_name` is only replaced by a non-empty value.
    pub fn upsert(&mut self, id: &str, username: Option<String>, first_name: &str, last_name: Option<String>) {
        let now = now_timestamp();
        match self.users.get_mut(id) {
            Some(record) => {
                record.last_active = now;
                record.username = username;
                record.first_name = first_name.to_string();
                if let Some(last) = last_name.filter(|s| !s.is_empty()) {
                    record.last_name = Some(last);
                }
            }
            None => {
                log::info!("registered new user {} ({})", first_name, id);
                self.users.insert(
                    id.to_string(),
                    UserRecord {
                        username,
                        first_name: first_name.to_string(),
                        last_name: last_name.filter(|s| !s.is_empty()),
                        join_date: now.clone(),
                        last_active: now,
                        downloads: 0,
                    },
                );
            }
        }

        self.save();
    }

    /// Refreshes `last_active` for a known user, then saves.
    /// No-op for unknown ids.
    pub fn touch(&mut self, id: &str) {
        if let Some(record) = self.users.get_mut(id) {
            record.last_active = now_timestamp();
            self.save();
        }
    }

    /// Bumps the download counter for a known user, then saves.
    /// No-op (no state change, no file write) for unknown ids.
    pub fn increment_download(&mut self, id: &str) {
        if let Some(record) = self.users.get_mut(id) {
            record.downloads += 1;
            self.save();
        }
    }

    pub fn get(&self, id: &str) -> Option<&UserRecord> {
        self.users.get(id)
    }

    /// Number of distinct users ever registered.
    pub fn total_users(&self) -> usize {
        self.users.len()
    }

    /// Users whose `last_active` date component is today (local clock).
    pub fn active_today(&self) -> usize {
        let today = today();
        self.users.values().filter(|r| r.last_active.starts_with(&today)).count()
    }

    /// Users whose `join_date` date component is today (local clock).
    pub fn new_users_today(&self) -> usize {
        let today = today();
        self.users.values().filter(|r| r.join_date.starts_with(&today)).count()
    }

    /// Sum of all download counters.
    pub fn total_downloads(&self) -> u64 {
        self.users.values().map(|r| r.downloads).sum()
    }

    /// Top `n` downloaders as (first name, count) pairs.
    ///
    /// Records with zero downloads are excluded; the sort is stable and
    /// descending by count.
    pub fn top_downloaders(&self, n: usize) -> Vec<(String, u64)> {
        let mut ranked: Vec<(String, u64)> = self
            .users
            .values()
            .filter(|r| r.downloads > 0)
            .map(|r| (r.first_name.clone(), r.downloads))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }

    /// Size of the backing file in bytes (0 when it does not exist yet).
    pub fn file_size_bytes(&self) -> u64 {
        fs_err::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Creates the parent directory of the store path when one is configured,
/// so first startup in a fresh data dir does not fail the initial save.
pub fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs_err::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

fn today() -> String {
    Local::now().format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> Store {
        Store::load(dir.path().join("users.json"))
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.total_users(), 0);
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.json");
        fs_err::write(&path, "{not json").unwrap();

        let store = Store::load(&path);
        assert_eq!(store.total_users(), 0);
    }

    #[test]
    fn join_date_is_immutable_across_upserts() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);

        store.upsert("42", None, "Ann", None);
        let first_join = store.get("42").unwrap().join_date.clone();

        store.upsert("42", Some("ann".to_string()), "Annie", Some("Lee".to_string()));
        let record = store.get("42").unwrap();

        assert_eq!(record.join_date, first_join);
        assert_eq!(record.first_name, "Annie");
        assert_eq!(record.username.as_deref(), Some("ann"));
        assert_eq!(record.last_name.as_deref(), Some("Lee"));
    }

    #[test]
    fn empty_last_name_does_not_clobber_existing() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);

        store.upsert("42", None, "Ann", Some("Lee".to_string()));
        store.upsert("42", None, "Ann", Some(String::new()));

        assert_eq!(store.get("42").unwrap().last_name.as_deref(), Some("Lee"));
    }

    #[test]
    fn increment_for_unknown_id_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.json");
        let mut store = Store::load(&path);

        store.upsert("42", None, "Ann", None);
        // Remove the file: a no-op increment must not recreate it.
        fs_err::remove_file(&path).unwrap();

        store.increment_download("99");

        assert!(!path.exists());
        assert_eq!(store.total_users(), 1);
    }

    #[test]
    fn download_counter_scenario() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);

        store.upsert("42", None, "Ann", None);
        assert_eq!(store.total_users(), 1);

        store.increment_download("42");
        store.increment_download("42");
        store.increment_download("42");
        assert_eq!(store.get("42").unwrap().downloads, 3);

        store.increment_download("99");
        assert_eq!(store.total_users(), 1);
        assert_eq!(store.total_downloads(), 3);
    }

    #[test]
    fn touch_refreshes_known_and_ignores_unknown() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);

        store.upsert("42", None, "Ann", None);
        store.touch("42");
        store.touch("99");

        assert!(store.get("42").unwrap().last_active.len() == 19);
        assert!(store.get("99").is_none());
    }

    #[test]
    fn save_and_reload_round_trips_identically() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.json");
        let mut store = Store::load(&path);

        store.upsert("42", Some("ann".to_string()), "Ann", Some("Lee".to_string()));
        store.upsert("7", None, "Bob", None);
        store.increment_download("42");

        let reloaded = Store::load(&path);
        assert_eq!(reloaded.get("42"), store.get("42"));
        assert_eq!(reloaded.get("7"), store.get("7"));
        assert_eq!(reloaded.total_users(), store.total_users());
    }

    #[test]
    fn active_today_counts_only_todays_dates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.json");

        // Hand-written file with one stale record and one fresh one.
        let stale = r#"{
            "1": {
                "username": null,
                "first_name": "Old",
                "last_name": null,
                "join_date": "2020-01-01 10:00:00",
                "last_active": "2020-01-01 10:00:00",
                "downloads": 2
            }
        }"#;
        fs_err::write(&path, stale).unwrap();

        let mut store = Store::load(&path);
        store.upsert("2", None, "Fresh", None);

        assert_eq!(store.total_users(), 2);
        assert_eq!(store.active_today(), 1);
        assert_eq!(store.new_users_today(), 1);
    }

    #[test]
    fn top_downloaders_excludes_zero_and_sorts_descending() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);

        for (id, name, downloads) in [("1", "Ann", 5u64), ("2", "Bob", 0), ("3", "Cy", 9), ("4", "Dee", 1)] {
            store.upsert(id, None, name, None);
            for _ in 0..downloads {
                store.increment_download(id);
            }
        }

        let top = store.top_downloaders(5);
        assert_eq!(
            top,
            vec![("Cy".to_string(), 9), ("Ann".to_string(), 5), ("Dee".to_string(), 1)]
        );

        let top_two = store.top_downloaders(2);
        assert_eq!(top_two.len(), 2);
        assert!(top_two[0].1 >= top_two[1].1);
    }

    #[test]
    fn single_nonzero_downloader_yields_one_entry() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);

        store.upsert("1", None, "Ann", None);
        store.upsert("2", None, "Bob", None);
        for _ in 0..5 {
            store.increment_download("1");
        }

        assert_eq!(store.top_downloaders(5), vec![("Ann".to_string(), 5)]);
    }

    #[test]
    fn file_size_reflects_backing_file() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        assert_eq!(store.file_size_bytes(), 0);

        store.upsert("42", None, "Ann", None);
        assert!(store.file_size_bytes() > 0);
    }
}
