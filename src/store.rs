use crate::debug_log;
use crate::error::{Error, Result};
use crate::streak::UserStats;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub stats: UserStats,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    users: BTreeMap<Uuid, User>,
}

impl StoreData {
    fn find_by_username(&self, username: &str) -> Option<&User> {
        self.users.values().find(|u| u.username == username)
    }
}

/// User accounts and their stats, optionally backed by a JSON file.
///
/// All reads and writes go through one lock, so a read-modify-write in
/// `update_stats` cannot interleave with another for the same user.
pub struct UserStore {
    path: Option<PathBuf>,
    data: Mutex<StoreData>,
}

impl UserStore {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: Mutex::new(StoreData::default()),
        }
    }

    /// Open the store at `path`, starting empty if the file does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let data: StoreData = serde_json::from_str(&content)?;
            debug_log!("open() - loaded {} users from {}", data.users.len(), path.display());
            data
        } else {
            StoreData::default()
        };
        Ok(Self {
            path: Some(path),
            data: Mutex::new(data),
        })
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn persist(&self, data: &StoreData) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(data)?)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `Error::UsernameTaken` if the username exists already.
    pub fn insert(&self, user: User) -> Result<()> {
        let mut data = self.data.lock();
        if data.find_by_username(&user.username).is_some() {
            return Err(Error::UsernameTaken(user.username));
        }
        let id = user.id;
        data.users.insert(id, user);
        if let Err(e) = self.persist(&data) {
            data.users.remove(&id);
            return Err(e);
        }
        Ok(())
    }

    #[must_use]
    pub fn find_by_username(&self, username: &str) -> Option<User> {
        self.data.lock().find_by_username(username).cloned()
    }

    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<User> {
        self.data.lock().users.get(&id).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.lock().users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.lock().users.is_empty()
    }

    /// Replace a user's stats with `update(current)`, holding the lock throughout.
    ///
    /// Nothing is written when `update` fails.
    ///
    /// # Errors
    ///
    /// Returns `Error::UserNotFound` for an unknown id, or whatever `update` returns.
    pub fn update_stats<F>(&self, id: Uuid, update: F) -> Result<UserStats>
    where
        F: FnOnce(&UserStats) -> Result<UserStats>,
    {
        let mut data = self.data.lock();
        let user = data
            .users
            .get_mut(&id)
            .ok_or_else(|| Error::UserNotFound(id.to_string()))?;
        let previous = user.stats;
        let updated = update(&previous)?;
        user.stats = updated;
        if let Err(e) = self.persist(&data) {
            if let Some(user) = data.users.get_mut(&id) {
                user.stats = previous;
            }
            return Err(e);
        }
        Ok(updated)
    }
}
