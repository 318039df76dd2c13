//! Session state: a small key-value store holding the logged-in user.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use anyhow::{anyhow, Context, Result};
use shared::domain::User;
use tracing::warn;

/// Key under which the JSON encoded [`User`] is stored.
pub const USER_KEY: &str = "user";
/// Key under which the API bearer token is stored.
pub const JWT_KEY: &str = "jwt";

pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

#[derive(Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.read().ok()?.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .write()
            .map_err(|_| anyhow!("memory storage lock poisoned"))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items
            .write()
            .map_err(|_| anyhow!("memory storage lock poisoned"))?
            .remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.items
            .write()
            .map_err(|_| anyhow!("memory storage lock poisoned"))?
            .clear();
        Ok(())
    }
}

/// Storage persisted as a flat JSON object on disk, rewritten on every change.
pub struct FileStorage {
    path: PathBuf,
    items: RwLock<BTreeMap<String, String>>,
}

impl FileStorage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let items = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("invalid session file '{}'", path.display()))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read session file '{}'", path.display()))
            }
        };

        Ok(Self {
            path,
            items: RwLock::new(items),
        })
    }

    fn persist(&self, items: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create session directory '{}'", parent.display())
            })?;
        }
        let raw = serde_json::to_string_pretty(items)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("failed to write session file '{}'", self.path.display()))
    }

    fn mutate(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let mut guard = self
            .items
            .write()
            .map_err(|_| anyhow!("file storage lock poisoned"))?;
        apply(&mut guard);
        self.persist(&guard)
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.read().ok()?.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.mutate(|items| {
            items.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.mutate(|items| {
            items.remove(key);
        })
    }

    fn clear(&self) -> Result<()> {
        self.mutate(BTreeMap::clear)
    }
}

/// Read access to the logged-in user.
pub trait SessionReader: Send + Sync {
    fn current_user(&self) -> Option<User>;

    fn email(&self) -> Option<String> {
        self.current_user().and_then(|user| user.email)
    }
}

/// Reads the user record from a [`KeyValueStorage`] on every call.
#[derive(Clone)]
pub struct StorageSession {
    storage: Arc<dyn KeyValueStorage>,
}

impl StorageSession {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }
}

impl SessionReader for StorageSession {
    fn current_user(&self) -> Option<User> {
        let raw = self.storage.get_item(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!(error = %err, "session: ignoring malformed user record");
                None
            }
        }
    }
}

pub fn save_user(storage: &dyn KeyValueStorage, user: &User) -> Result<()> {
    let raw = serde_json::to_string(user)?;
    storage.set_item(USER_KEY, &raw)
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use shared::domain::UserType;

    use super::*;

    #[test]
    fn reads_user_saved_in_memory_storage() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        save_user(storage.as_ref(), &User::employee("employee@test.com")).expect("save");

        let session = StorageSession::new(storage);
        let user = session.current_user().expect("user");
        assert_eq!(user.user_type, UserType::Employee);
        assert_eq!(session.email().as_deref(), Some("employee@test.com"));
    }

    #[test]
    fn malformed_user_record_reads_as_no_session() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
        storage.set_item(USER_KEY, "{not json").expect("set");

        assert!(StorageSession::new(storage).current_user().is_none());
    }

    #[test]
    fn file_storage_survives_reopen() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let root = std::env::temp_dir().join(format!("billed_session_test_{suffix}"));
        let path = root.join("nested").join("session.json");

        let storage = FileStorage::open(&path).expect("open");
        save_user(&storage, &User::employee("a@a")).expect("save");
        storage.set_item(JWT_KEY, "token").expect("jwt");
        drop(storage);

        let reopened = FileStorage::open(&path).expect("reopen");
        assert_eq!(reopened.get_item(JWT_KEY).as_deref(), Some("token"));
        reopened.remove_item(JWT_KEY).expect("remove");
        assert!(reopened.get_item(JWT_KEY).is_none());
        assert!(reopened.get_item(USER_KEY).is_some());

        fs::remove_dir_all(root).expect("cleanup");
    }
}
