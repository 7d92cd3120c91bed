use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

use super::error::AuthError;

const SESSION_FILE_VERSION: u32 = 1;
const SESSION_FILE_NAME: &str = "session.toml";

/// Well-known persisted keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum StorageKey {
    AuthToken,
    RefreshToken,
    TenantId,
    CompanyId,
    #[strum(serialize = "companyId")]
    LegacyCompanyId,
    #[strum(serialize = "company")]
    LegacyCompany,
}

impl StorageKey {
    /// Lookup order for the active company.
    pub const COMPANY_KEYS: [StorageKey; 3] = [
        StorageKey::CompanyId,
        StorageKey::LegacyCompanyId,
        StorageKey::LegacyCompany,
    ];

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Key/value storage for session state that outlives a single client.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, AuthError>;
    fn set(&self, key: &str, value: &str) -> Result<(), AuthError>;
    fn remove(&self, key: &str) -> Result<(), AuthError>;

    fn get_key(&self, key: StorageKey) -> Result<Option<String>, AuthError> {
        self.get(key.as_str())
    }

    fn set_key(&self, key: StorageKey, value: &str) -> Result<(), AuthError> {
        self.set(key.as_str(), value)
    }

    fn remove_key(&self, key: StorageKey) -> Result<(), AuthError> {
        self.remove(key.as_str())
    }
}

/// Configuration for file-backed session storage.
#[derive(Debug, Clone)]
pub struct SessionStoreConfig {
    pub base_dir: PathBuf,
}

impl SessionStoreConfig {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn default_dir() -> PathBuf {
        default_uruti_dir()
    }
}

/// File-backed session store using a single TOML file.
///
/// The file is re-read on every access so values written by another process
/// (for example `uruti company set`) are picked up by a running client.
/// Updates are serialized across clones of one store and land through a
/// temp-file rename, so readers never see a partially written file.
///
/// # Example
/// ```no_run
/// use uruti::auth::{FileSessionStore, SessionStore, StorageKey};
///
/// let store = FileSessionStore::new_default();
/// store.set_key(StorageKey::CompanyId, "company-42")?;
/// # Ok::<(), uruti::auth::AuthError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileSessionStore {
    pub fn new(config: SessionStoreConfig) -> Self {
        Self {
            path: config.base_dir.join(SESSION_FILE_NAME),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn new_default() -> Self {
        Self::new(SessionStoreConfig::new(default_uruti_dir()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, AuthError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new())
            }
            Err(err) => return Err(AuthError::Io(err.to_string())),
        };
        let file: SessionFile = toml::from_str(&raw)?;
        if file.version != SESSION_FILE_VERSION {
            return Err(AuthError::UnsupportedVersion(file.version));
        }
        Ok(file.entries)
    }

    fn write_entries(&self, entries: BTreeMap<String, String>) -> Result<(), AuthError> {
        let file = SessionFile {
            version: SESSION_FILE_VERSION,
            saved_at: Utc::now(),
            entries,
        };
        atomic_write(&self.path, toml::to_string(&file)?.as_bytes())
    }

    /// Read, change, and write back the entries while holding the write lock.
    fn update(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>) -> bool,
    ) -> Result<(), AuthError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut entries = self.read_entries()?;
        if !change(&mut entries) {
            return Ok(());
        }
        self.write_entries(entries)
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, AuthError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AuthError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), AuthError> {
        self.update(|entries| entries.remove(key).is_some())
    }
}

/// Write `data` to a sibling temp file (0600 on unix) and rename it over `path`.
fn atomic_write(path: &Path, data: &[u8]) -> Result<(), AuthError> {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file_name = path
        .file_name()
        .ok_or_else(|| AuthError::Io(format!("session path {} has no file name", path.display())))?;

    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let temp_name = format!(
        ".{}.tmp-{}-{nonce}-{}",
        file_name.to_string_lossy(),
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    );
    let temp_path = path.with_file_name(temp_name);

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let write_result = (|| -> std::io::Result<()> {
        let mut temp_file = options.open(&temp_path)?;
        temp_file.write_all(data)?;
        temp_file.sync_all()?;
        Ok(())
    })();
    if let Err(err) = write_result {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }

    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }
    Ok(())
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    version: u32,
    saved_at: DateTime<Utc>,
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// Process-local session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, AuthError> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AuthError> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AuthError> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(key);
        Ok(())
    }
}

fn default_uruti_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".uruti"))
        .unwrap_or_else(|| PathBuf::from(".uruti"))
}
