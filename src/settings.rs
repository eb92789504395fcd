//! # Settings Storage
//!
//! The verifier persists exactly one value, the fingerprint of the last
//! accepted certificate, and reads one flag, the server mode switch. Both go
//! through the narrow [`SettingsStore`] capability so the embedding
//! application decides where they live.
//!
//! Two stores are provided:
//! - [`MemorySettings`]: process-local, nothing survives a restart
//! - [`SqliteSettings`]: a `properties (key, value)` table in a SQLite file

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, RwLock};

use rusqlite::{Connection, OptionalExtension};

use crate::common::{TrustError, TrustResult};

const SQL_CREATE_PROPERTIES: &str = "\
CREATE TABLE IF NOT EXISTS properties (\
key TEXT PRIMARY KEY NOT NULL, \
value TEXT NOT NULL)";

const SQL_QUERY_PROPERTY: &str = "SELECT value FROM properties WHERE key = ?1 LIMIT 1";

const SQL_UPSERT_PROPERTY: &str = "INSERT OR REPLACE INTO properties (key, value) VALUES (?1, ?2)";

const SQL_QUERY_ALL: &str = "SELECT key, value FROM properties ORDER BY key";

/// Key-value configuration storage.
pub trait SettingsStore: Send + Sync {
    fn get_string(&self, key: &str) -> TrustResult<Option<String>>;

    fn set_string(&self, key: &str, value: &str) -> TrustResult<()>;

    /// Reads a boolean flag; only a case-insensitive `true` counts as set.
    fn get_bool(&self, key: &str) -> TrustResult<bool> {
        Ok(self
            .get_string(key)?
            .is_some_and(|value| value.trim().eq_ignore_ascii_case("true")))
    }
}

/// In-memory settings, shared between threads.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given pairs.
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: RwLock::new(
                values
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl SettingsStore for MemorySettings {
    fn get_string(&self, key: &str) -> TrustResult<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|e| TrustError::Settings(format!("{:?}", e)))?;
        Ok(values.get(key).cloned())
    }

    fn set_string(&self, key: &str, value: &str) -> TrustResult<()> {
        let mut values = self
            .values
            .write()
            .map_err(|e| TrustError::Settings(format!("{:?}", e)))?;
        values.insert(key.into(), value.into());
        Ok(())
    }
}

/// Settings persisted in a SQLite database.
///
/// Values live in a single `properties` table keyed by setting name; writing
/// an existing key replaces its value.
#[derive(Debug)]
pub struct SqliteSettings {
    connection: Mutex<Connection>,
}

impl SqliteSettings {
    /// Opens (or creates) the settings database at `path`.
    ///
    /// # Errors
    ///
    /// Returns `TrustError::Settings` if the database cannot be opened or the
    /// `properties` table cannot be created.
    pub fn open<P: AsRef<Path>>(path: P) -> TrustResult<Self> {
        Self::initialize(Connection::open(path)?)
    }

    /// Opens a private database that disappears with the connection.
    pub fn open_in_memory() -> TrustResult<Self> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(connection: Connection) -> TrustResult<Self> {
        connection.execute(SQL_CREATE_PROPERTIES, [])?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn connection(&self) -> TrustResult<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|e| TrustError::Settings(format!("{:?}", e)))
    }

    /// Reads all key-value pairs, sorted by key.
    pub fn properties(&self) -> TrustResult<Vec<(String, String)>> {
        let connection = self.connection()?;
        let mut statement = connection.prepare(SQL_QUERY_ALL)?;
        let iterator = statement.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        iterator
            .collect::<Result<Vec<_>, _>>()
            .map_err(TrustError::from)
    }
}

impl SettingsStore for SqliteSettings {
    fn get_string(&self, key: &str) -> TrustResult<Option<String>> {
        let connection = self.connection()?;
        Ok(connection
            .query_row(SQL_QUERY_PROPERTY, [key], |row| row.get(0))
            .optional()?)
    }

    fn set_string(&self, key: &str, value: &str) -> TrustResult<()> {
        let connection = self.connection()?;
        connection.execute(SQL_UPSERT_PROPERTY, [key, value])?;
        Ok(())
    }
}
