use rusqlite::{Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Small key/value store kept in a SQLite database.
/// Holds client-side state such as the recent-files list.
pub struct Storage {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl Storage {
    /// Open (or create) the store in the user's data directory:
    /// - Linux: ~/.local/share/drive-photos/drive_photos.db
    /// - macOS: ~/Library/Application Support/drive-photos/drive_photos.db
    /// - Windows: %APPDATA%\drive-photos\drive_photos.db
    pub fn open_default() -> Result<Self, StorageError> {
        let db_path = Self::get_db_path()?;
        Self::open(&db_path)
    }

    /// Open (or create) the store at `db_path`, creating parent directories
    pub fn open(db_path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        log::info!("Storage opened at {}", db_path.display());

        let storage = Storage {
            conn,
            db_path: Some(db_path.to_path_buf()),
        };
        storage.init_schema()?;
        Ok(storage)
    }

    /// Throwaway store, nothing touches the disk
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let storage = Storage {
            conn: Connection::open_in_memory()?,
            db_path: None,
        };
        storage.init_schema()?;
        Ok(storage)
    }

    fn get_db_path() -> Result<PathBuf, StorageError> {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or(StorageError::NoDataDir)?;

        path.push("drive-photos");
        path.push("drive_photos.db");
        Ok(path)
    }

    fn init_schema(&self) -> Result<(), StorageError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key     TEXT PRIMARY KEY,
                value   TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Path of the database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }

    /// Returns whether a value was removed
    pub fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let removed = self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(removed > 0)
    }

    /// Drop every stored value (sign-out)
    pub fn clear(&self) -> Result<(), StorageError> {
        self.conn.execute("DELETE FROM kv", [])?;
        Ok(())
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("db_path", &self.db_path)
            .finish()
    }
}
