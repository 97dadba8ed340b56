//! Key-value operations on the `kv_store` table.

use super::{Database, StorageResult, now_ms};
use crate::persistence::KeyValueStore;
use rusqlite::{OptionalExtension, params};

impl Database {
    /// Read the value stored under `key`.
    pub fn get_value(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        self.with_conn(|conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM kv_store WHERE key = ?1",
                    params![key],
                    |row| row.get::<_, Vec<u8>>(0),
                )
                .optional()?;
            Ok(value)
        })
    }

    /// Store `value` under `key`, replacing any prior value.
    pub fn put_value(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, now_ms()],
            )?;
            Ok(())
        })
    }

    /// Last write time of `key` in milliseconds.
    pub fn updated_at(&self, key: &str) -> StorageResult<Option<i64>> {
        self.with_conn(|conn| {
            let ts = conn
                .query_row(
                    "SELECT updated_at FROM kv_store WHERE key = ?1",
                    params![key],
                    |row| row.get::<_, i64>(0),
                )
                .optional()?;
            Ok(ts)
        })
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        self.get_value(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        self.put_value(key, value)
    }
}
