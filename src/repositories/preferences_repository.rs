// src/repositories/preferences_repository.rs
//
// Key-value preference store: API key plus per-kind sort/filter bundles,
// stored as serialized tagged-union JSON.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use rusqlite::{params, OptionalExtension};

use crate::db::ConnectionPool;
use crate::domain::{EntityKind, FavoritesSort, ListPreferences};
use crate::error::{ApiKeyError, AppResult};

const API_KEY: &str = "api_key";

fn list_preferences_key(kind: EntityKind) -> String {
    format!("list_preferences.{}", kind.list_path())
}

fn favorites_sort_key(kind: EntityKind) -> String {
    format!("favorites_sort.{}", kind.list_path())
}

pub trait PreferencesStore: Send + Sync {
    fn get_raw(&self, key: &str) -> AppResult<Option<String>>;
    fn set_raw(&self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&self, key: &str) -> AppResult<()>;

    fn list_preferences(&self, kind: EntityKind) -> AppResult<ListPreferences> {
        match self.get_raw(&list_preferences_key(kind))? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(ListPreferences::default()),
        }
    }

    /// Replaces the whole bundle after checking it applies to `kind`.
    fn set_list_preferences(&self, kind: EntityKind, preferences: &ListPreferences) -> AppResult<()> {
        preferences.validate_for(kind)?;
        let raw = serde_json::to_string(preferences)?;
        self.set_raw(&list_preferences_key(kind), &raw)
    }

    fn clear_list_preferences(&self, kind: EntityKind) -> AppResult<()> {
        self.remove(&list_preferences_key(kind))
    }

    fn favorites_sort(&self, kind: EntityKind) -> AppResult<FavoritesSort> {
        match self.get_raw(&favorites_sort_key(kind))? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(FavoritesSort::default()),
        }
    }

    fn set_favorites_sort(&self, kind: EntityKind, sort: FavoritesSort) -> AppResult<()> {
        let raw = serde_json::to_string(&sort)?;
        self.set_raw(&favorites_sort_key(kind), &raw)
    }
}

/// Source of the API key injected into every request.
#[cfg_attr(test, mockall::automock)]
pub trait ApiKeyStore: Send + Sync {
    fn api_key(&self) -> Result<Option<String>, ApiKeyError>;
    fn set_api_key(&self, key: &str) -> AppResult<()>;
    fn clear_api_key(&self) -> AppResult<()>;
}

pub struct SqlitePreferencesRepository {
    pool: Arc<ConnectionPool>,
}

impl SqlitePreferencesRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

impl PreferencesStore for SqlitePreferencesRepository {
    fn get_raw(&self, key: &str) -> AppResult<Option<String>> {
        let conn = self.pool.get()?;

        let value = conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(value)
    }

    fn set_raw(&self, key: &str, value: &str) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT OR REPLACE INTO preferences (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)],
        )?;

        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM preferences WHERE key = ?1", params![key])?;
        Ok(())
    }
}

impl ApiKeyStore for SqlitePreferencesRepository {
    fn api_key(&self) -> Result<Option<String>, ApiKeyError> {
        let key = self
            .get_raw(API_KEY)
            .map_err(|e| ApiKeyError::Io(e.to_string()))?;
        Ok(key.filter(|k| !k.trim().is_empty()))
    }

    fn set_api_key(&self, key: &str) -> AppResult<()> {
        self.set_raw(API_KEY, key.trim())
    }

    fn clear_api_key(&self) -> AppResult<()> {
        self.remove(API_KEY)
    }
}
