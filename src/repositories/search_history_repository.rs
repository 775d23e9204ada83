// src/repositories/search_history_repository.rs
//
// Search history repository
//
// A query is unique: submitting it again moves it to the top instead of
// adding a second row.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::SearchHistoryEntry;
use crate::error::AppResult;
use crate::repositories::observation::{ChangeNotifier, Observation};

pub trait SearchHistoryRepository: Send + Sync {
    /// Records `query`, returning the stored entry.
    fn insert(&self, query: &str) -> AppResult<SearchHistoryEntry>;
    /// Newest first.
    fn list(&self, limit: u32) -> AppResult<Vec<SearchHistoryEntry>>;
    fn observe(&self, limit: u32) -> Observation<Vec<SearchHistoryEntry>>;
    fn delete(&self, id: Uuid) -> AppResult<bool>;
    fn clear(&self) -> AppResult<usize>;
}

pub struct SqliteSearchHistoryRepository {
    pool: Arc<ConnectionPool>,
    notifier: ChangeNotifier,
}

impl SqliteSearchHistoryRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self {
            pool,
            notifier: ChangeNotifier::new(),
        }
    }

    fn row_to_entry(row: &Row) -> Result<SearchHistoryEntry, rusqlite::Error> {
        let id: String = row.get("id")?;
        let date_added: String = row.get("date_added")?;

        Ok(SearchHistoryEntry {
            id: Uuid::parse_str(&id).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
            })?,
            query: row.get("query")?,
            date_added: DateTime::parse_from_rfc3339(&date_added)
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        2,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?
                .with_timezone(&Utc),
        })
    }

    fn list_entries(pool: &ConnectionPool, limit: u32) -> AppResult<Vec<SearchHistoryEntry>> {
        let conn = pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, query, date_added FROM search_history
             ORDER BY date_added DESC
             LIMIT ?1",
        )?;

        let entries = stmt
            .query_map(params![limit], Self::row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }
}

impl SearchHistoryRepository for SqliteSearchHistoryRepository {
    fn insert(&self, query: &str) -> AppResult<SearchHistoryEntry> {
        let entry = SearchHistoryEntry::new(query)?;
        let conn = self.pool.get()?;

        // On a repeated query the original id survives; read it back.
        let stored = conn.query_row(
            "INSERT INTO search_history (id, query, date_added) VALUES (?1, ?2, ?3)
             ON CONFLICT(query) DO UPDATE SET date_added = excluded.date_added
             RETURNING id, query, date_added",
            params![
                entry.id.to_string(),
                entry.query,
                entry.date_added.to_rfc3339_opts(SecondsFormat::Micros, true),
            ],
            Self::row_to_entry,
        )?;

        log::debug!("Recorded search query '{}'", stored.query);
        self.notifier.notify();
        Ok(stored)
    }

    fn list(&self, limit: u32) -> AppResult<Vec<SearchHistoryEntry>> {
        Self::list_entries(&self.pool, limit)
    }

    fn observe(&self, limit: u32) -> Observation<Vec<SearchHistoryEntry>> {
        let pool = Arc::clone(&self.pool);
        Observation::new(&self.notifier, move || Self::list_entries(&pool, limit))
    }

    fn delete(&self, id: Uuid) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let deleted = conn.execute(
            "DELETE FROM search_history WHERE id = ?1",
            params![id.to_string()],
        )?;
        if deleted > 0 {
            self.notifier.notify();
        }
        Ok(deleted > 0)
    }

    fn clear(&self) -> AppResult<usize> {
        let conn = self.pool.get()?;
        let deleted = conn.execute("DELETE FROM search_history", [])?;
        self.notifier.notify();
        Ok(deleted)
    }
}
