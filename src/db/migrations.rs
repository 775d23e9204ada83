// src/db/migrations.rs
//
// Cache schema versioning and housekeeping.
//
// RULES:
// - Migrations are an ordered list; each runs once, in its own transaction
// - A database written by a newer build is refused, never downgraded
// - The cache holds nothing that cannot be refetched except favorites,
//   history and preferences, so migrations must preserve those tables

use rusqlite::{params, Connection};

use crate::error::{AppError, AppResult};

/// (version, SQL) in ascending order. Version 1 is the baseline schema.
const MIGRATIONS: &[(i32, &str)] = &[(1, include_str!("../../schema.sql"))];

fn latest_version() -> i32 {
    MIGRATIONS.last().map_or(0, |(version, _)| *version)
}

/// Brings the cache schema up to date. Safe to call on every start.
pub fn initialize_database(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
             version     INTEGER PRIMARY KEY,
             applied_at  TEXT NOT NULL
         );",
    )?;

    let current = schema_version(conn)?;
    let latest = latest_version();
    if current > latest {
        return Err(AppError::Other(format!(
            "Cache schema version {} is newer than supported {}",
            current, latest
        )));
    }

    for (version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql).map_err(|e| {
            AppError::Other(format!("Cache migration {} failed: {}", version, e))
        })?;
        tx.execute(
            "INSERT INTO schema_version (version, applied_at) VALUES (?1, datetime('now'))",
            params![version],
        )?;
        tx.commit()?;
        log::info!("Applied cache schema version {}", version);
    }

    Ok(())
}

/// Highest applied version; 0 for a fresh database.
fn schema_version(conn: &Connection) -> AppResult<i32> {
    let version: Option<i32> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(version.unwrap_or(0))
}

pub fn verify_database_integrity(conn: &Connection) -> AppResult<()> {
    let result: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
    if result != "ok" {
        return Err(AppError::Other(format!("Cache integrity check failed: {}", result)));
    }
    Ok(())
}

/// Size of the cache file and row counts of the tables users care about.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DatabaseStats {
    pub size_bytes: i64,
    pub page_count: i64,
    pub page_size: i64,
    pub cached_item_count: i64,
    pub favorite_count: i64,
    pub search_history_count: i64,
}

pub fn get_database_stats(conn: &Connection) -> AppResult<DatabaseStats> {
    let pragma = |name: &str| -> AppResult<i64> {
        Ok(conn.query_row(&format!("PRAGMA {}", name), [], |row| row.get(0))?)
    };
    let rows = |table: &str| -> AppResult<i64> {
        Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?)
    };

    let page_count = pragma("page_count")?;
    let page_size = pragma("page_size")?;

    Ok(DatabaseStats {
        size_bytes: page_count * page_size,
        page_count,
        page_size,
        cached_item_count: rows("paging_items")?,
        favorite_count: rows("favorites")?,
        search_history_count: rows("search_history")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::create_test_connection;

    fn cache_tables(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare(
                "SELECT name FROM sqlite_master
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
                 ORDER BY name",
            )
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap()
    }

    #[test]
    fn test_fresh_database_gets_every_table() {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();

        assert_eq!(schema_version(&conn).unwrap(), latest_version());
        assert_eq!(
            cache_tables(&conn),
            vec![
                "favorites",
                "paging_items",
                "preferences",
                "remote_keys",
                "schema_version",
                "search_history"
            ]
        );
    }

    #[test]
    fn test_rerun_keeps_data_and_version() {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();
        conn.execute(
            "INSERT INTO favorites (entity_id, entity_type, date_added)
             VALUES (1, 'character', '2024-01-01T00:00:00Z')",
            [],
        )
        .unwrap();

        initialize_database(&conn).unwrap();

        let applied: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(applied, MIGRATIONS.len() as i64);
        assert_eq!(get_database_stats(&conn).unwrap().favorite_count, 1);
    }

    #[test]
    fn test_newer_schema_is_refused() {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();
        conn.execute(
            "INSERT INTO schema_version (version, applied_at) VALUES (?1, datetime('now'))",
            params![latest_version() + 1],
        )
        .unwrap();

        assert!(initialize_database(&conn).is_err());
    }

    #[test]
    fn test_remote_keys_require_item() {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO remote_keys (paging_key, id, prev_offset, next_offset)
             VALUES ('issues', 1, NULL, 20)",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_stats_and_integrity_on_empty_cache() {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();
        verify_database_integrity(&conn).unwrap();

        let stats = get_database_stats(&conn).unwrap();
        assert!(stats.size_bytes > 0);
        assert_eq!(stats.cached_item_count, 0);
        assert_eq!(stats.search_history_count, 0);
    }
}
