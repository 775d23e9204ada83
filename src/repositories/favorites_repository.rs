// src/repositories/favorites_repository.rs
//
// Favorites repository
//
// CRITICAL RULES:
// - Favorite membership is the presence of a row, nothing else
// - Rows are inserted and deleted, never updated
// - Explicit SQL only

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, OptionalExtension, Row};

use crate::db::ConnectionPool;
use crate::domain::{EntityKind, FavoriteInfo, FavoritesSort};
use crate::error::AppResult;
use crate::repositories::observation::{ChangeNotifier, Observation};

pub trait FavoritesRepository: Send + Sync {
    fn get(&self, entity_id: i64, kind: EntityKind) -> AppResult<Option<FavoriteInfo>>;
    fn is_favorite(&self, entity_id: i64, kind: EntityKind) -> AppResult<bool>;
    fn list(&self, kind: EntityKind, sort: FavoritesSort) -> AppResult<Vec<FavoriteInfo>>;
    fn observe(&self, kind: EntityKind, sort: FavoritesSort) -> Observation<Vec<FavoriteInfo>>;
    /// Inserting an existing favorite keeps the original row.
    fn insert(&self, favorite: &FavoriteInfo) -> AppResult<()>;
    fn delete(&self, entity_id: i64, kind: EntityKind) -> AppResult<bool>;
    fn delete_list(&self, favorites: &[FavoriteInfo]) -> AppResult<usize>;

    /// Flips membership; returns whether the entity is now a favorite.
    fn toggle(&self, favorite: &FavoriteInfo) -> AppResult<bool> {
        if self.delete(favorite.entity_id, favorite.entity_type)? {
            Ok(false)
        } else {
            self.insert(favorite)?;
            Ok(true)
        }
    }
}

pub struct SqliteFavoritesRepository {
    pool: Arc<ConnectionPool>,
    notifier: ChangeNotifier,
}

impl SqliteFavoritesRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self {
            pool,
            notifier: ChangeNotifier::new(),
        }
    }

    fn row_to_favorite(row: &Row) -> Result<FavoriteInfo, rusqlite::Error> {
        let entity_type: String = row.get("entity_type")?;
        let date_added: String = row.get("date_added")?;

        Ok(FavoriteInfo {
            entity_id: row.get("entity_id")?,
            entity_type: entity_type.parse::<EntityKind>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?,
            name: row.get("name")?,
            image_url: row.get("image_url")?,
            date_added: DateTime::parse_from_rfc3339(&date_added)
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        0,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?
                .with_timezone(&Utc),
        })
    }

    fn list_favorites(
        pool: &ConnectionPool,
        kind: EntityKind,
        sort: FavoritesSort,
    ) -> AppResult<Vec<FavoriteInfo>> {
        let conn = pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT entity_id, entity_type, name, image_url, date_added
             FROM favorites
             WHERE entity_type = ?1
             ORDER BY {}",
            sort.order_by()
        ))?;

        let favorites = stmt
            .query_map(params![kind.list_path()], Self::row_to_favorite)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(favorites)
    }
}

impl FavoritesRepository for SqliteFavoritesRepository {
    fn get(&self, entity_id: i64, kind: EntityKind) -> AppResult<Option<FavoriteInfo>> {
        let conn = self.pool.get()?;
        let favorite = conn
            .query_row(
                "SELECT entity_id, entity_type, name, image_url, date_added
                 FROM favorites
                 WHERE entity_id = ?1 AND entity_type = ?2",
                params![entity_id, kind.list_path()],
                Self::row_to_favorite,
            )
            .optional()?;
        Ok(favorite)
    }

    fn is_favorite(&self, entity_id: i64, kind: EntityKind) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM favorites WHERE entity_id = ?1 AND entity_type = ?2)",
            params![entity_id, kind.list_path()],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn list(&self, kind: EntityKind, sort: FavoritesSort) -> AppResult<Vec<FavoriteInfo>> {
        Self::list_favorites(&self.pool, kind, sort)
    }

    fn observe(&self, kind: EntityKind, sort: FavoritesSort) -> Observation<Vec<FavoriteInfo>> {
        let pool = Arc::clone(&self.pool);
        Observation::new(&self.notifier, move || Self::list_favorites(&pool, kind, sort))
    }

    fn insert(&self, favorite: &FavoriteInfo) -> AppResult<()> {
        let conn = self.pool.get()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO favorites (entity_id, entity_type, name, image_url, date_added)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                favorite.entity_id,
                favorite.entity_type.list_path(),
                favorite.name,
                favorite.image_url,
                favorite
                    .date_added
                    .to_rfc3339_opts(SecondsFormat::Micros, true),
            ],
        )?;

        if inserted > 0 {
            log::info!(
                "Added favorite {} {}",
                favorite.entity_type.resource_name(),
                favorite.entity_id
            );
            self.notifier.notify();
        }
        Ok(())
    }

    fn delete(&self, entity_id: i64, kind: EntityKind) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let deleted = conn.execute(
            "DELETE FROM favorites WHERE entity_id = ?1 AND entity_type = ?2",
            params![entity_id, kind.list_path()],
        )?;

        if deleted > 0 {
            log::info!("Removed favorite {} {}", kind.resource_name(), entity_id);
            self.notifier.notify();
        }
        Ok(deleted > 0)
    }

    fn delete_list(&self, favorites: &[FavoriteInfo]) -> AppResult<usize> {
        if favorites.is_empty() {
            return Ok(0);
        }

        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;
        let mut deleted = 0;
        {
            let mut stmt =
                tx.prepare("DELETE FROM favorites WHERE entity_id = ?1 AND entity_type = ?2")?;
            for favorite in favorites {
                deleted += stmt.execute(params![
                    favorite.entity_id,
                    favorite.entity_type.list_path()
                ])?;
            }
        }
        tx.commit()?;

        if deleted > 0 {
            self.notifier.notify();
        }
        Ok(deleted)
    }
}
