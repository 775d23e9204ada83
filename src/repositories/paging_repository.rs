// src/repositories/paging_repository.rs
//
// Local cache of paged entities and their remote keys.
//
// CRITICAL RULES:
// - A page's items and remote keys are written in ONE transaction
// - Remote keys never outlive their item (FK cascade)
// - Items are ordered by their global offset index, never by rowid

use std::sync::Arc;

use chrono::{NaiveDateTime, SecondsFormat, Utc};
use rusqlite::{params, params_from_iter, OptionalExtension, Row};

use crate::db::ConnectionPool;
use crate::domain::datetime::{parse_comic_vine_datetime, COMIC_VINE_DATETIME_FORMAT};
use crate::domain::{ComicEntity, PagingKey, RemoteKeys};
use crate::error::AppResult;
use crate::repositories::observation::{ChangeNotifier, Observation};

/// One cached row; the entity itself lives in `payload` as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedItem {
    pub id: i64,
    pub offset_index: u32,
    pub name: Option<String>,
    pub date_added: Option<NaiveDateTime>,
    pub payload: String,
}

impl CachedItem {
    pub fn from_entity<T: ComicEntity>(entity: &T, offset_index: u32) -> AppResult<Self> {
        Ok(Self {
            id: entity.id(),
            offset_index,
            name: entity.name().map(str::to_string),
            date_added: entity.date_added(),
            payload: serde_json::to_string(entity)?,
        })
    }

    pub fn decode<T: ComicEntity>(&self) -> AppResult<T> {
        Ok(serde_json::from_str(&self.payload)?)
    }
}

pub trait PagingCacheRepository: Send + Sync {
    /// Persist a page and its keys atomically; `clear_first` wipes the
    /// window inside the same transaction (refresh).
    fn save_page(
        &self,
        key: PagingKey,
        items: &[CachedItem],
        keys: &[RemoteKeys],
        clear_first: bool,
    ) -> AppResult<()>;
    fn clear(&self, key: PagingKey) -> AppResult<()>;
    fn get_page(&self, key: PagingKey, offset: u32, limit: u32) -> AppResult<Vec<CachedItem>>;
    fn get_all(&self, key: PagingKey) -> AppResult<Vec<CachedItem>>;
    fn get_item(&self, key: PagingKey, id: i64) -> AppResult<Option<CachedItem>>;
    fn count(&self, key: PagingKey) -> AppResult<u32>;
    fn remote_keys(&self, key: PagingKey, id: i64) -> AppResult<Option<RemoteKeys>>;
    /// Keys of the item with the highest offset index.
    fn last_remote_keys(&self, key: PagingKey) -> AppResult<Option<RemoteKeys>>;
    /// Evict items (and, by cascade, their keys). Returns rows removed.
    fn delete_items(&self, key: PagingKey, ids: &[i64]) -> AppResult<usize>;
    fn observe(&self, key: PagingKey) -> Observation<Vec<CachedItem>>;
}

/// Typed read of a cached window page.
pub fn get_entities<T: ComicEntity>(
    cache: &dyn PagingCacheRepository,
    key: PagingKey,
    offset: u32,
    limit: u32,
) -> AppResult<Vec<T>> {
    cache
        .get_page(key, offset, limit)?
        .iter()
        .map(CachedItem::decode)
        .collect()
}

pub struct SqlitePagingRepository {
    pool: Arc<ConnectionPool>,
    notifier: ChangeNotifier,
}

const ITEM_COLUMNS: &str = "id, offset_index, name, date_added, payload";

impl SqlitePagingRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self {
            pool,
            notifier: ChangeNotifier::new(),
        }
    }

    fn row_to_item(row: &Row) -> Result<CachedItem, rusqlite::Error> {
        let date_added: Option<String> = row.get("date_added")?;
        Ok(CachedItem {
            id: row.get("id")?,
            offset_index: row.get("offset_index")?,
            name: row.get("name")?,
            date_added: date_added.as_deref().and_then(parse_comic_vine_datetime),
            payload: row.get("payload")?,
        })
    }

    fn row_to_keys(row: &Row) -> Result<RemoteKeys, rusqlite::Error> {
        Ok(RemoteKeys {
            id: row.get("id")?,
            prev_offset: row.get("prev_offset")?,
            next_offset: row.get("next_offset")?,
        })
    }

    fn all_items(pool: &ConnectionPool, key: PagingKey) -> AppResult<Vec<CachedItem>> {
        let conn = pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM paging_items WHERE paging_key = ?1 ORDER BY offset_index",
            ITEM_COLUMNS
        ))?;
        let items = stmt
            .query_map(params![key.to_string()], Self::row_to_item)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

}

impl PagingCacheRepository for SqlitePagingRepository {
    fn save_page(
        &self,
        key: PagingKey,
        items: &[CachedItem],
        keys: &[RemoteKeys],
        clear_first: bool,
    ) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let paging_key = key.to_string();
        let cached_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

        let tx = conn.transaction()?;
        if clear_first {
            tx.execute("DELETE FROM paging_items WHERE paging_key = ?1", params![paging_key])?;
        }
        {
            // Items first: REPLACE deletes the old row, which cascades to
            // its keys, so keys must be written after.
            let mut insert_item = tx.prepare(
                "INSERT OR REPLACE INTO paging_items
                    (paging_key, id, offset_index, name, date_added, payload, cached_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for item in items {
                insert_item.execute(params![
                    paging_key,
                    item.id,
                    item.offset_index,
                    item.name,
                    item.date_added
                        .map(|d| d.format(COMIC_VINE_DATETIME_FORMAT).to_string()),
                    item.payload,
                    cached_at,
                ])?;
            }

            let mut insert_keys = tx.prepare(
                "INSERT OR REPLACE INTO remote_keys (paging_key, id, prev_offset, next_offset)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for k in keys {
                insert_keys.execute(params![paging_key, k.id, k.prev_offset, k.next_offset])?;
            }
        }
        tx.commit()?;

        log::debug!(
            "Cached {} items for {} (clear_first={})",
            items.len(),
            paging_key,
            clear_first
        );
        self.notifier.notify();
        Ok(())
    }

    fn clear(&self, key: PagingKey) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "DELETE FROM paging_items WHERE paging_key = ?1",
            params![key.to_string()],
        )?;
        self.notifier.notify();
        Ok(())
    }

    fn get_page(&self, key: PagingKey, offset: u32, limit: u32) -> AppResult<Vec<CachedItem>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM paging_items
             WHERE paging_key = ?1
             ORDER BY offset_index
             LIMIT ?2 OFFSET ?3",
            ITEM_COLUMNS
        ))?;
        let items = stmt
            .query_map(params![key.to_string(), limit, offset], Self::row_to_item)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    fn get_all(&self, key: PagingKey) -> AppResult<Vec<CachedItem>> {
        Self::all_items(&self.pool, key)
    }

    fn get_item(&self, key: PagingKey, id: i64) -> AppResult<Option<CachedItem>> {
        let conn = self.pool.get()?;
        let item = conn
            .query_row(
                &format!(
                    "SELECT {} FROM paging_items WHERE paging_key = ?1 AND id = ?2",
                    ITEM_COLUMNS
                ),
                params![key.to_string(), id],
                Self::row_to_item,
            )
            .optional()?;
        Ok(item)
    }

    fn count(&self, key: PagingKey) -> AppResult<u32> {
        let conn = self.pool.get()?;
        let count: u32 = conn.query_row(
            "SELECT COUNT(*) FROM paging_items WHERE paging_key = ?1",
            params![key.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn remote_keys(&self, key: PagingKey, id: i64) -> AppResult<Option<RemoteKeys>> {
        let conn = self.pool.get()?;
        let keys = conn
            .query_row(
                "SELECT id, prev_offset, next_offset FROM remote_keys
                 WHERE paging_key = ?1 AND id = ?2",
                params![key.to_string(), id],
                Self::row_to_keys,
            )
            .optional()?;
        Ok(keys)
    }

    fn last_remote_keys(&self, key: PagingKey) -> AppResult<Option<RemoteKeys>> {
        let conn = self.pool.get()?;
        let keys = conn
            .query_row(
                "SELECT k.id, k.prev_offset, k.next_offset
                 FROM remote_keys k
                 JOIN paging_items i ON i.paging_key = k.paging_key AND i.id = k.id
                 WHERE k.paging_key = ?1
                 ORDER BY i.offset_index DESC
                 LIMIT 1",
                params![key.to_string()],
                Self::row_to_keys,
            )
            .optional()?;
        Ok(keys)
    }

    fn delete_items(&self, key: PagingKey, ids: &[i64]) -> AppResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let conn = self.pool.get()?;
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "DELETE FROM paging_items WHERE paging_key = ? AND id IN ({})",
            placeholders
        );

        let paging_key = key.to_string();
        let mut values: Vec<&dyn rusqlite::ToSql> = vec![&paging_key];
        values.extend(ids.iter().map(|id| id as &dyn rusqlite::ToSql));

        let removed = conn.execute(&sql, params_from_iter(values))?;
        log::debug!("Evicted {} items from {}", removed, paging_key);
        self.notifier.notify();
        Ok(removed)
    }

    fn observe(&self, key: PagingKey) -> Observation<Vec<CachedItem>> {
        let pool = Arc::clone(&self.pool);
        Observation::new(&self.notifier, move || Self::all_items(&pool, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_memory_pool, initialize_database};
    use crate::domain::{CharacterInfo, EntityKind};

    fn repository() -> SqlitePagingRepository {
        let pool = create_memory_pool().unwrap();
        initialize_database(&pool.get().unwrap()).unwrap();
        SqlitePagingRepository::new(Arc::new(pool))
    }

    fn character(id: i64, name: &str) -> CharacterInfo {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "date_added": "2010-01-01 00:00:00",
        }))
        .unwrap()
    }

    fn page(offset: u32, ids: &[i64]) -> (Vec<CachedItem>, Vec<RemoteKeys>) {
        let items: Vec<CachedItem> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                CachedItem::from_entity(&character(*id, &format!("c{}", id)), offset + i as u32)
                    .unwrap()
            })
            .collect();
        let keys = ids
            .iter()
            .map(|id| RemoteKeys {
                id: *id,
                prev_offset: offset.checked_sub(ids.len() as u32),
                next_offset: Some(offset + ids.len() as u32),
            })
            .collect();
        (items, keys)
    }

    const KEY: PagingKey = PagingKey {
        kind: EntityKind::Character,
        flavour: crate::domain::PagingFlavour::Browse,
    };

    #[test]
    fn test_saved_entities_read_back_unchanged() {
        let repo = repository();
        let original = vec![character(1, "Batman"), character(2, "Robin")];
        let items: Vec<CachedItem> = original
            .iter()
            .enumerate()
            .map(|(i, c)| CachedItem::from_entity(c, i as u32).unwrap())
            .collect();

        repo.save_page(KEY, &items, &[], true).unwrap();

        let read: Vec<CharacterInfo> = get_entities(&repo, KEY, 0, 10).unwrap();
        assert_eq!(read, original);
    }

    #[test]
    fn test_pages_ordered_by_offset_index() {
        let repo = repository();
        let (items, keys) = page(2, &[30, 10]);
        repo.save_page(KEY, &items, &keys, false).unwrap();
        let (items, keys) = page(0, &[50, 40]);
        repo.save_page(KEY, &items, &keys, false).unwrap();

        let ids: Vec<i64> = repo.get_all(KEY).unwrap().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![50, 40, 30, 10]);

        let second: Vec<i64> = repo.get_page(KEY, 2, 2).unwrap().iter().map(|i| i.id).collect();
        assert_eq!(second, vec![30, 10]);
    }

    #[test]
    fn test_refresh_clears_window_only() {
        let repo = repository();
        let other = PagingKey::recent(EntityKind::Character);

        let (items, keys) = page(0, &[1, 2]);
        repo.save_page(KEY, &items, &keys, false).unwrap();
        repo.save_page(other, &items, &keys, false).unwrap();

        let (items, keys) = page(0, &[3]);
        repo.save_page(KEY, &items, &keys, true).unwrap();

        assert_eq!(repo.count(KEY).unwrap(), 1);
        assert_eq!(repo.count(other).unwrap(), 2);
        assert!(repo.remote_keys(KEY, 1).unwrap().is_none());
    }

    #[test]
    fn test_last_remote_keys_follow_offset_order() {
        let repo = repository();
        let (items, keys) = page(0, &[1, 2]);
        repo.save_page(KEY, &items, &keys, true).unwrap();
        let (items, keys) = page(2, &[3, 4]);
        repo.save_page(KEY, &items, &keys, false).unwrap();

        let last = repo.last_remote_keys(KEY).unwrap().unwrap();
        assert_eq!(last.id, 4);
        assert_eq!(last.next_offset, Some(4));
        assert_eq!(last.prev_offset, Some(0));
    }

    #[test]
    fn test_failed_save_leaves_window_untouched() {
        let repo = repository();
        let (items, keys) = page(0, &[1, 2]);
        repo.save_page(KEY, &items, &keys, true).unwrap();

        // Keys for an id with no item row break the FK after the clear and
        // the item insert have already run.
        let (items, mut keys) = page(0, &[3]);
        keys.push(RemoteKeys {
            id: 999,
            prev_offset: None,
            next_offset: Some(1),
        });
        assert!(repo.save_page(KEY, &items, &keys, true).is_err());

        let ids: Vec<i64> = repo.get_all(KEY).unwrap().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(repo.get_item(KEY, 3).unwrap().is_none());
        assert!(repo.remote_keys(KEY, 1).unwrap().is_some());
        assert_eq!(repo.last_remote_keys(KEY).unwrap().unwrap().next_offset, Some(2));
    }

    #[test]
    fn test_delete_items_drops_keys() {
        let repo = repository();
        let (items, keys) = page(0, &[1, 2, 3]);
        repo.save_page(KEY, &items, &keys, true).unwrap();

        let removed = repo.delete_items(KEY, &[1, 3, 99]).unwrap();
        assert_eq!(removed, 2);
        assert!(repo.remote_keys(KEY, 1).unwrap().is_none());
        assert!(repo.remote_keys(KEY, 2).unwrap().is_some());
        assert_eq!(repo.get_item(KEY, 2).unwrap().unwrap().name.as_deref(), Some("c2"));
        assert_eq!(repo.delete_items(KEY, &[]).unwrap(), 0);
    }

    #[test]
    fn test_replacing_item_rewrites_its_keys() {
        let repo = repository();
        let (items, keys) = page(0, &[1]);
        repo.save_page(KEY, &items, &keys, true).unwrap();
        let (items, keys) = page(5, &[1]);
        repo.save_page(KEY, &items, &keys, false).unwrap();

        let keys = repo.remote_keys(KEY, 1).unwrap().unwrap();
        assert_eq!(keys.next_offset, Some(6));
        assert_eq!(repo.get_item(KEY, 1).unwrap().unwrap().offset_index, 5);
    }

    #[tokio::test]
    async fn test_observe_sees_committed_page() {
        let repo = repository();
        let mut observation = repo.observe(KEY);
        assert!(observation.current().unwrap().is_empty());

        let (items, keys) = page(0, &[7, 8]);
        repo.save_page(KEY, &items, &keys, true).unwrap();

        let seen = observation.changed().await.unwrap().unwrap();
        assert_eq!(seen.len(), 2);
    }
}
