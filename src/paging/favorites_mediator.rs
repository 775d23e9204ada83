// src/paging/favorites_mediator.rs
//
// Favorites-backed paging.
//
// ARCHITECTURE:
// - The page window is a slice of the locally stored favorite ids
// - Only those ids are fetched (id filter) and the fetched entities are
//   re-sorted in memory to match the favorites order
// - FavoritesWatcher keeps the window in step with the favorites table:
//   removals are purged from the cache, additions trigger a caller refresh
//
// CRITICAL RULES:
// - The API has no favorites endpoint; ordering is always local
// - Empty favorites: clear the window, no network call
// - The watcher lives as long as its owner and is aborted on drop

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::domain::{ComicEntity, EntityKind, FavoritesSort, PagingKey};
use crate::error::MediatorError;
use crate::paging::favorites_diff::FavoritesDiff;
use crate::paging::mediator::{ensure_ok, page_keys, LoadType, Mediator, MediatorResult, MediatorSuccess};
use crate::repositories::{
    CachedItem, EntityRepository, FavoritesRepository, PagingCacheRepository, PreferencesStore,
};

pub struct FavoritesMediator<T: ComicEntity> {
    repository: EntityRepository<T>,
    favorites: Arc<dyn FavoritesRepository>,
    preferences: Arc<dyn PreferencesStore>,
    cache: Arc<dyn PagingCacheRepository>,
    page_size: u32,
}

impl<T: ComicEntity> FavoritesMediator<T> {
    pub fn new(
        repository: EntityRepository<T>,
        favorites: Arc<dyn FavoritesRepository>,
        preferences: Arc<dyn PreferencesStore>,
        cache: Arc<dyn PagingCacheRepository>,
        page_size: u32,
    ) -> Self {
        Self {
            repository,
            favorites,
            preferences,
            cache,
            page_size: page_size.max(1),
        }
    }

    fn key(&self) -> PagingKey {
        PagingKey::favorites(T::KIND)
    }
}

/// Orders `entities` by their position in `ids`; entities not listed are dropped.
fn order_by_ids<T: ComicEntity>(entities: Vec<T>, ids: &[i64]) -> Vec<T> {
    let position: HashMap<i64, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    let mut ordered: Vec<(usize, T)> = entities
        .into_iter()
        .filter_map(|entity| position.get(&entity.id()).map(|pos| (*pos, entity)))
        .collect();
    ordered.sort_by_key(|(pos, _)| *pos);
    ordered.dedup_by_key(|(pos, _)| *pos);
    ordered.into_iter().map(|(_, entity)| entity).collect()
}

#[async_trait]
impl<T: ComicEntity> Mediator for FavoritesMediator<T> {
    fn paging_key(&self) -> PagingKey {
        self.key()
    }

    async fn load(&self, load_type: LoadType) -> MediatorResult {
        let key = self.key();
        // `offset` is a position in the favorites list, `first_index` the
        // offset index the page is stored under.
        let (offset, first_index) = match load_type {
            LoadType::Refresh => (0, 0),
            LoadType::Prepend => return Ok(MediatorSuccess::end_reached()),
            LoadType::Append => {
                if self.cache.last_remote_keys(key)?.and_then(|k| k.next_offset).is_none() {
                    return Ok(MediatorSuccess::end_reached());
                }
                // Purged favorites shift the list, so resume after what is
                // actually cached rather than at the stored next offset.
                let cached = self.cache.get_all(key)?;
                let next_index = cached.last().map_or(0, |item| item.offset_index + 1);
                (cached.len() as u32, next_index)
            }
        };

        // Recomputed on every load, so sort changes apply on the next page.
        let sort = self.preferences.favorites_sort(T::KIND)?;
        let favorites = self.favorites.list(T::KIND, sort)?;
        if favorites.is_empty() {
            log::debug!("{}: no favorites, clearing window", key);
            self.cache.clear(key)?;
            return Ok(MediatorSuccess::end_reached());
        }

        let limit = self.page_size;
        let window: Vec<i64> = favorites
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|f| f.entity_id)
            .collect();
        if window.is_empty() {
            return Ok(MediatorSuccess::end_reached());
        }

        let response = self.repository.get_items_by_ids(&window, None).await?;
        ensure_ok(&response)?;

        let end_reached = offset as usize + limit as usize >= favorites.len();
        let entities = order_by_ids(response.results, &window);

        let items = entities
            .iter()
            .enumerate()
            .map(|(i, entity)| CachedItem::from_entity(entity, first_index + i as u32))
            .collect::<Result<Vec<_>, _>>()?;
        let ids: Vec<i64> = items.iter().map(|item| item.id).collect();
        let keys = page_keys(&ids, offset, limit, end_reached);

        self.cache
            .save_page(key, &items, &keys, load_type == LoadType::Refresh)?;

        log::debug!(
            "{} {:?}: {} of {} favorites cached, end={}",
            key,
            load_type,
            items.len(),
            window.len(),
            end_reached
        );
        Ok(MediatorSuccess {
            end_of_pagination_reached: end_reached,
        })
    }
}

/// Background task mirroring favorites changes into the favorites window.
pub struct FavoritesWatcher {
    task: JoinHandle<()>,
}

impl FavoritesWatcher {
    /// Starts watching `kind`. The current favorites are the baseline;
    /// only later changes are reported.
    pub fn spawn<F, Fut>(
        kind: EntityKind,
        favorites: Arc<dyn FavoritesRepository>,
        cache: Arc<dyn PagingCacheRepository>,
        on_added: F,
    ) -> Self
    where
        F: Fn(Vec<i64>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let key = PagingKey::favorites(kind);
        let mut observation = favorites.observe(kind, FavoritesSort::default());
        let mut diff = FavoritesDiff::new();

        match observation.current() {
            Ok(snapshot) => {
                let ids: Vec<i64> = snapshot.iter().map(|f| f.entity_id).collect();
                diff.compare(&ids);
            }
            Err(e) => log::warn!("{}: could not read favorites baseline: {}", key, e),
        }

        let task = tokio::spawn(async move {
            while let Some(snapshot) = observation.changed().await {
                let snapshot = match snapshot {
                    Ok(snapshot) => snapshot,
                    Err(e) => {
                        log::warn!("{}: favorites read failed: {}", key, e);
                        continue;
                    }
                };

                let ids: Vec<i64> = snapshot.iter().map(|f| f.entity_id).collect();
                let result = diff.compare(&ids);

                if !result.removed.is_empty() {
                    match cache.delete_items(key, &result.removed) {
                        Ok(purged) => log::debug!("{}: purged {} unfavorited items", key, purged),
                        Err(e) => log::warn!("{}: purge failed: {}", key, e),
                    }
                }
                if !result.added.is_empty() {
                    log::debug!("{}: {} new favorites", key, result.added.len());
                    on_added(result.added).await;
                }
            }
        });

        Self { task }
    }

    pub fn stop(&self) {
        self.task.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for FavoritesWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}
