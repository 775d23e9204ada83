// src/services/browse_service.rs
//
// Browse Service - wires repositories and mediators per entity kind.
//
// CRITICAL RULES:
// - One pager per (kind, flavour) window
// - Favorites are local; toggling never touches the network
// - Changing list preferences invalidates the browse window

use std::future::Future;
use std::sync::Arc;

use crate::domain::{
    ComicEntity, EntityDetails, EntityKind, FavoriteInfo, FavoritesSort, ListPreferences,
    PagingFlavour, PagingKey,
};
use crate::error::{AppResult, ComicVineResult, MediatorError};
use crate::integrations::comicvine::{ComicVineApi, ComicVineResponse, StatusCode};
use crate::paging::{
    EntityPageSource, FavoritesMediator, FavoritesWatcher, Mediator, Pager, RemoteMediator,
};
use crate::repositories::{
    ApiKeyStore, EntityRepository, FavoritesRepository, Observation, PagingCacheRepository,
    PreferencesStore,
};

#[derive(Debug, Clone, Copy)]
pub struct BrowseSettings {
    pub page_size: u32,
    pub recent_items_cap: u32,
}

pub struct BrowseService {
    api: Arc<dyn ComicVineApi>,
    keys: Arc<dyn ApiKeyStore>,
    preferences: Arc<dyn PreferencesStore>,
    favorites: Arc<dyn FavoritesRepository>,
    cache: Arc<dyn PagingCacheRepository>,
    settings: BrowseSettings,
}

impl BrowseService {
    pub fn new(
        api: Arc<dyn ComicVineApi>,
        keys: Arc<dyn ApiKeyStore>,
        preferences: Arc<dyn PreferencesStore>,
        favorites: Arc<dyn FavoritesRepository>,
        cache: Arc<dyn PagingCacheRepository>,
        settings: BrowseSettings,
    ) -> Self {
        Self {
            api,
            keys,
            preferences,
            favorites,
            cache,
            settings,
        }
    }

    fn repository<T: ComicEntity>(&self) -> EntityRepository<T> {
        EntityRepository::new(Arc::clone(&self.api), Arc::clone(&self.keys))
    }

    pub fn mediator<T: ComicEntity>(&self, flavour: PagingFlavour) -> Arc<dyn Mediator> {
        let cache = Arc::clone(&self.cache);
        let page_size = self.settings.page_size;

        match flavour {
            PagingFlavour::Browse => Arc::new(RemoteMediator::new(
                PagingKey::browse(T::KIND),
                Arc::new(EntityPageSource::new(
                    self.repository::<T>(),
                    Arc::clone(&self.preferences),
                )),
                cache,
                page_size,
            )),
            PagingFlavour::Recent => Arc::new(RemoteMediator::recent(
                self.repository::<T>(),
                cache,
                page_size,
                self.settings.recent_items_cap,
            )),
            PagingFlavour::Favorites => Arc::new(FavoritesMediator::new(
                self.repository::<T>(),
                Arc::clone(&self.favorites),
                Arc::clone(&self.preferences),
                cache,
                page_size,
            )),
        }
    }

    pub fn pager<T: ComicEntity>(&self, flavour: PagingFlavour) -> Pager<T> {
        Pager::new(self.mediator::<T>(flavour), Arc::clone(&self.cache))
    }

    pub async fn details<T: ComicEntity>(
        &self,
        id: i64,
    ) -> ComicVineResult<ComicVineResponse<EntityDetails>> {
        self.repository::<T>().get_item_details_by_id(id).await
    }

    // ========================================================================
    // FAVORITES
    // ========================================================================

    pub fn is_favorite(&self, kind: EntityKind, id: i64) -> AppResult<bool> {
        self.favorites.is_favorite(id, kind)
    }

    /// Favorites of `kind` in the user's chosen order.
    pub fn favorites(&self, kind: EntityKind) -> AppResult<Vec<FavoriteInfo>> {
        let sort = self.preferences.favorites_sort(kind)?;
        self.favorites.list(kind, sort)
    }

    pub fn observe_favorites(&self, kind: EntityKind) -> AppResult<Observation<Vec<FavoriteInfo>>> {
        let sort = self.preferences.favorites_sort(kind)?;
        Ok(self.favorites.observe(kind, sort))
    }

    pub fn add_favorite<T: ComicEntity>(&self, entity: &T) -> AppResult<FavoriteInfo> {
        let favorite = FavoriteInfo::from_entity(entity);
        self.favorites.insert(&favorite)?;
        Ok(favorite)
    }

    /// Looks the entity up first so the favorite carries its name and image.
    pub async fn add_favorite_by_id<T: ComicEntity>(
        &self,
        id: i64,
    ) -> Result<FavoriteInfo, MediatorError> {
        let response = self.repository::<T>().get_items_by_ids(&[id], None).await?;
        crate::paging::mediator::ensure_ok(&response)?;

        let entity = response
            .results
            .into_iter()
            .find(|entity| entity.id() == id)
            .ok_or_else(|| MediatorError::Service {
                status_code: StatusCode::ObjectNotFound.code(),
                message: format!("{} {} not found", T::KIND.resource_name(), id),
            })?;

        Ok(self.add_favorite(&entity)?)
    }

    pub fn remove_favorite(&self, kind: EntityKind, id: i64) -> AppResult<bool> {
        self.favorites.delete(id, kind)
    }

    /// Returns whether the entity is a favorite afterwards.
    pub fn toggle_favorite<T: ComicEntity>(&self, entity: &T) -> AppResult<bool> {
        self.favorites.toggle(&FavoriteInfo::from_entity(entity))
    }

    pub fn set_favorites_sort(&self, kind: EntityKind, sort: FavoritesSort) -> AppResult<()> {
        self.preferences.set_favorites_sort(kind, sort)
    }

    /// Keeps the favorites window of `kind` in step with the favorites table
    /// until the returned watcher is dropped.
    pub fn watch_favorites<F, Fut>(&self, kind: EntityKind, on_added: F) -> FavoritesWatcher
    where
        F: Fn(Vec<i64>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        FavoritesWatcher::spawn(
            kind,
            Arc::clone(&self.favorites),
            Arc::clone(&self.cache),
            on_added,
        )
    }

    // ========================================================================
    // LIST PREFERENCES
    // ========================================================================

    pub fn list_preferences(&self, kind: EntityKind) -> AppResult<ListPreferences> {
        self.preferences.list_preferences(kind)
    }

    pub fn set_list_preferences(
        &self,
        kind: EntityKind,
        preferences: &ListPreferences,
    ) -> AppResult<()> {
        self.preferences.set_list_preferences(kind, preferences)?;
        self.cache.clear(PagingKey::browse(kind))
    }

    pub fn clear_list_preferences(&self, kind: EntityKind) -> AppResult<()> {
        self.preferences.clear_list_preferences(kind)?;
        self.cache.clear(PagingKey::browse(kind))
    }
}
