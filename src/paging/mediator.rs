// src/paging/mediator.rs
//
// Remote mediator: network page -> cache window.
//
// ARCHITECTURE:
// - A mediator owns one paging window (PagingKey) of the cache
// - Each load fetches one page, stamps items with their global offset,
//   and saves items + remote keys in a single cache transaction
// - Callers (the Pager) serialise loads; a mediator holds no lock itself
//
// CRITICAL RULES:
// - REFRESH starts at offset 0 and replaces the window atomically
// - APPEND continues from the stored next offset, or reports the end
// - PREPEND always reports the end: the API is strictly forward-ordered
// - No retries; a failed load is returned to the caller

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{ComicEntity, Filter, PagingKey, RemoteKeys, Sort, SortDirection, SortField};
use crate::error::MediatorError;
use crate::integrations::comicvine::ComicVineResponse;
use crate::repositories::{CachedItem, EntityRepository, PagingCacheRepository, PreferencesStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadType {
    Refresh,
    Prepend,
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediatorSuccess {
    pub end_of_pagination_reached: bool,
}

impl MediatorSuccess {
    pub fn end_reached() -> Self {
        Self {
            end_of_pagination_reached: true,
        }
    }
}

pub type MediatorResult = Result<MediatorSuccess, MediatorError>;

#[async_trait]
pub trait Mediator: Send + Sync {
    fn paging_key(&self) -> PagingKey;
    async fn load(&self, load_type: LoadType) -> MediatorResult;
}

/// Where a mediator gets its pages from.
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    async fn fetch(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<ComicVineResponse<Vec<T>>, MediatorError>;
}

enum Ordering {
    /// Read the kind's stored preferences at every fetch.
    Preferences(Arc<dyn PreferencesStore>),
    Fixed(Option<Sort>, Vec<Filter>),
}

/// List endpoint of one kind as a page source.
pub struct EntityPageSource<T: ComicEntity> {
    repository: EntityRepository<T>,
    ordering: Ordering,
}

impl<T: ComicEntity> EntityPageSource<T> {
    /// Browse list honouring the user's sort/filter selection.
    pub fn new(repository: EntityRepository<T>, preferences: Arc<dyn PreferencesStore>) -> Self {
        Self {
            repository,
            ordering: Ordering::Preferences(preferences),
        }
    }

    /// Newest additions first, unfiltered.
    pub fn recent(repository: EntityRepository<T>) -> Self {
        Self {
            repository,
            ordering: Ordering::Fixed(
                Some(Sort::new(SortField::DateAdded, SortDirection::Desc)),
                Vec::new(),
            ),
        }
    }
}

#[async_trait]
impl<T: ComicEntity> PageSource<T> for EntityPageSource<T> {
    async fn fetch(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<ComicVineResponse<Vec<T>>, MediatorError> {
        let response = match &self.ordering {
            Ordering::Preferences(store) => {
                let preferences = store.list_preferences(T::KIND)?;
                self.repository
                    .get_items(offset, limit, preferences.sort, &preferences.filters)
                    .await?
            }
            Ordering::Fixed(sort, filters) => {
                self.repository
                    .get_items(offset, limit, *sort, filters)
                    .await?
            }
        };
        Ok(response)
    }
}

/// Offsets around a page starting at `offset`.
pub(crate) fn page_keys(ids: &[i64], offset: u32, limit: u32, end_reached: bool) -> Vec<RemoteKeys> {
    let prev_offset = match offset {
        0 => None,
        _ => Some(offset.saturating_sub(limit)),
    };
    let next_offset = if end_reached {
        None
    } else {
        Some(offset + limit)
    };

    ids.iter()
        .map(|id| RemoteKeys {
            id: *id,
            prev_offset,
            next_offset,
        })
        .collect()
}

/// Turns a non-OK envelope into a `Service` error.
pub(crate) fn ensure_ok<T>(response: &ComicVineResponse<T>) -> Result<(), MediatorError> {
    if response.status_code.is_ok() {
        return Ok(());
    }
    log::warn!(
        "Comic Vine service error {}: {}",
        response.status_code.code(),
        response.error
    );
    Err(MediatorError::Service {
        status_code: response.status_code.code(),
        message: response.error.clone(),
    })
}

pub struct RemoteMediator<T: ComicEntity> {
    key: PagingKey,
    source: Arc<dyn PageSource<T>>,
    cache: Arc<dyn PagingCacheRepository>,
    page_size: u32,
    end_of_pagination_offset: Option<u32>,
}

impl<T: ComicEntity> RemoteMediator<T> {
    pub fn new(
        key: PagingKey,
        source: Arc<dyn PageSource<T>>,
        cache: Arc<dyn PagingCacheRepository>,
        page_size: u32,
    ) -> Self {
        Self {
            key,
            source,
            cache,
            page_size: page_size.max(1),
            end_of_pagination_offset: None,
        }
    }

    /// Stop paging once this many items are cached.
    pub fn with_end_of_pagination_offset(mut self, offset: u32) -> Self {
        self.end_of_pagination_offset = Some(offset);
        self
    }

    /// Bounded "recently added" list of one kind.
    pub fn recent(
        repository: EntityRepository<T>,
        cache: Arc<dyn PagingCacheRepository>,
        page_size: u32,
        cap: u32,
    ) -> Self {
        Self::new(
            PagingKey::recent(T::KIND),
            Arc::new(EntityPageSource::recent(repository)),
            cache,
            page_size,
        )
        .with_end_of_pagination_offset(cap)
    }

    fn start_offset(&self, load_type: LoadType) -> Result<Option<u32>, MediatorError> {
        match load_type {
            LoadType::Refresh => Ok(Some(0)),
            LoadType::Prepend => Ok(None),
            LoadType::Append => Ok(self
                .cache
                .last_remote_keys(self.key)?
                .and_then(|keys| keys.next_offset)),
        }
    }
}

#[async_trait]
impl<T: ComicEntity> Mediator for RemoteMediator<T> {
    fn paging_key(&self) -> PagingKey {
        self.key
    }

    async fn load(&self, load_type: LoadType) -> MediatorResult {
        let offset = match self.start_offset(load_type)? {
            Some(offset) => offset,
            None => {
                log::debug!("{} {:?}: end of pagination, no fetch", self.key, load_type);
                return Ok(MediatorSuccess::end_reached());
            }
        };
        if self.end_of_pagination_offset.is_some_and(|cap| offset >= cap) {
            return Ok(MediatorSuccess::end_reached());
        }

        let limit = self.page_size;
        let response = self.source.fetch(offset, limit).await?;
        ensure_ok(&response)?;

        let returned = response.results.len() as u32;
        let next = offset + limit;
        let capped = self.end_of_pagination_offset.is_some_and(|cap| next >= cap);
        let end_reached = returned < limit || capped;

        let mut entities = response.results;
        if let Some(cap) = self.end_of_pagination_offset {
            entities.truncate(cap.saturating_sub(offset) as usize);
        }

        let items = entities
            .iter()
            .enumerate()
            .map(|(i, entity)| CachedItem::from_entity(entity, offset + i as u32))
            .collect::<Result<Vec<_>, _>>()?;
        let ids: Vec<i64> = items.iter().map(|item| item.id).collect();
        let keys = page_keys(&ids, offset, limit, end_reached);

        self.cache
            .save_page(self.key, &items, &keys, load_type == LoadType::Refresh)?;

        log::debug!(
            "{} {:?}: offset={} returned={} end={}",
            self.key,
            load_type,
            offset,
            returned,
            end_reached
        );
        Ok(MediatorSuccess {
            end_of_pagination_reached: end_reached,
        })
    }
}
