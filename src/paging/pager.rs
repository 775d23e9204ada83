// src/paging/pager.rs
//
// Pager - the consumer-facing end of a paging window.
//
// Loads go through the mediator one at a time; reads come straight from
// the cache window, so a page is visible only once fully committed.

use std::marker::PhantomData;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{ComicEntity, PagingKey};
use crate::error::AppResult;
use crate::paging::mediator::{LoadType, Mediator, MediatorResult, MediatorSuccess};
use crate::repositories::{CachedItem, Observation, PagingCacheRepository};

#[derive(Debug, Default)]
struct PagerState {
    end_reached: bool,
    failed: Option<LoadType>,
}

pub struct Pager<T: ComicEntity> {
    key: PagingKey,
    mediator: Arc<dyn Mediator>,
    cache: Arc<dyn PagingCacheRepository>,
    state: Mutex<PagerState>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: ComicEntity> Pager<T> {
    pub fn new(mediator: Arc<dyn Mediator>, cache: Arc<dyn PagingCacheRepository>) -> Self {
        Self {
            key: mediator.paging_key(),
            mediator,
            cache,
            state: Mutex::new(PagerState::default()),
            _entity: PhantomData,
        }
    }

    pub fn paging_key(&self) -> PagingKey {
        self.key
    }

    pub async fn refresh(&self) -> MediatorResult {
        self.load(LoadType::Refresh).await
    }

    /// Next page; a no-op once the end has been reached.
    pub async fn load_more(&self) -> MediatorResult {
        self.load(LoadType::Append).await
    }

    /// Repeats the last failed load, if any. A failed refresh is repeated
    /// even when later appends succeeded.
    pub async fn retry(&self) -> MediatorResult {
        let failed = self.state.lock().await.failed;
        match failed {
            Some(load_type) => self.load(load_type).await,
            None => Ok(MediatorSuccess {
                end_of_pagination_reached: self.is_end_reached().await,
            }),
        }
    }

    pub async fn is_end_reached(&self) -> bool {
        self.state.lock().await.end_reached
    }

    pub async fn last_failed(&self) -> Option<LoadType> {
        self.state.lock().await.failed
    }

    async fn load(&self, load_type: LoadType) -> MediatorResult {
        let mut state = self.state.lock().await;
        if load_type == LoadType::Append && state.end_reached && state.failed.is_none() {
            return Ok(MediatorSuccess::end_reached());
        }

        let result = self.mediator.load(load_type).await;
        match &result {
            Ok(success) => {
                state.end_reached = success.end_of_pagination_reached;
                // A failed refresh stays pending until a refresh succeeds.
                if load_type == LoadType::Refresh || state.failed != Some(LoadType::Refresh) {
                    state.failed = None;
                }
            }
            Err(e) => {
                log::warn!("{} {:?} failed: {}", self.key, load_type, e);
                state.failed = Some(load_type);
            }
        }
        result
    }

    /// Everything cached in the window, in offset order.
    pub fn items(&self) -> AppResult<Vec<T>> {
        self.cache
            .get_all(self.key)?
            .iter()
            .map(CachedItem::decode)
            .collect()
    }

    pub fn observe(&self) -> Observation<Vec<T>> {
        self.cache
            .observe(self.key)
            .map(|items| items.iter().map(CachedItem::decode).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntityKind, TeamInfo};
    use crate::error::{ComicVineError, MediatorError};
    use crate::repositories::SqlitePagingRepository;
    use crate::db::{create_memory_pool, initialize_database};
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    /// Replays scripted outcomes and records the load types it saw.
    struct ScriptedMediator {
        outcomes: StdMutex<Vec<MediatorResult>>,
        seen: StdMutex<Vec<LoadType>>,
    }

    impl ScriptedMediator {
        fn new(mut outcomes: Vec<MediatorResult>) -> Arc<Self> {
            outcomes.reverse();
            Arc::new(Self {
                outcomes: StdMutex::new(outcomes),
                seen: StdMutex::new(Vec::new()),
            })
        }

        fn seen(&self) -> Vec<LoadType> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Mediator for ScriptedMediator {
        fn paging_key(&self) -> PagingKey {
            PagingKey::browse(EntityKind::Team)
        }

        async fn load(&self, load_type: LoadType) -> MediatorResult {
            self.seen.lock().unwrap().push(load_type);
            self.outcomes
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Ok(MediatorSuccess::end_reached()))
        }
    }

    fn cache() -> Arc<SqlitePagingRepository> {
        let pool = create_memory_pool().unwrap();
        initialize_database(&pool.get().unwrap()).unwrap();
        Arc::new(SqlitePagingRepository::new(Arc::new(pool)))
    }

    fn more() -> MediatorResult {
        Ok(MediatorSuccess {
            end_of_pagination_reached: false,
        })
    }

    #[tokio::test]
    async fn test_load_more_stops_at_end() {
        let mediator = ScriptedMediator::new(vec![more(), Ok(MediatorSuccess::end_reached())]);
        let pager: Pager<TeamInfo> = Pager::new(mediator.clone(), cache());

        pager.refresh().await.unwrap();
        pager.load_more().await.unwrap();
        assert!(pager.is_end_reached().await);
        pager.load_more().await.unwrap();

        assert_eq!(mediator.seen(), vec![LoadType::Refresh, LoadType::Append]);
    }

    #[tokio::test]
    async fn test_retry_repeats_failed_load() {
        let mediator = ScriptedMediator::new(vec![
            more(),
            Err(MediatorError::Fetch(ComicVineError::NoNetworkConnection)),
            more(),
        ]);
        let pager: Pager<TeamInfo> = Pager::new(mediator.clone(), cache());

        pager.refresh().await.unwrap();
        assert!(pager.load_more().await.is_err());
        assert_eq!(pager.last_failed().await, Some(LoadType::Append));

        pager.retry().await.unwrap();
        assert_eq!(pager.last_failed().await, None);
        assert_eq!(
            mediator.seen(),
            vec![LoadType::Refresh, LoadType::Append, LoadType::Append]
        );

        // Nothing failed: retry does not reach the mediator.
        pager.retry().await.unwrap();
        assert_eq!(mediator.seen().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_refresh_survives_later_append() {
        let mediator = ScriptedMediator::new(vec![
            Err(MediatorError::Fetch(ComicVineError::RequestTimeout)),
            Ok(MediatorSuccess::end_reached()),
            more(),
        ]);
        let pager: Pager<TeamInfo> = Pager::new(mediator.clone(), cache());

        assert!(pager.refresh().await.is_err());
        pager.load_more().await.unwrap();
        assert!(pager.is_end_reached().await);
        assert_eq!(pager.last_failed().await, Some(LoadType::Refresh));

        pager.retry().await.unwrap();
        assert_eq!(pager.last_failed().await, None);
        assert!(!pager.is_end_reached().await);
        assert_eq!(
            mediator.seen(),
            vec![LoadType::Refresh, LoadType::Append, LoadType::Refresh]
        );
    }

    #[tokio::test]
    async fn test_refresh_after_end_reopens_paging() {
        let mediator = ScriptedMediator::new(vec![Ok(MediatorSuccess::end_reached()), more(), more()]);
        let pager: Pager<TeamInfo> = Pager::new(mediator.clone(), cache());

        pager.refresh().await.unwrap();
        assert!(pager.is_end_reached().await);
        pager.refresh().await.unwrap();
        assert!(!pager.is_end_reached().await);
        pager.load_more().await.unwrap();
        assert_eq!(mediator.seen().len(), 3);
    }

    #[tokio::test]
    async fn test_items_read_cache_window() {
        let cache = cache();
        let key = PagingKey::browse(EntityKind::Team);
        let team: TeamInfo =
            serde_json::from_value(serde_json::json!({"id": 40, "name": "Teen Titans"})).unwrap();
        cache
            .save_page(key, &[CachedItem::from_entity(&team, 0).unwrap()], &[], true)
            .unwrap();

        let pager: Pager<TeamInfo> = Pager::new(ScriptedMediator::new(vec![]), cache.clone());
        assert_eq!(pager.items().unwrap(), vec![team.clone()]);

        let mut observation = pager.observe();
        assert_eq!(observation.current().unwrap().len(), 1);
        cache.clear(key).unwrap();
        assert!(observation.changed().await.unwrap().unwrap().is_empty());
    }
}
