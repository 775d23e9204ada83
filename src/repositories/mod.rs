// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO paging decisions (mediators own those)
// - NO cross-repository calls
// - Explicit SQL only
// - Remote repositories return ComicVineResult values, never panic

pub mod entity_repository;
pub mod favorites_repository;
pub mod observation;
pub mod paging_repository;
pub mod preferences_repository;
pub mod search_history_repository;
pub mod search_repository;

pub use entity_repository::EntityRepository;
pub use favorites_repository::{FavoritesRepository, SqliteFavoritesRepository};
pub use observation::{ChangeNotifier, Observation};
pub use paging_repository::{
    get_entities, CachedItem, PagingCacheRepository, SqlitePagingRepository,
};
pub use preferences_repository::{ApiKeyStore, PreferencesStore, SqlitePreferencesRepository};
pub use search_history_repository::{SearchHistoryRepository, SqliteSearchHistoryRepository};
pub use search_repository::{merge_responses, plan_search, SearchCategory, SearchRepository, SubRequest};

#[cfg(test)]
pub use preferences_repository::MockApiKeyStore;
