// src/application/state.rs

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::{create_connection_pool, create_memory_pool, initialize_database, ConnectionPool};
use crate::error::AppResult;
use crate::integrations::comicvine::{ComicVineApi, ComicVineClient};
use crate::repositories::{
    SearchRepository, SqliteFavoritesRepository, SqlitePagingRepository,
    SqlitePreferencesRepository, SqliteSearchHistoryRepository,
};
use crate::services::{BrowseService, BrowseSettings, SearchService};

/// Everything a front end needs, wired once at startup.
/// All fields are Arc-wrapped for sharing across tasks.
pub struct AppState {
    pub pool: Arc<ConnectionPool>,
    pub preferences: Arc<SqlitePreferencesRepository>,
    pub browse_service: Arc<BrowseService>,
    pub search_service: Arc<SearchService>,
}

impl AppState {
    /// On-disk database and the real HTTP client.
    pub fn initialize(config: &AppConfig) -> AppResult<Self> {
        let db_path = config.resolved_database_path()?;
        let pool = create_connection_pool(&db_path)?;
        let api: Arc<dyn ComicVineApi> = Arc::new(ComicVineClient::new(config)?);
        log::debug!("Using database at {}", db_path.display());
        Self::assemble(pool, api, config)
    }

    /// In-memory database over the given API, for tests and dry runs.
    pub fn in_memory(config: &AppConfig, api: Arc<dyn ComicVineApi>) -> AppResult<Self> {
        Self::assemble(create_memory_pool()?, api, config)
    }

    fn assemble(
        pool: ConnectionPool,
        api: Arc<dyn ComicVineApi>,
        config: &AppConfig,
    ) -> AppResult<Self> {
        // 1. SCHEMA (idempotent)
        {
            let conn = pool.get()?;
            initialize_database(&conn)?;
        }
        let pool = Arc::new(pool);

        // 2. REPOSITORIES
        let preferences = Arc::new(SqlitePreferencesRepository::new(pool.clone()));
        let favorites = Arc::new(SqliteFavoritesRepository::new(pool.clone()));
        let cache = Arc::new(SqlitePagingRepository::new(pool.clone()));
        let history = Arc::new(SqliteSearchHistoryRepository::new(pool.clone()));
        let search_repo = Arc::new(SearchRepository::new(api.clone(), preferences.clone()));

        // 3. SERVICES
        let browse_service = Arc::new(BrowseService::new(
            api,
            preferences.clone(),
            preferences.clone(),
            favorites,
            cache,
            BrowseSettings {
                page_size: config.page_size,
                recent_items_cap: config.recent_items_cap,
            },
        ));
        let search_service = Arc::new(SearchService::new(search_repo, history));

        Ok(Self {
            pool,
            preferences,
            browse_service,
            search_service,
        })
    }
}
