// src/lib.rs
// ComicVine - Local-first browsing core for the Comic Vine API
//
// Architecture:
// - Domain-centric: entity kinds, sort/filter preferences and favorites are plain values
// - Explicit: every network outcome is a typed error value, never a panic
// - Local-first: pages are cached in SQLite and read back from the cache
// - Paging: mediators fetch and persist, pagers serialise loads
// - Application Layer: command handlers and DTOs for front ends

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod integrations;
pub mod repositories;

// ============================================================================
// PAGING & SERVICES
// ============================================================================

pub mod paging;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    CharacterInfo, ComicEntity, ConceptInfo, EntityDetails, EntityKind, FavoriteInfo,
    FavoritesSort, Filter, IssueInfo, ListPreferences, LocationInfo, MovieInfo, ObjectInfo,
    PagingFlavour, PagingKey, PersonInfo, ResourceType, SearchHistoryEntry, SearchInfo, Sort,
    SortDirection, SortField, StoryArcInfo, TeamInfo, VolumeInfo,
};

// ============================================================================
// PUBLIC API - Errors & Configuration
// ============================================================================

pub use config::AppConfig;
pub use error::{ApiKeyError, AppError, AppResult, ComicVineError, ComicVineResult, MediatorError};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{create_connection_pool, create_memory_pool, initialize_database, ConnectionPool};

// ============================================================================
// PUBLIC API - Integrations & Repositories
// ============================================================================

pub use integrations::{ComicVineApi, ComicVineClient, ComicVineResponse, StatusCode};
pub use repositories::{
    ApiKeyStore, EntityRepository, FavoritesRepository, Observation, PagingCacheRepository,
    PreferencesStore, SearchHistoryRepository, SearchRepository, SqliteFavoritesRepository,
    SqlitePagingRepository, SqlitePreferencesRepository, SqliteSearchHistoryRepository,
};

// ============================================================================
// PUBLIC API - Paging & Services
// ============================================================================

pub use paging::{FavoritesWatcher, LoadType, Mediator, MediatorSuccess, Pager};
pub use services::{BrowseService, BrowseSettings, SearchRequest, SearchService};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::AppState;

pub use application::commands;
pub use application::dto;
