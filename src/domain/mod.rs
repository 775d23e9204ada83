// src/domain/mod.rs
//
// Domain Root - value types shared by every layer.
//
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod datetime;
pub mod details;
pub mod favorite;
pub mod info;
pub mod kind;
pub mod preferences;
pub mod remote_keys;
pub mod search_history;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use details::{EntityDetails, SearchInfo};
pub use favorite::{FavoriteInfo, FavoritesSort};
pub use info::{
    CharacterInfo, ComicEntity, ConceptInfo, ImageInfo, IssueInfo, LocationInfo, MovieInfo,
    ObjectInfo, PersonInfo, ResourceRef, StoryArcInfo, TeamInfo, VolumeInfo,
};
pub use kind::{EntityKind, ResourceType};
pub use preferences::{
    filter_param, DateRange, Filter, Gender, ListPreferences, Sort, SortDirection, SortField,
};
pub use remote_keys::{PagingFlavour, PagingKey, RemoteKeys};
pub use search_history::SearchHistoryEntry;

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
