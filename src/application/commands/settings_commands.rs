// src/application/commands/settings_commands.rs
//
// Settings Command Handlers
//
// RULES:
// - API key and list preferences only
// - Preference changes that alter list contents drop the cached window

use crate::application::error_handling::{CommandResult, ErrorResponse};
use crate::application::state::AppState;
use crate::db::{get_connection, get_database_stats, verify_database_integrity, DatabaseStats};
use crate::domain::{EntityKind, FavoritesSort, Filter, ListPreferences, Sort};
use crate::repositories::ApiKeyStore;

pub fn set_api_key(state: &AppState, key: &str) -> CommandResult<()> {
    if key.trim().is_empty() {
        return Err(ErrorResponse::validation("API key cannot be empty"));
    }
    state.preferences.set_api_key(key)?;
    log::info!("API key stored");
    Ok(())
}

pub fn clear_api_key(state: &AppState) -> CommandResult<()> {
    state.preferences.clear_api_key()?;
    log::info!("API key cleared");
    Ok(())
}

/// Whether a non-blank key is stored. The key itself is never returned.
pub fn has_api_key(state: &AppState) -> CommandResult<bool> {
    let key = state
        .preferences
        .api_key()
        .map_err(crate::error::ComicVineError::from)?;
    Ok(key.is_some())
}

pub fn get_list_preferences(state: &AppState, kind: EntityKind) -> CommandResult<ListPreferences> {
    Ok(state.browse_service.list_preferences(kind)?)
}

/// Replaces the sort of `kind`, keeping its filters. `None` restores the
/// API's default order.
pub fn set_list_sort(
    state: &AppState,
    kind: EntityKind,
    sort: Option<Sort>,
) -> CommandResult<ListPreferences> {
    let mut preferences = state.browse_service.list_preferences(kind)?;
    preferences.sort = sort;
    state.browse_service.set_list_preferences(kind, &preferences)?;
    Ok(preferences)
}

/// Replaces the filters of `kind`, keeping its sort.
pub fn set_list_filters(
    state: &AppState,
    kind: EntityKind,
    filters: Vec<Filter>,
) -> CommandResult<ListPreferences> {
    let mut preferences = state.browse_service.list_preferences(kind)?;
    preferences.filters = filters;
    state.browse_service.set_list_preferences(kind, &preferences)?;
    Ok(preferences)
}

pub fn clear_list_preferences(state: &AppState, kind: EntityKind) -> CommandResult<()> {
    Ok(state.browse_service.clear_list_preferences(kind)?)
}

pub fn set_favorites_sort(
    state: &AppState,
    kind: EntityKind,
    sort: FavoritesSort,
) -> CommandResult<()> {
    Ok(state.browse_service.set_favorites_sort(kind, sort)?)
}

/// Checks the cache database and reports its size and row counts.
pub fn cache_info(state: &AppState) -> CommandResult<DatabaseStats> {
    let conn = get_connection(&state.pool)?;
    verify_database_integrity(&conn)?;
    Ok(get_database_stats(&conn)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error_handling::ErrorType;
    use crate::config::AppConfig;
    use crate::domain::{SortDirection, SortField};
    use crate::integrations::comicvine::MockComicVineApi;
    use std::sync::Arc;

    fn state() -> AppState {
        AppState::in_memory(&AppConfig::default(), Arc::new(MockComicVineApi::new())).unwrap()
    }

    #[test]
    fn test_api_key_lifecycle() {
        let state = state();
        assert!(!has_api_key(&state).unwrap());

        assert_eq!(
            set_api_key(&state, "   ").unwrap_err().error_type,
            ErrorType::Validation
        );
        set_api_key(&state, "abc").unwrap();
        assert!(has_api_key(&state).unwrap());

        clear_api_key(&state).unwrap();
        assert!(!has_api_key(&state).unwrap());
    }

    #[test]
    fn test_sort_and_filters_are_kept_separately() {
        let state = state();
        let sort = Sort::new(SortField::CoverDate, SortDirection::Desc);

        set_list_sort(&state, EntityKind::Issue, Some(sort)).unwrap();
        set_list_filters(
            &state,
            EntityKind::Issue,
            vec![Filter::Name {
                value: "batman".to_string(),
            }],
        )
        .unwrap();

        let preferences = get_list_preferences(&state, EntityKind::Issue).unwrap();
        assert_eq!(preferences.sort, Some(sort));
        assert_eq!(preferences.filters.len(), 1);

        clear_list_preferences(&state, EntityKind::Issue).unwrap();
        assert_eq!(
            get_list_preferences(&state, EntityKind::Issue).unwrap(),
            ListPreferences::default()
        );
    }

    #[test]
    fn test_unsupported_sort_is_rejected() {
        let state = state();
        let sort = Sort::new(SortField::IssueNumber, SortDirection::Asc);

        let error = set_list_sort(&state, EntityKind::Character, Some(sort)).unwrap_err();
        assert_eq!(error.error_type, ErrorType::Validation);
    }

    #[test]
    fn test_cache_info_on_fresh_database() {
        let state = state();
        let stats = cache_info(&state).unwrap();
        assert_eq!(stats.cached_item_count, 0);
        assert_eq!(stats.favorite_count, 0);
        assert!(stats.page_count > 0);
    }

    #[test]
    fn test_favorites_sort_applies_to_listing() {
        let state = state();
        set_favorites_sort(&state, EntityKind::Team, FavoritesSort::NameAsc).unwrap();
        assert!(state.browse_service.favorites(EntityKind::Team).unwrap().is_empty());
    }
}
