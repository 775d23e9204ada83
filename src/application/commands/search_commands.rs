// src/application/commands/search_commands.rs
//
// Search Command Handlers

use uuid::Uuid;

use crate::application::dto::{HistoryEntryDto, SearchPageDto};
use crate::application::error_handling::{CommandResult, ErrorResponse};
use crate::application::state::AppState;
use crate::domain::EntityKind;
use crate::paging::mediator::ensure_ok;
use crate::services::SearchRequest;

const MAX_SEARCH_LIMIT: u32 = 100;

/// Search across `resources` (every kind when empty).
pub async fn search(
    state: &AppState,
    query: &str,
    resources: Vec<EntityKind>,
    offset: u32,
    limit: u32,
) -> CommandResult<SearchPageDto> {
    if limit == 0 || limit > MAX_SEARCH_LIMIT {
        return Err(ErrorResponse::validation(format!(
            "Search limit must be between 1 and {}",
            MAX_SEARCH_LIMIT
        )));
    }

    let response = state
        .search_service
        .search(SearchRequest {
            query: query.to_string(),
            resources,
            offset,
            limit,
        })
        .await?;
    ensure_ok(&response)?;

    Ok(SearchPageDto::from(response))
}

pub fn search_history(state: &AppState, limit: u32) -> CommandResult<Vec<HistoryEntryDto>> {
    let entries = state.search_service.history(limit)?;
    Ok(entries.into_iter().map(HistoryEntryDto::from).collect())
}

pub fn delete_history_entry(state: &AppState, entry_id: &str) -> CommandResult<bool> {
    let id = Uuid::parse_str(entry_id)
        .map_err(|e| ErrorResponse::validation(format!("Invalid history id: {}", e)))?;
    Ok(state.search_service.delete_history_entry(id)?)
}

/// Returns the number of entries removed.
pub fn clear_search_history(state: &AppState) -> CommandResult<usize> {
    Ok(state.search_service.clear_history()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error_handling::ErrorType;
    use crate::config::AppConfig;
    use crate::integrations::comicvine::{MockComicVineApi, RawResponse, StatusCode};
    use crate::repositories::ApiKeyStore;
    use serde_json::json;
    use std::sync::Arc;

    fn state(api: MockComicVineApi) -> AppState {
        let state = AppState::in_memory(&AppConfig::default(), Arc::new(api)).unwrap();
        state.preferences.set_api_key("key").unwrap();
        state
    }

    #[tokio::test]
    async fn test_search_returns_page_and_records_query() {
        let mut api = MockComicVineApi::new();
        api.expect_get()
            .withf(|path, _| path == "search")
            .returning(|_, _| {
                Ok(RawResponse::ok(
                    json!([{"id": 1, "name": "Batman", "resource_type": "character"}]),
                    0,
                    10,
                    1,
                ))
            });
        let state = state(api);

        let page = search(&state, "batman", vec![EntityKind::Character], 0, 10)
            .await
            .unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].kind, EntityKind::Character);

        let history = search_history(&state, 10).unwrap();
        assert_eq!(history[0].query, "batman");
    }

    #[tokio::test]
    async fn test_search_service_error_surfaces() {
        let mut api = MockComicVineApi::new();
        api.expect_get().returning(|_, _| {
            Ok(RawResponse::service_error(
                StatusCode::RateLimitExceeded,
                "Rate limit exceeded",
            ))
        });
        let state = state(api);

        let error = search(&state, "batman", vec![EntityKind::Volume], 0, 10)
            .await
            .unwrap_err();
        assert_eq!(error.error_type, ErrorType::Service);
        assert!(error.is_retryable());
    }

    #[tokio::test]
    async fn test_search_rejects_zero_limit() {
        let mut api = MockComicVineApi::new();
        api.expect_get().never();
        let state = state(api);

        let error = search(&state, "batman", vec![], 0, 0).await.unwrap_err();
        assert_eq!(error.error_type, ErrorType::Validation);
        assert!(search_history(&state, 10).unwrap().is_empty());
    }

    #[test]
    fn test_history_management() {
        let state = state(MockComicVineApi::new());

        assert!(delete_history_entry(&state, "not-a-uuid").is_err());
        assert!(!delete_history_entry(&state, &Uuid::new_v4().to_string()).unwrap());
        assert_eq!(clear_search_history(&state).unwrap(), 0);
    }
}
