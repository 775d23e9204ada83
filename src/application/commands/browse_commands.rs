// src/application/commands/browse_commands.rs
//
// Browse Command Handlers
//
// RULES:
// - Accept kinds and ids
// - Call the browse service
// - Return DTOs

use crate::application::dto::{DetailsDto, FavoriteDto, ItemDto, PageDto};
use crate::application::error_handling::{CommandResult, ErrorResponse};
use crate::application::state::AppState;
use crate::domain::{ComicEntity, EntityKind, PagingFlavour};
use crate::paging::mediator::ensure_ok;

fn validate_id(id: i64) -> CommandResult<()> {
    if id <= 0 {
        return Err(ErrorResponse::validation(format!(
            "Entity id must be positive, got {}",
            id
        )));
    }
    Ok(())
}

async fn load_window<T: ComicEntity>(
    state: &AppState,
    flavour: PagingFlavour,
    pages: u32,
) -> CommandResult<PageDto> {
    let pager = state.browse_service.pager::<T>(flavour);

    let mut outcome = pager.refresh().await?;
    let mut loaded = 1;
    while loaded < pages && !outcome.end_of_pagination_reached {
        outcome = pager.load_more().await?;
        loaded += 1;
    }

    Ok(PageDto {
        kind: T::KIND,
        items: pager.items()?.iter().map(ItemDto::from_entity).collect(),
        end_reached: outcome.end_of_pagination_reached,
    })
}

fn cached_window<T: ComicEntity>(state: &AppState, flavour: PagingFlavour) -> CommandResult<PageDto> {
    let pager = state.browse_service.pager::<T>(flavour);
    Ok(PageDto {
        kind: T::KIND,
        items: pager.items()?.iter().map(ItemDto::from_entity).collect(),
        end_reached: false,
    })
}

/// Refresh the window of `kind` and load up to `pages` pages into it.
pub async fn load_page(
    state: &AppState,
    kind: EntityKind,
    flavour: PagingFlavour,
    pages: u32,
) -> CommandResult<PageDto> {
    let pages = pages.max(1);
    with_entity_type!(kind, T => load_window::<T>(state, flavour, pages).await)
}

/// Whatever the window of `kind` currently holds, without the network.
pub fn cached_page(
    state: &AppState,
    kind: EntityKind,
    flavour: PagingFlavour,
) -> CommandResult<PageDto> {
    with_entity_type!(kind, T => cached_window::<T>(state, flavour))
}

pub async fn get_details(state: &AppState, kind: EntityKind, id: i64) -> CommandResult<DetailsDto> {
    validate_id(id)?;

    let response = with_entity_type!(kind, T => state.browse_service.details::<T>(id).await)?;
    ensure_ok(&response)?;

    Ok(DetailsDto::from_details(kind, response.results))
}

// ============================================================================
// FAVORITES
// ============================================================================

pub fn list_favorites(state: &AppState, kind: EntityKind) -> CommandResult<Vec<FavoriteDto>> {
    let favorites = state.browse_service.favorites(kind)?;
    Ok(favorites.into_iter().map(FavoriteDto::from).collect())
}

/// Looks the entity up, then marks it as a favorite.
pub async fn add_favorite(state: &AppState, kind: EntityKind, id: i64) -> CommandResult<FavoriteDto> {
    validate_id(id)?;

    let favorite =
        with_entity_type!(kind, T => state.browse_service.add_favorite_by_id::<T>(id).await)?;
    log::info!("Added {} {} to favorites", kind.resource_name(), id);

    Ok(FavoriteDto::from(favorite))
}

/// Returns whether a favorite was removed.
pub fn remove_favorite(state: &AppState, kind: EntityKind, id: i64) -> CommandResult<bool> {
    validate_id(id)?;

    let removed = state.browse_service.remove_favorite(kind, id)?;
    if !removed {
        log::debug!("{} {} was not a favorite", kind.resource_name(), id);
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error_handling::ErrorType;
    use crate::config::AppConfig;
    use crate::integrations::comicvine::{MockComicVineApi, RawResponse, StatusCode};
    use crate::repositories::ApiKeyStore;
    use serde_json::json;

    fn state(api: MockComicVineApi) -> AppState {
        let state = AppState::in_memory(&AppConfig::default(), std::sync::Arc::new(api)).unwrap();
        state.preferences.set_api_key("key").unwrap();
        state
    }

    #[tokio::test]
    async fn test_load_page_walks_pages_until_end() {
        let mut api = MockComicVineApi::new();
        api.expect_get()
            .withf(|path, _| path == "teams")
            .times(2)
            .returning(|_, query| {
                let offset: u32 = query
                    .iter()
                    .find(|(n, _)| n == "offset")
                    .map(|(_, v)| v.parse().unwrap())
                    .unwrap();
                let results = if offset == 0 {
                    json!((1..=20).map(|id| json!({"id": id})).collect::<Vec<_>>())
                } else {
                    json!([{"id": 21}])
                };
                Ok(RawResponse::ok(results, offset, 20, 21))
            });
        let state = state(api);

        let page = load_page(&state, EntityKind::Team, PagingFlavour::Browse, 5)
            .await
            .unwrap();
        assert_eq!(page.items.len(), 21);
        assert!(page.end_reached);
        assert_eq!(page.items[20].id, 21);

        let cached = cached_page(&state, EntityKind::Team, PagingFlavour::Browse).unwrap();
        assert_eq!(cached.items.len(), 21);
    }

    #[tokio::test]
    async fn test_details_service_error_is_reported() {
        let mut api = MockComicVineApi::new();
        api.expect_get()
            .withf(|path, _| path == "issue/4000-7")
            .returning(|_, _| {
                Ok(RawResponse::service_error(
                    StatusCode::ObjectNotFound,
                    "Object Not Found",
                ))
            });
        let state = state(api);

        let error = get_details(&state, EntityKind::Issue, 7).await.unwrap_err();
        assert_eq!(error.error_type, ErrorType::NotFound);
        assert_eq!(error.message, "Object Not Found");
    }

    #[tokio::test]
    async fn test_details_reads_common_fields() {
        let mut api = MockComicVineApi::new();
        api.expect_get().returning(|_, _| {
            Ok(RawResponse::ok(
                json!({"id": 1699, "name": "Batman", "real_name": "Bruce Wayne"}),
                0,
                1,
                1,
            ))
        });
        let state = state(api);

        let details = get_details(&state, EntityKind::Character, 1699).await.unwrap();
        assert_eq!(details.name.as_deref(), Some("Batman"));
        assert_eq!(details.extra["real_name"], "Bruce Wayne");
    }

    #[tokio::test]
    async fn test_add_and_remove_favorite() {
        let mut api = MockComicVineApi::new();
        api.expect_get()
            .withf(|path, _| path == "volumes")
            .returning(|_, _| Ok(RawResponse::ok(json!([{"id": 796, "name": "Saga"}]), 0, 1, 1)));
        let state = state(api);

        let favorite = add_favorite(&state, EntityKind::Volume, 796).await.unwrap();
        assert_eq!(favorite.name.as_deref(), Some("Saga"));
        assert_eq!(list_favorites(&state, EntityKind::Volume).unwrap().len(), 1);

        assert!(remove_favorite(&state, EntityKind::Volume, 796).unwrap());
        assert!(!remove_favorite(&state, EntityKind::Volume, 796).unwrap());
        assert!(list_favorites(&state, EntityKind::Volume).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_non_positive_id() {
        let mut api = MockComicVineApi::new();
        api.expect_get().never();
        let state = state(api);

        let error = add_favorite(&state, EntityKind::Volume, 0).await.unwrap_err();
        assert_eq!(error.error_type, ErrorType::Validation);
    }
}
