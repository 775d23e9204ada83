// src/repositories/entity_repository.rs
//
// Remote entity repository
//
// ARCHITECTURE:
// - One instance per entity kind, typed by the list struct
// - Reads the API key first, then issues exactly one request
// - Returns ComicVineResult values; nothing is thrown past this layer
//
// CRITICAL RULES:
// - Missing or unreadable key: no network call at all
// - No retries

use std::marker::PhantomData;
use std::sync::Arc;

use crate::domain::{filter_param, ComicEntity, EntityDetails, Filter, Sort};
use crate::error::{ApiKeyError, ComicVineError, ComicVineResult};
use crate::integrations::comicvine::{ComicVineApi, ComicVineResponse, RawResponse};
use crate::repositories::preferences_repository::ApiKeyStore;

/// Fetch the key or short-circuit with the matching `ApiKey` error.
pub(crate) fn require_api_key(store: &dyn ApiKeyStore) -> ComicVineResult<String> {
    match store.api_key()? {
        Some(key) => Ok(key),
        None => {
            log::warn!("Comic Vine request skipped: no API key configured");
            Err(ApiKeyError::NoApiKey.into())
        }
    }
}

/// Decode a raw envelope, classifying shape mismatches as `Exception`.
pub(crate) fn decode_response<T>(raw: RawResponse) -> ComicVineResult<ComicVineResponse<T>>
where
    T: serde::de::DeserializeOwned + Default,
{
    raw.decode()
        .map_err(|e| ComicVineError::Exception(format!("Failed to decode results: {}", e)))
}

pub(crate) fn param(name: &str, value: impl ToString) -> (String, String) {
    (name.to_string(), value.to_string())
}

pub struct EntityRepository<T: ComicEntity> {
    api: Arc<dyn ComicVineApi>,
    keys: Arc<dyn ApiKeyStore>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: ComicEntity> Clone for EntityRepository<T> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            keys: Arc::clone(&self.keys),
            _entity: PhantomData,
        }
    }
}

impl<T: ComicEntity> EntityRepository<T> {
    pub fn new(api: Arc<dyn ComicVineApi>, keys: Arc<dyn ApiKeyStore>) -> Self {
        Self {
            api,
            keys,
            _entity: PhantomData,
        }
    }

    /// One page of the kind's list endpoint.
    pub async fn get_items(
        &self,
        offset: u32,
        limit: u32,
        sort: Option<Sort>,
        filters: &[Filter],
    ) -> ComicVineResult<ComicVineResponse<Vec<T>>> {
        let api_key = require_api_key(self.keys.as_ref())?;

        let mut query = vec![
            param("api_key", api_key),
            param("offset", offset),
            param("limit", limit),
            param("field_list", T::FIELD_LIST),
        ];
        if let Some(sort) = sort {
            query.push(param("sort", sort.to_param()));
        }
        if let Some(filter) = filter_param(filters) {
            query.push(param("filter", filter));
        }

        log::debug!(
            "Fetching {} offset={} limit={}",
            T::KIND,
            offset,
            limit
        );
        let raw = self.api.get(T::KIND.list_path(), query).await?;
        decode_response(raw)
    }

    /// Entities with the given ids, in whatever order the API returns them.
    pub async fn get_items_by_ids(
        &self,
        ids: &[i64],
        sort: Option<Sort>,
    ) -> ComicVineResult<ComicVineResponse<Vec<T>>> {
        if ids.is_empty() {
            return Ok(ComicVineResponse::empty(0, 0));
        }
        let filters = [Filter::Ids { ids: ids.to_vec() }];
        self.get_items(0, ids.len() as u32, sort, &filters).await
    }

    pub async fn get_item_details_by_id(
        &self,
        id: i64,
    ) -> ComicVineResult<ComicVineResponse<EntityDetails>> {
        let api_key = require_api_key(self.keys.as_ref())?;
        let raw = self
            .api
            .get(&T::KIND.detail_path(id), vec![param("api_key", api_key)])
            .await?;
        decode_response(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CharacterInfo, SortDirection, SortField};
    use crate::integrations::comicvine::{MockComicVineApi, StatusCode};
    use crate::repositories::preferences_repository::MockApiKeyStore;
    use serde_json::json;

    fn key_store(key: Option<&'static str>) -> Arc<MockApiKeyStore> {
        let mut store = MockApiKeyStore::new();
        store
            .expect_api_key()
            .returning(move || Ok(key.map(str::to_string)));
        Arc::new(store)
    }

    fn has(query: &[(String, String)], name: &str, value: &str) -> bool {
        query.iter().any(|(n, v)| n == name && v == value)
    }

    #[tokio::test]
    async fn test_missing_key_skips_network() {
        let mut api = MockComicVineApi::new();
        api.expect_get().never();

        let repo: EntityRepository<CharacterInfo> =
            EntityRepository::new(Arc::new(api), key_store(None));

        let result = repo.get_items(0, 20, None, &[]).await;
        assert_eq!(result, Err(ComicVineError::ApiKey(ApiKeyError::NoApiKey)));

        let details = repo.get_item_details_by_id(1).await;
        assert_eq!(details, Err(ComicVineError::ApiKey(ApiKeyError::NoApiKey)));
    }

    #[tokio::test]
    async fn test_unreadable_key_is_api_key_io() {
        let mut api = MockComicVineApi::new();
        api.expect_get().never();
        let mut store = MockApiKeyStore::new();
        store
            .expect_api_key()
            .returning(|| Err(ApiKeyError::Io("disk gone".to_string())));

        let repo: EntityRepository<CharacterInfo> =
            EntityRepository::new(Arc::new(api), Arc::new(store));

        let result = repo.get_items(0, 20, None, &[]).await;
        assert_eq!(
            result,
            Err(ComicVineError::ApiKey(ApiKeyError::Io("disk gone".to_string())))
        );
    }

    #[tokio::test]
    async fn test_list_query_parameters() {
        let mut api = MockComicVineApi::new();
        api.expect_get()
            .withf(|path, query| {
                path == "characters"
                    && has(query, "api_key", "secret")
                    && has(query, "offset", "40")
                    && has(query, "limit", "20")
                    && has(query, "sort", "name:desc")
                    && has(query, "filter", "name:bat,gender:1")
                    && query.iter().any(|(n, _)| n == "field_list")
            })
            .times(1)
            .returning(|_, _| {
                Ok(RawResponse::ok(
                    json!([{"id": 1, "name": "Batman"}, {"id": 2, "name": "Batgirl"}]),
                    40,
                    20,
                    42,
                ))
            });

        let repo: EntityRepository<CharacterInfo> =
            EntityRepository::new(Arc::new(api), key_store(Some("secret")));

        let filters = [
            Filter::Name { value: "bat".to_string() },
            Filter::Gender { gender: crate::domain::Gender::Male },
        ];
        let response = repo
            .get_items(
                40,
                20,
                Some(Sort::new(SortField::Name, SortDirection::Desc)),
                &filters,
            )
            .await
            .unwrap();

        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[1].name.as_deref(), Some("Batgirl"));
        assert_eq!(response.number_of_total_results, 42);
    }

    #[tokio::test]
    async fn test_transport_errors_pass_through() {
        let mut api = MockComicVineApi::new();
        api.expect_get()
            .returning(|_, _| Err(ComicVineError::RequestTimeout));

        let repo: EntityRepository<CharacterInfo> =
            EntityRepository::new(Arc::new(api), key_store(Some("k")));

        assert_eq!(
            repo.get_items(0, 1, None, &[]).await,
            Err(ComicVineError::RequestTimeout)
        );
    }

    #[tokio::test]
    async fn test_wrong_shape_is_exception() {
        let mut api = MockComicVineApi::new();
        api.expect_get()
            .returning(|_, _| Ok(RawResponse::ok(json!([{"name": "no id"}]), 0, 1, 1)));

        let repo: EntityRepository<CharacterInfo> =
            EntityRepository::new(Arc::new(api), key_store(Some("k")));

        assert!(matches!(
            repo.get_items(0, 1, None, &[]).await,
            Err(ComicVineError::Exception(_))
        ));
    }

    #[tokio::test]
    async fn test_details_hit_detail_path() {
        let mut api = MockComicVineApi::new();
        api.expect_get()
            .withf(|path, query| {
                path == "character/4005-1699"
                    && query == &vec![("api_key".to_string(), "k".to_string())]
            })
            .times(1)
            .returning(|_, _| {
                Ok(RawResponse::ok(
                    json!({"id": 1699, "name": "Batman", "real_name": "Bruce Wayne"}),
                    0,
                    1,
                    1,
                ))
            });

        let repo: EntityRepository<CharacterInfo> =
            EntityRepository::new(Arc::new(api), key_store(Some("k")));

        let details = repo.get_item_details_by_id(1699).await.unwrap();
        assert_eq!(details.results.name.as_deref(), Some("Batman"));
        assert_eq!(details.results.extra["real_name"], "Bruce Wayne");
    }

    #[tokio::test]
    async fn test_service_error_details_default() {
        let mut api = MockComicVineApi::new();
        api.expect_get().returning(|_, _| {
            Ok(RawResponse::service_error(
                StatusCode::ObjectNotFound,
                "Object Not Found",
            ))
        });

        let repo: EntityRepository<CharacterInfo> =
            EntityRepository::new(Arc::new(api), key_store(Some("k")));

        let details = repo.get_item_details_by_id(1).await.unwrap();
        assert_eq!(details.status_code, StatusCode::ObjectNotFound);
        assert_eq!(details.results, EntityDetails::default());
    }

    #[tokio::test]
    async fn test_items_by_ids_uses_id_filter() {
        let mut api = MockComicVineApi::new();
        api.expect_get()
            .withf(|_, query| has(query, "filter", "id:3|1|2") && has(query, "limit", "3"))
            .times(1)
            .returning(|_, _| Ok(RawResponse::ok(json!([]), 0, 3, 0)));

        let repo: EntityRepository<CharacterInfo> =
            EntityRepository::new(Arc::new(api), key_store(Some("k")));

        repo.get_items_by_ids(&[3, 1, 2], None).await.unwrap();
        assert!(repo.get_items_by_ids(&[], None).await.unwrap().results.is_empty());
    }
}
