// src/repositories/search_repository.rs
//
// Search fan-out
//
// ARCHITECTURE:
// - The generic `search` endpoint does not cover story arcs and objects,
//   so one search becomes up to three concurrent requests:
//   generic search, story arcs by name, objects by name
// - Offset and limit are split evenly (ceiling) across active requests
// - Results are concatenated in that order and the counts summed
//
// CRITICAL RULES:
// - Fail fast: any failed request fails the whole search and the
//   in-flight siblings are dropped
// - A non-OK status in any response becomes the merged status, with no items

use std::sync::Arc;

use futures::future::try_join_all;

use crate::domain::details::UntypedSearchRow;
use crate::domain::{EntityKind, Filter, ResourceType, SearchInfo};
use crate::error::ComicVineResult;
use crate::integrations::comicvine::{ComicVineApi, ComicVineResponse};
use crate::repositories::entity_repository::{decode_response, param, require_api_key};
use crate::repositories::preferences_repository::ApiKeyStore;

/// One leg of a fanned-out search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCategory {
    /// The `search` endpoint, restricted to these kinds.
    Generic(Vec<EntityKind>),
    StoryArcs,
    Objects,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubRequest {
    pub category: SearchCategory,
    pub offset: u32,
    pub limit: u32,
}

/// Splits a search over `resources` into sub-requests.
///
/// An empty `resources` means every kind.
pub fn plan_search(resources: &[ResourceType], offset: u32, limit: u32) -> Vec<SubRequest> {
    let wanted = |kind: EntityKind| resources.is_empty() || resources.contains(&kind);

    let generic: Vec<EntityKind> = EntityKind::ALL
        .into_iter()
        .filter(|kind| kind.is_generic_searchable() && wanted(*kind))
        .collect();

    let mut categories = Vec::new();
    if !generic.is_empty() {
        categories.push(SearchCategory::Generic(generic));
    }
    if wanted(EntityKind::StoryArc) {
        categories.push(SearchCategory::StoryArcs);
    }
    if wanted(EntityKind::Object) {
        categories.push(SearchCategory::Objects);
    }

    let active = categories.len().max(1) as u32;
    let sub_offset = offset.div_ceil(active);
    let sub_limit = limit.div_ceil(active);

    categories
        .into_iter()
        .map(|category| SubRequest {
            category,
            offset: sub_offset,
            limit: sub_limit,
        })
        .collect()
}

/// Folds sub-responses into one page that echoes the caller's window.
pub fn merge_responses(
    responses: Vec<ComicVineResponse<Vec<SearchInfo>>>,
    offset: u32,
    limit: u32,
) -> ComicVineResponse<Vec<SearchInfo>> {
    let mut merged = ComicVineResponse::<Vec<SearchInfo>>::empty(offset, limit);

    for response in responses {
        if !response.status_code.is_ok() {
            if merged.status_code.is_ok() {
                merged.status_code = response.status_code;
                merged.error = response.error;
            }
            continue;
        }
        merged.number_of_page_results += response.number_of_page_results;
        merged.number_of_total_results += response.number_of_total_results;
        merged.results.extend(response.results);
    }

    if !merged.status_code.is_ok() {
        merged.results.clear();
        merged.number_of_page_results = 0;
        merged.number_of_total_results = 0;
    }
    merged
}

pub struct SearchRepository {
    api: Arc<dyn ComicVineApi>,
    keys: Arc<dyn ApiKeyStore>,
}

impl SearchRepository {
    pub fn new(api: Arc<dyn ComicVineApi>, keys: Arc<dyn ApiKeyStore>) -> Self {
        Self { api, keys }
    }

    pub async fn search(
        &self,
        query: &str,
        resources: &[ResourceType],
        offset: u32,
        limit: u32,
    ) -> ComicVineResult<ComicVineResponse<Vec<SearchInfo>>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(ComicVineResponse::empty(offset, limit));
        }

        let api_key = require_api_key(self.keys.as_ref())?;
        let plan = plan_search(resources, offset, limit);
        log::debug!("Searching '{}' across {} requests", query, plan.len());

        let requests = plan
            .iter()
            .map(|request| self.run(request, query, &api_key));
        let responses = try_join_all(requests).await.inspect_err(|e| {
            log::warn!("Search for '{}' failed: {}", query, e);
        })?;

        Ok(merge_responses(responses, offset, limit))
    }

    async fn run(
        &self,
        request: &SubRequest,
        query: &str,
        api_key: &str,
    ) -> ComicVineResult<ComicVineResponse<Vec<SearchInfo>>> {
        match &request.category {
            SearchCategory::Generic(kinds) => {
                let resources: Vec<&str> = kinds.iter().map(|k| k.resource_name()).collect();
                // The search endpoint pages by page number, not offset.
                let page = match request.limit {
                    0 => 1,
                    limit => request.offset / limit + 1,
                };
                let params = vec![
                    param("api_key", api_key),
                    param("query", query),
                    param("resources", resources.join(",")),
                    param("page", page),
                    param("limit", request.limit),
                ];
                let raw = self.api.get("search", params).await?;
                decode_response(raw)
            }
            SearchCategory::StoryArcs => {
                self.search_by_name(EntityKind::StoryArc, request, query, api_key)
                    .await
            }
            SearchCategory::Objects => {
                self.search_by_name(EntityKind::Object, request, query, api_key)
                    .await
            }
        }
    }

    async fn search_by_name(
        &self,
        kind: EntityKind,
        request: &SubRequest,
        query: &str,
        api_key: &str,
    ) -> ComicVineResult<ComicVineResponse<Vec<SearchInfo>>> {
        let filter = Filter::Name {
            value: query.to_string(),
        };
        let params = vec![
            param("api_key", api_key),
            param("filter", filter.to_param()),
            param("offset", request.offset),
            param("limit", request.limit),
        ];
        let raw = self.api.get(kind.list_path(), params).await?;
        let response = decode_response::<Vec<UntypedSearchRow>>(raw)?;
        Ok(response.map(|rows| {
            rows.into_iter()
                .map(|row| row.into_search_info(kind))
                .collect()
        }))
    }
}
