// src/services/search_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{ResourceType, SearchHistoryEntry, SearchInfo};
use crate::error::{AppResult, ComicVineResult};
use crate::integrations::comicvine::ComicVineResponse;
use crate::repositories::{Observation, SearchHistoryRepository, SearchRepository};

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    /// Empty means every kind.
    pub resources: Vec<ResourceType>,
    pub offset: u32,
    pub limit: u32,
}

pub struct SearchService {
    search_repo: Arc<SearchRepository>,
    history_repo: Arc<dyn SearchHistoryRepository>,
}

impl SearchService {
    pub fn new(
        search_repo: Arc<SearchRepository>,
        history_repo: Arc<dyn SearchHistoryRepository>,
    ) -> Self {
        Self {
            search_repo,
            history_repo,
        }
    }

    /// Runs the fan-out search. Non-blank queries are recorded in the
    /// history first; a history failure does not fail the search.
    pub async fn search(
        &self,
        request: SearchRequest,
    ) -> ComicVineResult<ComicVineResponse<Vec<SearchInfo>>> {
        if !request.query.trim().is_empty() {
            if let Err(e) = self.history_repo.insert(&request.query) {
                log::warn!("Could not record search history: {}", e);
            }
        }

        self.search_repo
            .search(
                &request.query,
                &request.resources,
                request.offset,
                request.limit,
            )
            .await
    }

    pub fn history(&self, limit: u32) -> AppResult<Vec<SearchHistoryEntry>> {
        self.history_repo.list(limit)
    }

    pub fn observe_history(&self, limit: u32) -> Observation<Vec<SearchHistoryEntry>> {
        self.history_repo.observe(limit)
    }

    pub fn delete_history_entry(&self, id: Uuid) -> AppResult<bool> {
        self.history_repo.delete(id)
    }

    pub fn clear_history(&self) -> AppResult<usize> {
        self.history_repo.clear()
    }
}
