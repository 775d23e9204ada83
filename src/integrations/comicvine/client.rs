// src/integrations/comicvine/client.rs
//
// Comic Vine REST client
//
// ARCHITECTURE:
// - Thin transport over reqwest: one GET per call, JSON envelope out
// - Classifies transport outcomes into ComicVineError values
// - Knows nothing about API keys, paging or caching (repositories do)
//
// CRITICAL RULES:
// - No retries here; retry is a caller decision
// - Never log the query string (it carries the API key)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult, ComicVineError, ComicVineResult};
use crate::integrations::comicvine::response::RawResponse;

/// HTTP seam used by every remote repository.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComicVineApi: Send + Sync {
    /// GET `{base}/{path}/?format=json&{query}`.
    async fn get(&self, path: &str, query: Vec<(String, String)>) -> ComicVineResult<RawResponse>;
}

/// reqwest-backed Comic Vine client
pub struct ComicVineClient {
    base_url: String,
    http_client: Client,
}

impl ComicVineClient {
    /// Create a client using the timeouts and user agent from `config`
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_http_client(&config.api_base_url, http_client))
    }

    /// Create a client over an already configured reqwest client
    pub fn with_http_client(base_url: &str, http_client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        }
    }

    /// Comic Vine requires the trailing slash on every resource path.
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/", self.base_url, path.trim_matches('/'))
    }
}

#[async_trait]
impl ComicVineApi for ComicVineClient {
    async fn get(&self, path: &str, query: Vec<(String, String)>) -> ComicVineResult<RawResponse> {
        let url = self.endpoint(path);
        log::debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .query(&[("format", "json")])
            .query(&query)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("Comic Vine returned HTTP {} for {}", status, url);
            return Err(ComicVineError::HttpError {
                code: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        response.json::<RawResponse>().await.map_err(|e| {
            if e.is_timeout() {
                ComicVineError::RequestTimeout
            } else {
                ComicVineError::Exception(format!(
                    "Failed to parse Comic Vine response: {}",
                    e.without_url()
                ))
            }
        })
    }
}

/// Map a reqwest send failure onto the error taxonomy.
pub fn classify_transport_error(err: reqwest::Error) -> ComicVineError {
    if err.is_timeout() {
        log::warn!("Comic Vine request timed out");
        ComicVineError::RequestTimeout
    } else if err.is_connect() {
        log::warn!("Comic Vine unreachable: {}", err.without_url());
        ComicVineError::NoNetworkConnection
    } else {
        ComicVineError::Exception(err.without_url().to_string())
    }
}
