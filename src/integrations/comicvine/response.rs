// src/integrations/comicvine/response.rs
//
// Comic Vine response envelope.
//
// Every endpoint wraps its payload the same way:
//   { status_code, error, limit, offset, number_of_page_results,
//     number_of_total_results, results, version }
// On failure the API still answers HTTP 200 with a non-OK status_code and
// `results: []`, which would not parse as a detail object. The envelope is
// therefore read with `results` untyped first and decoded afterwards.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// API-level status carried in the body (not the HTTP status).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum StatusCode {
    Ok,
    InvalidApiKey,
    ObjectNotFound,
    UrlFormatError,
    JsonpCallbackMissing,
    FilterError,
    SubscriberOnlyVideo,
    RateLimitExceeded,
    Unknown(i32),
}

impl StatusCode {
    pub fn code(&self) -> i32 {
        match self {
            StatusCode::Ok => 1,
            StatusCode::InvalidApiKey => 100,
            StatusCode::ObjectNotFound => 101,
            StatusCode::UrlFormatError => 102,
            StatusCode::JsonpCallbackMissing => 103,
            StatusCode::FilterError => 104,
            StatusCode::SubscriberOnlyVideo => 105,
            StatusCode::RateLimitExceeded => 107,
            StatusCode::Unknown(code) => *code,
        }
    }

    pub fn is_ok(&self) -> bool {
        *self == StatusCode::Ok
    }
}

impl From<i32> for StatusCode {
    fn from(code: i32) -> Self {
        match code {
            1 => StatusCode::Ok,
            100 => StatusCode::InvalidApiKey,
            101 => StatusCode::ObjectNotFound,
            102 => StatusCode::UrlFormatError,
            103 => StatusCode::JsonpCallbackMissing,
            104 => StatusCode::FilterError,
            105 => StatusCode::SubscriberOnlyVideo,
            107 => StatusCode::RateLimitExceeded,
            other => StatusCode::Unknown(other),
        }
    }
}

impl From<StatusCode> for i32 {
    fn from(status: StatusCode) -> Self {
        status.code()
    }
}

/// Envelope as received, `results` not yet typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawResponse {
    pub status_code: StatusCode,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub number_of_page_results: u32,
    #[serde(default)]
    pub number_of_total_results: u32,
    #[serde(default)]
    pub results: serde_json::Value,
}

impl RawResponse {
    /// Successful envelope around `results`.
    pub fn ok(results: serde_json::Value, offset: u32, limit: u32, total: u32) -> Self {
        let page = match &results {
            serde_json::Value::Array(items) => items.len() as u32,
            serde_json::Value::Null => 0,
            _ => 1,
        };
        Self {
            status_code: StatusCode::Ok,
            error: "OK".to_string(),
            limit,
            offset,
            number_of_page_results: page,
            number_of_total_results: total,
            results,
        }
    }

    /// Service-level failure envelope, as the API sends it.
    pub fn service_error(status_code: StatusCode, error: &str) -> Self {
        Self {
            status_code,
            error: error.to_string(),
            limit: 0,
            offset: 0,
            number_of_page_results: 0,
            number_of_total_results: 0,
            results: serde_json::Value::Array(Vec::new()),
        }
    }

    /// Types `results`. A non-OK envelope decodes to `T::default()`.
    pub fn decode<T>(self) -> Result<ComicVineResponse<T>, serde_json::Error>
    where
        T: DeserializeOwned + Default,
    {
        let results = if self.status_code.is_ok() {
            serde_json::from_value(self.results)?
        } else {
            T::default()
        };

        Ok(ComicVineResponse {
            status_code: self.status_code,
            error: self.error,
            limit: self.limit,
            offset: self.offset,
            number_of_page_results: self.number_of_page_results,
            number_of_total_results: self.number_of_total_results,
            results,
        })
    }
}

/// Typed Comic Vine response.
#[derive(Debug, Clone, PartialEq)]
pub struct ComicVineResponse<T> {
    pub status_code: StatusCode,
    pub error: String,
    pub limit: u32,
    pub offset: u32,
    pub number_of_page_results: u32,
    pub number_of_total_results: u32,
    pub results: T,
}

impl<T> ComicVineResponse<T> {
    /// Empty OK page, used when a request is answered without the network.
    pub fn empty(offset: u32, limit: u32) -> Self
    where
        T: Default,
    {
        Self {
            status_code: StatusCode::Ok,
            error: "OK".to_string(),
            limit,
            offset,
            number_of_page_results: 0,
            number_of_total_results: 0,
            results: T::default(),
        }
    }

    pub fn map<U, F>(self, f: F) -> ComicVineResponse<U>
    where
        F: FnOnce(T) -> U,
    {
        ComicVineResponse {
            status_code: self.status_code,
            error: self.error,
            limit: self.limit,
            offset: self.offset,
            number_of_page_results: self.number_of_page_results,
            number_of_total_results: self.number_of_total_results,
            results: f(self.results),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntityDetails;
    use serde_json::json;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(StatusCode::from(1), StatusCode::Ok);
        assert_eq!(StatusCode::from(100), StatusCode::InvalidApiKey);
        assert_eq!(StatusCode::from(999), StatusCode::Unknown(999));
        assert_eq!(StatusCode::RateLimitExceeded.code(), 107);
    }

    #[test]
    fn test_parse_envelope() {
        let body = json!({
            "error": "OK",
            "limit": 2,
            "offset": 0,
            "number_of_page_results": 2,
            "number_of_total_results": 150000,
            "status_code": 1,
            "results": [{"id": 1}, {"id": 2}],
            "version": "1.0"
        });

        let raw: RawResponse = serde_json::from_value(body).unwrap();
        assert!(raw.status_code.is_ok());
        assert_eq!(raw.number_of_total_results, 150000);
    }

    #[test]
    fn test_error_envelope_decodes_to_default_details() {
        let body = json!({
            "error": "Invalid API Key",
            "limit": 0,
            "offset": 0,
            "number_of_page_results": 0,
            "number_of_total_results": 0,
            "status_code": 100,
            "results": []
        });

        let raw: RawResponse = serde_json::from_value(body).unwrap();
        let response = raw.decode::<EntityDetails>().unwrap();
        assert_eq!(response.status_code, StatusCode::InvalidApiKey);
        assert_eq!(response.error, "Invalid API Key");
        assert_eq!(response.results, EntityDetails::default());
    }

    #[test]
    fn test_ok_helper_counts_page() {
        let raw = RawResponse::ok(json!([{"id": 1}, {"id": 2}, {"id": 3}]), 40, 20, 43);
        assert_eq!(raw.number_of_page_results, 3);
        assert_eq!(raw.offset, 40);
    }
}
