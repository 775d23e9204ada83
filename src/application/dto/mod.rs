// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL RULES:
// - DTOs are for serialization only
// - No business logic in DTOs
// - Conversion FROM domain values only (never into them)
// - Dates are rendered as strings so every front end reads the same form

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::datetime::COMIC_VINE_DATETIME_FORMAT;
use crate::domain::{
    ComicEntity, EntityDetails, EntityKind, FavoriteInfo, SearchHistoryEntry, SearchInfo,
};
use crate::integrations::ComicVineResponse;

// ============================================================================
// LIST ITEMS
// ============================================================================

/// One row of a list, recent or favorites window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDto {
    pub id: i64,
    pub kind: EntityKind,
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub date_added: Option<String>,
}

impl ItemDto {
    pub fn from_entity<T: ComicEntity>(entity: &T) -> Self {
        Self {
            id: entity.id(),
            kind: T::KIND,
            name: entity.name().map(str::to_string),
            image_url: entity
                .image()
                .and_then(|image| image.preview_url())
                .map(str::to_string),
            date_added: entity
                .date_added()
                .map(|date| date.format(COMIC_VINE_DATETIME_FORMAT).to_string()),
        }
    }
}

/// Snapshot of a pager's window after a load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDto {
    pub kind: EntityKind,
    pub items: Vec<ItemDto>,
    pub end_reached: bool,
}

// ============================================================================
// DETAILS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailsDto {
    pub id: i64,
    pub kind: EntityKind,
    pub name: Option<String>,
    pub deck: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub site_detail_url: Option<String>,
    pub date_added: Option<String>,
    pub date_last_updated: Option<String>,
    /// Kind-specific fields, untouched.
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DetailsDto {
    pub fn from_details(kind: EntityKind, details: EntityDetails) -> Self {
        Self {
            id: details.id,
            kind,
            name: details.name,
            deck: details.deck,
            description: details.description,
            image_url: details
                .image
                .as_ref()
                .and_then(|image| image.preview_url())
                .map(str::to_string),
            site_detail_url: details.site_detail_url,
            date_added: details
                .date_added
                .map(|date| date.format(COMIC_VINE_DATETIME_FORMAT).to_string()),
            date_last_updated: details
                .date_last_updated
                .map(|date| date.format(COMIC_VINE_DATETIME_FORMAT).to_string()),
            extra: details.extra,
        }
    }
}

// ============================================================================
// SEARCH
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultDto {
    pub id: i64,
    pub kind: EntityKind,
    pub name: Option<String>,
    pub deck: Option<String>,
    pub image_url: Option<String>,
}

impl From<SearchInfo> for SearchResultDto {
    fn from(info: SearchInfo) -> Self {
        Self {
            id: info.id,
            kind: info.resource_type,
            name: info.name,
            deck: info.deck,
            image_url: info
                .image
                .as_ref()
                .and_then(|image| image.preview_url())
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPageDto {
    pub results: Vec<SearchResultDto>,
    pub offset: u32,
    pub limit: u32,
    pub number_of_page_results: u32,
    pub number_of_total_results: u32,
}

impl From<ComicVineResponse<Vec<SearchInfo>>> for SearchPageDto {
    fn from(response: ComicVineResponse<Vec<SearchInfo>>) -> Self {
        Self {
            offset: response.offset,
            limit: response.limit,
            number_of_page_results: response.number_of_page_results,
            number_of_total_results: response.number_of_total_results,
            results: response.results.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntryDto {
    pub id: Uuid,
    pub query: String,
    pub date_added: String,
}

impl From<SearchHistoryEntry> for HistoryEntryDto {
    fn from(entry: SearchHistoryEntry) -> Self {
        Self {
            id: entry.id,
            query: entry.query,
            date_added: entry.date_added.to_rfc3339(),
        }
    }
}

// ============================================================================
// FAVORITES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteDto {
    pub id: i64,
    pub kind: EntityKind,
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub date_added: String,
}

impl From<FavoriteInfo> for FavoriteDto {
    fn from(favorite: FavoriteInfo) -> Self {
        Self {
            id: favorite.entity_id,
            kind: favorite.entity_type,
            name: favorite.name,
            image_url: favorite.image_url,
            date_added: favorite.date_added.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ImageInfo, VolumeInfo};
    use crate::integrations::StatusCode;
    use chrono::NaiveDate;

    #[test]
    fn test_item_from_entity() {
        let volume: VolumeInfo = serde_json::from_value(serde_json::json!({
            "id": 796,
            "name": "Saga",
            "image": {"small_url": "https://img/small.jpg"},
            "date_added": "2012-03-14 10:00:00"
        }))
        .unwrap();

        let dto = ItemDto::from_entity(&volume);
        assert_eq!(dto.kind, EntityKind::Volume);
        assert_eq!(dto.name.as_deref(), Some("Saga"));
        assert_eq!(dto.image_url.as_deref(), Some("https://img/small.jpg"));
        assert_eq!(dto.date_added.as_deref(), Some("2012-03-14 10:00:00"));
    }

    #[test]
    fn test_search_page_keeps_counts() {
        let response = ComicVineResponse {
            status_code: StatusCode::Ok,
            error: "OK".to_string(),
            limit: 10,
            offset: 0,
            number_of_page_results: 1,
            number_of_total_results: 42,
            results: vec![SearchInfo {
                id: 1,
                name: Some("Batman".to_string()),
                resource_type: EntityKind::Character,
                deck: None,
                image: Some(ImageInfo {
                    thumb_url: Some("https://img/thumb.jpg".to_string()),
                    ..ImageInfo::default()
                }),
                date_added: NaiveDate::from_ymd_opt(2008, 6, 6)
                    .and_then(|d| d.and_hms_opt(0, 0, 0)),
                date_last_updated: None,
            }],
        };

        let dto = SearchPageDto::from(response);
        assert_eq!(dto.number_of_total_results, 42);
        assert_eq!(dto.results[0].kind, EntityKind::Character);
        assert_eq!(
            dto.results[0].image_url.as_deref(),
            Some("https://img/thumb.jpg")
        );
    }

    #[test]
    fn test_favorite_serializes_kind_snake_case() {
        let favorite = FavoriteInfo::new(45, EntityKind::StoryArc, Some("Knightfall".into()));
        let json = serde_json::to_value(FavoriteDto::from(favorite)).unwrap();
        assert_eq!(json["kind"], "story_arc");
        assert_eq!(json["id"], 45);
    }
}
