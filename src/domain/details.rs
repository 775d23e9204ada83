// src/domain/details.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::datetime::option_datetime;
use crate::domain::{EntityKind, ImageInfo};

/// Detail view of any entity kind.
///
/// Common display fields are typed; everything kind-specific (credits,
/// issue lists, powers, ...) is kept in `extra` as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityDetails {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub deck: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<ImageInfo>,
    #[serde(default)]
    pub api_detail_url: Option<String>,
    #[serde(default)]
    pub site_detail_url: Option<String>,
    #[serde(default, with = "option_datetime")]
    pub date_added: Option<NaiveDateTime>,
    #[serde(default, with = "option_datetime")]
    pub date_last_updated: Option<NaiveDateTime>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One row of a (possibly merged) search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchInfo {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    pub resource_type: EntityKind,
    #[serde(default)]
    pub deck: Option<String>,
    #[serde(default)]
    pub image: Option<ImageInfo>,
    #[serde(default, with = "option_datetime")]
    pub date_added: Option<NaiveDateTime>,
    #[serde(default, with = "option_datetime")]
    pub date_last_updated: Option<NaiveDateTime>,
}

/// Shape of story arc and object rows when searched through their list
/// endpoints; they carry no `resource_type`, so it is stamped on here.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UntypedSearchRow {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub deck: Option<String>,
    #[serde(default)]
    pub image: Option<ImageInfo>,
    #[serde(default, with = "option_datetime")]
    pub date_added: Option<NaiveDateTime>,
    #[serde(default, with = "option_datetime")]
    pub date_last_updated: Option<NaiveDateTime>,
}

impl UntypedSearchRow {
    pub(crate) fn into_search_info(self, resource_type: EntityKind) -> SearchInfo {
        SearchInfo {
            id: self.id,
            name: self.name,
            resource_type,
            deck: self.deck,
            image: self.image,
            date_added: self.date_added,
            date_last_updated: self.date_last_updated,
        }
    }
}
