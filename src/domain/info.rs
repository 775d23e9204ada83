// src/domain/info.rs
//
// List-level entity values, one per Comic Vine kind.
//
// Values are created by deserializing API responses and are read-only
// afterwards. The cache stores them as JSON and hands them back unchanged.

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::datetime::option_datetime;
use crate::domain::EntityKind;

/// Image URLs attached to most Comic Vine resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageInfo {
    pub icon_url: Option<String>,
    pub medium_url: Option<String>,
    pub screen_url: Option<String>,
    pub small_url: Option<String>,
    pub super_url: Option<String>,
    pub thumb_url: Option<String>,
    pub tiny_url: Option<String>,
    pub original_url: Option<String>,
}

impl ImageInfo {
    /// Best URL for a list thumbnail, falling back to larger renditions.
    pub fn preview_url(&self) -> Option<&str> {
        self.small_url
            .as_deref()
            .or(self.medium_url.as_deref())
            .or(self.thumb_url.as_deref())
            .or(self.original_url.as_deref())
    }
}

/// Reference to another resource (`volume`, `publisher`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

/// Common surface of every list entity.
pub trait ComicEntity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    /// `field_list` sent to the list endpoint so responses only carry
    /// what the struct reads.
    const FIELD_LIST: &'static str;

    fn id(&self) -> i64;
    fn name(&self) -> Option<&str>;
    fn image(&self) -> Option<&ImageInfo>;
    fn date_added(&self) -> Option<NaiveDateTime>;
}

macro_rules! comic_entity {
    ($ty:ty, $kind:expr, $fields:expr) => {
        impl ComicEntity for $ty {
            const KIND: EntityKind = $kind;
            const FIELD_LIST: &'static str = $fields;

            fn id(&self) -> i64 {
                self.id
            }

            fn name(&self) -> Option<&str> {
                self.name.as_deref()
            }

            fn image(&self) -> Option<&ImageInfo> {
                self.image.as_ref()
            }

            fn date_added(&self) -> Option<NaiveDateTime> {
                self.date_added
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterInfo {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub deck: Option<String>,
    #[serde(default)]
    pub gender: Option<u8>,
    #[serde(default)]
    pub publisher: Option<ResourceRef>,
    #[serde(default)]
    pub count_of_issue_appearances: Option<u32>,
    #[serde(default)]
    pub image: Option<ImageInfo>,
    #[serde(default, with = "option_datetime")]
    pub date_added: Option<NaiveDateTime>,
    #[serde(default, with = "option_datetime")]
    pub date_last_updated: Option<NaiveDateTime>,
}

comic_entity!(
    CharacterInfo,
    EntityKind::Character,
    "id,name,real_name,deck,gender,publisher,count_of_issue_appearances,image,date_added,date_last_updated"
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueInfo {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub issue_number: Option<String>,
    #[serde(default)]
    pub volume: Option<ResourceRef>,
    #[serde(default)]
    pub cover_date: Option<String>,
    #[serde(default)]
    pub store_date: Option<String>,
    #[serde(default)]
    pub image: Option<ImageInfo>,
    #[serde(default, with = "option_datetime")]
    pub date_added: Option<NaiveDateTime>,
    #[serde(default, with = "option_datetime")]
    pub date_last_updated: Option<NaiveDateTime>,
}

comic_entity!(
    IssueInfo,
    EntityKind::Issue,
    "id,name,issue_number,volume,cover_date,store_date,image,date_added,date_last_updated"
);

impl IssueInfo {
    /// `Volume #12` style label used when the issue has no name.
    pub fn display_title(&self) -> String {
        let volume = self
            .volume
            .as_ref()
            .and_then(|v| v.name.as_deref())
            .unwrap_or("Unknown volume");
        match (&self.name, &self.issue_number) {
            (Some(name), Some(number)) => format!("{} #{}: {}", volume, number, name),
            (None, Some(number)) => format!("{} #{}", volume, number),
            (Some(name), None) => name.clone(),
            (None, None) => volume.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeInfo {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub start_year: Option<String>,
    #[serde(default)]
    pub publisher: Option<ResourceRef>,
    #[serde(default)]
    pub count_of_issues: Option<u32>,
    #[serde(default)]
    pub image: Option<ImageInfo>,
    #[serde(default, with = "option_datetime")]
    pub date_added: Option<NaiveDateTime>,
    #[serde(default, with = "option_datetime")]
    pub date_last_updated: Option<NaiveDateTime>,
}

comic_entity!(
    VolumeInfo,
    EntityKind::Volume,
    "id,name,start_year,publisher,count_of_issues,image,date_added,date_last_updated"
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptInfo {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub deck: Option<String>,
    #[serde(default)]
    pub start_year: Option<String>,
    #[serde(default)]
    pub count_of_issue_appearances: Option<u32>,
    #[serde(default)]
    pub image: Option<ImageInfo>,
    #[serde(default, with = "option_datetime")]
    pub date_added: Option<NaiveDateTime>,
    #[serde(default, with = "option_datetime")]
    pub date_last_updated: Option<NaiveDateTime>,
}

comic_entity!(
    ConceptInfo,
    EntityKind::Concept,
    "id,name,deck,start_year,count_of_issue_appearances,image,date_added,date_last_updated"
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub deck: Option<String>,
    #[serde(default)]
    pub start_year: Option<String>,
    #[serde(default)]
    pub count_of_issue_appearances: Option<u32>,
    #[serde(default)]
    pub image: Option<ImageInfo>,
    #[serde(default, with = "option_datetime")]
    pub date_added: Option<NaiveDateTime>,
    #[serde(default, with = "option_datetime")]
    pub date_last_updated: Option<NaiveDateTime>,
}

comic_entity!(
    LocationInfo,
    EntityKind::Location,
    "id,name,deck,start_year,count_of_issue_appearances,image,date_added,date_last_updated"
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieInfo {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub deck: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub image: Option<ImageInfo>,
    #[serde(default, with = "option_datetime")]
    pub date_added: Option<NaiveDateTime>,
    #[serde(default, with = "option_datetime")]
    pub date_last_updated: Option<NaiveDateTime>,
}

comic_entity!(
    MovieInfo,
    EntityKind::Movie,
    "id,name,deck,release_date,runtime,rating,image,date_added,date_last_updated"
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectInfo {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub deck: Option<String>,
    #[serde(default)]
    pub start_year: Option<String>,
    #[serde(default)]
    pub count_of_issue_appearances: Option<u32>,
    #[serde(default)]
    pub image: Option<ImageInfo>,
    #[serde(default, with = "option_datetime")]
    pub date_added: Option<NaiveDateTime>,
    #[serde(default, with = "option_datetime")]
    pub date_last_updated: Option<NaiveDateTime>,
}

comic_entity!(
    ObjectInfo,
    EntityKind::Object,
    "id,name,deck,start_year,count_of_issue_appearances,image,date_added,date_last_updated"
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonInfo {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub deck: Option<String>,
    #[serde(default)]
    pub birth: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub hometown: Option<String>,
    #[serde(default)]
    pub image: Option<ImageInfo>,
    #[serde(default, with = "option_datetime")]
    pub date_added: Option<NaiveDateTime>,
    #[serde(default, with = "option_datetime")]
    pub date_last_updated: Option<NaiveDateTime>,
}

comic_entity!(
    PersonInfo,
    EntityKind::Person,
    "id,name,deck,birth,country,hometown,image,date_added,date_last_updated"
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryArcInfo {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub deck: Option<String>,
    #[serde(default)]
    pub publisher: Option<ResourceRef>,
    #[serde(default)]
    pub count_of_issue_appearances: Option<u32>,
    #[serde(default)]
    pub image: Option<ImageInfo>,
    #[serde(default, with = "option_datetime")]
    pub date_added: Option<NaiveDateTime>,
    #[serde(default, with = "option_datetime")]
    pub date_last_updated: Option<NaiveDateTime>,
}

comic_entity!(
    StoryArcInfo,
    EntityKind::StoryArc,
    "id,name,deck,publisher,count_of_issue_appearances,image,date_added,date_last_updated"
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub deck: Option<String>,
    #[serde(default)]
    pub publisher: Option<ResourceRef>,
    #[serde(default)]
    pub count_of_team_members: Option<u32>,
    #[serde(default)]
    pub image: Option<ImageInfo>,
    #[serde(default, with = "option_datetime")]
    pub date_added: Option<NaiveDateTime>,
    #[serde(default, with = "option_datetime")]
    pub date_last_updated: Option<NaiveDateTime>,
}

comic_entity!(
    TeamInfo,
    EntityKind::Team,
    "id,name,deck,publisher,count_of_team_members,image,date_added,date_last_updated"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_from_api_json() {
        let json = r#"{
            "id": 1699,
            "name": "Batman",
            "real_name": "Bruce Wayne",
            "gender": 1,
            "publisher": {"id": 10, "name": "DC Comics", "api_detail_url": "x"},
            "image": {"small_url": "https://img/small.jpg"},
            "date_added": "2008-06-06 11:27:50",
            "date_last_updated": null,
            "aliases": "The Bat"
        }"#;

        let character: CharacterInfo = serde_json::from_str(json).unwrap();
        assert_eq!(character.id(), 1699);
        assert_eq!(character.name(), Some("Batman"));
        assert_eq!(character.publisher.unwrap().name.as_deref(), Some("DC Comics"));
        assert_eq!(
            character.image.unwrap().preview_url(),
            Some("https://img/small.jpg")
        );
        assert!(character.date_added.is_some());
        assert!(character.date_last_updated.is_none());
    }

    #[test]
    fn test_issue_display_title() {
        let issue: IssueInfo = serde_json::from_str(
            r#"{"id": 6, "issue_number": "12", "volume": {"id": 3, "name": "Detective Comics"}}"#,
        )
        .unwrap();
        assert_eq!(issue.display_title(), "Detective Comics #12");
    }

    #[test]
    fn test_kind_constants() {
        assert_eq!(StoryArcInfo::KIND, EntityKind::StoryArc);
        assert!(PersonInfo::FIELD_LIST.starts_with("id,"));
    }
}
