// src/domain/kind.rs
//
// Entity kinds exposed by the Comic Vine API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// A browsable category of the Comic Vine database.
///
/// Serialized in the same snake_case form the API uses for
/// `resource_type` in search results (`character`, `story_arc`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Character,
    Issue,
    Volume,
    Concept,
    Location,
    Movie,
    Object,
    Person,
    StoryArc,
    Team,
}

/// Search resource categories are the same set as entity kinds.
pub type ResourceType = EntityKind;

impl EntityKind {
    pub const ALL: [EntityKind; 10] = [
        EntityKind::Character,
        EntityKind::Issue,
        EntityKind::Volume,
        EntityKind::Concept,
        EntityKind::Location,
        EntityKind::Movie,
        EntityKind::Object,
        EntityKind::Person,
        EntityKind::StoryArc,
        EntityKind::Team,
    ];

    /// Path of the list endpoint, e.g. `characters`.
    pub fn list_path(&self) -> &'static str {
        match self {
            EntityKind::Character => "characters",
            EntityKind::Issue => "issues",
            EntityKind::Volume => "volumes",
            EntityKind::Concept => "concepts",
            EntityKind::Location => "locations",
            EntityKind::Movie => "movies",
            EntityKind::Object => "objects",
            EntityKind::Person => "people",
            EntityKind::StoryArc => "story_arcs",
            EntityKind::Team => "teams",
        }
    }

    /// Singular resource name, used by detail endpoints and the
    /// `resources` search parameter.
    pub fn resource_name(&self) -> &'static str {
        match self {
            EntityKind::Character => "character",
            EntityKind::Issue => "issue",
            EntityKind::Volume => "volume",
            EntityKind::Concept => "concept",
            EntityKind::Location => "location",
            EntityKind::Movie => "movie",
            EntityKind::Object => "object",
            EntityKind::Person => "person",
            EntityKind::StoryArc => "story_arc",
            EntityKind::Team => "team",
        }
    }

    /// Numeric type prefix of detail ids (`4005-1699` for a character).
    pub fn type_id(&self) -> u32 {
        match self {
            EntityKind::Issue => 4000,
            EntityKind::Character => 4005,
            EntityKind::Concept => 4015,
            EntityKind::Location => 4020,
            EntityKind::Movie => 4025,
            EntityKind::Person => 4040,
            EntityKind::StoryArc => 4045,
            EntityKind::Volume => 4050,
            EntityKind::Object => 4055,
            EntityKind::Team => 4060,
        }
    }

    /// Path of the detail endpoint for `id`, e.g. `character/4005-1699`.
    pub fn detail_path(&self, id: i64) -> String {
        format!("{}/{}-{}", self.resource_name(), self.type_id(), id)
    }

    /// Whether the generic `search` endpoint covers this kind.
    ///
    /// Story arcs and objects have to be searched through their own
    /// list endpoints with a name filter.
    pub fn is_generic_searchable(&self) -> bool {
        !matches!(self, EntityKind::StoryArc | EntityKind::Object)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.list_path())
    }
}

impl FromStr for EntityKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace('-', "_");
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.list_path() == needle || kind.resource_name() == needle)
            .ok_or_else(|| DomainError::InvalidValue(format!("Unknown entity kind: {}", s)))
    }
}
