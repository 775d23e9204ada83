// src/domain/favorite.rs
//
// Favorites are local-only: the API knows nothing about them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ComicEntity, EntityKind};

/// A user-marked entity.
///
/// Identified by `(entity_id, entity_type)`. Created on favorite, deleted
/// on unfavorite, never updated in between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteInfo {
    pub entity_id: i64,
    pub entity_type: EntityKind,
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub date_added: DateTime<Utc>,
}

impl FavoriteInfo {
    pub fn new(entity_id: i64, entity_type: EntityKind, name: Option<String>) -> Self {
        Self {
            entity_id,
            entity_type,
            name,
            image_url: None,
            date_added: Utc::now(),
        }
    }

    /// Build a favorite from a list entity, carrying its display fields.
    pub fn from_entity<T: ComicEntity>(entity: &T) -> Self {
        Self {
            entity_id: entity.id(),
            entity_type: T::KIND,
            name: entity.name().map(str::to_string),
            image_url: entity
                .image()
                .and_then(|image| image.preview_url())
                .map(str::to_string),
            date_added: Utc::now(),
        }
    }

    pub fn key(&self) -> (i64, EntityKind) {
        (self.entity_id, self.entity_type)
    }
}

/// Ordering of favorites pages, chosen by the user.
///
/// Applied in memory after fetch: the API has no favorites endpoint to
/// sort server-side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FavoritesSort {
    DateAddedAsc,
    #[default]
    DateAddedDesc,
    NameAsc,
    NameDesc,
}

impl FavoritesSort {
    pub fn apply(&self, favorites: &mut [FavoriteInfo]) {
        match self {
            FavoritesSort::DateAddedAsc => favorites.sort_by(|a, b| {
                a.date_added
                    .cmp(&b.date_added)
                    .then(a.entity_id.cmp(&b.entity_id))
            }),
            FavoritesSort::DateAddedDesc => favorites.sort_by(|a, b| {
                b.date_added
                    .cmp(&a.date_added)
                    .then(b.entity_id.cmp(&a.entity_id))
            }),
            FavoritesSort::NameAsc => favorites.sort_by_key(name_key),
            FavoritesSort::NameDesc => {
                favorites.sort_by_key(|f| std::cmp::Reverse(name_key(f)))
            }
        }
    }

    /// SQL `ORDER BY` clause matching [`FavoritesSort::apply`].
    pub fn order_by(&self) -> &'static str {
        match self {
            FavoritesSort::DateAddedAsc => "date_added ASC, entity_id ASC",
            FavoritesSort::DateAddedDesc => "date_added DESC, entity_id DESC",
            FavoritesSort::NameAsc => "LOWER(COALESCE(name, '')) ASC, entity_id ASC",
            FavoritesSort::NameDesc => "LOWER(COALESCE(name, '')) DESC, entity_id DESC",
        }
    }
}

fn name_key(favorite: &FavoriteInfo) -> (String, i64) {
    (
        favorite.name.clone().unwrap_or_default().to_lowercase(),
        favorite.entity_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn favorite(id: i64, name: &str, minutes_ago: i64) -> FavoriteInfo {
        FavoriteInfo {
            date_added: Utc::now() - Duration::minutes(minutes_ago),
            ..FavoriteInfo::new(id, EntityKind::Character, Some(name.to_string()))
        }
    }

    #[test]
    fn test_sort_by_date_added() {
        let mut favorites = vec![favorite(1, "b", 10), favorite(2, "a", 5), favorite(3, "c", 20)];

        FavoritesSort::DateAddedDesc.apply(&mut favorites);
        let ids: Vec<i64> = favorites.iter().map(|f| f.entity_id).collect();
        assert_eq!(ids, vec![2, 1, 3]);

        FavoritesSort::DateAddedAsc.apply(&mut favorites);
        let ids: Vec<i64> = favorites.iter().map(|f| f.entity_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_sort_by_name_is_case_insensitive() {
        let mut favorites = vec![favorite(1, "batman", 0), favorite(2, "Aquaman", 0)];
        FavoritesSort::NameAsc.apply(&mut favorites);
        assert_eq!(favorites[0].entity_id, 2);
    }

    #[test]
    fn test_sort_serializes_as_tagged_value() {
        let json = serde_json::to_string(&FavoritesSort::NameDesc).unwrap();
        assert_eq!(json, r#"{"type":"name_desc"}"#);
    }
}
