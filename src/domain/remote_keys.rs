// src/domain/remote_keys.rs
//
// Page-boundary bookkeeping for cached paging windows.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::EntityKind;

/// Which list a cached window belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PagingFlavour {
    Browse,
    Recent,
    Favorites,
}

/// Identifies one cached paging window (`issues`, `issues_recent`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PagingKey {
    pub kind: EntityKind,
    pub flavour: PagingFlavour,
}

impl PagingKey {
    pub fn browse(kind: EntityKind) -> Self {
        Self {
            kind,
            flavour: PagingFlavour::Browse,
        }
    }

    pub fn recent(kind: EntityKind) -> Self {
        Self {
            kind,
            flavour: PagingFlavour::Recent,
        }
    }

    pub fn favorites(kind: EntityKind) -> Self {
        Self {
            kind,
            flavour: PagingFlavour::Favorites,
        }
    }
}

impl fmt::Display for PagingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.flavour {
            PagingFlavour::Browse => write!(f, "{}", self.kind.list_path()),
            PagingFlavour::Recent => write!(f, "{}_recent", self.kind.list_path()),
            PagingFlavour::Favorites => write!(f, "{}_favorites", self.kind.list_path()),
        }
    }
}

/// Offsets of the pages around a cached item.
///
/// Written together with the item in one transaction and deleted with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteKeys {
    pub id: i64,
    pub prev_offset: Option<u32>,
    pub next_offset: Option<u32>,
}
