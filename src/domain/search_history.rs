// src/domain/search_history.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult};

/// A previously submitted search query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    pub id: Uuid,
    pub query: String,
    pub date_added: DateTime<Utc>,
}

impl SearchHistoryEntry {
    /// Normalises whitespace; blank queries are not recorded.
    pub fn new(query: &str) -> DomainResult<Self> {
        let query = query.split_whitespace().collect::<Vec<_>>().join(" ");
        if query.is_empty() {
            return Err(DomainError::InvalidValue(
                "Search query cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            query,
            date_added: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_is_normalised() {
        let entry = SearchHistoryEntry::new("  green   lantern ").unwrap();
        assert_eq!(entry.query, "green lantern");
    }

    #[test]
    fn test_blank_query_rejected() {
        assert!(SearchHistoryEntry::new("   ").is_err());
    }
}
