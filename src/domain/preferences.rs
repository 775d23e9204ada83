// src/domain/preferences.rs
//
// Sort/filter selections persisted per entity kind.
//
// Values are replaced wholesale when the user edits them and are
// translated into `sort` / `filter` query parameters at call time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult, EntityKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Name,
    DateAdded,
    DateLastUpdated,
    CoverDate,
    StoreDate,
    IssueNumber,
    StartYear,
}

impl SortField {
    pub fn api_name(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::DateAdded => "date_added",
            SortField::DateLastUpdated => "date_last_updated",
            SortField::CoverDate => "cover_date",
            SortField::StoreDate => "store_date",
            SortField::IssueNumber => "issue_number",
            SortField::StartYear => "start_year",
        }
    }

    pub fn supports(&self, kind: EntityKind) -> bool {
        match self {
            SortField::Name | SortField::DateAdded | SortField::DateLastUpdated => true,
            SortField::CoverDate | SortField::StoreDate | SortField::IssueNumber => {
                kind == EntityKind::Issue
            }
            SortField::StartYear => matches!(
                kind,
                EntityKind::Volume
                    | EntityKind::Concept
                    | EntityKind::Location
                    | EntityKind::Object
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Renders `field:asc` / `field:desc`.
    pub fn to_param(&self) -> String {
        let direction = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        format!("{}:{}", self.field.api_name(), direction)
    }
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> DomainResult<Self> {
        if end < start {
            return Err(DomainError::InvalidValue(format!(
                "Date range end {} is before start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    fn to_param(self) -> String {
        format!("{}|{}", self.start.format("%Y-%m-%d"), self.end.format("%Y-%m-%d"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Other,
    Male,
    Female,
}

impl Gender {
    fn code(&self) -> u8 {
        match self {
            Gender::Other => 0,
            Gender::Male => 1,
            Gender::Female => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Filter {
    Name { value: String },
    DateAdded(DateRange),
    DateLastUpdated(DateRange),
    CoverDate(DateRange),
    StoreDate(DateRange),
    Gender { gender: Gender },
    Ids { ids: Vec<i64> },
}

impl Filter {
    /// Renders one `field:value` pair.
    pub fn to_param(&self) -> String {
        match self {
            // Commas separate filters on the wire.
            Filter::Name { value } => format!("name:{}", value.replace(',', " ").trim()),
            Filter::DateAdded(range) => format!("date_added:{}", range.to_param()),
            Filter::DateLastUpdated(range) => format!("date_last_updated:{}", range.to_param()),
            Filter::CoverDate(range) => format!("cover_date:{}", range.to_param()),
            Filter::StoreDate(range) => format!("store_date:{}", range.to_param()),
            Filter::Gender { gender } => format!("gender:{}", gender.code()),
            Filter::Ids { ids } => {
                let joined: Vec<String> = ids.iter().map(i64::to_string).collect();
                format!("id:{}", joined.join("|"))
            }
        }
    }

    pub fn supports(&self, kind: EntityKind) -> bool {
        match self {
            Filter::Name { .. }
            | Filter::DateAdded(_)
            | Filter::DateLastUpdated(_)
            | Filter::Ids { .. } => true,
            Filter::CoverDate(_) | Filter::StoreDate(_) => kind == EntityKind::Issue,
            Filter::Gender { .. } => kind == EntityKind::Character,
        }
    }
}

/// Joins filters into the `filter` query value, or `None` when empty.
pub fn filter_param(filters: &[Filter]) -> Option<String> {
    if filters.is_empty() {
        return None;
    }
    let rendered: Vec<String> = filters.iter().map(Filter::to_param).collect();
    Some(rendered.join(","))
}

/// The persisted sort/filter bundle of one list screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPreferences {
    #[serde(default)]
    pub sort: Option<Sort>,
    #[serde(default)]
    pub filters: Vec<Filter>,
}

impl ListPreferences {
    pub fn validate_for(&self, kind: EntityKind) -> DomainResult<()> {
        if let Some(sort) = &self.sort {
            if !sort.field.supports(kind) {
                return Err(DomainError::InvalidValue(format!(
                    "Cannot sort {} by {}",
                    kind,
                    sort.field.api_name()
                )));
            }
        }
        if let Some(filter) = self.filters.iter().find(|f| !f.supports(kind)) {
            return Err(DomainError::InvalidValue(format!(
                "Filter {} does not apply to {}",
                filter.to_param(),
                kind
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_sort_param() {
        let sort = Sort::new(SortField::Name, SortDirection::Asc);
        assert_eq!(sort.to_param(), "name:asc");
        let sort = Sort::new(SortField::DateLastUpdated, SortDirection::Desc);
        assert_eq!(sort.to_param(), "date_last_updated:desc");
    }

    #[test]
    fn test_filter_params() {
        let range = DateRange::new(date("2020-01-01"), date("2020-12-31")).unwrap();
        assert_eq!(
            Filter::DateAdded(range).to_param(),
            "date_added:2020-01-01|2020-12-31"
        );
        assert_eq!(Filter::Ids { ids: vec![1, 2, 3] }.to_param(), "id:1|2|3");
        assert_eq!(
            Filter::Gender { gender: Gender::Female }.to_param(),
            "gender:2"
        );
        assert_eq!(
            Filter::Name { value: "Spider, Man".to_string() }.to_param(),
            "name:Spider  Man"
        );
    }

    #[test]
    fn test_filters_join_with_comma() {
        let filters = vec![
            Filter::Name { value: "Batman".to_string() },
            Filter::Gender { gender: Gender::Male },
        ];
        assert_eq!(filter_param(&filters).unwrap(), "name:Batman,gender:1");
        assert!(filter_param(&[]).is_none());
    }

    #[test]
    fn test_reversed_range_rejected() {
        assert!(DateRange::new(date("2021-01-01"), date("2020-01-01")).is_err());
    }

    #[test]
    fn test_validate_for_kind() {
        let prefs = ListPreferences {
            sort: Some(Sort::new(SortField::CoverDate, SortDirection::Desc)),
            filters: vec![],
        };
        assert!(prefs.validate_for(EntityKind::Issue).is_ok());
        assert!(prefs.validate_for(EntityKind::Character).is_err());

        let prefs = ListPreferences {
            sort: None,
            filters: vec![Filter::Gender { gender: Gender::Male }],
        };
        assert!(prefs.validate_for(EntityKind::Team).is_err());
    }

    #[test]
    fn test_preferences_round_trip_as_tagged_json() {
        let prefs = ListPreferences {
            sort: Some(Sort::new(SortField::Name, SortDirection::Desc)),
            filters: vec![Filter::Name { value: "Flash".to_string() }],
        };
        let json = serde_json::to_string(&prefs).unwrap();
        assert!(json.contains(r#""type":"name""#));
        let back: ListPreferences = serde_json::from_str(&json).unwrap();
        assert_eq!(back, prefs);
    }
}
