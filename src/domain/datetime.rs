// src/domain/datetime.rs
//
// Comic Vine timestamps look like `2008-06-06 11:27:50` (no `T`, no zone),
// which chrono's default serde format does not accept.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serializer};

pub const COMIC_VINE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn parse_comic_vine_datetime(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), COMIC_VINE_DATETIME_FORMAT).ok()
}

/// `#[serde(with = "...")]` adapter for optional Comic Vine timestamps.
pub mod option_datetime {
    use super::*;

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => {
                serializer.serialize_some(&dt.format(COMIC_VINE_DATETIME_FORMAT).to_string())
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDateTime::parse_from_str(s, COMIC_VINE_DATETIME_FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
