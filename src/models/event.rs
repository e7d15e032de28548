// Copyright (c) EventEye Team
// SPDX-License-Identifier: Apache-2.0

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::events;

/// Event lifecycle. The only transition is draft -> published.
pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_PUBLISHED: &str = "published";

/// Model for an event row
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = events)]
pub struct Event {
    pub id: i32,
    pub organizer_id: i32,
    pub name: String,
    pub description: String,
    pub event_date: NaiveDate,
    pub location: String,
    pub audience_size: Option<i32>,
    pub themes: Vec<String>,
    pub status: String,
    pub view_count: i32,
    pub pitch_deck_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// DTO for creating an event. New events always start as drafts.
#[derive(Debug, Insertable)]
#[diesel(table_name = events)]
pub struct NewEvent {
    pub organizer_id: i32,
    pub name: String,
    pub description: String,
    pub event_date: NaiveDate,
    pub location: String,
    pub audience_size: Option<i32>,
    pub themes: Vec<String>,
    pub status: String,
    pub pitch_deck_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Changeset for editing an event. `None` fields are left untouched.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = events)]
pub struct UpdateEvent {
    pub name: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub audience_size: Option<Option<i32>>,
    pub themes: Option<Vec<String>>,
    pub pitch_deck_url: Option<Option<String>>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Split a comma-separated theme string into clean theme labels, dropping
/// empties. The event form submits themes this way.
pub fn parse_themes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn themes_are_split_and_trimmed() {
        assert_eq!(
            parse_themes(" AI , Robotics ,, Design "),
            vec!["AI", "Robotics", "Design"]
        );
    }

    #[test]
    fn empty_theme_string_yields_no_themes() {
        assert!(parse_themes("  ,  ,").is_empty());
    }
}
