// Copyright (c) EventEye Team
// SPDX-License-Identifier: Apache-2.0

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::sponsor_interests;

/// Status recorded when a sponsor expresses interest in an event. Presence of
/// the row is what "interested" means; removal deletes the row outright.
pub const STATUS_INTERESTED: &str = "interested";

/// Model for a sponsor interest row (the sponsor/event join table)
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = sponsor_interests)]
pub struct SponsorInterest {
    pub id: i32,
    pub sponsor_id: i32,
    pub event_id: i32,
    pub status: String,
    pub created_at: NaiveDateTime,
}

/// DTO for recording a new interest
#[derive(Debug, Insertable)]
#[diesel(table_name = sponsor_interests)]
pub struct NewSponsorInterest {
    pub sponsor_id: i32,
    pub event_id: i32,
    pub status: String,
    pub created_at: NaiveDateTime,
}
