// Copyright (c) EventEye Team
// SPDX-License-Identifier: Apache-2.0

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::messages;

/// Model for a direct message between two profiles, optionally tied to an
/// event. `read_at` transitions null -> timestamp at most once.
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = messages)]
pub struct Message {
    pub id: i32,
    pub sender_id: i32,
    pub recipient_id: i32,
    pub event_id: Option<i32>,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub read_at: Option<NaiveDateTime>,
}

/// DTO for sending a message
#[derive(Debug, Insertable)]
#[diesel(table_name = messages)]
pub struct NewMessage {
    pub sender_id: i32,
    pub recipient_id: i32,
    pub event_id: Option<i32>,
    pub content: String,
    pub created_at: NaiveDateTime,
}
