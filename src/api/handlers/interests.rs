// Copyright (c) EventEye Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Serialize;
use tracing::debug;

use crate::api::{ApiResponse, AppState};
use crate::auth::CurrentUser;
use crate::db::acquire;
use crate::error::{AppError, AppResult};
use crate::models::interest::{NewSponsorInterest, STATUS_INTERESTED};
use crate::schema::{events, sponsor_interests};

use super::profiles::{require_profile, require_sponsor};

/// Event ids the calling sponsor has marked interested. The client seeds its
/// local interest set from this.
pub async fn list_interests(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state.db).await?;
    let profile = require_profile(&mut conn, &user.user.id).await?;
    let sponsor = require_sponsor(&mut conn, &profile).await?;

    let ids: Vec<i32> = sponsor_interests::table
        .filter(sponsor_interests::sponsor_id.eq(sponsor.id))
        .select(sponsor_interests::event_id)
        .load(&mut conn)
        .await
        .map_err(|e| AppError::backend("Failed to load interests", e))?;

    Ok(Json(ApiResponse::success(ids)))
}

#[derive(Debug, Serialize)]
pub struct InterestToggle {
    pub event_id: i32,
    pub interested: bool,
}

/// Toggle the caller's interest in an event. Membership is the presence of
/// the row; the client updates its local set only after this call succeeds.
pub async fn toggle_interest(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state.db).await?;
    let profile = require_profile(&mut conn, &user.user.id).await?;
    let sponsor = require_sponsor(&mut conn, &profile).await?;

    let event_exists: i64 = events::table
        .filter(events::id.eq(event_id))
        .count()
        .get_result(&mut conn)
        .await
        .map_err(|e| AppError::backend("Failed to update interest", e))?;
    if event_exists == 0 {
        return Err(AppError::NotFound("event"));
    }

    let existing: Option<i32> = sponsor_interests::table
        .filter(sponsor_interests::sponsor_id.eq(sponsor.id))
        .filter(sponsor_interests::event_id.eq(event_id))
        .select(sponsor_interests::id)
        .first(&mut conn)
        .await
        .optional()?;

    if let Some(interest_id) = existing {
        diesel::delete(sponsor_interests::table.find(interest_id))
            .execute(&mut conn)
            .await
            .map_err(|e| AppError::backend("Failed to update interest", e))?;

        debug!("sponsor {} withdrew interest in event {}", sponsor.id, event_id);
        Ok(Json(ApiResponse::with_message(
            InterestToggle {
                event_id,
                interested: false,
            },
            "Removed from interests",
        )))
    } else {
        let interest = NewSponsorInterest {
            sponsor_id: sponsor.id,
            event_id,
            status: STATUS_INTERESTED.to_string(),
            created_at: Utc::now().naive_utc(),
        };
        // A concurrent duplicate insert trips the unique (sponsor_id,
        // event_id) constraint and surfaces as a generic failure; there is no
        // recovery path.
        diesel::insert_into(sponsor_interests::table)
            .values(&interest)
            .execute(&mut conn)
            .await
            .map_err(|e| AppError::backend("Failed to update interest", e))?;

        debug!("sponsor {} expressed interest in event {}", sponsor.id, event_id);
        Ok(Json(ApiResponse::with_message(
            InterestToggle {
                event_id,
                interested: true,
            },
            "Added to interests",
        )))
    }
}
