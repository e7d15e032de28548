// Copyright (c) EventEye Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::{ApiResponse, AppState};
use crate::auth::CurrentUser;
use crate::db::{acquire, DbConnection};
use crate::discovery::{Catalog, CatalogEvent, EventFilter, InterestSet};
use crate::error::{AppError, AppResult};
use crate::models::event::{
    parse_themes, Event, NewEvent, UpdateEvent, STATUS_DRAFT, STATUS_PUBLISHED,
};
use crate::models::required_trimmed;
use crate::schema::{events, organizer_profiles};

use super::profiles::{require_organizer, require_profile, require_sponsor};

/// Fetch the full published catalog: events inner-joined with their
/// organizer's public fields, newest first. Events whose organizer row is
/// missing are excluded by the join, not null-padded.
pub(crate) async fn fetch_catalog(conn: &mut DbConnection) -> AppResult<Vec<CatalogEvent>> {
    let rows: Vec<(Event, (String, String))> = events::table
        .inner_join(organizer_profiles::table)
        .filter(events::status.eq(STATUS_PUBLISHED))
        .order_by(events::created_at.desc())
        .select((
            Event::as_select(),
            (
                organizer_profiles::club_name,
                organizer_profiles::college,
            ),
        ))
        .load(conn)
        .await
        .map_err(|e| AppError::backend("Failed to load events", e))?;

    Ok(rows
        .into_iter()
        .map(|(event, (club_name, college))| CatalogEvent::from_row(event, club_name, college))
        .collect())
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub events: Vec<CatalogEvent>,
    /// Distinct theme and location values across the whole published set,
    /// for the filter controls.
    pub themes: Vec<String>,
    pub locations: Vec<String>,
}

/// The discovery catalog. Filter predicates arrive as query parameters and
/// are applied in memory over the fetched set; the full set is always
/// fetched (no pagination).
pub async fn list_catalog(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(filter): Query<EventFilter>,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state.db).await?;
    let catalog = Catalog::new(fetch_catalog(&mut conn).await?, InterestSet::default());

    let themes = catalog.unique_themes();
    let locations = catalog.unique_locations();
    let events: Vec<CatalogEvent> = catalog.filtered(&filter).into_iter().cloned().collect();

    debug!(
        "catalog query matched {} of {} published events",
        events.len(),
        catalog.events.len()
    );

    Ok(Json(ApiResponse::success(CatalogResponse {
        events,
        themes,
        locations,
    })))
}

/// Up to three published events whose themes match the calling sponsor's
/// marketing goals, in catalog (newest-first) order.
pub async fn recommended_events(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state.db).await?;
    let profile = require_profile(&mut conn, &user.user.id).await?;
    let sponsor = require_sponsor(&mut conn, &profile).await?;

    let catalog = Catalog::new(fetch_catalog(&mut conn).await?, InterestSet::default());
    let events: Vec<CatalogEvent> = catalog
        .recommended_for(&sponsor.marketing_goals)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(ApiResponse::success(events)))
}

/// The caller's own events, drafts included, newest first.
pub async fn my_events(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state.db).await?;
    let profile = require_profile(&mut conn, &user.user.id).await?;
    let organizer = require_organizer(&mut conn, &profile).await?;

    let rows: Vec<Event> = events::table
        .filter(events::organizer_id.eq(organizer.id))
        .order_by(events::created_at.desc())
        .select(Event::as_select())
        .load(&mut conn)
        .await
        .map_err(|e| AppError::backend("Failed to load events", e))?;

    Ok(Json(ApiResponse::success(rows)))
}

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    pub description: String,
    pub event_date: NaiveDate,
    pub location: String,
    #[serde(default)]
    pub audience_size: Option<i32>,
    /// Comma-separated theme labels, as submitted by the event form.
    #[serde(default)]
    pub themes: String,
    #[serde(default)]
    pub pitch_deck_url: Option<String>,
}

impl CreateEventRequest {
    fn validate(&self) -> AppResult<()> {
        required_trimmed("Event name", &self.name)?;
        required_trimmed("Description", &self.description)?;
        required_trimmed("Location", &self.location)?;
        if matches!(self.audience_size, Some(n) if n < 0) {
            return Err(AppError::Validation(
                "Audience size must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Create an event. New events always start in `draft` and are invisible to
/// sponsors until published.
pub async fn create_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateEventRequest>,
) -> AppResult<impl IntoResponse> {
    request.validate()?;

    let mut conn = acquire(&state.db).await?;
    let profile = require_profile(&mut conn, &user.user.id).await?;
    let organizer = require_organizer(&mut conn, &profile).await?;

    let now = Utc::now().naive_utc();
    let new_event = NewEvent {
        organizer_id: organizer.id,
        name: request.name.trim().to_string(),
        description: request.description.trim().to_string(),
        event_date: request.event_date,
        location: request.location.trim().to_string(),
        audience_size: request.audience_size,
        themes: parse_themes(&request.themes),
        status: STATUS_DRAFT.to_string(),
        pitch_deck_url: request.pitch_deck_url,
        created_at: now,
        updated_at: now,
    };

    let event: Event = diesel::insert_into(events::table)
        .values(&new_event)
        .returning(Event::as_returning())
        .get_result(&mut conn)
        .await
        .map_err(|e| AppError::backend("Failed to create event", e))?;

    info!("organizer {} created event {}", organizer.id, event.id);
    Ok(Json(ApiResponse::with_message(
        event,
        "Event created successfully!",
    )))
}

/// Load an event and check it belongs to the given organizer.
async fn owned_event(
    conn: &mut DbConnection,
    organizer_id: i32,
    event_id: i32,
) -> AppResult<Event> {
    let event = events::table
        .find(event_id)
        .select(Event::as_select())
        .first::<Event>(conn)
        .await
        .optional()?
        .ok_or(AppError::NotFound("event"))?;

    if event.organizer_id != organizer_id {
        return Err(AppError::Forbidden(
            "You can only manage your own events".to_string(),
        ));
    }
    Ok(event)
}

#[derive(Debug, Deserialize)]
pub struct UpdateEventRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub audience_size: Option<i32>,
    #[serde(default)]
    pub themes: Option<String>,
    #[serde(default)]
    pub pitch_deck_url: Option<String>,
}

impl UpdateEventRequest {
    fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name {
            required_trimmed("Event name", name)?;
        }
        if let Some(description) = &self.description {
            required_trimmed("Description", description)?;
        }
        if let Some(location) = &self.location {
            required_trimmed("Location", location)?;
        }
        if matches!(self.audience_size, Some(n) if n < 0) {
            return Err(AppError::Validation(
                "Audience size must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Owner-only event edit. Absent fields are left untouched.
pub async fn update_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<i32>,
    Json(request): Json<UpdateEventRequest>,
) -> AppResult<impl IntoResponse> {
    request.validate()?;

    let mut conn = acquire(&state.db).await?;
    let profile = require_profile(&mut conn, &user.user.id).await?;
    let organizer = require_organizer(&mut conn, &profile).await?;
    let event = owned_event(&mut conn, organizer.id, event_id).await?;

    let changes = UpdateEvent {
        name: request.name.map(|n| n.trim().to_string()),
        description: request.description.map(|d| d.trim().to_string()),
        event_date: request.event_date,
        location: request.location.map(|l| l.trim().to_string()),
        audience_size: request.audience_size.map(Some),
        themes: request.themes.as_deref().map(parse_themes),
        pitch_deck_url: request.pitch_deck_url.map(Some),
        updated_at: Some(Utc::now().naive_utc()),
    };

    let updated: Event = diesel::update(events::table.find(event.id))
        .set(&changes)
        .returning(Event::as_returning())
        .get_result(&mut conn)
        .await
        .map_err(|e| AppError::backend("Failed to update event", e))?;

    Ok(Json(ApiResponse::with_message(
        updated,
        "Event updated successfully!",
    )))
}

/// One-way draft -> published transition. Publishing an already-published
/// event is a no-op.
pub async fn publish_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state.db).await?;
    let profile = require_profile(&mut conn, &user.user.id).await?;
    let organizer = require_organizer(&mut conn, &profile).await?;
    let event = owned_event(&mut conn, organizer.id, event_id).await?;

    let transitioned = diesel::update(
        events::table
            .find(event.id)
            .filter(events::status.eq(STATUS_DRAFT)),
    )
    .set((
        events::status.eq(STATUS_PUBLISHED),
        events::updated_at.eq(Utc::now().naive_utc()),
    ))
    .execute(&mut conn)
    .await
    .map_err(|e| AppError::backend("Failed to publish event", e))?;

    if transitioned > 0 {
        info!("organizer {} published event {}", organizer.id, event.id);
    }

    Ok(Json(ApiResponse::with_message(
        (),
        "Event published successfully!",
    )))
}

/// Record one view: a single atomic increment in the store, never a
/// client-side read-modify-write. Callers bump their cached copy by exactly
/// one with no read-back; drift is corrected by the next catalog refetch.
pub async fn record_view(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(event_id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state.db).await?;

    let updated = diesel::update(events::table.find(event_id))
        .set(events::view_count.eq(events::view_count + 1))
        .execute(&mut conn)
        .await
        .map_err(|e| AppError::backend("Failed to record view", e))?;

    if updated == 0 {
        return Err(AppError::NotFound("event"));
    }

    Ok(Json(ApiResponse::success(())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateEventRequest {
        CreateEventRequest {
            name: "Tech Summit".to_string(),
            description: "Annual flagship conference".to_string(),
            event_date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            location: "Boston".to_string(),
            audience_size: Some(500),
            themes: "AI, Robotics".to_string(),
            pitch_deck_url: None,
        }
    }

    #[test]
    fn valid_create_request_passes() {
        assert!(create_request().validate().is_ok());
    }

    #[test]
    fn blank_name_is_rejected_before_any_write() {
        let mut request = create_request();
        request.name = " ".to_string();
        let err = request.validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "Event name is required"));
    }

    #[test]
    fn negative_audience_size_is_rejected() {
        let mut request = create_request();
        request.audience_size = Some(-5);
        assert!(request.validate().is_err());
    }

    #[test]
    fn update_request_allows_absent_fields() {
        let request = UpdateEventRequest {
            name: None,
            description: None,
            event_date: None,
            location: None,
            audience_size: None,
            themes: None,
            pitch_deck_url: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn update_request_rejects_blank_provided_field() {
        let request = UpdateEventRequest {
            name: Some("  ".to_string()),
            description: None,
            event_date: None,
            location: None,
            audience_size: None,
            themes: None,
            pitch_deck_url: None,
        };
        assert!(request.validate().is_err());
    }
}
