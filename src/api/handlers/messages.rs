// Copyright (c) EventEye Team
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Deserialize;

use crate::api::{ApiResponse, AppState};
use crate::auth::CurrentUser;
use crate::db::acquire;
use crate::error::{AppError, AppResult};
use crate::models::message::{Message, NewMessage};
use crate::models::required_trimmed;
use crate::schema::{messages, profiles};

use super::profiles::require_profile;

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub recipient_id: i32,
    #[serde(default)]
    pub event_id: Option<i32>,
    pub content: String,
}

/// Send a message from the caller's profile, optionally tied to an event.
pub async fn send_message(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<SendMessageRequest>,
) -> AppResult<impl IntoResponse> {
    let content = required_trimmed("Message", &request.content)?;

    let mut conn = acquire(&state.db).await?;
    let sender = require_profile(&mut conn, &user.user.id).await?;

    let recipient_exists: i64 = profiles::table
        .filter(profiles::id.eq(request.recipient_id))
        .count()
        .get_result(&mut conn)
        .await
        .map_err(|e| AppError::backend("Failed to send message", e))?;
    if recipient_exists == 0 {
        return Err(AppError::NotFound("recipient"));
    }

    let message = NewMessage {
        sender_id: sender.id,
        recipient_id: request.recipient_id,
        event_id: request.event_id,
        content,
        created_at: Utc::now().naive_utc(),
    };

    let sent: Message = diesel::insert_into(messages::table)
        .values(&message)
        .returning(Message::as_returning())
        .get_result(&mut conn)
        .await
        .map_err(|e| AppError::backend("Failed to send message", e))?;

    Ok(Json(ApiResponse::with_message(sent, "Message sent")))
}

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    /// Narrow to the conversation with this profile id.
    #[serde(default)]
    pub with: Option<i32>,
}

/// Messages involving the caller, oldest first, optionally narrowed to one
/// counterpart.
pub async fn list_messages(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<MessagesQuery>,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state.db).await?;
    let me = require_profile(&mut conn, &user.user.id).await?;

    let rows: Vec<Message> = match query.with {
        Some(other) => {
            messages::table
                .filter(
                    messages::sender_id
                        .eq(me.id)
                        .and(messages::recipient_id.eq(other))
                        .or(messages::sender_id
                            .eq(other)
                            .and(messages::recipient_id.eq(me.id))),
                )
                .order_by(messages::created_at.asc())
                .select(Message::as_select())
                .load(&mut conn)
                .await
        }
        None => {
            messages::table
                .filter(
                    messages::sender_id
                        .eq(me.id)
                        .or(messages::recipient_id.eq(me.id)),
                )
                .order_by(messages::created_at.asc())
                .select(Message::as_select())
                .load(&mut conn)
                .await
        }
    }
    .map_err(|e| AppError::backend("Failed to load messages", e))?;

    Ok(Json(ApiResponse::success(rows)))
}

/// Mark a received message as read. `read_at` is written only while null, so
/// the transition happens at most once; repeat calls are no-ops.
pub async fn mark_read(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(message_id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state.db).await?;
    let me = require_profile(&mut conn, &user.user.id).await?;

    let message = messages::table
        .find(message_id)
        .select(Message::as_select())
        .first::<Message>(&mut conn)
        .await
        .optional()?
        .ok_or(AppError::NotFound("message"))?;

    if message.recipient_id != me.id {
        return Err(AppError::Forbidden(
            "You can only mark messages sent to you".to_string(),
        ));
    }

    diesel::update(
        messages::table
            .find(message_id)
            .filter(messages::read_at.is_null()),
    )
    .set(messages::read_at.eq(Utc::now().naive_utc()))
    .execute(&mut conn)
    .await
    .map_err(|e| AppError::backend("Failed to mark message as read", e))?;

    Ok(Json(ApiResponse::success(())))
}
