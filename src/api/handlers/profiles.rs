// Copyright (c) EventEye Team
// SPDX-License-Identifier: Apache-2.0

use anyhow::anyhow;
use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::{ApiResponse, AppState};
use crate::auth::CurrentUser;
use crate::db::{acquire, DbConnection};
use crate::error::{AppError, AppResult};
use crate::models::profile::{
    NewOrganizerProfile, NewProfile, NewSponsorProfile, OrganizerProfile, Profile,
    ResolvedProfile, Role, SocialLinks, SponsorProfile, UpdateOrganizerProfile,
    UpdateSponsorProfile,
};
use crate::models::required_trimmed;
use crate::schema::{organizer_profiles, profiles, sponsor_profiles};

/// Look up the generic profile row for an auth identity.
pub(crate) async fn profile_for_user(
    conn: &mut DbConnection,
    user_id: &str,
) -> AppResult<Option<Profile>> {
    let profile = profiles::table
        .filter(profiles::user_id.eq(user_id))
        .select(Profile::as_select())
        .first::<Profile>(conn)
        .await
        .optional()?;
    Ok(profile)
}

/// As `profile_for_user`, but absence is an error. Callers that can route the
/// user to role selection should use `profile_for_user` instead.
pub(crate) async fn require_profile(
    conn: &mut DbConnection,
    user_id: &str,
) -> AppResult<Profile> {
    profile_for_user(conn, user_id)
        .await?
        .ok_or(AppError::NotFound("profile"))
}

/// Load the organizer extension for a profile. A sponsor calling an
/// organizer-only action is refused; a missing extension row for an organizer
/// profile is a data inconsistency and is surfaced, not defaulted.
pub(crate) async fn require_organizer(
    conn: &mut DbConnection,
    profile: &Profile,
) -> AppResult<OrganizerProfile> {
    if profile.role != Role::Organizer.as_str() {
        return Err(AppError::Forbidden(
            "You need an organizer profile for this action".to_string(),
        ));
    }
    organizer_profiles::table
        .filter(organizer_profiles::profile_id.eq(profile.id))
        .select(OrganizerProfile::as_select())
        .first::<OrganizerProfile>(conn)
        .await
        .optional()?
        .ok_or(AppError::NotFound("organizer profile"))
}

/// Load the sponsor extension for a profile, refusing non-sponsors.
pub(crate) async fn require_sponsor(
    conn: &mut DbConnection,
    profile: &Profile,
) -> AppResult<SponsorProfile> {
    if profile.role != Role::Sponsor.as_str() {
        return Err(AppError::Forbidden(
            "You need to be a sponsor to express interest".to_string(),
        ));
    }
    sponsor_profiles::table
        .filter(sponsor_profiles::profile_id.eq(profile.id))
        .select(SponsorProfile::as_select())
        .first::<SponsorProfile>(conn)
        .await
        .optional()?
        .ok_or(AppError::NotFound("sponsor profile"))
}

/// Follow the role discriminant to the matching extension row.
pub(crate) async fn resolve_extension(
    conn: &mut DbConnection,
    profile: Profile,
) -> AppResult<ResolvedProfile> {
    let role = profile
        .role()
        .map_err(|e| AppError::backend("Failed to load profile", anyhow!(e)))?;

    match role {
        Role::Organizer => {
            let organizer = require_organizer(conn, &profile).await?;
            Ok(ResolvedProfile {
                profile,
                organizer: Some(organizer),
                sponsor: None,
            })
        }
        Role::Sponsor => {
            let sponsor = require_sponsor(conn, &profile).await?;
            Ok(ResolvedProfile {
                profile,
                organizer: None,
                sponsor: Some(sponsor),
            })
        }
    }
}

/// Resolve the caller's profile and role extension. 404 means the profile was
/// never created and the client should route to role selection.
pub async fn me(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state.db).await?;
    let profile = require_profile(&mut conn, &user.user.id).await?;
    let resolved = resolve_extension(&mut conn, profile).await?;
    Ok(Json(ApiResponse::success(resolved)))
}

#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    pub role: Role,
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    // Organizer fields
    #[serde(default)]
    pub club_name: Option<String>,
    #[serde(default)]
    pub college: Option<String>,
    #[serde(default)]
    pub social_links: Option<SocialLinks>,
    // Sponsor fields
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub budget_range: Option<String>,
    #[serde(default)]
    pub marketing_goals: Vec<String>,
    #[serde(default)]
    pub target_audience: Vec<String>,
}

impl CreateProfileRequest {
    /// All required fields, validated before any write is issued.
    fn validate(&self) -> AppResult<()> {
        required_trimmed("Full name", &self.full_name)?;
        match self.role {
            Role::Organizer => {
                required_trimmed("Club name", self.club_name.as_deref().unwrap_or(""))?;
                required_trimmed("College", self.college.as_deref().unwrap_or(""))?;
            }
            Role::Sponsor => {
                required_trimmed("Company name", self.company_name.as_deref().unwrap_or(""))?;
                required_trimmed("Industry", self.industry.as_deref().unwrap_or(""))?;
            }
        }
        Ok(())
    }
}

/// Create the profile and its role extension after role selection. The two
/// inserts are sequenced, not atomic: if the extension insert fails the error
/// names the half that failed.
pub async fn create_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateProfileRequest>,
) -> AppResult<impl IntoResponse> {
    request.validate()?;

    let mut conn = acquire(&state.db).await?;

    if profile_for_user(&mut conn, &user.user.id).await?.is_some() {
        return Err(AppError::Validation(
            "You already have a profile".to_string(),
        ));
    }

    let now = Utc::now().naive_utc();
    let new_profile = NewProfile {
        user_id: user.user.id.clone(),
        email: user.user.email.clone().unwrap_or_default(),
        full_name: request.full_name.trim().to_string(),
        role: request.role.as_str().to_string(),
        created_at: now,
        updated_at: now,
    };

    let profile: Profile = diesel::insert_into(profiles::table)
        .values(&new_profile)
        .returning(Profile::as_returning())
        .get_result(&mut conn)
        .await
        .map_err(|e| AppError::backend("Failed to create profile", e))?;

    // The extension row is keyed by the profile row id, not the auth user id.
    match request.role {
        Role::Organizer => {
            let extension = NewOrganizerProfile {
                profile_id: profile.id,
                club_name: request.club_name.unwrap_or_default().trim().to_string(),
                college: request.college.unwrap_or_default().trim().to_string(),
                description: request.description,
                social_links: request.social_links.unwrap_or_default().to_json(),
                created_at: now,
                updated_at: now,
            };
            diesel::insert_into(organizer_profiles::table)
                .values(&extension)
                .execute(&mut conn)
                .await
                .map_err(|e| {
                    AppError::backend(
                        "Your profile was created but the organizer details could not be saved",
                        e,
                    )
                })?;
        }
        Role::Sponsor => {
            let extension = NewSponsorProfile {
                profile_id: profile.id,
                company_name: request.company_name.unwrap_or_default().trim().to_string(),
                industry: request.industry.unwrap_or_default().trim().to_string(),
                website: request.website,
                budget_range: request.budget_range,
                marketing_goals: request.marketing_goals,
                target_audience: request.target_audience,
                created_at: now,
                updated_at: now,
            };
            diesel::insert_into(sponsor_profiles::table)
                .values(&extension)
                .execute(&mut conn)
                .await
                .map_err(|e| {
                    AppError::backend(
                        "Your profile was created but the sponsor details could not be saved",
                        e,
                    )
                })?;
        }
    }

    info!("created {} profile {} for user {}", profile.role, profile.id, profile.user_id);

    let resolved = resolve_extension(&mut conn, profile).await?;
    Ok(Json(ApiResponse::with_message(
        resolved,
        "Profile created successfully!",
    )))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    // Organizer fields
    #[serde(default)]
    pub club_name: Option<String>,
    #[serde(default)]
    pub college: Option<String>,
    #[serde(default)]
    pub social_links: Option<SocialLinks>,
    // Sponsor fields
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub budget_range: Option<String>,
    #[serde(default)]
    pub marketing_goals: Option<Vec<String>>,
    #[serde(default)]
    pub target_audience: Option<Vec<String>>,
}

impl UpdateProfileRequest {
    /// Minimal validation: required text fields non-empty after trimming.
    /// Nothing else (URLs, ranges) is checked at this layer.
    fn validate(&self, role: Role) -> AppResult<()> {
        required_trimmed("Full name", &self.full_name)?;
        match role {
            Role::Organizer => {
                required_trimmed("Club name", self.club_name.as_deref().unwrap_or(""))?;
                required_trimmed("College", self.college.as_deref().unwrap_or(""))?;
            }
            Role::Sponsor => {
                required_trimmed("Company name", self.company_name.as_deref().unwrap_or(""))?;
                required_trimmed("Industry", self.industry.as_deref().unwrap_or(""))?;
            }
        }
        Ok(())
    }
}

/// One logical "update profile" operation over two sequenced writes: the base
/// row (name only), then the full extension row. Partial failure leaves the
/// first write in place and the error reports which half failed.
pub async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<UpdateProfileRequest>,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state.db).await?;
    let profile = require_profile(&mut conn, &user.user.id).await?;
    let role = profile
        .role()
        .map_err(|e| AppError::backend("Failed to load profile", anyhow!(e)))?;

    request.validate(role)?;

    let now = Utc::now().naive_utc();

    diesel::update(profiles::table.find(profile.id))
        .set((
            profiles::full_name.eq(request.full_name.trim()),
            profiles::updated_at.eq(now),
        ))
        .execute(&mut conn)
        .await
        .map_err(|e| AppError::backend("Failed to update profile", e))?;

    match role {
        Role::Organizer => {
            let current = require_organizer(&mut conn, &profile).await?;
            let changes = UpdateOrganizerProfile {
                club_name: request.club_name.unwrap_or_default().trim().to_string(),
                college: request.college.unwrap_or_default().trim().to_string(),
                description: request.description,
                social_links: request
                    .social_links
                    .map(|l| l.to_json())
                    .unwrap_or(current.social_links),
                updated_at: now,
            };
            diesel::update(organizer_profiles::table.find(current.id))
                .set(&changes)
                .execute(&mut conn)
                .await
                .map_err(|e| {
                    AppError::backend(
                        "Your name was saved but the organizer details failed to update",
                        e,
                    )
                })?;
        }
        Role::Sponsor => {
            let current = require_sponsor(&mut conn, &profile).await?;
            let changes = UpdateSponsorProfile {
                company_name: request.company_name.unwrap_or_default().trim().to_string(),
                industry: request.industry.unwrap_or_default().trim().to_string(),
                website: request.website.or(current.website),
                budget_range: request.budget_range.or(current.budget_range),
                marketing_goals: request.marketing_goals.unwrap_or(current.marketing_goals),
                target_audience: request.target_audience.unwrap_or(current.target_audience),
                updated_at: now,
            };
            diesel::update(sponsor_profiles::table.find(current.id))
                .set(&changes)
                .execute(&mut conn)
                .await
                .map_err(|e| {
                    AppError::backend(
                        "Your name was saved but the sponsor details failed to update",
                        e,
                    )
                })?;
        }
    }

    debug!("updated profile {}", profile.id);

    let fresh = require_profile(&mut conn, &user.user.id).await?;
    let resolved = resolve_extension(&mut conn, fresh).await?;
    Ok(Json(ApiResponse::with_message(
        resolved,
        "Profile updated successfully!",
    )))
}

/// One entry in the sponsor directory on the explore page.
#[derive(Debug, Serialize)]
pub struct SponsorDirectoryEntry {
    #[serde(flatten)]
    pub sponsor: SponsorProfile,
    pub contact_name: String,
}

/// All sponsor profiles joined with their contact's name, newest first.
pub async fn list_sponsors(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> AppResult<impl IntoResponse> {
    let mut conn = acquire(&state.db).await?;

    let rows: Vec<(SponsorProfile, String)> = sponsor_profiles::table
        .inner_join(profiles::table)
        .select((SponsorProfile::as_select(), profiles::full_name))
        .order_by(sponsor_profiles::created_at.desc())
        .load(&mut conn)
        .await
        .map_err(|e| AppError::backend("Failed to load sponsors", e))?;

    let entries: Vec<SponsorDirectoryEntry> = rows
        .into_iter()
        .map(|(sponsor, contact_name)| SponsorDirectoryEntry {
            sponsor,
            contact_name,
        })
        .collect();

    Ok(Json(ApiResponse::success(entries)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn organizer_update() -> UpdateProfileRequest {
        UpdateProfileRequest {
            full_name: "Ada Lovelace".to_string(),
            description: None,
            club_name: Some("Robotics Club".to_string()),
            college: Some("MIT".to_string()),
            social_links: None,
            company_name: None,
            industry: None,
            website: None,
            budget_range: None,
            marketing_goals: None,
            target_audience: None,
        }
    }

    #[test]
    fn organizer_update_with_all_fields_passes() {
        assert!(organizer_update().validate(Role::Organizer).is_ok());
    }

    #[test]
    fn blank_full_name_blocks_save() {
        let mut request = organizer_update();
        request.full_name = "   ".to_string();
        let err = request.validate(Role::Organizer).unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "Full name is required"));
    }

    #[test]
    fn organizer_update_requires_club_name() {
        let mut request = organizer_update();
        request.club_name = None;
        assert!(request.validate(Role::Organizer).is_err());
    }

    #[test]
    fn sponsor_update_requires_company_and_industry() {
        let mut request = organizer_update();
        request.company_name = Some("TechCorp".to_string());
        request.industry = Some("".to_string());
        let err = request.validate(Role::Sponsor).unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "Industry is required"));
    }

    #[test]
    fn create_request_validates_per_role() {
        let request = CreateProfileRequest {
            role: Role::Sponsor,
            full_name: "Grace Hopper".to_string(),
            description: None,
            club_name: None,
            college: None,
            social_links: None,
            company_name: Some("Compilers Inc".to_string()),
            website: None,
            industry: Some("Technology".to_string()),
            budget_range: None,
            marketing_goals: vec![],
            target_audience: vec![],
        };
        assert!(request.validate().is_ok());
    }
}
