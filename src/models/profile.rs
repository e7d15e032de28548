// Copyright (c) EventEye Team
// SPDX-License-Identifier: Apache-2.0

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::schema::{organizer_profiles, profiles, sponsor_profiles};

/// The two user roles. A profile's role is chosen once at sign-up and is
/// immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Organizer,
    Sponsor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Organizer => "organizer",
            Role::Sponsor => "sponsor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "organizer" => Ok(Role::Organizer),
            "sponsor" => Ok(Role::Sponsor),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Model for the generic profile row shared by both roles
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = profiles)]
pub struct Profile {
    pub id: i32,
    pub user_id: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub avatar_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Profile {
    pub fn role(&self) -> Result<Role, String> {
        self.role.parse()
    }
}

/// DTO for creating the generic profile row
#[derive(Debug, Insertable)]
#[diesel(table_name = profiles)]
pub struct NewProfile {
    pub user_id: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Known social platforms for an organizer. Unrecognized keys in stored JSON
/// are ignored when loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

impl SocialLinks {
    /// Parse stored JSON, dropping unknown keys. Malformed data degrades to
    /// an empty set of links rather than failing the profile load.
    pub fn from_json(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Model for the organizer extension row
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = organizer_profiles)]
pub struct OrganizerProfile {
    pub id: i32,
    pub profile_id: i32,
    pub club_name: String,
    pub college: String,
    pub description: Option<String>,
    pub social_links: serde_json::Value,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl OrganizerProfile {
    pub fn social_links(&self) -> SocialLinks {
        SocialLinks::from_json(self.social_links.clone())
    }
}

/// DTO for creating an organizer extension row
#[derive(Debug, Insertable)]
#[diesel(table_name = organizer_profiles)]
pub struct NewOrganizerProfile {
    pub profile_id: i32,
    pub club_name: String,
    pub college: String,
    pub description: Option<String>,
    pub social_links: serde_json::Value,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Changeset for editing organizer details
#[derive(Debug, AsChangeset)]
#[diesel(table_name = organizer_profiles)]
pub struct UpdateOrganizerProfile {
    pub club_name: String,
    pub college: String,
    pub description: Option<String>,
    pub social_links: serde_json::Value,
    pub updated_at: NaiveDateTime,
}

/// Model for the sponsor extension row
#[derive(Debug, Clone, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = sponsor_profiles)]
pub struct SponsorProfile {
    pub id: i32,
    pub profile_id: i32,
    pub company_name: String,
    pub industry: String,
    pub website: Option<String>,
    pub budget_range: Option<String>,
    pub marketing_goals: Vec<String>,
    pub target_audience: Vec<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// DTO for creating a sponsor extension row
#[derive(Debug, Insertable)]
#[diesel(table_name = sponsor_profiles)]
pub struct NewSponsorProfile {
    pub profile_id: i32,
    pub company_name: String,
    pub industry: String,
    pub website: Option<String>,
    pub budget_range: Option<String>,
    pub marketing_goals: Vec<String>,
    pub target_audience: Vec<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Changeset for editing sponsor details
#[derive(Debug, AsChangeset)]
#[diesel(table_name = sponsor_profiles)]
pub struct UpdateSponsorProfile {
    pub company_name: String,
    pub industry: String,
    pub website: Option<String>,
    pub budget_range: Option<String>,
    pub marketing_goals: Vec<String>,
    pub target_audience: Vec<String>,
    pub updated_at: NaiveDateTime,
}

/// A profile joined with its role extension. Exactly one of the extension
/// fields is populated, matching `profile.role`.
#[derive(Debug, Serialize)]
pub struct ResolvedProfile {
    pub profile: Profile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizer: Option<OrganizerProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sponsor: Option<SponsorProfile>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn social_links_ignore_unknown_keys() {
        let links = SocialLinks::from_json(json!({
            "instagram": "https://instagram.com/techclub",
            "myspace": "https://myspace.com/techclub",
        }));
        assert_eq!(
            links.instagram.as_deref(),
            Some("https://instagram.com/techclub")
        );
        assert_eq!(links.facebook, None);
    }

    #[test]
    fn malformed_social_links_degrade_to_empty() {
        assert_eq!(SocialLinks::from_json(json!("oops")), SocialLinks::default());
    }

    #[test]
    fn social_links_round_trip_known_keys_only() {
        let links = SocialLinks {
            twitter: Some("https://twitter.com/techclub".to_string()),
            ..Default::default()
        };
        let value = links.to_json();
        assert_eq!(value.as_object().map(|o| o.len()), Some(1));
        assert_eq!(SocialLinks::from_json(value), links);
    }

    #[test]
    fn role_parses_and_prints() {
        assert_eq!("organizer".parse::<Role>().unwrap(), Role::Organizer);
        assert_eq!(Role::Sponsor.to_string(), "sponsor");
        assert!("admin".parse::<Role>().is_err());
    }
}
