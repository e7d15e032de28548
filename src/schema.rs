// Copyright (c) EventEye Team
// SPDX-License-Identifier: Apache-2.0

// Import diesel table macros
use diesel::allow_tables_to_appear_in_same_query;
use diesel::joinable;
use diesel::table;

table! {
    profiles (id) {
        id -> Integer,
        user_id -> Varchar,
        email -> Varchar,
        full_name -> Varchar,
        role -> Varchar,
        avatar_url -> Nullable<Varchar>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    organizer_profiles (id) {
        id -> Integer,
        profile_id -> Integer,
        club_name -> Varchar,
        college -> Varchar,
        description -> Nullable<Text>,
        social_links -> Jsonb,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    sponsor_profiles (id) {
        id -> Integer,
        profile_id -> Integer,
        company_name -> Varchar,
        industry -> Varchar,
        website -> Nullable<Varchar>,
        budget_range -> Nullable<Varchar>,
        marketing_goals -> Array<Text>,
        target_audience -> Array<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    events (id) {
        id -> Integer,
        organizer_id -> Integer,
        name -> Varchar,
        description -> Text,
        event_date -> Date,
        location -> Varchar,
        audience_size -> Nullable<Integer>,
        themes -> Array<Text>,
        status -> Varchar,
        view_count -> Integer,
        pitch_deck_url -> Nullable<Varchar>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    sponsor_interests (id) {
        id -> Integer,
        sponsor_id -> Integer,
        event_id -> Integer,
        status -> Varchar,
        created_at -> Timestamp,
    }
}

table! {
    messages (id) {
        id -> Integer,
        sender_id -> Integer,
        recipient_id -> Integer,
        event_id -> Nullable<Integer>,
        content -> Text,
        created_at -> Timestamp,
        read_at -> Nullable<Timestamp>,
    }
}

joinable!(organizer_profiles -> profiles (profile_id));
joinable!(sponsor_profiles -> profiles (profile_id));
joinable!(events -> organizer_profiles (organizer_id));
joinable!(sponsor_interests -> sponsor_profiles (sponsor_id));
joinable!(sponsor_interests -> events (event_id));

allow_tables_to_appear_in_same_query!(
    profiles,
    organizer_profiles,
    sponsor_profiles,
    events,
    sponsor_interests,
    messages,
);
