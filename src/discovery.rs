// Copyright (c) EventEye Team
// SPDX-License-Identifier: Apache-2.0

//! In-memory discovery core for the sponsor workflow: the published catalog
//! as last fetched from the store, the multi-predicate filter applied on top
//! of it, the sponsor's interest set, and the optimistic view counter.
//!
//! Everything here is pure bookkeeping over already-fetched rows. Mutations
//! are applied only after the corresponding store write succeeded; the
//! locally cached view counts may drift from the store under concurrent
//! viewers and are corrected by the next full catalog refetch.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::event::Event;

/// A published event enriched with its organizer's public fields, as produced
/// by the catalog join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEvent {
    pub id: i32,
    pub organizer_id: i32,
    pub name: String,
    pub description: String,
    pub event_date: chrono::NaiveDate,
    pub location: String,
    pub audience_size: Option<i32>,
    pub themes: Vec<String>,
    pub view_count: i32,
    pub pitch_deck_url: Option<String>,
    pub club_name: String,
    pub college: String,
}

impl CatalogEvent {
    pub fn from_row(event: Event, club_name: String, college: String) -> Self {
        CatalogEvent {
            id: event.id,
            organizer_id: event.organizer_id,
            name: event.name,
            description: event.description,
            event_date: event.event_date,
            location: event.location,
            audience_size: event.audience_size,
            themes: event.themes,
            view_count: event.view_count,
            pitch_deck_url: event.pitch_deck_url,
            club_name,
            college,
        }
    }
}

/// Discovery predicates. Empty values are no-ops; non-empty predicates are
/// ANDed. All matching is case-insensitive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub location: String,
}

impl EventFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.theme.is_empty() && self.location.is_empty()
    }

    pub fn matches(&self, event: &CatalogEvent) -> bool {
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            let hit = event.name.to_lowercase().contains(&needle)
                || event.description.to_lowercase().contains(&needle)
                || event.club_name.to_lowercase().contains(&needle)
                || event.college.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }

        if !self.theme.is_empty() {
            let theme = self.theme.to_lowercase();
            if !event.themes.iter().any(|t| t.to_lowercase() == theme) {
                return false;
            }
        }

        if !self.location.is_empty()
            && !event
                .location
                .to_lowercase()
                .contains(&self.location.to_lowercase())
        {
            return false;
        }

        true
    }
}

/// Stable filter over a fetched event list: the result is an order-preserving
/// subsequence of the input, and an all-empty filter is the identity.
pub fn filter_events<'a>(events: &'a [CatalogEvent], filter: &EventFilter) -> Vec<&'a CatalogEvent> {
    events.iter().filter(|e| filter.matches(e)).collect()
}

/// The sponsor's local record of which events they marked interested.
/// Membership mirrors the store rows and is updated only after the backing
/// write succeeded.
#[derive(Debug, Clone, Default)]
pub struct InterestSet {
    ids: HashSet<i32>,
}

impl InterestSet {
    pub fn from_ids(ids: impl IntoIterator<Item = i32>) -> Self {
        InterestSet {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn contains(&self, event_id: i32) -> bool {
        self.ids.contains(&event_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn mark(&mut self, event_id: i32) {
        self.ids.insert(event_id);
    }

    pub fn unmark(&mut self, event_id: i32) {
        self.ids.remove(&event_id);
    }
}

/// A sponsor's view of the published catalog for one session.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub events: Vec<CatalogEvent>,
    pub interests: InterestSet,
}

impl Catalog {
    pub fn new(events: Vec<CatalogEvent>, interests: InterestSet) -> Self {
        Catalog { events, interests }
    }

    pub fn filtered(&self, filter: &EventFilter) -> Vec<&CatalogEvent> {
        filter_events(&self.events, filter)
    }

    /// Optimistically bump the cached view count for an event by exactly 1,
    /// after the store's atomic increment succeeded. No read-back: the store's
    /// true count is reconciled by the next full refetch.
    pub fn record_view(&mut self, event_id: i32) {
        if let Some(event) = self.events.iter_mut().find(|e| e.id == event_id) {
            event.view_count += 1;
        }
    }

    /// Distinct theme labels across the catalog, in first-seen order.
    pub fn unique_themes(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.events
            .iter()
            .flat_map(|e| e.themes.iter())
            .filter(|t| seen.insert(t.to_lowercase()))
            .cloned()
            .collect()
    }

    /// Distinct locations across the catalog, in first-seen order.
    pub fn unique_locations(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.events
            .iter()
            .map(|e| &e.location)
            .filter(|l| seen.insert(l.to_lowercase()))
            .cloned()
            .collect()
    }

    /// Events whose themes match the sponsor's marketing goals, newest first
    /// (catalog order), capped at three. Matching is case-insensitive exact
    /// equality between a goal and a theme label.
    pub fn recommended_for(&self, marketing_goals: &[String]) -> Vec<&CatalogEvent> {
        let goals: HashSet<String> = marketing_goals.iter().map(|g| g.to_lowercase()).collect();
        self.events
            .iter()
            .filter(|e| e.themes.iter().any(|t| goals.contains(&t.to_lowercase())))
            .take(3)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn event(id: i32, name: &str, description: &str, club: &str, college: &str) -> CatalogEvent {
        CatalogEvent {
            id,
            organizer_id: 1,
            name: name.to_string(),
            description: description.to_string(),
            event_date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            location: "Boston".to_string(),
            audience_size: Some(300),
            themes: vec![],
            view_count: 0,
            pitch_deck_url: None,
            club_name: club.to_string(),
            college: college.to_string(),
        }
    }

    fn sample_catalog() -> Vec<CatalogEvent> {
        let mut tech = event(1, "Tech Summit", "annual flagship", "Robotics Club", "MIT");
        tech.themes = vec!["AI".to_string(), "Robotics".to_string()];
        let mut art = event(2, "Art Fair", "modern tech in art", "Art Society", "RISD");
        art.themes = vec!["Design".to_string()];
        art.location = "Providence".to_string();
        vec![tech, art]
    }

    #[test]
    fn empty_filter_is_identity() {
        let events = sample_catalog();
        let out = filter_events(&events, &EventFilter::default());
        let ids: Vec<i32> = out.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn search_matches_name_and_description() {
        let events = sample_catalog();
        let filter = EventFilter {
            search: "tech".to_string(),
            ..Default::default()
        };
        // "Tech Summit" matches on name, "Art Fair" on description.
        assert_eq!(filter_events(&events, &filter).len(), 2);
    }

    #[test]
    fn search_matches_club_and_college() {
        let events = sample_catalog();
        let by_club = EventFilter {
            search: "robotics club".to_string(),
            ..Default::default()
        };
        assert_eq!(filter_events(&events, &by_club)[0].id, 1);

        let by_college = EventFilter {
            search: "risd".to_string(),
            ..Default::default()
        };
        assert_eq!(filter_events(&events, &by_college)[0].id, 2);
    }

    #[test]
    fn theme_requires_exact_membership() {
        let events = sample_catalog();
        let filter = EventFilter {
            theme: "AI".to_string(),
            ..Default::default()
        };
        let out = filter_events(&events, &filter);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 1);
    }

    #[test]
    fn location_is_substring_match() {
        let events = sample_catalog();
        let filter = EventFilter {
            location: "provid".to_string(),
            ..Default::default()
        };
        let out = filter_events(&events, &filter);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 2);
    }

    #[test_log::test]
    fn predicates_are_anded() {
        let events = sample_catalog();
        let filter = EventFilter {
            search: "tech".to_string(),
            theme: "Design".to_string(),
            location: "boston".to_string(),
        };
        // "Art Fair" matches search and theme but sits in Providence.
        assert!(filter_events(&events, &filter).is_empty());
    }

    #[test]
    fn filter_preserves_input_order() {
        let mut events = sample_catalog();
        events.reverse();
        let filter = EventFilter {
            search: "tech".to_string(),
            ..Default::default()
        };
        let ids: Vec<i32> = filter_events(&events, &filter).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test_log::test]
    fn record_view_bumps_by_exactly_one() {
        let mut events = sample_catalog();
        events[0].view_count = 5;
        let mut catalog = Catalog::new(events, InterestSet::default());
        catalog.record_view(1);
        catalog.record_view(1);
        assert_eq!(catalog.events[0].view_count, 7);
        // Untouched events keep their counts.
        assert_eq!(catalog.events[1].view_count, 0);
    }

    #[test]
    fn record_view_on_unknown_event_is_a_no_op() {
        let mut catalog = Catalog::new(sample_catalog(), InterestSet::default());
        catalog.record_view(99);
        assert_eq!(catalog.events[0].view_count, 0);
    }

    #[test]
    fn interest_toggle_is_an_involution() {
        let mut interests = InterestSet::default();
        assert!(!interests.contains(7));
        interests.mark(7);
        assert!(interests.contains(7));
        assert_eq!(interests.len(), 1);
        interests.unmark(7);
        assert!(!interests.contains(7));
        assert!(interests.is_empty());
    }

    #[test]
    fn unique_themes_and_locations_dedupe() {
        let catalog = Catalog::new(sample_catalog(), InterestSet::default());
        assert_eq!(catalog.unique_themes(), vec!["AI", "Robotics", "Design"]);
        assert_eq!(catalog.unique_locations(), vec!["Boston", "Providence"]);
    }

    #[test]
    fn recommendations_match_goals_against_themes() {
        let catalog = Catalog::new(sample_catalog(), InterestSet::default());
        let goals = vec!["ai".to_string(), "Lead Generation".to_string()];
        let out = catalog.recommended_for(&goals);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 1);
    }

    #[test]
    fn recommendations_require_whole_label_match() {
        let catalog = Catalog::new(sample_catalog(), InterestSet::default());
        // "AI Ethics" is not the theme "AI"; partial containment no longer counts.
        let goals = vec!["AI Ethics".to_string()];
        assert!(catalog.recommended_for(&goals).is_empty());
    }
}
