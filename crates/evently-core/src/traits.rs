//! Core traits for evently storage.
//!
//! `EventRepository` is the seam between the ranking/planning logic and a
//! concrete store. Filter and sort types live next to it so every backend
//! shares one definition of their semantics.

use std::cmp::Ordering;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{CreateEventRequest, Event, UpdateEventRequest};

// =============================================================================
// FILTERS
// =============================================================================

/// "Related to" predicate used by the similar-events candidate fetch:
/// exact category match OR case-insensitive location containment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedTo {
    pub category: String,
    pub location_contains: String,
}

/// Predicates over events. Every present predicate is ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Case-insensitive substring over title OR description OR location.
    pub search: Option<String>,
    /// Exact, case-sensitive category.
    pub category: Option<String>,
    /// Ids that must not appear in the result.
    pub exclude_ids: Vec<Uuid>,
    pub related_to: Option<RelatedTo>,
}

impl EventFilter {
    /// Reference semantics for the filter; SQL backends must agree with it
    /// for ASCII text.
    ///
    /// Case folding here is Rust's Unicode `to_lowercase`, while Postgres
    /// `ILIKE` folds under the database collation, so the two can differ on
    /// non-ASCII input such as `ß` or `İ`.
    pub fn matches(&self, event: &Event) -> bool {
        if self.exclude_ids.contains(&event.id) {
            return false;
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = contains_ci(&event.title, &needle)
                || event
                    .description
                    .as_deref()
                    .is_some_and(|d| contains_ci(d, &needle))
                || contains_ci(&event.location, &needle);
            if !hit {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if &event.category != category {
                return false;
            }
        }

        if let Some(related) = &self.related_to {
            let needle = related.location_contains.to_lowercase();
            if event.category != related.category && !contains_ci(&event.location, &needle) {
                return false;
            }
        }

        true
    }
}

/// `needle` must already be lower-cased.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

// =============================================================================
// SORTING
// =============================================================================

/// Fields a store can order by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Date,
    Title,
    CreatedAt,
    Category,
    Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Ordered list of sort keys. Stores append `id ASC` as a final key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSort(pub Vec<(SortField, SortDirection)>);

impl EventSort {
    pub fn by(field: SortField, direction: SortDirection) -> Self {
        Self(vec![(field, direction)])
    }

    pub fn then(mut self, field: SortField, direction: SortDirection) -> Self {
        self.0.push((field, direction));
        self
    }

    pub fn keys(&self) -> &[(SortField, SortDirection)] {
        &self.0
    }

    /// Total order over events, including the trailing `id` tie-breaker.
    pub fn compare(&self, a: &Event, b: &Event) -> Ordering {
        for (field, direction) in &self.0 {
            let ord = match field {
                SortField::Date => a.date.cmp(&b.date),
                SortField::Title => a.title.cmp(&b.title),
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                SortField::Category => a.category.cmp(&b.category),
                SortField::Location => a.location.cmp(&b.location),
            };
            let ord = match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        a.id.cmp(&b.id)
    }
}

// =============================================================================
// EVENT REPOSITORY
// =============================================================================

/// Persistence for events.
///
/// Single-record operations are expected to be atomic. Nothing here
/// coordinates across calls: a check-then-act sequence in the caller can
/// race with a concurrent delete.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert a new event. The store assigns id and timestamps.
    async fn insert(&self, req: CreateEventRequest) -> Result<Event>;

    /// Fetch an event by id.
    async fn fetch(&self, id: Uuid) -> Result<Option<Event>>;

    /// Check if an event exists.
    async fn exists(&self, id: Uuid) -> Result<bool>;

    /// Events matching `filter`, ordered by `sort`, skipping `offset`, at most `limit`.
    async fn find(
        &self,
        filter: &EventFilter,
        sort: &EventSort,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Event>>;

    /// Number of events matching `filter`, ignoring pagination.
    async fn count(&self, filter: &EventFilter) -> Result<i64>;

    /// Partially update an event and refresh `updated_at`.
    /// Returns NotFound if the event no longer exists.
    async fn update(&self, id: Uuid, req: UpdateEventRequest) -> Result<Event>;

    /// Permanently delete an event. Returns NotFound if nothing was removed.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Distinct categories, sorted ascending.
    async fn categories(&self) -> Result<Vec<String>>;
}
