//! In-memory `EventRepository`.
//!
//! Backs tests and the `STORE_BACKEND=memory` mode. Filtering and ordering
//! go through `EventFilter::matches` and `EventSort::compare`, the same
//! semantics the PostgreSQL repository implements in SQL.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{CreateEventRequest, Event, UpdateEventRequest};
use crate::traits::{EventFilter, EventRepository, EventSort};

#[derive(Default)]
pub struct MemoryEventRepository {
    events: RwLock<HashMap<Uuid, Event>>,
}

impl MemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with fully-formed events (ids and timestamps kept as given).
    pub fn with_events(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: RwLock::new(events.into_iter().map(|e| (e.id, e)).collect()),
        }
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl EventRepository for MemoryEventRepository {
    async fn insert(&self, req: CreateEventRequest) -> Result<Event> {
        let event = Event::from_request(req, Utc::now());
        self.events.write().await.insert(event.id, event.clone());
        Ok(event)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Event>> {
        Ok(self.events.read().await.get(&id).cloned())
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        Ok(self.events.read().await.contains_key(&id))
    }

    async fn find(
        &self,
        filter: &EventFilter,
        sort: &EventSort,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Event>> {
        let events = self.events.read().await;
        let mut matched: Vec<&Event> = events.values().filter(|e| filter.matches(e)).collect();
        matched.sort_by(|a, b| sort.compare(a, b));

        Ok(matched
            .into_iter()
            .skip(clamp_to_usize(offset))
            .take(clamp_to_usize(limit))
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &EventFilter) -> Result<i64> {
        let events = self.events.read().await;
        Ok(events.values().filter(|e| filter.matches(e)).count() as i64)
    }

    async fn update(&self, id: Uuid, req: UpdateEventRequest) -> Result<Event> {
        let mut events = self.events.write().await;
        let event = events.get_mut(&id).ok_or_else(|| Error::event_not_found(id))?;
        event.apply(&req, Utc::now());
        Ok(event.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.events
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::event_not_found(id))
    }

    async fn categories(&self) -> Result<Vec<String>> {
        let events = self.events.read().await;
        let distinct: BTreeSet<&str> = events.values().map(|e| e.category.as_str()).collect();
        Ok(distinct.into_iter().map(String::from).collect())
    }
}

/// Negative values read as 0; values past `usize::MAX` saturate.
fn clamp_to_usize(n: i64) -> usize {
    if n <= 0 {
        0
    } else {
        usize::try_from(n).unwrap_or(usize::MAX)
    }
}
