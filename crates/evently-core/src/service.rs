//! Event operations exposed to the HTTP layer.
//!
//! Update and delete check existence and then mutate as two separate store
//! calls. A concurrent delete landing between the two is not coordinated:
//! the caller then sees the store's NotFound from the second call.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{
    CreateEventRequest, DeleteEventResponse, Event, Paginated, UpdateEventRequest,
};
use crate::query::{plan_list, ListEventsQuery};
use crate::similar::SimilarEventsRanker;
use crate::traits::EventRepository;

#[derive(Clone)]
pub struct EventService {
    repo: Arc<dyn EventRepository>,
    ranker: SimilarEventsRanker,
}

impl EventService {
    pub fn new(repo: Arc<dyn EventRepository>, ranker: SimilarEventsRanker) -> Self {
        Self { repo, ranker }
    }

    pub async fn create(&self, req: CreateEventRequest) -> Result<Event> {
        let event = self.repo.insert(req).await?;
        info!(
            subsystem = "core",
            component = "events",
            op = "create",
            event_id = %event.id,
            category = %event.category,
            "Event created"
        );
        Ok(event)
    }

    pub async fn list(&self, query: &ListEventsQuery) -> Result<Paginated<Event>> {
        let start = Instant::now();
        let plan = plan_list(query);

        let total = self.repo.count(&plan.filter).await?;
        let data = self
            .repo
            .find(&plan.filter, &plan.sort, plan.offset, plan.limit)
            .await?;

        debug!(
            subsystem = "core",
            component = "events",
            op = "list",
            total,
            result_count = data.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Events listed"
        );
        Ok(Paginated::new(data, total, plan.page, plan.limit))
    }

    pub async fn get(&self, id: Uuid) -> Result<Event> {
        self.repo
            .fetch(id)
            .await?
            .ok_or_else(|| Error::event_not_found(id))
    }

    pub async fn similar(&self, id: Uuid, limit: i64) -> Result<Vec<Event>> {
        self.ranker.similar_to(self.repo.as_ref(), id, limit).await
    }

    pub async fn categories(&self) -> Result<Vec<String>> {
        self.repo.categories().await
    }

    pub async fn update(&self, id: Uuid, req: UpdateEventRequest) -> Result<Event> {
        if !self.repo.exists(id).await? {
            return Err(Error::event_not_found(id));
        }
        let event = self.repo.update(id, req).await?;
        info!(
            subsystem = "core",
            component = "events",
            op = "update",
            event_id = %id,
            "Event updated"
        );
        Ok(event)
    }

    pub async fn delete(&self, id: Uuid) -> Result<DeleteEventResponse> {
        if !self.repo.exists(id).await? {
            return Err(Error::event_not_found(id));
        }
        self.repo.delete(id).await?;
        info!(
            subsystem = "core",
            component = "events",
            op = "delete",
            event_id = %id,
            "Event deleted"
        );
        Ok(DeleteEventResponse { id })
    }
}
