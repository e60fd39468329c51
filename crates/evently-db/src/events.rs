//! Event repository implementation.

use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use evently_core::{
    CreateEventRequest, Error, Event, EventFilter, EventRepository, EventSort, Result,
    UpdateEventRequest,
};

use crate::event_filter::{order_by_clause, EventFilterQueryBuilder, QueryParam};

const EVENT_COLUMNS: &str =
    "id, title, description, date, location, category, latitude, longitude, created_at, updated_at";

/// PostgreSQL implementation of EventRepository.
#[derive(Clone)]
pub struct PgEventRepository {
    pool: Pool<Postgres>,
}

impl PgEventRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn insert(&self, req: CreateEventRequest) -> Result<Event> {
        let event = Event::from_request(req, Utc::now());

        let sql = format!(
            "INSERT INTO events ({EVENT_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {EVENT_COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&sql)
            .bind(event.id)
            .bind(&event.title)
            .bind(&event.description)
            .bind(event.date)
            .bind(&event.location)
            .bind(&event.category)
            .bind(event.latitude)
            .bind(event.longitude)
            .bind(event.created_at)
            .bind(event.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Event>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM events WHERE id = $1) AS present")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.get("present"))
    }

    async fn find(
        &self,
        filter: &EventFilter,
        sort: &EventSort,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Event>> {
        let start = Instant::now();
        let (where_clause, mut params) = EventFilterQueryBuilder::new(filter, 0).build();
        let limit_param = params.len() + 1;
        let offset_param = params.len() + 2;
        params.push(QueryParam::Int(limit.max(0)));
        params.push(QueryParam::Int(offset.max(0)));

        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events
             WHERE {}
             ORDER BY {}
             LIMIT ${} OFFSET ${}",
            where_clause,
            order_by_clause(sort),
            limit_param,
            offset_param
        );

        let mut q = sqlx::query_as::<_, Event>(&sql);
        for param in &params {
            q = param.bind_to_as(q);
        }
        let events = q.fetch_all(&self.pool).await.map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "events",
            op = "find",
            result_count = events.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Events query executed"
        );
        Ok(events)
    }

    async fn count(&self, filter: &EventFilter) -> Result<i64> {
        let (where_clause, params) = EventFilterQueryBuilder::new(filter, 0).build();
        let sql = format!("SELECT COUNT(*) AS count FROM events WHERE {}", where_clause);

        let mut q = sqlx::query(&sql);
        for param in &params {
            q = param.bind_to(q);
        }
        let row = q.fetch_one(&self.pool).await.map_err(Error::Database)?;
        Ok(row.get("count"))
    }

    async fn update(&self, id: Uuid, req: UpdateEventRequest) -> Result<Event> {
        // Absent fields keep their stored value; updated_at never precedes created_at.
        let sql = format!(
            "UPDATE events SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                date = COALESCE($4, date),
                location = COALESCE($5, location),
                category = COALESCE($6, category),
                latitude = COALESCE($7, latitude),
                longitude = COALESCE($8, longitude),
                updated_at = GREATEST($9, created_at)
             WHERE id = $1
             RETURNING {EVENT_COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .bind(req.title)
            .bind(req.description)
            .bind(req.date)
            .bind(req.location)
            .bind(req.category)
            .bind(req.latitude)
            .bind(req.longitude)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or_else(|| Error::event_not_found(id))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::event_not_found(id));
        }
        Ok(())
    }

    async fn categories(&self) -> Result<Vec<String>> {
        let rows = sqlx::query(
            "SELECT DISTINCT category COLLATE \"C\" AS category FROM events ORDER BY category ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(|row| row.get("category")).collect())
    }
}
