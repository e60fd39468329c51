//! Event record and the request/response types that carry it over the wire.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::query::total_pages;

// =============================================================================
// EVENT
// =============================================================================

/// A scheduled occurrence with a title, time, place and category.
///
/// `id`, `created_at` and `updated_at` are assigned by the store. All
/// timestamps serialize as ISO-8601 UTC strings with millisecond precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When the event occurs. May be in the past or the future.
    #[serde(with = "iso8601")]
    pub date: DateTime<Utc>,
    pub location: String,
    /// Free-text grouping key, compared exactly (case-sensitive).
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(with = "iso8601")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "iso8601")]
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Build a new event from a validated request, stamping id and timestamps.
    pub fn from_request(req: CreateEventRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: req.title,
            description: req.description,
            date: req.date,
            location: req.location,
            category: req.category,
            latitude: req.latitude,
            longitude: req.longitude,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update in place. Only provided fields change;
    /// `updated_at` is always refreshed.
    pub fn apply(&mut self, req: &UpdateEventRequest, now: DateTime<Utc>) {
        if let Some(title) = &req.title {
            self.title = title.clone();
        }
        if let Some(description) = &req.description {
            self.description = Some(description.clone());
        }
        if let Some(date) = req.date {
            self.date = date;
        }
        if let Some(location) = &req.location {
            self.location = location.clone();
        }
        if let Some(category) = &req.category {
            self.category = category.clone();
        }
        if let Some(latitude) = req.latitude {
            self.latitude = Some(latitude);
        }
        if let Some(longitude) = req.longitude {
            self.longitude = Some(longitude);
        }
        // Never move backwards, even if the clock does.
        self.updated_at = now.max(self.created_at);
    }
}

// =============================================================================
// CREATE / UPDATE
// =============================================================================

/// Raw create payload as received from clients, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateEventInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Raw partial-update payload as received from clients, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateEventInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Validated request for creating an event.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: String,
    pub category: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Validated partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl UpdateEventRequest {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.location.is_none()
            && self.category.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
    }
}

// =============================================================================
// RESPONSES
// =============================================================================

/// Paginated list envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    /// Wrap one page of results; `total_pages` is derived from `total`.
    pub fn new(data: Vec<T>, total: i64, page: i64, limit: i64) -> Self {
        Self {
            data,
            total,
            page,
            limit,
            total_pages: total_pages(total, limit),
        }
    }
}

/// Body returned after a delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteEventResponse {
    pub id: Uuid,
}

// =============================================================================
// DATES
// =============================================================================

/// Parse a client-supplied date.
///
/// Accepts:
/// - RFC 3339 with timezone: `2024-06-01T18:00:00Z`, `2024-06-01T18:00:00.000+02:00`
/// - ISO 8601 without timezone (assumes UTC): `2024-06-01T18:00:00`
/// - Date only (assumes midnight UTC): `2024-06-01`
pub fn parse_event_date(s: &str) -> Result<DateTime<Utc>, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Date must be a valid ISO date string".to_string());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }

    Err("Date must be a valid ISO date string".to_string())
}

/// Serde adapter rendering `DateTime<Utc>` as `2024-06-01T00:00:00.000Z`.
pub mod iso8601 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn format(dt: &DateTime<Utc>) -> String {
        dt.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(dt))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_event_date(&s).map_err(de::Error::custom)
    }
}
