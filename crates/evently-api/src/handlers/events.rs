//! Event HTTP handlers.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use evently_core::{
    validate_create, validate_list, validate_similar_limit, validate_update, CreateEventInput,
    DeleteEventResponse, Error, Event, ListEventsParams, Paginated, UpdateEventInput,
};

use crate::error::ApiError;
use crate::AppState;

/// Path ids that are not UUIDs cannot name an event, so they read as 404.
fn parse_event_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| Error::event_not_found(raw).into())
}

#[derive(Debug, Default, Deserialize)]
pub struct SimilarParams {
    pub limit: Option<String>,
}

/// `GET /events`
pub async fn list_events(
    State(state): State<AppState>,
    params: Result<Query<ListEventsParams>, QueryRejection>,
) -> Result<Json<Paginated<Event>>, ApiError> {
    let Query(params) = params?;
    let query = validate_list(params)?;
    let page = state.events.list(&query).await?;
    Ok(Json(page))
}

/// `POST /events`
///
/// # Returns
/// - 201 Created with the stored event
/// - 400 Bad Request with every validation message
pub async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<CreateEventInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let Json(input) = payload?;
    let req = validate_create(input)?;
    let event = state.events.create(req).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// `GET /events/categories`
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.events.categories().await?))
}

/// `GET /events/:id`
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Event>, ApiError> {
    let id = parse_event_id(&id)?;
    Ok(Json(state.events.get(id).await?))
}

/// `GET /events/:id/similar?limit=N`
pub async fn similar_events(
    State(state): State<AppState>,
    Path(id): Path<String>,
    params: Result<Query<SimilarParams>, QueryRejection>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let id = parse_event_id(&id)?;
    let Query(params) = params?;
    let limit = validate_similar_limit(params.limit.as_deref())?;
    Ok(Json(state.events.similar(id, limit).await?))
}

/// `PATCH /events/:id`
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateEventInput>, JsonRejection>,
) -> Result<Json<Event>, ApiError> {
    let id = parse_event_id(&id)?;
    let Json(input) = payload?;
    let req = validate_update(input)?;
    Ok(Json(state.events.update(id, req).await?))
}

/// `DELETE /events/:id`
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteEventResponse>, ApiError> {
    let id = parse_event_id(&id)?;
    Ok(Json(state.events.delete(id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_event_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_event_id(&id.to_string()).unwrap(), id);

        match parse_event_id("not-a-uuid") {
            Err(ApiError::NotFound(msg)) => {
                assert_eq!(msg, "Event with ID not-a-uuid not found")
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }
}
