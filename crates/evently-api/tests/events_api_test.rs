//! HTTP tests for the events API.
//!
//! Each test spawns the full router (middleware included) on an ephemeral
//! port backed by a fresh in-memory store and talks to it over reqwest.

use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use evently_api::{router, AppState};
use evently_core::{EventService, MemoryEventRepository, SimilarEventsRanker};

async fn spawn_test_server() -> String {
    let service = EventService::new(
        Arc::new(MemoryEventRepository::new()),
        SimilarEventsRanker::default(),
    );
    let app = router(AppState::new(service), "http://localhost:3000");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

async fn create_event(client: &reqwest::Client, base: &str, body: Value) -> Value {
    let response = client
        .post(format!("{}/events", base))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

fn event_body(title: &str, location: &str, category: &str, date: &str) -> Value {
    json!({
        "title": title,
        "description": "A gathering worth attending",
        "date": date,
        "location": location,
        "category": category,
    })
}

async fn seed(client: &reqwest::Client, base: &str) -> Vec<Value> {
    let mut created = Vec::new();
    for (title, location, category, date) in [
        ("Jazz Night", "Paris, France", "Music", "2024-06-01T19:00:00Z"),
        ("Rock Fest", "Berlin, Germany", "Music", "2024-07-15T18:00:00Z"),
        ("Marathon", "Paris, Texas", "Sports", "2024-05-20T08:00:00Z"),
        ("Oil Painting", "Rome, Italy", "Art", "2024-09-01T10:00:00Z"),
        ("Chess Open", "Oslo, Norway", "Games", "2024-03-10T09:00:00Z"),
    ] {
        created.push(create_event(client, base, event_body(title, location, category, date)).await);
    }
    created
}

fn assert_error_envelope(body: &Value, status: u16) {
    assert_eq!(body["success"], false);
    assert_eq!(body["statusCode"], status);
    assert!(body["message"].is_string());
    assert!(body["errors"].is_array());
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_health() {
    let base = spawn_test_server().await;
    let response = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_returns_camel_case_event() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let body = json!({
        "title": "Jazz Night",
        "date": "2024-06-01",
        "location": "Paris, France",
        "category": "Music",
        "latitude": 48.8566,
        "longitude": 2.3522,
    });
    let event = create_event(&client, &base, body).await;

    assert!(Uuid::parse_str(event["id"].as_str().unwrap()).is_ok());
    assert_eq!(event["date"], "2024-06-01T00:00:00.000Z");
    assert_eq!(event["latitude"], 48.8566);
    assert!(event["createdAt"].is_string());
    assert!(event["updatedAt"].is_string());
    assert!(event.get("created_at").is_none());
}

#[tokio::test]
async fn test_create_validation_lists_every_error() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/events", base))
        .json(&json!({ "title": "Hi", "date": "soon", "category": "Music" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert_error_envelope(&body, 400);
    let errors: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e.as_str().unwrap())
        .collect();
    assert!(errors.contains(&"Title must be at least 3 characters long"));
    assert!(errors.contains(&"Date must be a valid ISO date string"));
    assert!(errors.contains(&"location should not be empty"));
    assert_eq!(body["message"], body["errors"][0]);
}

#[tokio::test]
async fn test_unknown_fields_and_malformed_json_are_400() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let mut body = event_body("Jazz Night", "Paris", "Music", "2024-06-01");
    body["organizer"] = json!("someone");
    let response = client
        .post(format!("{}/events", base))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .post(format!("{}/events", base))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_error_envelope(&body, 400);
}

#[tokio::test]
async fn test_list_envelope_filters_and_paging() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();
    seed(&client, &base).await;

    let body: Value = client
        .get(format!("{}/events?limit=2&page=2", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total"], 5);
    assert_eq!(body["page"], 2);
    assert_eq!(body["limit"], 2);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["data"][0]["title"], "Jazz Night");

    let body: Value = client
        .get(format!("{}/events?search=paris&sortBy=title&sortOrder=desc", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total"], 2);
    assert_eq!(body["data"][0]["title"], "Marathon");
    assert_eq!(body["data"][1]["title"], "Jazz Night");

    let body: Value = client
        .get(format!("{}/events?category=Music&search=", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn test_list_huge_page_returns_empty_data() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();
    seed(&client, &base).await;

    let response = client
        .get(format!("{}/events?page={}", base, i64::MAX))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["total"], 5);
    assert_eq!(body["page"], i64::MAX);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_rejects_bad_parameters() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    for query in ["limit=0", "limit=101", "page=abc", "sortBy=location", "sortOrder=up"] {
        let response = client
            .get(format!("{}/events?{}", base, query))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "query {}", query);
        let body: Value = response.json().await.unwrap();
        assert_error_envelope(&body, 400);
    }
}

#[tokio::test]
async fn test_get_unknown_and_malformed_ids_are_404() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let missing = Uuid::new_v4();
    let response = client
        .get(format!("{}/events/{}", base, missing))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_error_envelope(&body, 404);
    assert_eq!(
        body["message"],
        format!("Event with ID {} not found", missing)
    );

    let response = client
        .get(format!("{}/events/not-a-uuid", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_similar_events() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();
    let created = seed(&client, &base).await;
    let jazz_id = created[0]["id"].as_str().unwrap();

    let response = client
        .get(format!("{}/events/{}/similar", base, jazz_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let similar: Vec<Value> = response.json().await.unwrap();
    let titles: Vec<&str> = similar.iter().map(|e| e["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Rock Fest", "Marathon", "Chess Open", "Oil Painting"]);

    let similar: Vec<Value> = client
        .get(format!("{}/events/{}/similar?limit=1", base, jazz_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(similar.len(), 1);

    let response = client
        .get(format!("{}/events/{}/similar?limit=0", base, jazz_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .get(format!("{}/events/{}/similar", base, Uuid::new_v4()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patch_and_delete() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();
    let created = create_event(
        &client,
        &base,
        event_body("Jazz Night", "Paris", "Music", "2024-06-01"),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let response = client
        .patch(format!("{}/events/{}", base, id))
        .json(&json!({ "location": "Lyon, France" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["location"], "Lyon, France");
    assert_eq!(updated["title"], "Jazz Night");
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let response = client
        .patch(format!("{}/events/{}", base, id))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "At least one field must be provided");

    let response = client
        .delete(format!("{}/events/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"], id);

    for response in [
        client.get(format!("{}/events/{}", base, id)).send().await.unwrap(),
        client.delete(format!("{}/events/{}", base, id)).send().await.unwrap(),
        client
            .patch(format!("{}/events/{}", base, id))
            .json(&json!({ "title": "Again" }))
            .send()
            .await
            .unwrap(),
    ] {
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_categories() {
    let base = spawn_test_server().await;
    let client = reqwest::Client::new();

    let empty: Vec<String> = client
        .get(format!("{}/events/categories", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(empty.is_empty());

    seed(&client, &base).await;
    let categories: Vec<String> = client
        .get(format!("{}/events/categories", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(categories, vec!["Art", "Games", "Music", "Sports"]);
}

#[tokio::test]
async fn test_unknown_route_uses_envelope() {
    let base = spawn_test_server().await;
    let response = reqwest::get(format!("{}/nope", base)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_error_envelope(&body, 404);
    assert_eq!(body["message"], "Cannot GET /nope");
}
