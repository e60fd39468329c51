//! Similar-events ranking against the in-memory repository.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use evently_core::{
    Error, Event, EventRepository, MemoryEventRepository, RankerConfig, SimilarEventsRanker,
};

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn event(title: &str, location: &str, category: &str, date: DateTime<Utc>) -> Event {
    Event {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: None,
        date,
        location: location.to_string(),
        category: category.to_string(),
        latitude: None,
        longitude: None,
        created_at: date,
        updated_at: date,
    }
}

fn target() -> Event {
    event("Jazz Night", "Paris, France", "Music", at(2024, 6, 1))
}

/// Eight events unrelated to the target, dated 2023-01-01 .. 2023-01-08.
fn unrelated() -> Vec<Event> {
    (1..=8)
        .map(|d| {
            event(
                &format!("Exhibit {}", d),
                "Rome, Italy",
                "Art",
                at(2023, 1, d),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let repo = MemoryEventRepository::with_events(vec![target()]);
    let ranker = SimilarEventsRanker::default();
    let missing = Uuid::new_v4();

    let err = ranker.similar_to(&repo, missing, 4).await.unwrap_err();
    match err {
        Error::NotFound(msg) => assert!(msg.contains(&missing.to_string())),
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_two_scored_then_two_backfilled_by_date() {
    let t = target();
    let same_category = event("Blues", "Berlin, Germany", "Music", at(2024, 6, 10));
    let same_city = event("Rodeo", "Paris, Texas", "Sports", at(2024, 6, 2));
    let others = unrelated();

    let mut all = vec![t.clone(), same_category.clone(), same_city.clone()];
    all.extend(others.clone());
    let repo = MemoryEventRepository::with_events(all);

    let result = SimilarEventsRanker::default()
        .similar_to(&repo, t.id, 4)
        .await
        .unwrap();

    let ids: Vec<Uuid> = result.iter().map(|e| e.id).collect();
    assert_eq!(
        ids,
        vec![same_category.id, same_city.id, others[0].id, others[1].id]
    );
}

#[tokio::test]
async fn test_output_length_is_min_of_limit_and_other_events() {
    let t = target();
    let ranker = SimilarEventsRanker::default();

    for others in 0..=6usize {
        let mut all = vec![t.clone()];
        all.extend(unrelated().into_iter().take(others));
        let repo = MemoryEventRepository::with_events(all);

        for limit in 1..=5i64 {
            let result = ranker.similar_to(&repo, t.id, limit).await.unwrap();
            assert_eq!(
                result.len(),
                (limit as usize).min(others),
                "limit={} others={}",
                limit,
                others
            );
        }
    }
}

#[tokio::test]
async fn test_never_returns_target_or_duplicates() {
    let t = target();
    let mut all = vec![t.clone()];
    for d in 1..=6 {
        all.push(event("Gig", "Paris", "Music", at(2024, 6, d)));
    }
    all.extend(unrelated());
    let repo = MemoryEventRepository::with_events(all);

    let result = SimilarEventsRanker::default()
        .similar_to(&repo, t.id, 10)
        .await
        .unwrap();

    assert_eq!(result.len(), 10);
    let ids: HashSet<Uuid> = result.iter().map(|e| e.id).collect();
    assert_eq!(ids.len(), result.len());
    assert!(!ids.contains(&t.id));
}

#[tokio::test]
async fn test_backfill_never_displaces_scored_candidates() {
    let t = target();
    let mut related = Vec::new();
    for d in 1..=5 {
        related.push(event("Gig", "Lyon", "Music", at(2024, 8, d)));
    }
    let mut all = vec![t.clone()];
    all.extend(related.clone());
    // Unrelated events are earlier than every related one, so they would
    // win an ascending-date fill if the fill ran first.
    all.extend(unrelated());
    let repo = MemoryEventRepository::with_events(all);

    let result = SimilarEventsRanker::default()
        .similar_to(&repo, t.id, 4)
        .await
        .unwrap();

    assert_eq!(result.len(), 4);
    assert!(result.iter().all(|e| e.category == "Music"));
}

#[tokio::test]
async fn test_scores_descend_and_fill_is_last() {
    let t = target();
    let exact = event("Quartet", "Paris", "Music", t.date);
    let month_later = event("Trio", "Paris", "Music", t.date + Duration::days(30));
    let city_only = event("Match", "Paris, Texas", "Sports", t.date);
    let filler = event("Exhibit", "Rome", "Art", at(2020, 1, 1));
    let repo = MemoryEventRepository::with_events(vec![
        t.clone(),
        filler.clone(),
        city_only.clone(),
        month_later.clone(),
        exact.clone(),
    ]);

    let result = SimilarEventsRanker::default()
        .similar_to(&repo, t.id, 4)
        .await
        .unwrap();

    let ids: Vec<Uuid> = result.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![exact.id, month_later.id, city_only.id, filler.id]);
}

#[tokio::test]
async fn test_equal_scores_keep_candidate_pool_order() {
    let t = target();
    // Same category and date, neither in Paris: identical scores.
    // Pool order is location ascending within the category.
    let marseille = event("B", "Marseille", "Music", at(2024, 6, 5));
    let lyon = event("A", "Lyon", "Music", at(2024, 6, 5));
    let repo = MemoryEventRepository::with_events(vec![t.clone(), marseille.clone(), lyon.clone()]);

    let result = SimilarEventsRanker::default()
        .rank_for(&repo, &t, 2, at(2024, 1, 1))
        .await
        .unwrap();

    let ids: Vec<Uuid> = result.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![lyon.id, marseille.id]);
}

#[tokio::test]
async fn test_candidate_multiplier_bounds_the_pool() {
    let mut t = target();
    t.category = "Art".to_string();
    // Pool order is category descending: Sports, Music, Art.
    let sports = event("S", "Paris", "Sports", t.date);
    let music = event("M", "Paris", "Music", t.date);
    let art = event("A", "Berlin", "Art", t.date);
    let events = vec![t.clone(), sports.clone(), music.clone(), art.clone()];

    let narrow = SimilarEventsRanker::new(RankerConfig {
        candidate_multiplier: 2,
    });
    let repo = MemoryEventRepository::with_events(events);
    let result = narrow.rank_for(&repo, &t, 1, at(2024, 1, 1)).await.unwrap();
    assert_eq!(result[0].id, sports.id);

    let wide = SimilarEventsRanker::new(RankerConfig {
        candidate_multiplier: 3,
    });
    let result = wide.rank_for(&repo, &t, 1, at(2024, 1, 1)).await.unwrap();
    assert_eq!(result[0].id, art.id);
}

#[tokio::test]
async fn test_zero_limit_returns_empty() {
    let t = target();
    let repo = MemoryEventRepository::with_events(vec![t.clone()]);
    let result = SimilarEventsRanker::default()
        .similar_to(&repo, t.id, 0)
        .await
        .unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_ranker_works_through_trait_object() {
    let t = target();
    let repo: Arc<dyn EventRepository> =
        Arc::new(MemoryEventRepository::with_events(vec![t.clone()]));
    let result = SimilarEventsRanker::default()
        .similar_to(repo.as_ref(), t.id, 4)
        .await
        .unwrap();
    assert!(result.is_empty());
}
