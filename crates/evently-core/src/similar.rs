//! Similar-events ranking.
//!
//! Retrieve-then-rank-then-backfill: fetch a superset of plausible
//! candidates from the store, score them in memory, stable-sort by score,
//! keep the top `limit`, then top up from the rest of the store (ascending
//! date) when the candidate pool was too small.
//!
//! Each stage is a free function so it can be tested on its own; the
//! [`SimilarEventsRanker`] only wires them to an [`EventRepository`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::defaults;
use crate::error::{Error, Result};
use crate::models::Event;
use crate::traits::{EventFilter, EventRepository, EventSort, RelatedTo, SortDirection, SortField};

const MILLIS_PER_DAY: f64 = 1000.0 * 60.0 * 60.0 * 24.0;

// =============================================================================
// SCORING POLICY
// =============================================================================

/// Similarity of a candidate to the target. Higher is more similar.
pub trait SimilarityScorer: Send + Sync {
    fn score(&self, target: &Event, candidate: &Event) -> f64;
}

/// Weighted sum of category match, location containment and date proximity.
///
/// Category compares exactly (case-sensitive); location compares
/// case-insensitively against the target's primary location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedScorer {
    pub category_weight: f64,
    pub location_weight: f64,
    pub date_max: f64,
    /// Days per point of date-score decay.
    pub date_decay_days: f64,
}

impl Default for WeightedScorer {
    fn default() -> Self {
        Self {
            category_weight: defaults::SCORE_CATEGORY,
            location_weight: defaults::SCORE_LOCATION,
            date_max: defaults::SCORE_DATE_MAX,
            date_decay_days: defaults::SCORE_DATE_DECAY_DAYS,
        }
    }
}

impl SimilarityScorer for WeightedScorer {
    fn score(&self, target: &Event, candidate: &Event) -> f64 {
        let mut score = 0.0;

        if candidate.category == target.category {
            score += self.category_weight;
        }

        let primary = primary_location(&target.location).to_lowercase();
        if candidate.location.to_lowercase().contains(&primary) {
            score += self.location_weight;
        }

        let days = days_between(target.date, candidate.date);
        score += (self.date_max - days / self.date_decay_days).max(0.0);

        score
    }
}

/// Absolute distance between two instants in fractional days.
pub fn days_between(a: DateTime<Utc>, b: DateTime<Utc>) -> f64 {
    (a - b).num_milliseconds().abs() as f64 / MILLIS_PER_DAY
}

// =============================================================================
// PIPELINE STAGES
// =============================================================================

/// First comma-delimited segment of a location, trimmed.
pub fn primary_location(location: &str) -> &str {
    location.split(',').next().map(str::trim).unwrap_or_default()
}

/// Candidates: anything but the target sharing its category or primary location.
pub fn candidate_filter(target: &Event) -> EventFilter {
    EventFilter {
        exclude_ids: vec![target.id],
        related_to: Some(RelatedTo {
            category: target.category.clone(),
            location_contains: primary_location(&target.location).to_string(),
        }),
        ..Default::default()
    }
}

/// Order of the candidate pool, which is also the tie-break among equal
/// scores: category descending, location ascending, then date toward the
/// target's side of `now` (newest first for past events, soonest first
/// for upcoming ones).
pub fn candidate_sort(target: &Event, now: DateTime<Utc>) -> EventSort {
    let date_direction = if target.date < now {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };
    EventSort::by(SortField::Category, SortDirection::Desc)
        .then(SortField::Location, SortDirection::Asc)
        .then(SortField::Date, date_direction)
}

/// Pair each candidate with its score, preserving pool order.
pub fn score_candidates(
    scorer: &dyn SimilarityScorer,
    target: &Event,
    candidates: Vec<Event>,
) -> Vec<(Event, f64)> {
    candidates
        .into_iter()
        .map(|candidate| {
            let score = scorer.score(target, &candidate);
            trace!(
                subsystem = "core",
                component = "ranker",
                event_id = %candidate.id,
                score,
                "Candidate scored"
            );
            (candidate, score)
        })
        .collect()
}

/// Score-descending stable sort, truncated to `limit`.
pub fn rank(mut scored: Vec<(Event, f64)>, limit: usize) -> Vec<Event> {
    // sort_by is stable: equal scores keep pool order
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(limit);
    scored.into_iter().map(|(event, _)| event).collect()
}

/// Events eligible for the fallback fill: not the target, not already chosen.
pub fn backfill_filter(target_id: Uuid, chosen: &[Event]) -> EventFilter {
    let mut exclude_ids = Vec::with_capacity(chosen.len() + 1);
    exclude_ids.push(target_id);
    exclude_ids.extend(chosen.iter().map(|e| e.id));
    EventFilter {
        exclude_ids,
        ..Default::default()
    }
}

/// Fallback fill order.
pub fn backfill_sort() -> EventSort {
    EventSort::by(SortField::Date, SortDirection::Asc)
}

// =============================================================================
// RANKER
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankerConfig {
    /// Candidate pool size as a multiple of the requested limit.
    pub candidate_multiplier: i64,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            candidate_multiplier: defaults::SIMILAR_CANDIDATE_MULTIPLIER,
        }
    }
}

/// Finds events similar to a target event.
#[derive(Clone)]
pub struct SimilarEventsRanker {
    config: RankerConfig,
    scorer: Arc<dyn SimilarityScorer>,
}

impl Default for SimilarEventsRanker {
    fn default() -> Self {
        Self::new(RankerConfig::default())
    }
}

impl SimilarEventsRanker {
    pub fn new(config: RankerConfig) -> Self {
        Self {
            config,
            scorer: Arc::new(WeightedScorer::default()),
        }
    }

    /// Replace the scoring policy.
    pub fn with_scorer(mut self, scorer: Arc<dyn SimilarityScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn config(&self) -> RankerConfig {
        self.config
    }

    /// Up to `limit` events similar to the event `id`, most similar first.
    ///
    /// Fails with NotFound if `id` does not exist; nothing else is fatal.
    pub async fn similar_to(
        &self,
        repo: &dyn EventRepository,
        id: Uuid,
        limit: i64,
    ) -> Result<Vec<Event>> {
        let target = repo
            .fetch(id)
            .await?
            .ok_or_else(|| Error::event_not_found(id))?;
        self.rank_for(repo, &target, limit, Utc::now()).await
    }

    /// Rank against an already-resolved target. `now` decides the candidate
    /// pool's date direction.
    pub async fn rank_for(
        &self,
        repo: &dyn EventRepository,
        target: &Event,
        limit: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<Event>> {
        if limit <= 0 {
            return Ok(Vec::new());
        }

        let pool_size = limit.saturating_mul(self.config.candidate_multiplier.max(1));
        let candidates = repo
            .find(
                &candidate_filter(target),
                &candidate_sort(target, now),
                0,
                pool_size,
            )
            .await?;
        let candidate_count = candidates.len();

        let scored = score_candidates(self.scorer.as_ref(), target, candidates);
        let mut ranked = rank(scored, limit as usize);

        let shortfall = limit - ranked.len() as i64;
        let mut backfill_count = 0;
        if shortfall > 0 {
            let extra = repo
                .find(
                    &backfill_filter(target.id, &ranked),
                    &backfill_sort(),
                    0,
                    shortfall,
                )
                .await?;
            backfill_count = extra.len();
            ranked.extend(extra);
        }

        debug!(
            subsystem = "core",
            component = "ranker",
            op = "similar",
            event_id = %target.id,
            limit,
            candidate_count,
            backfill_count,
            result_count = ranked.len(),
            "Similar events ranked"
        );

        Ok(ranked)
    }
}
