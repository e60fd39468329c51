//! Centralized default constants for evently.
//!
//! Crates reference these instead of repeating magic numbers.

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page number for list queries (1-based).
pub const PAGE: i64 = 1;

/// Default page size for list queries.
pub const PAGE_LIMIT: i64 = 12;

/// Largest page size a client may request.
pub const PAGE_LIMIT_MAX: i64 = 100;

// =============================================================================
// SIMILAR EVENTS
// =============================================================================

/// Default number of similar events returned.
pub const SIMILAR_LIMIT: i64 = 4;

/// Largest number of similar events a client may request.
pub const SIMILAR_LIMIT_MAX: i64 = 100;

/// Candidate pool size as a multiple of the requested limit.
pub const SIMILAR_CANDIDATE_MULTIPLIER: i64 = 2;

/// Score awarded when categories match exactly.
pub const SCORE_CATEGORY: f64 = 10.0;

/// Score awarded when the candidate location contains the primary location.
pub const SCORE_LOCATION: f64 = 5.0;

/// Score awarded for events on the same day; decays linearly with distance.
pub const SCORE_DATE_MAX: f64 = 5.0;

/// Days over which the date score loses one point.
pub const SCORE_DATE_DECAY_DAYS: f64 = 30.0;

// =============================================================================
// FIELD LIMITS
// =============================================================================

pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 200;
pub const DESCRIPTION_MIN: usize = 10;
pub const DESCRIPTION_MAX: usize = 2000;
pub const LOCATION_MIN: usize = 3;
pub const LOCATION_MAX: usize = 200;
pub const CATEGORY_MIN: usize = 2;
pub const CATEGORY_MAX: usize = 50;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3001;

/// Default bind address.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default allowed CORS origin (the web frontend in development).
pub const CORS_ORIGIN: &str = "http://localhost:3000";

/// Default maximum database connections.
pub const DB_MAX_CONNECTIONS: u32 = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_score_reaches_zero_at_150_days() {
        assert_eq!(SCORE_DATE_MAX * SCORE_DATE_DECAY_DAYS, 150.0);
    }

    #[test]
    fn test_max_score_is_twenty() {
        assert_eq!(SCORE_CATEGORY + SCORE_LOCATION + SCORE_DATE_MAX, 20.0);
    }

    #[test]
    fn test_default_limits_within_bounds() {
        assert!(PAGE_LIMIT >= 1 && PAGE_LIMIT <= PAGE_LIMIT_MAX);
        assert!(SIMILAR_LIMIT >= 1 && SIMILAR_LIMIT <= SIMILAR_LIMIT_MAX);
    }
}
