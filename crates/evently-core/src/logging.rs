//! Structured logging field names shared by every evently crate.
//!
//! Log aggregation queries rely on these names staying stable, so use the
//! constants (or the identical literal in `tracing` macros) rather than
//! inventing per-call field names.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, client error responses |
//! | INFO  | Lifecycle events (startup, shutdown), mutations |
//! | DEBUG | Decision points, query plans, ranking summaries |
//! | TRACE | Per-candidate scores |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated from the `x-request-id` header.
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "core", "database"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "ranker", "planner", "pool", "events"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "list", "similar", "update", "backfill"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Event UUID being operated on.
pub const EVENT_ID: &str = "event_id";

/// Category of the event being operated on.
pub const CATEGORY: &str = "category";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a query.
pub const RESULT_COUNT: &str = "result_count";

/// Number of candidates fetched before ranking.
pub const CANDIDATE_COUNT: &str = "candidate_count";

/// Number of events appended by the fallback fill.
pub const BACKFILL_COUNT: &str = "backfill_count";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// HTTP status code of a response.
pub const STATUS: &str = "status";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
