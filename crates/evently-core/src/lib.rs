//! # evently-core
//!
//! Core types and logic for the evently service: the event record, its
//! validation, list query planning, similar-events ranking and the
//! repository abstraction the storage crates implement.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod memory;
pub mod models;
pub mod query;
pub mod service;
pub mod similar;
pub mod traits;
pub mod validation;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use memory::MemoryEventRepository;
pub use models::*;
pub use query::{
    plan_list, total_pages, ListEventsParams, ListEventsQuery, ListPlan, SortBy, SortOrder,
};
pub use service::EventService;
pub use similar::{RankerConfig, SimilarEventsRanker, SimilarityScorer, WeightedScorer};
pub use traits::*;
pub use validation::{validate_create, validate_list, validate_similar_limit, validate_update};
