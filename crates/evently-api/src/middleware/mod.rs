//! HTTP middleware for evently-api.

pub mod request_log;

pub use request_log::request_log;
