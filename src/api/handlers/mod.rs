//! API request handlers.

/// Health check handler.
pub mod health;
/// Research pipeline handler.
pub mod research;
