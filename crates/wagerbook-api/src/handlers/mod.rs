//! API Handlers
//!
//! Request handlers for all API endpoints.

pub mod auth;
pub mod bets;
pub mod health;
pub mod wallet;

pub use health::*;
