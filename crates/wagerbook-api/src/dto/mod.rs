//! Data Transfer Objects
//!
//! Request and response structures for the API. Bet records travel as
//! [`wagerbook_ledger::Bet`] unchanged.

pub mod auth;
pub mod wallet;

pub use auth::*;
pub use wallet::*;
