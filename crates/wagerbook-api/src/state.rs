//! Application state shared across handlers
//!
//! Holds the token authority and the record stores. Built once by the
//! composition root and shared behind an `Arc` for the life of the process.

use std::sync::Arc;
use wagerbook_auth::TokenAuthority;
use wagerbook_ledger::{BetBook, LedgerGuard};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Token issuance and verification
    pub auth: Arc<TokenAuthority>,
    /// Wallet and its transactions
    pub ledger: LedgerGuard,
    /// Bet records
    pub bets: BetBook,
}

impl AppState {
    /// Create a new application state with empty stores
    pub fn new(auth: Arc<TokenAuthority>) -> Self {
        Self {
            auth,
            ledger: LedgerGuard::new(),
            bets: BetBook::new(),
        }
    }

    /// Create state with explicit stores
    pub fn with_stores(auth: Arc<TokenAuthority>, ledger: LedgerGuard, bets: BetBook) -> Self {
        Self { auth, ledger, bets }
    }

    /// Create state for testing
    #[cfg(test)]
    pub fn test() -> Self {
        use wagerbook_auth::TokenConfig;

        let config = TokenConfig::new(
            "test-secret-key-at-least-32-bytes-long!!",
            std::time::Duration::from_secs(900),
        );
        let auth = TokenAuthority::new(config).expect("valid test config");
        Self::new(Arc::new(auth))
    }
}
