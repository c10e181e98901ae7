//! Wagerbook Ledger - wallet ledger and betting records
//!
//! The ledger is:
//! - Single-wallet (one wallet per process)
//! - Transaction-keyed (every wallet movement is a uniquely identified record)
//! - Reversible (a committed transaction can be removed, undoing its effect)
//! - Store-agnostic (records live behind [`TransactionStore`])
//!
//! # Invariants
//!
//! 1. Wallet balance equals the sum of signed effects of all present transactions
//! 2. Transaction ids are unique
//! 3. Apply and reverse are atomic: no caller observes the store and the wallet out of step

pub mod bets;
pub mod guard;
pub mod store;

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use bets::{Bet, BetBook, BetOutcome, BetType};
pub use guard::LedgerGuard;
pub use store::{InMemoryTransactionStore, TransactionStore};

/// Errors that can occur in ledger operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("{entity} already exists: {id}")]
    DuplicateId { entity: &'static str, id: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid transaction type: {kind}")]
    InvalidTransactionType { kind: String },

    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },
}

impl LedgerError {
    pub(crate) fn duplicate_transaction(id: &str) -> Self {
        Self::DuplicateId {
            entity: "transaction",
            id: id.to_string(),
        }
    }

    pub(crate) fn transaction_not_found(id: &str) -> Self {
        Self::NotFound {
            entity: "transaction",
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Kind of wallet movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Cash in
    Deposit,
    /// Cash out
    Withdrawal,
    /// Stake placed on a bet
    Bet,
    /// Winnings from a bet
    Payout,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Bet => "bet",
            Self::Payout => "payout",
        }
    }

    /// Signed balance effect of a transaction of this type
    pub fn effect(&self, amount: Decimal) -> Decimal {
        match self {
            Self::Deposit | Self::Payout => amount,
            Self::Withdrawal | Self::Bet => -amount,
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "deposit" => Ok(Self::Deposit),
            "withdrawal" => Ok(Self::Withdrawal),
            "bet" => Ok(Self::Bet),
            "payout" => Ok(Self::Payout),
            other => Err(LedgerError::InvalidTransactionType {
                kind: other.to_string(),
            }),
        }
    }
}

/// A single wallet movement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletTransaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Non-negative magnitude; the sign comes from `kind`
    pub amount: Decimal,
    pub date: String,
    /// Bet this movement relates to (reference only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bet_id: Option<String>,
}

impl WalletTransaction {
    pub fn new(
        id: impl Into<String>,
        kind: TransactionType,
        amount: Decimal,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            amount,
            date: date.into(),
            bet_id: None,
        }
    }

    pub fn with_bet(mut self, bet_id: impl Into<String>) -> Self {
        self.bet_id = Some(bet_id.into());
        self
    }

    /// Signed balance effect of this transaction
    pub fn effect(&self) -> Decimal {
        self.kind.effect(self.amount)
    }
}

/// The wallet aggregate
///
/// `transactions` holds ids in commit order; the records themselves live in
/// the transaction store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub balance: Decimal,
    pub transactions: Vec<String>,
}

/// Wallet with its transactions resolved, as returned to readers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSnapshot {
    pub balance: Decimal,
    pub transactions: Vec<WalletTransaction>,
}
