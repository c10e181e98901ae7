//! Bet records
//!
//! Plain keyed storage. Bets never touch the wallet; wallet transactions
//! point at bets by id only.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{LedgerError, Result};

/// Market a bet was placed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BetType {
    Winner,
    Total,
    Handicap,
    Other,
}

/// Settlement state of a bet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BetOutcome {
    Won,
    Lost,
    Draw,
    Pending,
}

/// A betting record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bet {
    pub id: String,
    pub date: String,
    #[serde(rename = "type")]
    pub bet_type: BetType,
    pub amount: Decimal,
    pub odds: Decimal,
    pub outcome: BetOutcome,
    pub payout: Decimal,
    pub profit: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub favorite: bool,
}

fn bet_not_found(id: &str) -> LedgerError {
    LedgerError::NotFound {
        entity: "bet",
        id: id.to_string(),
    }
}

/// Thread-safe store of bet records
#[derive(Clone, Default)]
pub struct BetBook {
    bets: Arc<DashMap<String, Bet>>,
}

impl BetBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new bet; its id must be unused
    pub fn create(&self, bet: Bet) -> Result<Bet> {
        match self.bets.entry(bet.id.clone()) {
            Entry::Occupied(_) => Err(LedgerError::DuplicateId {
                entity: "bet",
                id: bet.id,
            }),
            Entry::Vacant(slot) => {
                slot.insert(bet.clone());
                tracing::info!(id = %bet.id, "Created bet");
                Ok(bet)
            }
        }
    }

    pub fn get(&self, id: &str) -> Result<Bet> {
        self.bets
            .get(id)
            .map(|bet| bet.value().clone())
            .ok_or_else(|| bet_not_found(id))
    }

    /// All bets, ordered by id
    pub fn list(&self) -> Vec<Bet> {
        let mut bets: Vec<Bet> = self.bets.iter().map(|entry| entry.value().clone()).collect();
        bets.sort_by(|a, b| a.id.cmp(&b.id));
        bets
    }

    /// Replace an existing bet. The stored record keeps `id` as its key and id.
    pub fn update(&self, id: &str, mut bet: Bet) -> Result<Bet> {
        let mut slot = self.bets.get_mut(id).ok_or_else(|| bet_not_found(id))?;
        bet.id = id.to_string();
        *slot = bet.clone();
        tracing::info!(id = %id, "Updated bet");
        Ok(bet)
    }

    pub fn delete(&self, id: &str) -> Result<Bet> {
        let (_, bet) = self.bets.remove(id).ok_or_else(|| bet_not_found(id))?;
        tracing::info!(id = %id, "Deleted bet");
        Ok(bet)
    }
}
