//! Wallet DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use wagerbook_ledger::{TransactionType, WalletTransaction};

use crate::error::ApiResult;

/// New wallet transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    pub id: String,
    /// One of "deposit", "withdrawal", "bet", "payout"
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: Decimal,
    pub date: String,
    #[serde(default)]
    pub bet_id: Option<String>,
}

impl CreateTransactionRequest {
    /// Convert into a ledger record, validating the transaction type
    pub fn into_transaction(self) -> ApiResult<WalletTransaction> {
        let kind: TransactionType = self.kind.parse()?;
        let mut transaction = WalletTransaction::new(self.id, kind, self.amount, self.date);
        transaction.bet_id = self.bet_id;
        Ok(transaction)
    }
}
