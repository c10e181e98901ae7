//! Transaction storage
//!
//! The guard owns its store and only touches it while holding its own lock,
//! so implementations need no internal synchronisation.

use std::collections::HashMap;

use crate::WalletTransaction;

/// Keyed storage for wallet transactions
pub trait TransactionStore: Send + Sync + 'static {
    fn exists(&self, id: &str) -> bool;

    /// Insert a record. Callers check [`exists`](Self::exists) first.
    fn insert(&mut self, transaction: WalletTransaction);

    fn remove(&mut self, id: &str) -> Option<WalletTransaction>;

    fn get(&self, id: &str) -> Option<WalletTransaction>;

    /// All records, in no particular order
    fn list(&self) -> Vec<WalletTransaction>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory store (no durability)
#[derive(Debug, Default)]
pub struct InMemoryTransactionStore {
    transactions: HashMap<String, WalletTransaction>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransactionStore for InMemoryTransactionStore {
    fn exists(&self, id: &str) -> bool {
        self.transactions.contains_key(id)
    }

    fn insert(&mut self, transaction: WalletTransaction) {
        self.transactions.insert(transaction.id.clone(), transaction);
    }

    fn remove(&mut self, id: &str) -> Option<WalletTransaction> {
        self.transactions.remove(id)
    }

    fn get(&self, id: &str) -> Option<WalletTransaction> {
        self.transactions.get(id).cloned()
    }

    fn list(&self) -> Vec<WalletTransaction> {
        self.transactions.values().cloned().collect()
    }

    fn len(&self) -> usize {
        self.transactions.len()
    }
}
