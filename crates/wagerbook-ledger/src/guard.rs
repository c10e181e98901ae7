//! Ledger Guard
//!
//! Keeps the wallet balance consistent with the transaction store. The store
//! and the wallet sit behind one lock, so `apply` and `reverse` each run as a
//! single critical section covering both.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::store::{InMemoryTransactionStore, TransactionStore};
use crate::{LedgerError, Result, Wallet, WalletSnapshot, WalletTransaction};

struct Book<S> {
    store: S,
    wallet: Wallet,
}

/// Invariant-preserving front for the wallet and its transactions
pub struct LedgerGuard<S = InMemoryTransactionStore> {
    book: Arc<RwLock<Book<S>>>,
}

impl<S> Clone for LedgerGuard<S> {
    fn clone(&self) -> Self {
        Self {
            book: self.book.clone(),
        }
    }
}

impl LedgerGuard<InMemoryTransactionStore> {
    /// Create a guard over an empty in-memory store and a zero-balance wallet
    pub fn new() -> Self {
        Self::from_parts(InMemoryTransactionStore::new(), Wallet::default())
    }
}

impl Default for LedgerGuard<InMemoryTransactionStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TransactionStore> LedgerGuard<S> {
    /// Create a guard over an existing store
    ///
    /// The wallet is rebuilt from whatever the store already holds. Fails with
    /// [`LedgerError::InvalidAmount`] when the stored effects overflow.
    pub fn with_store(store: S) -> Result<Self> {
        let mut existing = store.list();
        existing.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

        let balance = existing
            .iter()
            .try_fold(Decimal::ZERO, |sum, t| sum.checked_add(t.effect()))
            .ok_or_else(|| LedgerError::InvalidAmount {
                message: "balance overflow".to_string(),
            })?;

        let wallet = Wallet {
            balance,
            transactions: existing.into_iter().map(|t| t.id).collect(),
        };

        Ok(Self::from_parts(store, wallet))
    }

    fn from_parts(store: S, wallet: Wallet) -> Self {
        Self {
            book: Arc::new(RwLock::new(Book { store, wallet })),
        }
    }

    /// Commit a transaction and apply its effect to the balance
    ///
    /// Rejects a negative amount or an existing id before touching anything.
    pub async fn apply(&self, transaction: WalletTransaction) -> Result<WalletTransaction> {
        if transaction.amount < Decimal::ZERO {
            return Err(LedgerError::InvalidAmount {
                message: format!("amount must not be negative, got {}", transaction.amount),
            });
        }

        let mut book = self.book.write().await;

        if book.store.exists(&transaction.id) {
            tracing::warn!(id = %transaction.id, "Rejected duplicate transaction");
            return Err(LedgerError::duplicate_transaction(&transaction.id));
        }

        let new_balance = book
            .wallet
            .balance
            .checked_add(transaction.effect())
            .ok_or_else(|| LedgerError::InvalidAmount {
                message: "balance overflow".to_string(),
            })?;

        book.store.insert(transaction.clone());
        book.wallet.transactions.push(transaction.id.clone());
        book.wallet.balance = new_balance;

        tracing::info!(
            id = %transaction.id,
            kind = %transaction.kind,
            amount = %transaction.amount,
            balance = %new_balance,
            "Applied wallet transaction"
        );

        Ok(transaction)
    }

    /// Remove a transaction and undo exactly its effect on the balance
    pub async fn reverse(&self, id: &str) -> Result<WalletTransaction> {
        let mut book = self.book.write().await;

        let effect = book
            .store
            .get(id)
            .ok_or_else(|| LedgerError::transaction_not_found(id))?
            .effect();
        let new_balance = book
            .wallet
            .balance
            .checked_sub(effect)
            .ok_or_else(|| LedgerError::InvalidAmount {
                message: "balance overflow".to_string(),
            })?;

        let removed = book
            .store
            .remove(id)
            .ok_or_else(|| LedgerError::transaction_not_found(id))?;
        book.wallet.transactions.retain(|t| t != id);
        book.wallet.balance = new_balance;

        tracing::info!(
            id = %removed.id,
            kind = %removed.kind,
            amount = %removed.amount,
            balance = %new_balance,
            "Reversed wallet transaction"
        );

        Ok(removed)
    }

    /// Get a committed transaction
    pub async fn get(&self, id: &str) -> Result<WalletTransaction> {
        let book = self.book.read().await;
        book.store
            .get(id)
            .ok_or_else(|| LedgerError::transaction_not_found(id))
    }

    /// All committed transactions, in commit order
    pub async fn list(&self) -> Vec<WalletTransaction> {
        let book = self.book.read().await;
        book.wallet
            .transactions
            .iter()
            .filter_map(|id| book.store.get(id))
            .collect()
    }

    /// Current balance
    pub async fn balance(&self) -> Decimal {
        self.book.read().await.wallet.balance
    }

    /// Balance together with the resolved transactions, read under one lock
    pub async fn wallet(&self) -> WalletSnapshot {
        let book = self.book.read().await;
        WalletSnapshot {
            balance: book.wallet.balance,
            transactions: book
                .wallet
                .transactions
                .iter()
                .filter_map(|id| book.store.get(id))
                .collect(),
        }
    }

    /// Number of committed transactions
    pub async fn transaction_count(&self) -> usize {
        self.book.read().await.store.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TransactionType;
    use rust_decimal_macros::dec;

    fn tx(id: &str, kind: TransactionType, amount: Decimal) -> WalletTransaction {
        WalletTransaction::new(id, kind, amount, "2024-01-01")
    }

    /// Recompute the balance from scratch, independent of commit order
    async fn recomputed_balance<S: TransactionStore>(guard: &LedgerGuard<S>) -> Decimal {
        guard.list().await.iter().map(WalletTransaction::effect).sum()
    }

    #[tokio::test]
    async fn test_round_trip() {
        let guard = LedgerGuard::new();
        assert_eq!(guard.balance().await, dec!(0));

        guard.apply(tx("dep", TransactionType::Deposit, dec!(100))).await.unwrap();
        assert_eq!(guard.balance().await, dec!(100));

        guard.apply(tx("wd", TransactionType::Withdrawal, dec!(30))).await.unwrap();
        assert_eq!(guard.balance().await, dec!(70));

        guard.reverse("wd").await.unwrap();
        assert_eq!(guard.balance().await, dec!(100));

        guard.reverse("dep").await.unwrap();
        assert_eq!(guard.balance().await, dec!(0));
        assert_eq!(guard.transaction_count().await, 0);
    }

    #[tokio::test]
    async fn test_apply_returns_record_unchanged() {
        let guard = LedgerGuard::new();
        let record = tx("b1", TransactionType::Bet, dec!(12.50)).with_bet("bet-7");
        let committed = guard.apply(record.clone()).await.unwrap();
        assert_eq!(committed, record);
        assert_eq!(guard.get("b1").await.unwrap(), record);
    }

    #[tokio::test]
    async fn test_reversal_order_does_not_matter() {
        let first = LedgerGuard::new();
        let second = LedgerGuard::new();
        let records = [
            tx("a", TransactionType::Deposit, dec!(200)),
            tx("b", TransactionType::Bet, dec!(45)),
            tx("c", TransactionType::Payout, dec!(90)),
            tx("d", TransactionType::Withdrawal, dec!(60)),
        ];
        for record in &records {
            first.apply(record.clone()).await.unwrap();
            second.apply(record.clone()).await.unwrap();
        }

        first.reverse("b").await.unwrap();
        first.reverse("d").await.unwrap();
        second.reverse("d").await.unwrap();
        second.reverse("b").await.unwrap();

        assert_eq!(first.balance().await, dec!(290));
        assert_eq!(second.balance().await, dec!(290));
        assert_eq!(first.balance().await, recomputed_balance(&first).await);
    }

    #[tokio::test]
    async fn test_duplicate_id_leaves_state_unchanged() {
        let guard = LedgerGuard::new();
        guard.apply(tx("t1", TransactionType::Deposit, dec!(50))).await.unwrap();

        let result = guard.apply(tx("t1", TransactionType::Withdrawal, dec!(20))).await;
        assert_eq!(
            result,
            Err(LedgerError::DuplicateId {
                entity: "transaction",
                id: "t1".to_string()
            })
        );
        assert_eq!(guard.balance().await, dec!(50));
        assert_eq!(guard.transaction_count().await, 1);
        assert_eq!(guard.get("t1").await.unwrap().kind, TransactionType::Deposit);
    }

    #[tokio::test]
    async fn test_reverse_unknown_id_leaves_state_unchanged() {
        let guard = LedgerGuard::new();
        guard.apply(tx("t1", TransactionType::Deposit, dec!(50))).await.unwrap();

        let result = guard.reverse("missing").await;
        assert!(matches!(result, Err(LedgerError::NotFound { .. })));
        assert_eq!(guard.balance().await, dec!(50));
        assert_eq!(guard.transaction_count().await, 1);
    }

    #[tokio::test]
    async fn test_negative_amount_rejected() {
        let guard = LedgerGuard::new();
        let result = guard.apply(tx("neg", TransactionType::Deposit, dec!(-5))).await;
        assert!(matches!(result, Err(LedgerError::InvalidAmount { .. })));
        assert_eq!(guard.transaction_count().await, 0);
    }

    #[tokio::test]
    async fn test_balance_may_go_negative() {
        let guard = LedgerGuard::new();
        guard.apply(tx("bet", TransactionType::Bet, dec!(10))).await.unwrap();
        assert_eq!(guard.balance().await, dec!(-10));
    }

    #[tokio::test]
    async fn test_wallet_snapshot_in_commit_order() {
        let guard = LedgerGuard::new();
        for (id, amount) in [("z", dec!(1)), ("a", dec!(2)), ("m", dec!(3))] {
            guard.apply(tx(id, TransactionType::Deposit, amount)).await.unwrap();
        }
        guard.reverse("a").await.unwrap();

        let wallet = guard.wallet().await;
        assert_eq!(wallet.balance, dec!(4));
        let ids: Vec<_> = wallet.transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "m"]);
    }

    #[tokio::test]
    async fn test_with_store_rebuilds_wallet() {
        let mut store = InMemoryTransactionStore::new();
        store.insert(tx("a", TransactionType::Deposit, dec!(100)));
        store.insert(tx("b", TransactionType::Bet, dec!(40)));

        let guard = LedgerGuard::with_store(store).unwrap();
        assert_eq!(guard.balance().await, dec!(60));
        assert_eq!(guard.list().await.len(), 2);
    }

    #[test]
    fn test_with_store_rejects_overflowing_balance() {
        let mut store = InMemoryTransactionStore::new();
        store.insert(tx("a", TransactionType::Deposit, Decimal::MAX));
        store.insert(tx("b", TransactionType::Deposit, Decimal::MAX));

        assert!(matches!(
            LedgerGuard::with_store(store),
            Err(LedgerError::InvalidAmount { .. })
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_apply_on_disjoint_ids() {
        let guard = LedgerGuard::new();
        let mut handles = Vec::new();

        for i in 0..200u32 {
            let guard = guard.clone();
            handles.push(tokio::spawn(async move {
                let kind = if i % 3 == 0 {
                    TransactionType::Withdrawal
                } else {
                    TransactionType::Deposit
                };
                guard
                    .apply(tx(&format!("tx-{}", i), kind, Decimal::from(i)))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let expected: Decimal = (0..200u32)
            .map(|i| {
                if i % 3 == 0 {
                    -Decimal::from(i)
                } else {
                    Decimal::from(i)
                }
            })
            .sum();
        assert_eq!(guard.balance().await, expected);
        assert_eq!(guard.transaction_count().await, 200);
        assert_eq!(recomputed_balance(&guard).await, expected);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_duplicate_apply_commits_once() {
        let guard = LedgerGuard::new();
        let mut handles = Vec::new();

        for _ in 0..50 {
            let guard = guard.clone();
            handles.push(tokio::spawn(async move {
                guard
                    .apply(tx("same", TransactionType::Deposit, dec!(10)))
                    .await
                    .is_ok()
            }));
        }

        let mut committed = 0;
        for handle in handles {
            if handle.await.unwrap() {
                committed += 1;
            }
        }
        assert_eq!(committed, 1);
        assert_eq!(guard.balance().await, dec!(10));
    }
}
