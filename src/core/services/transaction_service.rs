//! Recording and querying income/expense transactions.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{PaymentMethod, Transaction, TransactionKind};
use crate::errors::{FinanceError, Result};
use crate::storage::FinanceStore;

/// Transaction data as captured from a form or extracted from a message,
/// before category resolution.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub amount: f64,
    pub category: Option<String>,
    pub description: String,
    pub payment_method: PaymentMethod,
}

pub struct TransactionService;

impl TransactionService {
    /// Persists a transaction, resolving its free-text category to a
    /// category id.
    pub fn record(
        store: &dyn FinanceStore,
        user_id: Uuid,
        draft: TransactionDraft,
        date: NaiveDate,
    ) -> Result<Transaction> {
        if !draft.amount.is_finite() || draft.amount <= 0.0 {
            return Err(FinanceError::InvalidInput(
                "transaction amount must be greater than zero".into(),
            ));
        }
        let category_id = match draft.category.as_deref() {
            Some(name) => store.get_or_create_category(user_id, name, draft.kind)?,
            None => None,
        };
        let transaction = Transaction::new(user_id, draft.kind, draft.amount, date)
            .with_category(category_id)
            .with_description(draft.description)
            .with_payment_method(draft.payment_method);
        store.insert_transaction(transaction.clone())?;
        tracing::info!(kind = ?transaction.kind, amount = transaction.amount, "transaction recorded");
        Ok(transaction)
    }

    /// Returns the user's transactions, newest first.
    pub fn list(store: &dyn FinanceStore, user_id: Uuid) -> Result<Vec<Transaction>> {
        store.list_transactions(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn expense(amount: f64, category: Option<&str>) -> TransactionDraft {
        TransactionDraft {
            kind: TransactionKind::Expense,
            amount,
            category: category.map(str::to_string),
            description: String::new(),
            payment_method: PaymentMethod::Card,
        }
    }

    #[test]
    fn record_resolves_category_names_to_ids() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let first = TransactionService::record(
            &store,
            user,
            expense(50.0, Some("Groceries")),
            date(2024, 4, 2),
        )
        .unwrap();
        let second = TransactionService::record(
            &store,
            user,
            expense(30.0, Some("Groceries")),
            date(2024, 4, 3),
        )
        .unwrap();
        assert!(first.category_id.is_some());
        assert_eq!(first.category_id, second.category_id);
    }

    #[test]
    fn record_without_category_leaves_id_unset() {
        let store = MemoryStore::new();
        let txn = TransactionService::record(
            &store,
            Uuid::new_v4(),
            expense(10.0, None),
            date(2024, 4, 2),
        )
        .unwrap();
        assert!(txn.category_id.is_none());
    }

    #[test]
    fn record_rejects_non_positive_amounts() {
        let store = MemoryStore::new();
        let err = TransactionService::record(
            &store,
            Uuid::new_v4(),
            expense(-5.0, None),
            date(2024, 4, 2),
        )
        .expect_err("negative amount must fail");
        assert!(matches!(err, FinanceError::InvalidInput(_)));
    }

    #[test]
    fn list_orders_newest_first() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        TransactionService::record(&store, user, expense(10.0, None), date(2024, 1, 1)).unwrap();
        TransactionService::record(&store, user, expense(20.0, None), date(2024, 2, 1)).unwrap();
        let listed = TransactionService::list(&store, user).unwrap();
        assert_eq!(listed[0].amount, 20.0);
        assert_eq!(listed[1].amount, 10.0);
    }
}
