//! Balance and period aggregation over recorded transactions.

use chrono::Datelike;
use uuid::Uuid;

use crate::domain::TransactionKind;
use crate::errors::Result;
use crate::storage::FinanceStore;

/// Income and expense totals over some slice of a user's transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
}

impl Totals {
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    pub totals: Totals,
}

pub struct SummaryService;

impl SummaryService {
    /// Lifetime totals across every transaction the user recorded.
    pub fn balance(store: &dyn FinanceStore, user_id: Uuid) -> Result<Totals> {
        let transactions = store.list_transactions(user_id)?;
        Ok(fold_totals(transactions.iter().map(|t| (t.kind, t.amount))))
    }

    /// Totals restricted to one calendar month.
    pub fn month_summary(
        store: &dyn FinanceStore,
        user_id: Uuid,
        year: i32,
        month: u32,
    ) -> Result<MonthSummary> {
        let transactions = store.list_transactions(user_id)?;
        let totals = fold_totals(
            transactions
                .iter()
                .filter(|t| t.date.year() == year && t.date.month() == month)
                .map(|t| (t.kind, t.amount)),
        );
        Ok(MonthSummary {
            year,
            month,
            totals,
        })
    }
}

fn fold_totals(entries: impl Iterator<Item = (TransactionKind, f64)>) -> Totals {
    let mut totals = Totals::default();
    for (kind, amount) in entries {
        match kind {
            TransactionKind::Income => totals.income += amount,
            TransactionKind::Expense => totals.expense += amount,
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::{TransactionDraft, TransactionService};
    use crate::domain::PaymentMethod;
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    fn record(
        store: &MemoryStore,
        user: Uuid,
        kind: TransactionKind,
        amount: f64,
        date: NaiveDate,
    ) {
        TransactionService::record(
            store,
            user,
            TransactionDraft {
                kind,
                amount,
                category: None,
                description: String::new(),
                payment_method: PaymentMethod::Pix,
            },
            date,
        )
        .unwrap();
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn balance_nets_income_against_expenses() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        record(&store, user, TransactionKind::Income, 1000.0, date(2024, 1, 5));
        record(&store, user, TransactionKind::Expense, 150.0, date(2024, 1, 7));
        record(&store, user, TransactionKind::Expense, 50.0, date(2024, 2, 1));

        let totals = SummaryService::balance(&store, user).unwrap();
        assert_eq!(totals.income, 1000.0);
        assert_eq!(totals.expense, 200.0);
        assert_eq!(totals.net(), 800.0);
    }

    #[test]
    fn month_summary_ignores_other_months() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        record(&store, user, TransactionKind::Income, 1000.0, date(2024, 1, 5));
        record(&store, user, TransactionKind::Expense, 150.0, date(2024, 1, 7));
        record(&store, user, TransactionKind::Expense, 999.0, date(2024, 2, 1));
        record(&store, user, TransactionKind::Expense, 999.0, date(2023, 1, 15));

        let summary = SummaryService::month_summary(&store, user, 2024, 1).unwrap();
        assert_eq!(summary.totals.income, 1000.0);
        assert_eq!(summary.totals.expense, 150.0);
        assert_eq!(summary.totals.net(), 850.0);
    }

    #[test]
    fn balance_ignores_other_users() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        record(&store, Uuid::new_v4(), TransactionKind::Income, 500.0, date(2024, 1, 5));
        let totals = SummaryService::balance(&store, user).unwrap();
        assert_eq!(totals, Totals::default());
    }
}
