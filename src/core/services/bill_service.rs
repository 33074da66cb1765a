//! Validation and persistence flow for payable/receivable bills.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Bill, BillKind, BillStatus, ObligationDraft, RecurrencePolicy};
use crate::errors::{FinanceError, Result};
use crate::schedule;
use crate::storage::FinanceStore;

pub struct BillService;

impl BillService {
    /// Validates a bill form, expands its recurrence policy, and persists
    /// every generated instance in a single bulk insert.
    pub fn create(
        store: &dyn FinanceStore,
        draft: ObligationDraft,
        policy: RecurrencePolicy,
    ) -> Result<Vec<Bill>> {
        if !draft.amount.is_finite() || draft.amount <= 0.0 {
            return Err(FinanceError::InvalidInput(
                "bill amount must be greater than zero".into(),
            ));
        }
        if draft.party_name.trim().is_empty() {
            return Err(FinanceError::InvalidInput(format!(
                "bill {} name must not be empty",
                draft.kind.party_role()
            )));
        }
        let bills = schedule::expand(&draft, &policy);
        store.insert_bills(&bills)?;
        tracing::info!(count = bills.len(), kind = ?draft.kind, "bills created");
        Ok(bills)
    }

    pub fn list(store: &dyn FinanceStore, user_id: Uuid, kind: BillKind) -> Result<Vec<Bill>> {
        store.list_bills(user_id, kind)
    }

    pub fn mark_paid(store: &dyn FinanceStore, id: Uuid) -> Result<()> {
        store.update_bill_status(id, BillStatus::Paid)
    }

    pub fn remove(store: &dyn FinanceStore, id: Uuid) -> Result<Bill> {
        store
            .remove_bill(id)?
            .ok_or_else(|| FinanceError::NotFound(format!("bill {id}")))
    }

    /// Flips pending bills past their due date to overdue, returning the
    /// affected ids. Runs on every bill listing, mirroring the dashboard
    /// refresh.
    pub fn sweep_overdue(
        store: &dyn FinanceStore,
        user_id: Uuid,
        kind: BillKind,
        today: NaiveDate,
    ) -> Result<Vec<Uuid>> {
        let mut flipped = Vec::new();
        for bill in store.list_bills(user_id, kind)? {
            if bill.status == BillStatus::Pending && bill.due_date < today {
                store.update_bill_status(bill.id, BillStatus::Overdue)?;
                flipped.push(bill.id);
            }
        }
        if !flipped.is_empty() {
            tracing::info!(count = flipped.len(), kind = ?kind, "bills marked overdue");
        }
        Ok(flipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PaymentMethod, RecurrenceInterval};
    use crate::storage::MemoryStore;

    fn draft(user_id: Uuid, due_date: NaiveDate) -> ObligationDraft {
        ObligationDraft {
            user_id,
            kind: BillKind::Payable,
            amount: 90.0,
            due_date,
            description: String::new(),
            party_name: "Utility Co".into(),
            payment_method: PaymentMethod::Pix,
        }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn create_persists_every_expanded_instance() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let policy = RecurrencePolicy::recurring(RecurrenceInterval::Monthly).with_count(3);
        let created =
            BillService::create(&store, draft(user, date(2024, 2, 10)), policy).unwrap();
        assert_eq!(created.len(), 3);
        let listed = BillService::list(&store, user, BillKind::Payable).unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].due_date, date(2024, 2, 10));
    }

    #[test]
    fn create_rejects_non_positive_amounts() {
        let store = MemoryStore::new();
        let mut bad = draft(Uuid::new_v4(), date(2024, 2, 10));
        bad.amount = 0.0;
        let err = BillService::create(&store, bad, RecurrencePolicy::one_shot())
            .expect_err("zero amount must fail");
        assert!(matches!(err, FinanceError::InvalidInput(_)));
    }

    #[test]
    fn create_rejects_blank_party_names() {
        let store = MemoryStore::new();
        let mut bad = draft(Uuid::new_v4(), date(2024, 2, 10));
        bad.party_name = "  ".into();
        let err = BillService::create(&store, bad, RecurrencePolicy::one_shot())
            .expect_err("blank party must fail");
        assert!(err.to_string().contains("supplier"));
    }

    #[test]
    fn sweep_overdue_only_touches_past_pending_bills() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let today = date(2024, 3, 15);
        BillService::create(
            &store,
            draft(user, date(2024, 3, 1)),
            RecurrencePolicy::one_shot(),
        )
        .unwrap();
        let current = BillService::create(
            &store,
            draft(user, date(2024, 3, 20)),
            RecurrencePolicy::one_shot(),
        )
        .unwrap();
        let paid = BillService::create(
            &store,
            draft(user, date(2024, 2, 1)),
            RecurrencePolicy::one_shot(),
        )
        .unwrap();
        BillService::mark_paid(&store, paid[0].id).unwrap();

        let flipped = BillService::sweep_overdue(&store, user, BillKind::Payable, today).unwrap();
        assert_eq!(flipped.len(), 1);
        let listed = BillService::list(&store, user, BillKind::Payable).unwrap();
        let statuses: Vec<BillStatus> = listed.iter().map(|b| b.status).collect();
        assert_eq!(
            statuses,
            vec![BillStatus::Paid, BillStatus::Overdue, BillStatus::Pending]
        );
        assert_ne!(flipped[0], current[0].id);
    }

    #[test]
    fn remove_returns_the_deleted_bill() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let created = BillService::create(
            &store,
            draft(user, date(2024, 5, 1)),
            RecurrencePolicy::one_shot(),
        )
        .unwrap();
        let removed = BillService::remove(&store, created[0].id).unwrap();
        assert_eq!(removed.id, created[0].id);
        assert!(BillService::list(&store, user, BillKind::Payable)
            .unwrap()
            .is_empty());
    }
}
