use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{
    Bill, BillKind, BillStatus, Category, Reminder, Transaction, TransactionKind, UserProfile,
};
use crate::errors::Result;

use super::{DataSet, FinanceStore};

/// In-memory backend used by tests and short-lived assistant runs.
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<DataSet>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> DataSet {
        self.data().clone()
    }

    fn data(&self) -> MutexGuard<'_, DataSet> {
        self.data.lock().expect("finance store mutex poisoned")
    }
}

impl FinanceStore for MemoryStore {
    fn upsert_user(&self, user: UserProfile) -> Result<UserProfile> {
        Ok(self.data().upsert_user(user))
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<UserProfile>> {
        Ok(self.data().find_user_by_email(email))
    }

    fn user(&self, id: Uuid) -> Result<Option<UserProfile>> {
        Ok(self.data().user(id))
    }

    fn insert_bills(&self, bills: &[Bill]) -> Result<()> {
        self.data().insert_bills(bills);
        Ok(())
    }

    fn list_bills(&self, user_id: Uuid, kind: BillKind) -> Result<Vec<Bill>> {
        Ok(self.data().list_bills(user_id, kind))
    }

    fn update_bill_status(&self, id: Uuid, status: BillStatus) -> Result<()> {
        self.data().update_bill_status(id, status)
    }

    fn remove_bill(&self, id: Uuid) -> Result<Option<Bill>> {
        Ok(self.data().remove_bill(id))
    }

    fn insert_transaction(&self, transaction: Transaction) -> Result<Uuid> {
        Ok(self.data().insert_transaction(transaction))
    }

    fn list_transactions(&self, user_id: Uuid) -> Result<Vec<Transaction>> {
        Ok(self.data().list_transactions(user_id))
    }

    fn get_or_create_category(
        &self,
        user_id: Uuid,
        name: &str,
        kind: TransactionKind,
    ) -> Result<Option<Uuid>> {
        Ok(self.data().get_or_create_category(user_id, name, kind))
    }

    fn category(&self, id: Uuid) -> Result<Option<Category>> {
        Ok(self.data().category(id))
    }

    fn insert_reminder(&self, reminder: Reminder) -> Result<Uuid> {
        Ok(self.data().insert_reminder(reminder))
    }

    fn reminders_due(&self, date: NaiveDate) -> Result<Vec<Reminder>> {
        Ok(self.data().reminders_due(date))
    }

    fn mark_reminder_sent(&self, id: Uuid, sent_at: DateTime<Utc>) -> Result<()> {
        self.data().mark_reminder_sent(id, sent_at)
    }
}
