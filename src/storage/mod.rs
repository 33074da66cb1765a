pub mod json_backend;
pub mod memory;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Bill, BillKind, BillStatus, Category, Reminder, Transaction, TransactionKind, UserProfile,
};
use crate::errors::{FinanceError, Result};

pub use json_backend::JsonStore;
pub use memory::MemoryStore;

/// Abstraction over persistence backends holding the assistant's records.
///
/// Handles are passed explicitly into services so business logic stays
/// independently testable against the in-memory backend.
pub trait FinanceStore: Send + Sync {
    fn upsert_user(&self, user: UserProfile) -> Result<UserProfile>;
    fn find_user_by_email(&self, email: &str) -> Result<Option<UserProfile>>;
    fn user(&self, id: Uuid) -> Result<Option<UserProfile>>;

    fn insert_bills(&self, bills: &[Bill]) -> Result<()>;
    fn list_bills(&self, user_id: Uuid, kind: BillKind) -> Result<Vec<Bill>>;
    fn update_bill_status(&self, id: Uuid, status: BillStatus) -> Result<()>;
    fn remove_bill(&self, id: Uuid) -> Result<Option<Bill>>;

    fn insert_transaction(&self, transaction: Transaction) -> Result<Uuid>;
    fn list_transactions(&self, user_id: Uuid) -> Result<Vec<Transaction>>;

    fn get_or_create_category(
        &self,
        user_id: Uuid,
        name: &str,
        kind: TransactionKind,
    ) -> Result<Option<Uuid>>;
    fn category(&self, id: Uuid) -> Result<Option<Category>>;

    fn insert_reminder(&self, reminder: Reminder) -> Result<Uuid>;
    fn reminders_due(&self, date: NaiveDate) -> Result<Vec<Reminder>>;
    fn mark_reminder_sent(&self, id: Uuid, sent_at: DateTime<Utc>) -> Result<()>;
}

/// Serializable snapshot of every table the assistant persists. Both
/// backends share the mutation logic defined here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataSet {
    #[serde(default)]
    pub users: Vec<UserProfile>,
    #[serde(default)]
    pub bills: Vec<Bill>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub reminders: Vec<Reminder>,
}

impl DataSet {
    pub(crate) fn upsert_user(&mut self, user: UserProfile) -> UserProfile {
        if let Some(existing) = self.users.iter_mut().find(|u| u.email == user.email) {
            existing.name = user.name;
            if user.whatsapp_number.is_some() {
                existing.whatsapp_number = user.whatsapp_number;
            }
            existing.clone()
        } else {
            self.users.push(user.clone());
            user
        }
    }

    pub(crate) fn find_user_by_email(&self, email: &str) -> Option<UserProfile> {
        self.users.iter().find(|u| u.email == email).cloned()
    }

    pub(crate) fn user(&self, id: Uuid) -> Option<UserProfile> {
        self.users.iter().find(|u| u.id == id).cloned()
    }

    pub(crate) fn insert_bills(&mut self, bills: &[Bill]) {
        self.bills.extend_from_slice(bills);
    }

    pub(crate) fn list_bills(&self, user_id: Uuid, kind: BillKind) -> Vec<Bill> {
        let mut bills: Vec<Bill> = self
            .bills
            .iter()
            .filter(|bill| bill.user_id == user_id && bill.kind == kind)
            .cloned()
            .collect();
        bills.sort_by_key(|bill| bill.due_date);
        bills
    }

    pub(crate) fn update_bill_status(&mut self, id: Uuid, status: BillStatus) -> Result<()> {
        let bill = self
            .bills
            .iter_mut()
            .find(|bill| bill.id == id)
            .ok_or_else(|| FinanceError::NotFound(format!("bill {id}")))?;
        bill.status = status;
        Ok(())
    }

    pub(crate) fn remove_bill(&mut self, id: Uuid) -> Option<Bill> {
        let index = self.bills.iter().position(|bill| bill.id == id)?;
        Some(self.bills.remove(index))
    }

    pub(crate) fn insert_transaction(&mut self, transaction: Transaction) -> Uuid {
        let id = transaction.id;
        self.transactions.push(transaction);
        id
    }

    pub(crate) fn list_transactions(&self, user_id: Uuid) -> Vec<Transaction> {
        let mut transactions: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|txn| txn.user_id == user_id)
            .cloned()
            .collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        transactions
    }

    pub(crate) fn get_or_create_category(
        &mut self,
        user_id: Uuid,
        name: &str,
        kind: TransactionKind,
    ) -> Option<Uuid> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Some(existing) = self
            .categories
            .iter()
            .find(|c| c.user_id == user_id && c.kind == kind && c.name == trimmed)
        {
            return Some(existing.id);
        }
        let category = Category::new(user_id, trimmed, kind);
        let id = category.id;
        self.categories.push(category);
        Some(id)
    }

    pub(crate) fn category(&self, id: Uuid) -> Option<Category> {
        self.categories.iter().find(|c| c.id == id).cloned()
    }

    pub(crate) fn insert_reminder(&mut self, reminder: Reminder) -> Uuid {
        let id = reminder.id;
        self.reminders.push(reminder);
        id
    }

    pub(crate) fn reminders_due(&self, date: NaiveDate) -> Vec<Reminder> {
        use crate::domain::ReminderStatus;

        self.reminders
            .iter()
            .filter(|r| {
                r.due_date == date
                    && r.status == ReminderStatus::Pending
                    && r.send_notification
                    && r.notification_sent_at.is_none()
            })
            .cloned()
            .collect()
    }

    pub(crate) fn mark_reminder_sent(&mut self, id: Uuid, sent_at: DateTime<Utc>) -> Result<()> {
        let reminder = self
            .reminders
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| FinanceError::NotFound(format!("reminder {id}")))?;
        reminder.notification_sent_at = Some(sent_at);
        Ok(())
    }
}
