use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::Identifiable;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    Pending,
    Done,
}

impl Default for ReminderStatus {
    fn default() -> Self {
        ReminderStatus::Pending
    }
}

/// A dated commitment the assistant can push to the user's chat channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub due_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_time: Option<NaiveTime>,
    pub send_notification: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_sent_at: Option<DateTime<Utc>>,
    pub status: ReminderStatus,
}

impl Reminder {
    pub fn new(user_id: Uuid, title: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            description: None,
            due_date,
            due_time: None,
            send_notification: true,
            notification_sent_at: None,
            status: ReminderStatus::Pending,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn at(mut self, due_time: NaiveTime) -> Self {
        self.due_time = Some(due_time);
        self
    }

    pub fn silent(mut self) -> Self {
        self.send_notification = false;
        self
    }

    /// Chat message body announcing this reminder.
    pub fn message_body(&self) -> String {
        let time = self
            .due_time
            .map(|t| format!(" at {}", t.format("%H:%M")))
            .unwrap_or_default();
        let description = self
            .description
            .as_deref()
            .map(|d| format!("\n{d}"))
            .unwrap_or_default();
        format!(
            "\u{1F514} Reminder\n\n{}{}\n\u{1F5D3} {}{}",
            self.title, description, self.due_date, time
        )
    }
}

impl Identifiable for Reminder {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_body_includes_time_and_description() {
        let due = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let reminder = Reminder::new(Uuid::new_v4(), "Rent", due)
            .with_description("Transfer to landlord")
            .at(NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        let body = reminder.message_body();
        assert!(body.contains("Rent"));
        assert!(body.contains("Transfer to landlord"));
        assert!(body.contains("2024-06-01 at 09:30"));
    }

    #[test]
    fn message_body_omits_absent_fields() {
        let due = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let body = Reminder::new(Uuid::new_v4(), "Rent", due).message_body();
        assert!(body.contains("Rent"));
        assert!(!body.contains(" at "));
    }
}
