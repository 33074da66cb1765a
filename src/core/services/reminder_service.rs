//! Scheduled dispatch of due-date reminders over the messaging gateway.

use chrono::{DateTime, NaiveDate, Utc};

use crate::assist::gateway::MessageGateway;
use crate::errors::{FinanceError, Result};
use crate::storage::FinanceStore;

/// Outcome of one dispatch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Reminders due today that had not been notified yet.
    pub scanned: usize,
    /// Messages actually handed to the gateway.
    pub sent: usize,
}

pub struct ReminderService;

impl ReminderService {
    /// Bearer-secret gate for the scheduled dispatch entrypoint. A missing
    /// configured secret leaves the entrypoint open, matching the original
    /// deployment default.
    pub fn authorize(auth_header: Option<&str>, secret: Option<&str>) -> Result<()> {
        let secret = match secret {
            Some(secret) => secret,
            None => return Ok(()),
        };
        let expected = format!("Bearer {secret}");
        if auth_header == Some(expected.as_str()) {
            Ok(())
        } else {
            Err(FinanceError::Unauthorized)
        }
    }

    /// Sends every reminder due today that still awaits notification and
    /// stamps it as notified. Reminders whose owner has no reachable
    /// channel are stamped without a send so they are not retried forever.
    pub fn dispatch_due(
        store: &dyn FinanceStore,
        gateway: &dyn MessageGateway,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<DispatchReport> {
        let due = store.reminders_due(today)?;
        let mut sent = 0;
        for reminder in &due {
            let recipient = store
                .user(reminder.user_id)?
                .and_then(|user| user.whatsapp_number);
            if let Some(number) = recipient {
                match gateway.send_text(&number, &reminder.message_body()) {
                    Ok(()) => sent += 1,
                    Err(err) => {
                        tracing::warn!(reminder = %reminder.id, error = %err, "reminder send failed");
                    }
                }
            }
            store.mark_reminder_sent(reminder.id, now)?;
        }
        tracing::info!(scanned = due.len(), sent, "reminder dispatch finished");
        Ok(DispatchReport {
            scanned: due.len(),
            sent,
        })
    }
}
