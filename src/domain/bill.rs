use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Displayable, Identifiable, PaymentMethod};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BillKind {
    Payable,
    Receivable,
}

impl BillKind {
    pub fn label(&self) -> &'static str {
        match self {
            BillKind::Payable => "Payable",
            BillKind::Receivable => "Receivable",
        }
    }

    /// Role of the counterparty named on a bill of this kind.
    pub fn party_role(&self) -> &'static str {
        match self {
            BillKind::Payable => "supplier",
            BillKind::Receivable => "client",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Pending,
    Paid,
    Overdue,
}

impl Default for BillStatus {
    fn default() -> Self {
        BillStatus::Pending
    }
}

/// Calendar step between recurrence instances.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceInterval {
    Weekly,
    Monthly,
    Quarterly,
    Annual,
}

impl Default for RecurrenceInterval {
    fn default() -> Self {
        RecurrenceInterval::Monthly
    }
}

impl RecurrenceInterval {
    /// Parses a form value; missing or unrecognized input falls back to
    /// monthly.
    pub fn parse_or_monthly(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "weekly" => RecurrenceInterval::Weekly,
            "quarterly" => RecurrenceInterval::Quarterly,
            "annual" => RecurrenceInterval::Annual,
            _ => RecurrenceInterval::Monthly,
        }
    }

    /// Advances a due date by one interval step.
    ///
    /// Month and year steps keep the day-of-month as given; when the target
    /// month is shorter, the excess days roll over into the following month
    /// (Jan 31 plus one month lands on Mar 2 in a leap year, Mar 3
    /// otherwise). Weekly steps are a plain seven-day offset.
    pub fn advance(&self, from: NaiveDate) -> NaiveDate {
        match self {
            RecurrenceInterval::Weekly => from + Duration::days(7),
            RecurrenceInterval::Monthly => shift_months_rolling(from, 1),
            RecurrenceInterval::Quarterly => shift_months_rolling(from, 3),
            RecurrenceInterval::Annual => resolve_rolling(from.year() + 1, from.month(), from.day()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecurrenceInterval::Weekly => "Weekly",
            RecurrenceInterval::Monthly => "Monthly",
            RecurrenceInterval::Quarterly => "Quarterly",
            RecurrenceInterval::Annual => "Annual",
        }
    }
}

fn shift_months_rolling(date: NaiveDate, months: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    resolve_rolling(year, month as u32, date.day())
}

fn resolve_rolling(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        // Day is out of range for the target month: roll the excess days
        // into the month that follows.
        None => NaiveDate::from_ymd_opt(year, month, 1).unwrap() + Duration::days(day as i64 - 1),
    }
}

/// Recurrence rule captured from the bill form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecurrencePolicy {
    pub is_recurring: bool,
    #[serde(default)]
    pub interval: RecurrenceInterval,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl RecurrencePolicy {
    pub fn one_shot() -> Self {
        Self::default()
    }

    pub fn recurring(interval: RecurrenceInterval) -> Self {
        Self {
            is_recurring: true,
            interval,
            count: None,
            end_date: None,
        }
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn until(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Occurrence counts of zero are treated the same as an absent bound.
    pub fn effective_count(&self) -> Option<u32> {
        self.count.filter(|count| *count > 0)
    }
}

/// Base bill data captured from a form submission, before expansion.
#[derive(Debug, Clone)]
pub struct ObligationDraft {
    pub user_id: Uuid,
    pub kind: BillKind,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub description: String,
    pub party_name: String,
    pub payment_method: PaymentMethod,
}

/// One persisted bill row. Recurring submissions produce several rows that
/// share no identity beyond their common recurrence metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: BillKind,
    pub amount: f64,
    pub due_date: NaiveDate,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub party_name: String,
    pub payment_method: PaymentMethod,
    pub status: BillStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrencePolicy>,
}

impl Bill {
    pub fn from_draft(
        draft: &ObligationDraft,
        due_date: NaiveDate,
        recurrence: Option<RecurrencePolicy>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: draft.user_id,
            kind: draft.kind,
            amount: draft.amount,
            due_date,
            description: draft.description.clone(),
            party_name: draft.party_name.clone(),
            payment_method: draft.payment_method,
            status: BillStatus::Pending,
            recurrence,
        }
    }
}

impl Identifiable for Bill {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Bill {
    fn display_label(&self) -> String {
        format!("{} {} [{:?}]", self.kind.label(), self.party_name, self.status)
    }
}
