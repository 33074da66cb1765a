//! Deterministic expansion of recurring obligations into dated bill rows.

use chrono::NaiveDate;

use crate::domain::{Bill, ObligationDraft, RecurrencePolicy};

/// Upper bound on generated instances, far above any realistic form input.
const MAX_OCCURRENCES: usize = 1024;

/// Expands a base obligation into the ordered list of dated instances
/// described by its recurrence policy.
///
/// A non-recurring policy produces exactly one instance at the draft's due
/// date, whatever the other policy fields say. A recurring policy is
/// bounded either by a positive occurrence count (which wins when both
/// bounds are present) or by an inclusive end date; with neither bound the
/// expansion falls back to the single-instance case rather than running
/// unbounded. Every instance copies the draft's fields and starts out
/// pending.
pub fn expand(draft: &ObligationDraft, policy: &RecurrencePolicy) -> Vec<Bill> {
    let recurrence = if policy.is_recurring {
        Some(policy.clone())
    } else {
        None
    };
    expansion_dates(draft.due_date, policy)
        .into_iter()
        .map(|due| Bill::from_draft(draft, due, recurrence.clone()))
        .collect()
}

/// The date sequence alone, first element equal to `due_date` whenever the
/// sequence is non-empty.
pub fn expansion_dates(due_date: NaiveDate, policy: &RecurrencePolicy) -> Vec<NaiveDate> {
    if !policy.is_recurring {
        return vec![due_date];
    }

    let mut dates = Vec::new();
    if let Some(count) = policy.effective_count() {
        let mut current = due_date;
        for _ in 0..(count as usize).min(MAX_OCCURRENCES) {
            dates.push(current);
            current = policy.interval.advance(current);
        }
    } else if let Some(end_date) = policy.end_date {
        let mut current = due_date;
        while current <= end_date && dates.len() < MAX_OCCURRENCES {
            dates.push(current);
            current = policy.interval.advance(current);
        }
    } else {
        dates.push(due_date);
    }
    dates
}
