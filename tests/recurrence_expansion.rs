use chrono::NaiveDate;
use uuid::Uuid;

use finance_core::domain::{
    BillKind, BillStatus, ObligationDraft, PaymentMethod, RecurrenceInterval, RecurrencePolicy,
};
use finance_core::schedule::{expand, expansion_dates};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn rent_draft(due_date: NaiveDate) -> ObligationDraft {
    ObligationDraft {
        user_id: Uuid::new_v4(),
        kind: BillKind::Payable,
        amount: 1500.0,
        due_date,
        description: "Office rent".into(),
        party_name: "Landlord".into(),
        payment_method: PaymentMethod::Transfer,
    }
}

#[test]
fn end_of_january_monthly_rolls_through_short_months() {
    let draft = rent_draft(date(2024, 1, 31));
    let policy = RecurrencePolicy::recurring(RecurrenceInterval::Monthly).with_count(3);

    let dates: Vec<NaiveDate> = expand(&draft, &policy)
        .into_iter()
        .map(|bill| bill.due_date)
        .collect();

    // Jan 31 -> "Feb 31" rolls to Mar 2 (2024 is a leap year), then Apr 2.
    assert_eq!(
        dates,
        vec![date(2024, 1, 31), date(2024, 3, 2), date(2024, 4, 2)]
    );
}

#[test]
fn weekly_count_produces_seven_day_steps() {
    let draft = rent_draft(date(2024, 1, 15));
    let policy = RecurrencePolicy::recurring(RecurrenceInterval::Weekly).with_count(4);

    let dates: Vec<NaiveDate> = expand(&draft, &policy)
        .into_iter()
        .map(|bill| bill.due_date)
        .collect();

    assert_eq!(
        dates,
        vec![
            date(2024, 1, 15),
            date(2024, 1, 22),
            date(2024, 1, 29),
            date(2024, 2, 5),
        ]
    );
}

#[test]
fn quarterly_end_date_excludes_first_overshoot() {
    let draft = rent_draft(date(2024, 1, 1));
    let policy =
        RecurrencePolicy::recurring(RecurrenceInterval::Quarterly).until(date(2024, 9, 1));

    let dates: Vec<NaiveDate> = expand(&draft, &policy)
        .into_iter()
        .map(|bill| bill.due_date)
        .collect();

    assert_eq!(
        dates,
        vec![date(2024, 1, 1), date(2024, 4, 1), date(2024, 7, 1)]
    );
    // The first discarded advance would land past the bound.
    let last = *dates.last().unwrap();
    assert!(policy.interval.advance(last) > date(2024, 9, 1));
}

#[test]
fn non_recurring_ignores_populated_recurrence_fields() {
    let draft = rent_draft(date(2024, 6, 1));
    let policy = RecurrencePolicy {
        is_recurring: false,
        interval: RecurrenceInterval::Weekly,
        count: Some(10),
        end_date: Some(date(2030, 1, 1)),
    };

    let bills = expand(&draft, &policy);
    assert_eq!(bills.len(), 1);
    assert_eq!(bills[0].due_date, date(2024, 6, 1));
}

#[test]
fn every_interval_satisfies_the_end_date_contract() {
    let due = date(2024, 2, 29);
    let end = date(2026, 1, 15);
    for interval in [
        RecurrenceInterval::Weekly,
        RecurrenceInterval::Monthly,
        RecurrenceInterval::Quarterly,
        RecurrenceInterval::Annual,
    ] {
        let policy = RecurrencePolicy::recurring(interval).until(end);
        let dates = expansion_dates(due, &policy);
        assert!(!dates.is_empty(), "{interval:?} generated nothing");
        assert_eq!(dates[0], due);
        for produced in &dates {
            assert!(*produced <= end, "{interval:?} exceeded the bound");
        }
        assert!(interval.advance(*dates.last().unwrap()) > end);
        for pair in dates.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }
}

#[test]
fn annual_expansion_moves_leap_day_to_march_first() {
    let policy = RecurrencePolicy::recurring(RecurrenceInterval::Annual).with_count(3);
    let dates = expansion_dates(date(2024, 2, 29), &policy);
    assert_eq!(
        dates,
        vec![date(2024, 2, 29), date(2025, 3, 1), date(2026, 3, 1)]
    );
}

#[test]
fn expanded_instances_start_pending_and_keep_base_fields() {
    let draft = rent_draft(date(2024, 3, 10));
    let policy = RecurrencePolicy::recurring(RecurrenceInterval::Monthly).with_count(6);

    let bills = expand(&draft, &policy);
    assert_eq!(bills.len(), 6);
    for bill in &bills {
        assert_eq!(bill.status, BillStatus::Pending);
        assert_eq!(bill.amount, 1500.0);
        assert_eq!(bill.party_name, "Landlord");
        assert_eq!(bill.payment_method, PaymentMethod::Transfer);
        assert_eq!(bill.user_id, draft.user_id);
    }
    // Each instance is an independent row.
    let mut ids: Vec<Uuid> = bills.iter().map(|bill| bill.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 6);
}
