//! Interactive data-entry forms for bills and transactions.

use chrono::{Local, NaiveDate};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use uuid::Uuid;

use crate::core::services::TransactionDraft;
use crate::domain::{
    BillKind, ObligationDraft, PaymentMethod, RecurrenceInterval, RecurrencePolicy,
    TransactionKind,
};
use crate::errors::{FinanceError, Result};

use super::prompt_error;

const PAYMENT_METHODS: [PaymentMethod; 4] = [
    PaymentMethod::Pix,
    PaymentMethod::Card,
    PaymentMethod::Transfer,
    PaymentMethod::Cash,
];

const INTERVALS: [RecurrenceInterval; 4] = [
    RecurrenceInterval::Weekly,
    RecurrenceInterval::Monthly,
    RecurrenceInterval::Quarterly,
    RecurrenceInterval::Annual,
];

/// Collects a bill draft plus its recurrence policy.
pub fn bill_form(user_id: Uuid) -> Result<(ObligationDraft, RecurrencePolicy)> {
    let theme = ColorfulTheme::default();

    let kind_index = Select::with_theme(&theme)
        .with_prompt("Bill kind")
        .items(&["Payable", "Receivable"])
        .default(0)
        .interact()
        .map_err(prompt_error)?;
    let kind = if kind_index == 0 {
        BillKind::Payable
    } else {
        BillKind::Receivable
    };

    let amount: f64 = Input::with_theme(&theme)
        .with_prompt("Amount")
        .interact_text()
        .map_err(prompt_error)?;

    let due_date = date_input(&theme, "Due date (YYYY-MM-DD)", Some(today_string()))?;

    let party_name: String = Input::with_theme(&theme)
        .with_prompt(format!("{} name", capitalize(kind.party_role())))
        .interact_text()
        .map_err(prompt_error)?;

    let description: String = Input::with_theme(&theme)
        .with_prompt("Description")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_error)?;

    let payment_method = payment_method_select(&theme)?;

    let is_recurring = Confirm::with_theme(&theme)
        .with_prompt("Recurring?")
        .default(false)
        .interact()
        .map_err(prompt_error)?;

    let policy = if is_recurring {
        let interval_index = Select::with_theme(&theme)
            .with_prompt("Interval")
            .items(&INTERVALS.map(|i| i.label()))
            .default(1)
            .interact()
            .map_err(prompt_error)?;
        let mut policy = RecurrencePolicy::recurring(INTERVALS[interval_index]);

        let count_raw: String = Input::with_theme(&theme)
            .with_prompt("Occurrences (empty for none)")
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_error)?;
        if !count_raw.trim().is_empty() {
            let count: u32 = count_raw.trim().parse().map_err(|_| {
                FinanceError::InvalidInput("occurrence count must be a whole number".into())
            })?;
            policy = policy.with_count(count);
        }

        if policy.effective_count().is_none() {
            let end_raw: String = Input::with_theme(&theme)
                .with_prompt("End date (YYYY-MM-DD, empty for none)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_error)?;
            if !end_raw.trim().is_empty() {
                policy = policy.until(parse_date(end_raw.trim())?);
            }
        }
        policy
    } else {
        RecurrencePolicy::one_shot()
    };

    let draft = ObligationDraft {
        user_id,
        kind,
        amount,
        due_date,
        description,
        party_name,
        payment_method,
    };
    Ok((draft, policy))
}

/// Collects a transaction draft and its date.
pub fn transaction_form() -> Result<(TransactionDraft, NaiveDate)> {
    let theme = ColorfulTheme::default();

    let kind_index = Select::with_theme(&theme)
        .with_prompt("Transaction kind")
        .items(&["Expense", "Income"])
        .default(0)
        .interact()
        .map_err(prompt_error)?;
    let kind = if kind_index == 0 {
        TransactionKind::Expense
    } else {
        TransactionKind::Income
    };

    let amount: f64 = Input::with_theme(&theme)
        .with_prompt("Amount")
        .interact_text()
        .map_err(prompt_error)?;

    let category: String = Input::with_theme(&theme)
        .with_prompt("Category (empty for none)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_error)?;

    let description: String = Input::with_theme(&theme)
        .with_prompt("Description")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_error)?;

    let payment_method = payment_method_select(&theme)?;
    let date = date_input(&theme, "Date (YYYY-MM-DD)", Some(today_string()))?;

    let draft = TransactionDraft {
        kind,
        amount,
        category: Some(category.trim().to_string()).filter(|c| !c.is_empty()),
        description,
        payment_method,
    };
    Ok((draft, date))
}

fn payment_method_select(theme: &ColorfulTheme) -> Result<PaymentMethod> {
    let index = Select::with_theme(theme)
        .with_prompt("Payment method")
        .items(&PAYMENT_METHODS.map(|m| m.label()))
        .default(0)
        .interact()
        .map_err(prompt_error)?;
    Ok(PAYMENT_METHODS[index])
}

fn date_input(theme: &ColorfulTheme, prompt: &str, default: Option<String>) -> Result<NaiveDate> {
    let mut input = Input::with_theme(theme).with_prompt(prompt);
    if let Some(default) = default {
        input = input.default(default);
    }
    let raw: String = input.interact_text().map_err(prompt_error)?;
    parse_date(raw.trim())
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| FinanceError::InvalidInput(format!("invalid date `{raw}`")))
}

fn today_string() -> String {
    Local::now().date_naive().to_string()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
