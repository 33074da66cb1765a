//! Interactive menu and one-shot commands standing in for the dashboard's
//! form submissions.

pub mod forms;
pub mod output;

use chrono::{Local, Utc};
use dialoguer::{theme::ColorfulTheme, Select};

use crate::assist::gateway::MetaWhatsAppGateway;
use crate::assist::{handle_inbound, Assistant, InboundOutcome, WebhookPayload};
use crate::config::AppConfig;
use crate::core::services::{
    BillService, ReminderService, SummaryService, TransactionService,
};
use crate::domain::{BillKind, UserProfile};
use crate::errors::{FinanceError, Result};
use crate::storage::{FinanceStore, JsonStore};

const LOCAL_USER_EMAIL: &str = "local@finance-core";

pub fn run_cli() -> Result<()> {
    let config = AppConfig::from_env();
    let store = JsonStore::open(config.data_dir.clone(), None)?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.split_first() {
        Some((command, rest)) => run_command(&store, &config, command, rest),
        None => run_menu(&store, &config),
    }
}

/// One-shot commands suitable for scripting and smoke tests.
fn run_command(
    store: &dyn FinanceStore,
    config: &AppConfig,
    command: &str,
    rest: &[String],
) -> Result<()> {
    let today = Local::now().date_naive();
    let user = local_user(store)?;
    match command {
        "summary" => {
            let totals = SummaryService::balance(store, user.id)?;
            output::print_totals(&totals);
            Ok(())
        }
        "bills" => {
            for kind in [BillKind::Payable, BillKind::Receivable] {
                BillService::sweep_overdue(store, user.id, kind, today)?;
                let bills = BillService::list(store, user.id, kind)?;
                output::print_bills(kind, &bills);
            }
            Ok(())
        }
        "transactions" => {
            let transactions = TransactionService::list(store, user.id)?;
            output::print_transactions(&transactions);
            Ok(())
        }
        "sweep-overdue" => {
            let mut flipped = 0;
            for kind in [BillKind::Payable, BillKind::Receivable] {
                flipped += BillService::sweep_overdue(store, user.id, kind, today)?.len();
            }
            println!("{flipped} bill(s) marked overdue.");
            Ok(())
        }
        "dispatch-reminders" => {
            let whatsapp = config.whatsapp()?;
            let gateway = MetaWhatsAppGateway::new(
                whatsapp.access_token.clone(),
                whatsapp.phone_number_id.clone(),
            );
            let report = ReminderService::dispatch_due(store, &gateway, today, Utc::now())?;
            println!(
                "Dispatched {} of {} due reminder(s).",
                report.sent, report.scanned
            );
            Ok(())
        }
        "handle-webhook" => {
            let path = rest.first().ok_or_else(|| {
                FinanceError::InvalidInput("handle-webhook expects a payload file path".into())
            })?;
            let payload: WebhookPayload = serde_json::from_str(&std::fs::read_to_string(path)?)
                .map_err(|err| {
                    FinanceError::InvalidInput(format!("invalid webhook payload: {err}"))
                })?;
            let assistant = Assistant::from_config(config)?;
            let ctx = assistant.context(store);
            match handle_inbound(&ctx, &payload, today)? {
                InboundOutcome::Ignored => println!("Delivery carried no user message."),
                InboundOutcome::Replied { to, body } => println!("Replied to {to}: {body}"),
            }
            Ok(())
        }
        other => Err(FinanceError::InvalidInput(format!(
            "unknown command `{other}` (expected summary, bills, transactions, sweep-overdue, dispatch-reminders, or handle-webhook)"
        ))),
    }
}

fn run_menu(store: &dyn FinanceStore, config: &AppConfig) -> Result<()> {
    let user = local_user(store)?;
    loop {
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Finance Core")
            .items(&[
                "Add bill",
                "Add transaction",
                "List bills",
                "List transactions",
                "Balance summary",
                "Dispatch reminders",
                "Quit",
            ])
            .default(0)
            .interact()
            .map_err(prompt_error)?;
        match choice {
            0 => {
                let (draft, policy) = forms::bill_form(user.id)?;
                let created = BillService::create(store, draft, policy)?;
                println!("Created {} bill instance(s).", created.len());
            }
            1 => {
                let (draft, date) = forms::transaction_form()?;
                let transaction = TransactionService::record(store, user.id, draft, date)?;
                println!("Recorded {}.", transaction.kind.label().to_lowercase());
            }
            2 => run_command(store, config, "bills", &[])?,
            3 => run_command(store, config, "transactions", &[])?,
            4 => run_command(store, config, "summary", &[])?,
            5 => run_command(store, config, "dispatch-reminders", &[])?,
            _ => return Ok(()),
        }
    }
}

fn local_user(store: &dyn FinanceStore) -> Result<UserProfile> {
    if let Some(user) = store.find_user_by_email(LOCAL_USER_EMAIL)? {
        return Ok(user);
    }
    store.upsert_user(UserProfile::new("Local", LOCAL_USER_EMAIL))
}

pub(crate) fn prompt_error(err: dialoguer::Error) -> FinanceError {
    FinanceError::InvalidInput(err.to_string())
}
