//! Plain-table rendering for CLI listings.

use colored::Colorize;

use crate::core::services::Totals;
use crate::domain::{format_amount, Bill, BillKind, BillStatus, Transaction};

pub fn print_bills(kind: BillKind, bills: &[Bill]) {
    println!("{}", format!("{} bills", kind.label()).bold());
    if bills.is_empty() {
        println!("  (none)");
        return;
    }
    for bill in bills {
        println!(
            "  {}  {:<20}  {:>12}  {}",
            bill.due_date,
            bill.party_name,
            format_amount(bill.amount),
            status_label(bill.status)
        );
    }
}

pub fn print_transactions(transactions: &[Transaction]) {
    println!("{}", "Transactions".bold());
    if transactions.is_empty() {
        println!("  (none)");
        return;
    }
    for txn in transactions {
        println!(
            "  {}  {:<8}  {:>12}  {}",
            txn.date,
            txn.kind.label(),
            format_amount(txn.amount),
            txn.payment_method.label()
        );
    }
}

pub fn print_totals(totals: &Totals) {
    println!("{}", "Balance".bold());
    println!("  Income:   {}", format_amount(totals.income).green());
    println!("  Expenses: {}", format_amount(totals.expense).red());
    let net = format_amount(totals.net());
    if totals.net() >= 0.0 {
        println!("  Net:      {}", net.green());
    } else {
        println!("  Net:      {}", net.red());
    }
}

fn status_label(status: BillStatus) -> colored::ColoredString {
    match status {
        BillStatus::Pending => "pending".yellow(),
        BillStatus::Paid => "paid".green(),
        BillStatus::Overdue => "overdue".red(),
    }
}
