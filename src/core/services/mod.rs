//! Business services coordinating domain rules with the storage boundary.

pub mod bill_service;
pub mod reminder_service;
pub mod summary_service;
pub mod transaction_service;

pub use bill_service::BillService;
pub use reminder_service::{DispatchReport, ReminderService};
pub use summary_service::{MonthSummary, SummaryService, Totals};
pub use transaction_service::{TransactionDraft, TransactionService};
