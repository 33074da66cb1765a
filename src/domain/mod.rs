pub mod bill;
pub mod category;
pub mod common;
pub mod reminder;
pub mod transaction;
pub mod user;

pub use bill::{
    Bill, BillKind, BillStatus, ObligationDraft, RecurrenceInterval, RecurrencePolicy,
};
pub use category::Category;
pub use common::{format_amount, Displayable, Identifiable, PaymentMethod};
pub use reminder::{Reminder, ReminderStatus};
pub use transaction::{Transaction, TransactionKind};
pub use user::UserProfile;
