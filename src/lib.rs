#![doc(test(attr(deny(warnings))))]

//! Finance Core provides the domain primitives of a personal-finance
//! assistant: payable/receivable bills with recurrence, income/expense
//! transactions, balance summaries, due-date reminders, and the messaging
//! pipeline that ties them to an external chat gateway.

pub mod assist;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod schedule;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Finance Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
