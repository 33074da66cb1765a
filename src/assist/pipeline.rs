//! Classification-and-reply pipeline for inbound assistant messages.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;

use crate::assist::classify::{Classification, Classifier, ExtractedTransaction, OpenAiClassifier};
use crate::assist::gateway::{MessageGateway, MetaWhatsAppGateway};
use crate::assist::transcribe::{OpenAiTranscriber, Transcriber};
use crate::assist::webhook::WebhookPayload;
use crate::config::AppConfig;
use crate::core::services::{SummaryService, TransactionDraft, TransactionService};
use crate::domain::{format_amount, TransactionKind, UserProfile};
use crate::errors::Result;
use crate::storage::FinanceStore;

static BALANCE_KEYWORDS: Lazy<Vec<&'static str>> =
    Lazy::new(|| vec!["balance", "saldo", "how much do i have", "quanto tenho"]);
static REPORT_KEYWORDS: Lazy<Vec<&'static str>> =
    Lazy::new(|| vec!["report", "summary", "relat\u{f3}rio", "resumo"]);

const HELP_REPLY: &str = "Hi! I am your finance assistant. I can record transactions like \
\"spent R$ 50 at the market\" or answer questions about your balance and reports.";
const UNREADABLE_REPLY: &str = "I could not read your message. Please try sending it as text.";
const FALLBACK_REPLY: &str = "Message received. To record a transaction, try something like \
\"spent R$ 50 at the market\".";

/// Collaborators required to process one inbound webhook delivery.
pub struct AssistantContext<'a> {
    pub store: &'a dyn FinanceStore,
    pub gateway: &'a dyn MessageGateway,
    pub classifier: &'a dyn Classifier,
    pub transcriber: &'a dyn Transcriber,
}

/// Production wiring of the boundary clients, built from configuration.
pub struct Assistant {
    gateway: MetaWhatsAppGateway,
    classifier: OpenAiClassifier,
    transcriber: OpenAiTranscriber,
}

impl Assistant {
    /// Fails with a configuration error when either the gateway or the
    /// OpenAI credentials are absent.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let whatsapp = config.whatsapp()?;
        let api_key = config.openai_api_key()?;
        Ok(Self {
            gateway: MetaWhatsAppGateway::new(
                whatsapp.access_token.clone(),
                whatsapp.phone_number_id.clone(),
            ),
            classifier: OpenAiClassifier::new(api_key),
            transcriber: OpenAiTranscriber::new(api_key),
        })
    }

    pub fn context<'a>(&'a self, store: &'a dyn FinanceStore) -> AssistantContext<'a> {
        AssistantContext {
            store,
            gateway: &self.gateway,
            classifier: &self.classifier,
            transcriber: &self.transcriber,
        }
    }
}

/// What the pipeline did with a delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundOutcome {
    /// Payload carried no usable message (delivery receipts, empty pings).
    Ignored,
    /// A reply was sent to the given channel address.
    Replied { to: String, body: String },
}

/// Processes one webhook delivery end to end: resolve the sender to a
/// user, transcribe voice notes, classify the text, record or answer, and
/// reply through the gateway. Processing failures degrade to a generic
/// reply; only gateway failures surface as errors.
pub fn handle_inbound(
    ctx: &AssistantContext<'_>,
    payload: &WebhookPayload,
    today: NaiveDate,
) -> Result<InboundOutcome> {
    let message = match payload.first_message() {
        Some(message) => message,
        None => return Ok(InboundOutcome::Ignored),
    };

    let text = message.text.as_ref().map(|t| t.body.clone());
    let audio_id = message.audio.as_ref().map(|a| a.id.clone());
    if text.is_none() && audio_id.is_none() {
        return Ok(InboundOutcome::Ignored);
    }

    let user = resolve_user(ctx.store, &message.from)?;

    let content = match text {
        Some(body) => Some(body),
        None => fetch_transcription(ctx, audio_id.as_deref()),
    };
    let content = match content {
        Some(value) if !value.trim().is_empty() => value,
        _ => return reply(ctx, &message.from, UNREADABLE_REPLY.to_string()),
    };

    let body = match process_content(ctx, &user, &content, today) {
        Ok(reply_body) => reply_body,
        Err(err) => {
            tracing::warn!(error = %err, "inbound message processing failed");
            FALLBACK_REPLY.to_string()
        }
    };
    reply(ctx, &message.from, body)
}

fn reply(ctx: &AssistantContext<'_>, to: &str, body: String) -> Result<InboundOutcome> {
    ctx.gateway.send_text(to, &body)?;
    Ok(InboundOutcome::Replied {
        to: to.to_string(),
        body,
    })
}

/// Finds the sender's profile or creates one keyed by the channel address.
fn resolve_user(store: &dyn FinanceStore, sender: &str) -> Result<UserProfile> {
    if let Some(user) = store.find_user_by_email(sender)? {
        return Ok(user);
    }
    store.upsert_user(UserProfile::from_channel(sender))
}

fn fetch_transcription(ctx: &AssistantContext<'_>, audio_id: Option<&str>) -> Option<String> {
    let media_id = audio_id?;
    let audio = match ctx.gateway.fetch_media(media_id) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(error = %err, "media download failed");
            return None;
        }
    };
    match ctx.transcriber.transcribe(&audio) {
        Ok(text) => Some(text),
        Err(err) => {
            tracing::warn!(error = %err, "transcription failed");
            None
        }
    }
}

fn process_content(
    ctx: &AssistantContext<'_>,
    user: &UserProfile,
    content: &str,
    today: NaiveDate,
) -> Result<String> {
    match ctx.classifier.classify(content)? {
        Classification::Query => answer_query(ctx.store, user, content, today),
        Classification::Income(extracted) => {
            record_extracted(ctx.store, user, TransactionKind::Income, extracted, today)
        }
        Classification::Expense(extracted) => {
            record_extracted(ctx.store, user, TransactionKind::Expense, extracted, today)
        }
    }
}

fn record_extracted(
    store: &dyn FinanceStore,
    user: &UserProfile,
    kind: TransactionKind,
    extracted: ExtractedTransaction,
    today: NaiveDate,
) -> Result<String> {
    let category_label = extracted
        .category
        .clone()
        .unwrap_or_else(|| "Uncategorized".to_string());
    let draft = TransactionDraft {
        kind,
        amount: extracted.amount,
        category: extracted.category,
        description: extracted.description,
        payment_method: extracted.payment_method,
    };
    let transaction = TransactionService::record(store, user.id, draft, today)?;
    Ok(format!(
        "\u{2705} Transaction recorded: {} of {} in category {}",
        transaction.kind.label().to_lowercase(),
        format_amount(transaction.amount),
        category_label
    ))
}

fn answer_query(
    store: &dyn FinanceStore,
    user: &UserProfile,
    content: &str,
    today: NaiveDate,
) -> Result<String> {
    let lowered = content.to_lowercase();
    if BALANCE_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        let totals = SummaryService::balance(store, user.id)?;
        return Ok(format!(
            "\u{1F4B0} Your current balance is {} (income {}, expenses {})",
            format_amount(totals.net()),
            format_amount(totals.income),
            format_amount(totals.expense)
        ));
    }
    if REPORT_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
        let summary =
            SummaryService::month_summary(store, user.id, today.year(), today.month())?;
        return Ok(format!(
            "\u{1F4CA} This month: income {}, expenses {}, net {}",
            format_amount(summary.totals.income),
            format_amount(summary.totals.expense),
            format_amount(summary.totals.net())
        ));
    }
    Ok(HELP_REPLY.to_string())
}
