//! Natural-language classification boundary.
//!
//! The remote model returns loosely shaped JSON; everything is validated
//! into a closed tagged variant here so the rest of the pipeline never
//! touches untyped payloads.

use serde::{Deserialize, Serialize};

use crate::domain::PaymentMethod;
use crate::errors::{FinanceError, Result};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const CLASSIFIER_MODEL: &str = "gpt-4";

const SYSTEM_PROMPT: &str = "You are a personal-finance assistant. Analyze the user's message and \
extract transaction details. Reply with a single JSON object of the form \
{\"type\": \"income\" | \"expense\", \"amount\": number, \"category\": string, \
\"payment_method\": \"pix\" | \"card\" | \"transfer\" | \"cash\", \"description\": string}. \
Examples: \"spent R$ 50 at the market with my card\" -> type expense, amount 50, \
category Groceries, payment_method card; \"received R$ 1000 salary via pix\" -> \
type income, amount 1000, category Salary, payment_method pix. \
If the message is not a transaction, reply {\"type\": \"query\"}.";

/// A transaction extracted from free-form text.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedTransaction {
    pub amount: f64,
    pub category: Option<String>,
    pub payment_method: PaymentMethod,
    pub description: String,
}

/// Validated outcome of classifying an inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Query,
    Income(ExtractedTransaction),
    Expense(ExtractedTransaction),
}

pub trait Classifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<Classification>;
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RawClassification {
    Query,
    Income(RawTransaction),
    Expense(RawTransaction),
}

#[derive(Debug, Deserialize)]
struct RawTransaction {
    amount: f64,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    payment_method: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Parses and validates the classifier's JSON payload, rejecting malformed
/// shapes instead of trusting them downstream.
pub fn parse_classification(raw_json: &str) -> Result<Classification> {
    let trimmed = strip_code_fences(raw_json.trim());
    let raw: RawClassification = serde_json::from_str(trimmed)
        .map_err(|err| FinanceError::Classify(format!("malformed classification payload: {err}")))?;
    match raw {
        RawClassification::Query => Ok(Classification::Query),
        RawClassification::Income(txn) => Ok(Classification::Income(validate(txn)?)),
        RawClassification::Expense(txn) => Ok(Classification::Expense(validate(txn)?)),
    }
}

fn validate(raw: RawTransaction) -> Result<ExtractedTransaction> {
    if !raw.amount.is_finite() || raw.amount <= 0.0 {
        return Err(FinanceError::Classify(format!(
            "classification carried a non-positive amount: {}",
            raw.amount
        )));
    }
    Ok(ExtractedTransaction {
        amount: raw.amount,
        category: raw
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty()),
        payment_method: raw
            .payment_method
            .as_deref()
            .map(PaymentMethod::parse_or_cash)
            .unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
    })
}

/// Strips markdown code fences the model sometimes wraps around its JSON.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text.strip_prefix("```") else {
        return text;
    };
    let stripped = stripped.strip_prefix("json").unwrap_or(stripped);
    stripped
        .strip_suffix("```")
        .unwrap_or(stripped)
        .trim()
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Chat-completion client performing the extraction remotely.
pub struct OpenAiClassifier {
    agent: ureq::Agent,
    api_key: String,
    base_url: String,
}

impl OpenAiClassifier {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            api_key: api_key.into(),
            base_url: OPENAI_API_BASE.to_string(),
        }
    }

    /// Points the client at a different API root; used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Classifier for OpenAiClassifier {
    fn classify(&self, text: &str) -> Result<Classification> {
        let request = ChatRequest {
            model: CLASSIFIER_MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
        };
        let response = self
            .agent
            .post(&format!("{}/chat/completions", self.base_url))
            .header("authorization", &format!("Bearer {}", self.api_key))
            .send_json(&request)
            .map_err(|err| FinanceError::Classify(format!("classification request failed: {err}")))?;
        let parsed: ChatResponse = response
            .into_body()
            .read_json()
            .map_err(|err| FinanceError::Classify(format!("unreadable classifier response: {err}")))?;
        let content = parsed
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| FinanceError::Classify("classifier response contained no content".into()))?;
        parse_classification(&content)
    }
}
