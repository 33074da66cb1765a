//! Messaging-assistant boundary: webhook payloads, classification,
//! transcription, and the reply pipeline gluing them to the domain
//! services.

pub mod classify;
pub mod gateway;
pub mod pipeline;
pub mod transcribe;
pub mod webhook;

pub use classify::{Classification, Classifier, ExtractedTransaction, OpenAiClassifier};
pub use gateway::{MessageGateway, MetaWhatsAppGateway};
pub use pipeline::{handle_inbound, Assistant, AssistantContext, InboundOutcome};
pub use transcribe::{OpenAiTranscriber, Transcriber};
pub use webhook::{verify_subscription, VerifyRequest, WebhookPayload};
