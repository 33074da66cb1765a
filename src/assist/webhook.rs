//! Inbound webhook surface of the chat gateway.

use serde::Deserialize;

/// Subscription handshake parameters (the gateway's `hub.*` query fields).
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyRequest {
    pub mode: String,
    pub token: String,
    pub challenge: String,
}

/// Answers the gateway's subscription handshake: a subscribe request with a
/// matching token echoes the challenge back, anything else is refused.
pub fn verify_subscription(request: &VerifyRequest, verify_token: &str) -> Option<String> {
    if request.mode == "subscribe" && request.token == verify_token {
        Some(request.challenge.clone())
    } else {
        None
    }
}

/// Envelope delivered by the gateway. Status-only callbacks arrive in the
/// same shape with an empty message list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookEntry {
    #[serde(default)]
    pub changes: Vec<WebhookChange>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookChange {
    #[serde(default)]
    pub value: ChangeValue,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub messages: Vec<InboundMessage>,
    #[serde(default)]
    pub statuses: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    pub from: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: Option<TextContent>,
    #[serde(default)]
    pub audio: Option<AudioContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextContent {
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioContent {
    pub id: String,
}

impl WebhookPayload {
    /// First user message in the delivery, if any.
    pub fn first_message(&self) -> Option<&InboundMessage> {
        self.entry
            .first()?
            .changes
            .first()?
            .value
            .messages
            .first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_echoes_challenge_on_token_match() {
        let request = VerifyRequest {
            mode: "subscribe".into(),
            token: "hunter2".into(),
            challenge: "12345".into(),
        };
        assert_eq!(
            verify_subscription(&request, "hunter2").as_deref(),
            Some("12345")
        );
        assert!(verify_subscription(&request, "other").is_none());
    }

    #[test]
    fn verify_rejects_non_subscribe_modes() {
        let request = VerifyRequest {
            mode: "unsubscribe".into(),
            token: "hunter2".into(),
            challenge: "12345".into(),
        };
        assert!(verify_subscription(&request, "hunter2").is_none());
    }

    #[test]
    fn payload_parses_text_message() {
        let payload: WebhookPayload = serde_json::from_value(serde_json::json!({
            "entry": [{
                "changes": [{
                    "value": {
                        "messages": [{
                            "from": "5511999",
                            "type": "text",
                            "text": { "body": "spent R$ 50 at the market" }
                        }]
                    }
                }]
            }]
        }))
        .unwrap();
        let message = payload.first_message().expect("message present");
        assert_eq!(message.from, "5511999");
        assert_eq!(message.text.as_ref().unwrap().body, "spent R$ 50 at the market");
        assert!(message.audio.is_none());
    }

    #[test]
    fn status_only_payload_has_no_message() {
        let payload: WebhookPayload = serde_json::from_value(serde_json::json!({
            "entry": [{
                "changes": [{
                    "value": {
                        "statuses": [{ "status": "delivered" }]
                    }
                }]
            }]
        }))
        .unwrap();
        assert!(payload.first_message().is_none());
    }

    #[test]
    fn empty_payload_parses() {
        let payload: WebhookPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.first_message().is_none());
    }
}
