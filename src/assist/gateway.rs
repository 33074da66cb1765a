//! Outbound side of the chat gateway (WhatsApp Cloud API).

use serde::Serialize;
use serde_json::Value;

use crate::errors::{FinanceError, Result};

const GRAPH_API_BASE: &str = "https://graph.facebook.com/v22.0";

/// Messaging boundary the services talk to.
pub trait MessageGateway: Send + Sync {
    /// Sends a plain text message to a channel address.
    fn send_text(&self, to: &str, body: &str) -> Result<()>;

    /// Downloads the raw bytes of an inbound media attachment.
    fn fetch_media(&self, media_id: &str) -> Result<Vec<u8>>;
}

#[derive(Serialize)]
struct TextMessageRequest<'a> {
    messaging_product: &'a str,
    to: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    text: TextBody<'a>,
}

#[derive(Serialize)]
struct TextBody<'a> {
    body: &'a str,
}

/// WhatsApp Cloud API client, bearer-token authenticated.
pub struct MetaWhatsAppGateway {
    agent: ureq::Agent,
    access_token: String,
    phone_number_id: String,
    base_url: String,
}

impl MetaWhatsAppGateway {
    pub fn new(access_token: impl Into<String>, phone_number_id: impl Into<String>) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            access_token: access_token.into(),
            phone_number_id: phone_number_id.into(),
            base_url: GRAPH_API_BASE.to_string(),
        }
    }

    /// Points the client at a different API root; used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

impl MessageGateway for MetaWhatsAppGateway {
    fn send_text(&self, to: &str, body: &str) -> Result<()> {
        let url = format!("{}/{}/messages", self.base_url, self.phone_number_id);
        let request = TextMessageRequest {
            messaging_product: "whatsapp",
            to,
            kind: "text",
            text: TextBody { body },
        };
        let response = self
            .agent
            .post(&url)
            .header("authorization", &self.bearer())
            .send_json(&request)
            .map_err(|err| FinanceError::Gateway(format!("message send failed: {err}")))?;
        let _: Value = response
            .into_body()
            .read_json()
            .map_err(|err| FinanceError::Gateway(format!("unreadable send response: {err}")))?;
        tracing::debug!(to, "outbound message delivered to gateway");
        Ok(())
    }

    fn fetch_media(&self, media_id: &str) -> Result<Vec<u8>> {
        // The media id resolves to a short-lived download URL first.
        let meta_url = format!("{}/{}", self.base_url, media_id);
        let response = self
            .agent
            .get(&meta_url)
            .header("authorization", &self.bearer())
            .call()
            .map_err(|err| FinanceError::Gateway(format!("media lookup failed: {err}")))?;
        let meta: Value = response
            .into_body()
            .read_json()
            .map_err(|err| FinanceError::Gateway(format!("unreadable media lookup: {err}")))?;
        let media_url = meta
            .get("url")
            .and_then(Value::as_str)
            .ok_or_else(|| FinanceError::Gateway("media lookup response had no url".into()))?;

        let response = self
            .agent
            .get(media_url)
            .header("authorization", &self.bearer())
            .call()
            .map_err(|err| FinanceError::Gateway(format!("media download failed: {err}")))?;
        response
            .into_body()
            .read_to_vec()
            .map_err(|err| FinanceError::Gateway(format!("media body unreadable: {err}")))
    }
}
