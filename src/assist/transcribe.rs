//! Speech-to-text boundary for voice notes.

use serde::Deserialize;
use uuid::Uuid;

use crate::errors::{FinanceError, Result};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const TRANSCRIPTION_MODEL: &str = "whisper-1";

pub trait Transcriber: Send + Sync {
    /// Turns downloaded audio bytes into text. An empty result means the
    /// audio carried no recognizable speech.
    fn transcribe(&self, audio: &[u8]) -> Result<String>;
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Whisper transcription client. The endpoint only accepts multipart
/// uploads, so the body is assembled by hand.
pub struct OpenAiTranscriber {
    agent: ureq::Agent,
    api_key: String,
    base_url: String,
}

impl OpenAiTranscriber {
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

impl Transcriber for OpenAiTranscriber {
    fn transcribe(&self, audio: &[u8]) -> Result<String> {
        let boundary = format!("finance-core-{}", Uuid::new_v4().simple());
        let body = multipart_body(&boundary, TRANSCRIPTION_MODEL, audio);
        let response = self
            .agent
            .post(&format!("{}/audio/transcriptions", self.base_url))
            .header("authorization", &format!("Bearer {}", self.api_key))
            .header(
                "content-type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .send(&body[..])
            .map_err(|err| FinanceError::Transcribe(format!("transcription request failed: {err}")))?;
        let parsed: TranscriptionResponse = response
            .into_body()
            .read_json()
            .map_err(|err| FinanceError::Transcribe(format!("unreadable transcription: {err}")))?;
        Ok(parsed.text)
    }
}

fn multipart_body(boundary: &str, model: &str, audio: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(audio.len() + 512);
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"model\"\r\n\r\n{model}\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"audio.ogg\"\r\nContent-Type: audio/ogg\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(audio);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipart_body_wraps_audio_between_fields() {
        let body = multipart_body("xyz", "whisper-1", b"AUDIO");
        let text = String::from_utf8_lossy(&body);
        assert!(text.starts_with("--xyz\r\n"));
        assert!(text.contains("name=\"model\"\r\n\r\nwhisper-1"));
        assert!(text.contains("filename=\"audio.ogg\""));
        assert!(text.contains("AUDIO"));
        assert!(text.ends_with("--xyz--\r\n"));
    }
}
