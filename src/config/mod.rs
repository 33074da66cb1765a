//! Environment-driven application configuration.

use std::path::PathBuf;

use crate::errors::{FinanceError, Result};

/// Credentials for the WhatsApp Cloud API.
#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    pub verify_token: String,
    pub access_token: String,
    pub phone_number_id: String,
}

/// Full runtime configuration. Optional services stay unconfigured when
/// their credentials are absent; the accessors surface that explicitly.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub whatsapp: Option<WhatsAppConfig>,
    pub openai_api_key: Option<String>,
    pub reminder_cron_secret: Option<String>,
    pub data_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let whatsapp = match (
            env("META_VERIFY_TOKEN"),
            env("META_ACCESS_TOKEN"),
            env("META_PHONE_NUMBER_ID"),
        ) {
            (Some(verify_token), Some(access_token), Some(phone_number_id)) => {
                Some(WhatsAppConfig {
                    verify_token,
                    access_token,
                    phone_number_id,
                })
            }
            _ => None,
        };
        Self {
            whatsapp,
            openai_api_key: env("OPENAI_API_KEY"),
            reminder_cron_secret: env("REMINDER_CRON_SECRET"),
            data_dir: env("FINANCE_CORE_HOME").map(PathBuf::from),
        }
    }

    pub fn whatsapp(&self) -> Result<&WhatsAppConfig> {
        self.whatsapp
            .as_ref()
            .ok_or_else(|| FinanceError::Config("WhatsApp gateway is not configured".into()))
    }

    pub fn openai_api_key(&self) -> Result<&str> {
        self.openai_api_key
            .as_deref()
            .ok_or_else(|| FinanceError::Config("OpenAI integration is not configured".into()))
    }
}

fn env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
