use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::Identifiable;

/// An account owner. The email doubles as the lookup key for users created
/// from an inbound chat message, where the sender id stands in for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp_number: Option<String>,
}

impl UserProfile {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            whatsapp_number: None,
        }
    }

    /// Profile for a sender first seen through the messaging gateway.
    pub fn from_channel(sender: &str) -> Self {
        let mut user = Self::new(format!("User {sender}"), sender);
        user.whatsapp_number = Some(sender.to_string());
        user
    }

    pub fn with_whatsapp_number(mut self, number: impl Into<String>) -> Self {
        self.whatsapp_number = Some(number.into());
        self
    }
}

impl Identifiable for UserProfile {
    fn id(&self) -> Uuid {
        self.id
    }
}
