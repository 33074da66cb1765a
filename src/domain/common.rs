use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Settlement channels shared by bills and transactions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Pix,
    Card,
    Transfer,
    Cash,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

impl PaymentMethod {
    /// Parses a loosely typed form or classifier value. Unrecognized input
    /// falls back to cash.
    pub fn parse_or_cash(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "pix" => PaymentMethod::Pix,
            "card" => PaymentMethod::Card,
            "transfer" => PaymentMethod::Transfer,
            _ => PaymentMethod::Cash,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Pix => "Pix",
            PaymentMethod::Card => "Card",
            PaymentMethod::Transfer => "Transfer",
            PaymentMethod::Cash => "Cash",
        }
    }
}

/// Formats a currency amount for replies and CLI output.
pub fn format_amount(value: f64) -> String {
    format!("R$ {:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_or_cash_accepts_known_methods() {
        assert_eq!(PaymentMethod::parse_or_cash("pix"), PaymentMethod::Pix);
        assert_eq!(PaymentMethod::parse_or_cash(" Card "), PaymentMethod::Card);
        assert_eq!(
            PaymentMethod::parse_or_cash("transfer"),
            PaymentMethod::Transfer
        );
    }

    #[test]
    fn parse_or_cash_falls_back_on_unknown_input() {
        assert_eq!(PaymentMethod::parse_or_cash("boleto"), PaymentMethod::Cash);
        assert_eq!(PaymentMethod::parse_or_cash(""), PaymentMethod::Cash);
    }

    #[test]
    fn amounts_render_with_two_decimals() {
        assert_eq!(format_amount(50.0), "R$ 50.00");
        assert_eq!(format_amount(1234.5), "R$ 1234.50");
    }
}
