use serde::Deserialize;

use stockroom_core::{DomainError, DomainResult};
use stockroom_inventory::Direction;

// -------------------------
// Form DTOs
// -------------------------
//
// Every field defaults so a half-filled form reaches the handler and is rejected with
// a readable validation message instead of an extractor error.

#[derive(Debug, Deserialize)]
pub struct NameForm {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddStockForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: String,
}

#[derive(Debug, Deserialize)]
pub struct AdjustStockForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub direction: String,
    #[serde(default)]
    pub amount: String,
}

#[derive(Debug, Deserialize)]
pub struct RemoveStockForm {
    #[serde(default)]
    pub name: String,
    pub confirm: Option<String>,
}

// -------------------------
// Field parsing
// -------------------------

pub fn parse_amount(raw: &str, field: &str) -> DomainResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| DomainError::validation(format!("{field} must be a whole number")))
}

pub fn parse_direction(raw: &str) -> DomainResult<Direction> {
    raw.parse()
}

pub fn require_confirmation(confirm: Option<&str>) -> DomainResult<()> {
    match confirm.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(()),
        _ => Err(DomainError::validation(
            "tick the confirmation box to remove an item completely",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_must_be_integers() {
        assert_eq!(parse_amount(" 12 ", "quantity").unwrap(), 12);
        assert_eq!(parse_amount("-3", "quantity").unwrap(), -3);
        assert!(matches!(parse_amount("", "quantity"), Err(DomainError::Validation(_))));
        assert!(matches!(parse_amount("1.5", "amount"), Err(DomainError::Validation(_))));
    }

    #[test]
    fn confirmation_must_be_present() {
        assert!(require_confirmation(Some("yes")).is_ok());
        assert!(require_confirmation(Some(" ")).is_err());
        assert!(require_confirmation(None).is_err());
    }
}
