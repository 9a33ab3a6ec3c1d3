use axum::http::StatusCode;

use stockroom_core::DomainError;
use stockroom_infra::LedgerError;

use crate::app::notice::{Level, Notice};

/// Map a rejected operation to the status code and message shown on the re-rendered page.
pub fn domain_error_notice(err: &DomainError) -> (StatusCode, Notice) {
    match err {
        DomainError::Validation(msg) => (
            StatusCode::BAD_REQUEST,
            Notice::new(Level::Error, capitalize(msg)),
        ),
        DomainError::NotFound(key) => (
            StatusCode::NOT_FOUND,
            Notice::new(Level::Warning, format!("{key} is not in the stockroom.")),
        ),
        DomainError::InsufficientQuantity {
            key,
            requested,
            available,
        } => (
            StatusCode::CONFLICT,
            Notice::new(
                Level::Error,
                format!("Cannot issue {requested} of {key}: only {available} in stock."),
            ),
        ),
        DomainError::Duplicate(key) => (
            StatusCode::CONFLICT,
            Notice::new(Level::Warning, format!("{key} is already in the stockroom.")),
        ),
        DomainError::Conflict(msg) => (
            StatusCode::CONFLICT,
            Notice::new(Level::Error, capitalize(msg)),
        ),
    }
}

pub fn ledger_error_notice(err: &LedgerError) -> (StatusCode, Notice) {
    match err {
        LedgerError::Domain(e) => domain_error_notice(e),
        LedgerError::Store(e) => {
            tracing::warn!(error = %e, "stock table request failed");
            (
                StatusCode::BAD_GATEWAY,
                Notice::new(
                    Level::Error,
                    "The stock table is unavailable right now. Nothing was changed; try again.",
                ),
            )
        }
    }
}

/// Notice for a failed listing shown after (or instead of) an operation's own notice.
///
/// The listing is read after the operation, so this says nothing about whether it applied.
pub fn listing_error_notice(err: &LedgerError) -> (StatusCode, Notice) {
    match err {
        LedgerError::Domain(e) => domain_error_notice(e),
        LedgerError::Store(e) => {
            tracing::warn!(error = %e, "stock table listing failed");
            (
                StatusCode::BAD_GATEWAY,
                Notice::new(
                    Level::Error,
                    "The stock list could not be loaded right now. Reload the page to see \
                     current stock.",
                ),
            )
        }
    }
}

fn capitalize(msg: &str) -> String {
    let mut chars = msg.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>() + ".",
        None => String::new(),
    }
}
