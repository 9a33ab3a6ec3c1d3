//! Stockroom with quantities (per session).

use std::sync::Arc;

use axum::{
    Form, Router,
    extract::Extension,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};

use stockroom_core::DomainResult;
use stockroom_inventory::LedgerEntry;

use crate::app::notice::Notice;
use crate::app::services::AppServices;
use crate::app::views::{self, LEDGER_PAGE};
use crate::app::{dto, errors};
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(show))
        .route("/add", post(add))
        .route("/adjust", post(adjust))
        .route("/remove", post(remove))
}

pub async fn show(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> Response {
    render(&services, session, StatusCode::OK, None)
}

pub async fn add(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Form(form): Form<dto::AddStockForm>,
) -> Response {
    let result = dto::parse_amount(&form.quantity, "quantity").and_then(|amount| {
        services.sessions().with_session(session.session_id(), |s| {
            s.ledger.upsert_or_merge(&form.name, amount)
        })
    });

    if let Ok(outcome) = &result {
        tracing::info!(
            session = %session.session_id(),
            key = %outcome.entry.key,
            quantity = outcome.entry.quantity,
            created = outcome.created,
            "ledger entry upserted"
        );
    }
    respond(&services, session, result.map(|o| Notice::upserted(&o)))
}

pub async fn adjust(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Form(form): Form<dto::AdjustStockForm>,
) -> Response {
    let result = dto::parse_amount(&form.amount, "amount").and_then(|delta| {
        let direction = dto::parse_direction(&form.direction)?;
        services.sessions().with_session(session.session_id(), |s| {
            s.ledger.adjust(&form.name, delta, direction)
        })
    });

    if let Ok(outcome) = &result {
        tracing::info!(
            session = %session.session_id(),
            key = %outcome.key,
            direction = %outcome.direction,
            delta = outcome.delta,
            remaining = ?outcome.remaining,
            "ledger entry adjusted"
        );
    }
    respond(&services, session, result.map(|o| Notice::adjusted(&o)))
}

pub async fn remove(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Form(form): Form<dto::RemoveStockForm>,
) -> Response {
    let result = dto::require_confirmation(form.confirm.as_deref()).and_then(|()| {
        services
            .sessions()
            .with_session(session.session_id(), |s| s.ledger.remove(&form.name))
    });

    if let Ok(entry) = &result {
        tracing::info!(session = %session.session_id(), key = %entry.key, "ledger entry removed");
    }
    respond(&services, session, result.map(|e| Notice::removed(&e)))
}

fn respond(
    services: &AppServices,
    session: SessionContext,
    result: DomainResult<Notice>,
) -> Response {
    let (status, notice) = match result {
        Ok(notice) => (StatusCode::OK, notice),
        Err(e) => {
            tracing::debug!(
                session = %session.session_id(),
                error = %e,
                "ledger operation rejected"
            );
            errors::domain_error_notice(&e)
        }
    };
    render(services, session, status, Some(notice))
}

fn render(
    services: &AppServices,
    session: SessionContext,
    status: StatusCode,
    notice: Option<Notice>,
) -> Response {
    let entries: Vec<LedgerEntry> = services
        .sessions()
        .read_session(session.session_id(), |s| s.ledger.list_sorted().collect());

    let html = views::ledger_page(
        &LEDGER_PAGE,
        &entries,
        notice.as_slice(),
        "Kept in this browser session only; closing the session discards it.",
    );
    (status, Html(html)).into_response()
}
