//! Stockroom with quantities backed by the shared stock table.

use std::sync::Arc;

use axum::{
    Form, Router,
    extract::Extension,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};

use stockroom_infra::LedgerError;

use crate::app::notice::Notice;
use crate::app::services::AppServices;
use crate::app::views::{self, STORE_PAGE};
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(show))
        .route("/add", post(add))
        .route("/adjust", post(adjust))
        .route("/remove", post(remove))
}

pub async fn show(Extension(services): Extension<Arc<AppServices>>) -> Response {
    render(&services, StatusCode::OK, None).await
}

pub async fn add(
    Extension(services): Extension<Arc<AppServices>>,
    Form(form): Form<dto::AddStockForm>,
) -> Response {
    let result = async {
        let amount = dto::parse_amount(&form.quantity, "quantity")?;
        let outcome = services.store().upsert_or_merge(&form.name, amount).await?;
        Ok::<_, LedgerError>(Notice::upserted(&outcome))
    }
    .await;

    respond(&services, result).await
}

pub async fn adjust(
    Extension(services): Extension<Arc<AppServices>>,
    Form(form): Form<dto::AdjustStockForm>,
) -> Response {
    let result = async {
        let delta = dto::parse_amount(&form.amount, "amount")?;
        let direction = dto::parse_direction(&form.direction)?;
        let outcome = services.store().adjust(&form.name, delta, direction).await?;
        Ok::<_, LedgerError>(Notice::adjusted(&outcome))
    }
    .await;

    respond(&services, result).await
}

pub async fn remove(
    Extension(services): Extension<Arc<AppServices>>,
    Form(form): Form<dto::RemoveStockForm>,
) -> Response {
    let result = async {
        dto::require_confirmation(form.confirm.as_deref())?;
        let entry = services.store().remove(&form.name).await?;
        Ok::<_, LedgerError>(Notice::removed(&entry))
    }
    .await;

    respond(&services, result).await
}

async fn respond(services: &AppServices, result: Result<Notice, LedgerError>) -> Response {
    let (status, notice) = match result {
        Ok(notice) => (StatusCode::OK, notice),
        Err(e) => {
            tracing::debug!(error = %e, "store operation rejected");
            errors::ledger_error_notice(&e)
        }
    };
    render(services, status, Some(notice)).await
}

/// Render the page with the current listing.
///
/// An operation's own status and notice stand even if the listing that follows fails;
/// the listing failure is reported as a second notice.
async fn render(
    services: &AppServices,
    mut status: StatusCode,
    notice: Option<Notice>,
) -> Response {
    let mut notices: Vec<Notice> = notice.into_iter().collect();

    let entries = match services.store().list_sorted().await {
        Ok(entries) => entries,
        Err(e) => {
            let (listing_status, listing_notice) = errors::listing_error_notice(&e);
            if notices.is_empty() {
                status = listing_status;
            }
            notices.push(listing_notice);
            Vec::new()
        }
    };

    let html = views::ledger_page(&STORE_PAGE, &entries, &notices, services.store_label());
    (status, Html(html)).into_response()
}
