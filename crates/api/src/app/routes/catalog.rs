//! Names-only stockroom (per session).

use std::sync::Arc;

use axum::{
    Form, Router,
    extract::Extension,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};

use stockroom_core::DomainResult;

use crate::app::notice::Notice;
use crate::app::services::AppServices;
use crate::app::{dto, errors, views};
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(show))
        .route("/add", post(add))
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
    Form(form): Form<dto::NameForm>,
) -> Response {
    let result = services
        .sessions()
        .with_session(session.session_id(), |s| s.catalog.add(&form.name));

    if let Ok(key) = &result {
        tracing::info!(session = %session.session_id(), key = %key, "catalog item added");
    }
    respond(&services, session, result.map(|key| Notice::catalog_added(&key)))
}

pub async fn remove(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Form(form): Form<dto::NameForm>,
) -> Response {
    let result = services
        .sessions()
        .with_session(session.session_id(), |s| s.catalog.remove(&form.name));

    if let Ok(key) = &result {
        tracing::info!(session = %session.session_id(), key = %key, "catalog item removed");
    }
    respond(&services, session, result.map(|key| Notice::catalog_removed(&key)))
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
                "catalog operation rejected"
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
    let html = services
        .sessions()
        .read_session(session.session_id(), |s| {
            views::catalog_page(&s.catalog, notice.as_slice())
        });
    (status, Html(html)).into_response()
}
