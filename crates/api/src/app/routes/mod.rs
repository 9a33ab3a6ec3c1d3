use axum::{Router, response::Redirect, routing::get};

pub mod catalog;
pub mod ledger;
pub mod store;
pub mod system;

/// Router for all session-scoped pages.
pub fn router() -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/ledger") }))
        .nest("/catalog", catalog::router())
        .nest("/ledger", ledger::router())
        .nest("/store", store::router())
}
