//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: session store and table-client wiring
//! - `routes/`: HTTP routes + handlers (one file per stockroom variant)
//! - `views.rs`: HTML rendering
//! - `dto.rs`: form DTOs and field parsing
//! - `notice.rs` / `errors.rs`: messages shown after each submission

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use stockroom_infra::AppConfig;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod notice;
pub mod routes;
pub mod services;
pub mod views;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Starts the idle-session sweeper, so this must run inside a tokio runtime.
pub fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = services::build_services(config)?;
    services.sessions().spawn_sweeper(config.session_idle);
    Ok(router_with(Arc::new(services)))
}

/// Build the router around already-wired services (tests inject their own table).
pub fn router_with(services: Arc<services::AppServices>) -> Router {
    let pages = routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn(middleware::session_middleware))
            .layer(Extension(services)),
    );

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(pages)
}
