//! HTTP front end: session handling, form routes and HTML pages.

pub mod app;
pub mod context;
pub mod middleware;
