//! API Module
//!
//! HTTP layer of the cache server: handlers, routes and shared state.
//! Cache operations speak JSON; the statistics reports under /stats/*
//! are fixed-format plain text rendered by the stats engine.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
