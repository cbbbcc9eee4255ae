use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::engine::Engine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// The analysis engine. Loaded once at startup from immutable model
    /// artifacts and shared read-only across requests — no locking needed.
    pub engine: Arc<Engine>,
    pub config: Config,
}
