//! elp-progress library - Progression service
//!
//! HTTP layer over the progression engine in `elp-common`: one endpoint per
//! engine calculation, plus authenticated user-scoped endpoints that apply
//! rewards to stored XP totals.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Shared secret for API authentication (0 disables checking)
    pub shared_secret: i64,
}

impl AppState {
    pub fn new(db: SqlitePool, shared_secret: i64) -> Self {
        Self { db, shared_secret }
    }
}

/// Build application router
///
/// Calculation endpoints and health are public; user-scoped endpoints sit
/// behind the authentication middleware.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::post;

    let protected = Router::new()
        .route("/api/users/:user_id/progress", post(api::get_user_progress))
        .route("/api/users/:user_id/award", post(api::award_xp))
        .route("/api/users/:user_id/skills", post(api::update_skills))
        .route("/api/users/:user_id/awards", post(api::list_awards))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    let public = Router::new()
        .merge(api::calculation_routes())
        .merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
