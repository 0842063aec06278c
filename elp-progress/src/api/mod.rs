//! HTTP API handlers for elp-progress

pub mod auth;
pub mod calc;
pub mod error;
pub mod extract;
pub mod health;
pub mod users;
pub mod validation;

pub use auth::auth_middleware;
pub use calc::calculation_routes;
pub use error::ApiError;
pub use extract::ApiJson;
pub use health::health_routes;
pub use users::{award_xp, get_user_progress, list_awards, update_skills};
