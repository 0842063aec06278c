//! Shared HTTP API functionality
//!
//! Pure authentication functions, shared-secret storage and common
//! request/response types. Framework-specific middleware lives in each
//! service crate.

pub mod auth;
pub mod types;

pub use auth::{
    calculate_hash, sign_body, to_canonical_json, validate_hash, validate_timestamp,
    ApiAuthError,
};
#[cfg(feature = "sqlx")]
pub use auth::{initialize_shared_secret, load_shared_secret};
pub use types::{AuthFields, ErrorResponse};
