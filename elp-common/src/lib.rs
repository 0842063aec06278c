//! # ELP Common Library
//!
//! Shared code for the English Learning Platform services including:
//! - Progression engine (XP curve, rewards, level-up detection, skills)
//! - Database initialization and models
//! - API authentication primitives
//! - Bootstrap configuration loading

pub mod api;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod progression;

pub use error::{Error, Result};
pub use progression::{LevelInfo, ProgressSummary, SkillSnapshot, XpReward};
