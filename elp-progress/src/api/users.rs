//! User-scoped progress endpoints
//!
//! All routes here sit behind the authentication middleware. The request
//! body carries the auth fields (`timestamp`, `hash`) next to the payload;
//! handlers ignore them.

use axum::{
    extract::{Path, State},
    Json,
};
use elp_common::db::{UserProgress, XpAward};
use elp_common::progression::{
    get_level_info, progress_summary, LevelInfo, ProgressSummary, SkillSnapshot, XpReward,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::calc::{reward_for, RewardRequest};
use super::{validation, ApiError, ApiJson};
use crate::{db, AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct UserProgressResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(flatten)]
    pub summary: ProgressSummary,
    /// Absent for learners with no stored progress yet
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AwardResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub reward: XpReward,
    #[serde(rename = "previousTotalXP")]
    pub previous_total_xp: u64,
    #[serde(rename = "totalXP")]
    pub total_xp: u64,
    #[serde(rename = "levelInfo")]
    pub level_info: LevelInfo,
    #[serde(rename = "leveledUp")]
    pub leveled_up: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct AwardsQuery {
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AwardsResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub awards: Vec<XpAward>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/users/:user_id/progress
///
/// Stored summary; learners without a row report zero XP.
pub async fn get_user_progress(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserProgressResponse>, ApiError> {
    validation::user_id(&user_id)?;

    let stored = db::fetch_progress(&state.db, &user_id).await?;
    Ok(Json(progress_response(user_id, stored.as_ref())))
}

/// POST /api/users/:user_id/award
///
/// Computes the reward, adds it to the stored total and reports level-up.
pub async fn award_xp(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ApiJson(req): ApiJson<RewardRequest>,
) -> Result<Json<AwardResponse>, ApiError> {
    validation::user_id(&user_id)?;
    let reward = reward_for(&req)?;
    let action = req.action.trim();

    let applied = db::apply_award(
        &state.db,
        &user_id,
        action,
        &reward,
        validation::MAX_TOTAL_XP,
    )
    .await?;

    info!(
        "Awarded {} XP to {} for {} (total {})",
        reward.total_xp, user_id, action, applied.total_xp
    );

    Ok(Json(AwardResponse {
        user_id,
        reward,
        previous_total_xp: applied.previous_total_xp,
        total_xp: applied.total_xp,
        level_info: get_level_info(applied.total_xp),
        leveled_up: applied.leveled_up,
    }))
}

/// POST /api/users/:user_id/skills
///
/// Merges the submitted scores into the stored snapshot.
pub async fn update_skills(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ApiJson(skills): ApiJson<SkillSnapshot>,
) -> Result<Json<UserProgressResponse>, ApiError> {
    validation::user_id(&user_id)?;
    validation::skills(&skills)?;

    let stored = db::save_skills(&state.db, &user_id, &skills).await?;
    Ok(Json(progress_response(user_id, Some(&stored))))
}

/// POST /api/users/:user_id/awards
///
/// Most recent ledger entries, newest first.
pub async fn list_awards(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ApiJson(query): ApiJson<AwardsQuery>,
) -> Result<Json<AwardsResponse>, ApiError> {
    validation::user_id(&user_id)?;
    let limit = validation::award_limit(query.limit)?;

    let awards = db::recent_awards(&state.db, &user_id, limit).await?;
    Ok(Json(AwardsResponse { user_id, awards }))
}

fn progress_response(user_id: String, stored: Option<&UserProgress>) -> UserProgressResponse {
    let (total_xp, skills, updated_at) = match stored {
        Some(row) => (row.total_xp(), row.skills(), Some(row.updated_at.clone())),
        None => (0, SkillSnapshot::default(), None),
    };

    UserProgressResponse {
        user_id,
        summary: progress_summary(total_xp, &skills),
        updated_at,
    }
}
