//! Calculation endpoints
//!
//! One endpoint per engine operation. Stateless: no database access, no
//! authentication. Bodies are validated, passed to the engine and the result
//! returned as JSON.

use axum::{
    routing::{get, post},
    Json, Router,
};
use elp_common::progression::{
    self, rewards, LevelInfo, ProgressSummary, SkillSnapshot, XpReward,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{validation, ApiError, ApiJson};
use crate::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LevelRequest {
    pub level: i64,
}

#[derive(Debug, Deserialize)]
pub struct TotalXpRequest {
    #[serde(rename = "totalXP")]
    pub total_xp: i64,
}

/// Total XP plus an optional explicit level (derived when omitted)
#[derive(Debug, Deserialize)]
pub struct TotalXpAtLevelRequest {
    #[serde(rename = "totalXP")]
    pub total_xp: i64,
    #[serde(default)]
    pub level: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RewardRequest {
    pub action: String,
    #[serde(default)]
    pub multiplier: Option<f64>,
    #[serde(default, rename = "customXP")]
    pub custom_xp: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct LevelUpRequest {
    #[serde(rename = "oldXP")]
    pub old_xp: i64,
    #[serde(rename = "newXP")]
    pub new_xp: i64,
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    #[serde(rename = "totalXP")]
    pub total_xp: i64,
    #[serde(default)]
    pub skills: SkillSnapshot,
}

#[derive(Debug, Serialize)]
pub struct XpForLevelResponse {
    pub level: u32,
    #[serde(rename = "xpForLevel")]
    pub xp_for_level: u64,
}

#[derive(Debug, Serialize)]
pub struct TotalXpForLevelResponse {
    pub level: u32,
    #[serde(rename = "totalXPForLevel")]
    pub total_xp_for_level: u64,
}

#[derive(Debug, Serialize)]
pub struct LevelResponse {
    #[serde(rename = "totalXP")]
    pub total_xp: u64,
    pub level: u32,
}

#[derive(Debug, Serialize)]
pub struct CurrentLevelXpResponse {
    #[serde(rename = "totalXP")]
    pub total_xp: u64,
    pub level: u32,
    #[serde(rename = "currentLevelXP")]
    pub current_level_xp: u64,
}

#[derive(Debug, Serialize)]
pub struct XpToNextLevelResponse {
    #[serde(rename = "totalXP")]
    pub total_xp: u64,
    pub level: u32,
    /// Remaining XP; negative when the supplied level is above the total
    #[serde(rename = "xpToNextLevel")]
    pub xp_to_next_level: i64,
}

#[derive(Debug, Serialize)]
pub struct LevelUpResponse {
    #[serde(rename = "oldLevel")]
    pub old_level: u32,
    #[serde(rename = "newLevel")]
    pub new_level: u32,
    #[serde(rename = "leveledUp")]
    pub leveled_up: bool,
}

#[derive(Debug, Serialize)]
pub struct AverageSkillResponse {
    #[serde(rename = "averageSkillLevel")]
    pub average_skill_level: u32,
}

#[derive(Debug, Serialize)]
pub struct ActionEntry {
    pub action: &'static str,
    #[serde(rename = "baseXP")]
    pub base_xp: u64,
}

#[derive(Debug, Serialize)]
pub struct ActionsResponse {
    pub actions: Vec<ActionEntry>,
    #[serde(rename = "defaultBaseXP")]
    pub default_base_xp: u64,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/progress/actions - base reward table
pub async fn list_actions() -> Json<ActionsResponse> {
    let actions = rewards::reward_table()
        .map(|(action, base_xp)| ActionEntry { action, base_xp })
        .collect();

    Json(ActionsResponse {
        actions,
        default_base_xp: rewards::DEFAULT_BASE_XP,
    })
}

/// POST /api/progress/xp-for-level
pub async fn xp_for_level(
    ApiJson(req): ApiJson<LevelRequest>,
) -> Result<Json<XpForLevelResponse>, ApiError> {
    let level = validation::level("level", req.level)?;

    Ok(Json(XpForLevelResponse {
        level,
        xp_for_level: progression::xp_for_level(level),
    }))
}

/// POST /api/progress/total-xp-for-level
pub async fn total_xp_for_level(
    ApiJson(req): ApiJson<LevelRequest>,
) -> Result<Json<TotalXpForLevelResponse>, ApiError> {
    let level = validation::level("level", req.level)?;

    Ok(Json(TotalXpForLevelResponse {
        level,
        total_xp_for_level: progression::total_xp_for_level(level),
    }))
}

/// POST /api/progress/level
pub async fn level_from_xp(
    ApiJson(req): ApiJson<TotalXpRequest>,
) -> Result<Json<LevelResponse>, ApiError> {
    let total_xp = validation::xp_value("totalXP", req.total_xp)?;

    Ok(Json(LevelResponse {
        total_xp,
        level: progression::level_from_xp(total_xp),
    }))
}

/// POST /api/progress/current-level-xp
pub async fn current_level_xp(
    ApiJson(req): ApiJson<TotalXpAtLevelRequest>,
) -> Result<Json<CurrentLevelXpResponse>, ApiError> {
    let (total_xp, level) = total_xp_at_level(&req)?;

    Ok(Json(CurrentLevelXpResponse {
        total_xp,
        level,
        current_level_xp: progression::current_level_xp(total_xp, level),
    }))
}

/// POST /api/progress/xp-to-next-level
pub async fn xp_to_next_level(
    ApiJson(req): ApiJson<TotalXpAtLevelRequest>,
) -> Result<Json<XpToNextLevelResponse>, ApiError> {
    let (total_xp, level) = total_xp_at_level(&req)?;

    Ok(Json(XpToNextLevelResponse {
        total_xp,
        level,
        xp_to_next_level: progression::xp_to_next_level(total_xp, level),
    }))
}

/// POST /api/progress/level-info
pub async fn level_info(
    ApiJson(req): ApiJson<TotalXpRequest>,
) -> Result<Json<LevelInfo>, ApiError> {
    let total_xp = validation::xp_value("totalXP", req.total_xp)?;
    Ok(Json(progression::get_level_info(total_xp)))
}

/// POST /api/progress/reward
pub async fn calculate_reward(
    ApiJson(req): ApiJson<RewardRequest>,
) -> Result<Json<XpReward>, ApiError> {
    let reward = reward_for(&req)?;
    debug!("Calculated reward: {}", reward.reason);
    Ok(Json(reward))
}

/// POST /api/progress/check-level-up
pub async fn check_level_up(
    ApiJson(req): ApiJson<LevelUpRequest>,
) -> Result<Json<LevelUpResponse>, ApiError> {
    let old_xp = validation::xp_value("oldXP", req.old_xp)?;
    let new_xp = validation::xp_value("newXP", req.new_xp)?;

    Ok(Json(LevelUpResponse {
        old_level: progression::level_from_xp(old_xp),
        new_level: progression::level_from_xp(new_xp),
        leveled_up: progression::check_level_up(old_xp, new_xp),
    }))
}

/// POST /api/progress/average-skill
pub async fn average_skill(
    ApiJson(skills): ApiJson<SkillSnapshot>,
) -> Result<Json<AverageSkillResponse>, ApiError> {
    validation::skills(&skills)?;

    Ok(Json(AverageSkillResponse {
        average_skill_level: progression::average_skill_level(&skills),
    }))
}

/// POST /api/progress/summary
pub async fn summary(
    ApiJson(req): ApiJson<SummaryRequest>,
) -> Result<Json<ProgressSummary>, ApiError> {
    let total_xp = validation::xp_value("totalXP", req.total_xp)?;
    validation::skills(&req.skills)?;

    Ok(Json(progression::progress_summary(total_xp, &req.skills)))
}

/// Validate a reward request and run the engine on it
pub fn reward_for(req: &RewardRequest) -> Result<XpReward, ApiError> {
    let action = validation::action(&req.action)?;
    let multiplier = validation::multiplier(req.multiplier)?;
    let custom_xp = validation::custom_xp(req.custom_xp)?;

    let reward = progression::calculate_xp_reward(action, multiplier, custom_xp);
    if reward.total_xp > validation::MAX_TOTAL_XP {
        return Err(ApiError::BadRequest(format!(
            "reward of {} XP exceeds the maximum of {}",
            reward.total_xp,
            validation::MAX_TOTAL_XP
        )));
    }
    Ok(reward)
}

fn total_xp_at_level(req: &TotalXpAtLevelRequest) -> Result<(u64, u32), ApiError> {
    let total_xp = validation::xp_value("totalXP", req.total_xp)?;
    let level = match req.level {
        Some(level) => validation::level("level", level)?,
        None => progression::level_from_xp(total_xp),
    };
    Ok((total_xp, level))
}

/// Build calculation routes
pub fn calculation_routes() -> Router<AppState> {
    Router::new()
        .route("/api/progress/actions", get(list_actions))
        .route("/api/progress/xp-for-level", post(xp_for_level))
        .route("/api/progress/total-xp-for-level", post(total_xp_for_level))
        .route("/api/progress/level", post(level_from_xp))
        .route("/api/progress/current-level-xp", post(current_level_xp))
        .route("/api/progress/xp-to-next-level", post(xp_to_next_level))
        .route("/api/progress/level-info", post(level_info))
        .route("/api/progress/reward", post(calculate_reward))
        .route("/api/progress/check-level-up", post(check_level_up))
        .route("/api/progress/average-skill", post(average_skill))
        .route("/api/progress/summary", post(summary))
}
