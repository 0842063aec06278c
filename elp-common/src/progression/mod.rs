//! Progression engine
//!
//! Pure, stateless XP and leveling calculations shared by every service that
//! awards or displays learner progress.
//!
//! # Architecture
//!
//! - [`curve`]: level curve and XP/level conversions
//! - [`rewards`]: base reward table and contextual multiplier rules
//! - [`skills`]: skill averaging and the display-ready progress summary
//!
//! Nothing in this module performs I/O or keeps state between calls. Callers
//! own storage of XP totals and validate inputs (non-negative, finite) before
//! calling in.

pub mod curve;
pub mod rewards;
pub mod skills;

use serde::{Deserialize, Serialize};

pub use curve::{
    check_level_up, current_level_xp, get_level_info, level_from_xp, total_xp_for_level,
    xp_for_level, xp_to_next_level,
};
pub use rewards::{calculate_xp_reward, MultiplierRule, DEFAULT_BASE_XP, MULTIPLIER_RULES};
pub use skills::{average_skill_level, progress_summary, SkillSnapshot};

/// Level information derived from a total-XP value
///
/// Never stored; recomputed on demand by [`get_level_info`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    /// Current level (>= 1)
    pub level: u32,

    /// XP earned inside the current level
    #[serde(rename = "currentXP")]
    pub current_xp: u64,

    /// Size of the bucket between the current level and the next one
    ///
    /// This is the progress-bar denominator, not the remaining amount
    /// (see [`xp_to_next_level`] for that).
    #[serde(rename = "xpToNextLevel")]
    pub xp_to_next_level: u64,

    /// `current_xp / xp_to_next_level` as a rounded percentage (0-100)
    #[serde(rename = "progressPercentage")]
    pub progress_percentage: u8,
}

/// XP reward produced for a single learner action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XpReward {
    /// Final awarded XP after multipliers
    #[serde(rename = "totalXP")]
    pub total_xp: u64,

    /// Human-readable description, e.g. `daily streak (+23 XP) x1.5`
    pub reason: String,

    /// Base XP before multipliers
    #[serde(rename = "baseXP")]
    pub base_xp: u64,

    /// Final multiplier after contextual adjustments
    pub multiplier: f64,
}

/// Display-ready progress record
///
/// Pure field composition of [`LevelInfo`] and [`average_skill_level`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    #[serde(flatten)]
    pub level_info: LevelInfo,

    #[serde(rename = "totalXP")]
    pub total_xp: u64,

    #[serde(rename = "averageSkillLevel")]
    pub average_skill_level: u32,

    pub skills: SkillSnapshot,
}
