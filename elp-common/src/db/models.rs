//! Database models

use serde::{Deserialize, Serialize};

use crate::progression::SkillSnapshot;

/// Stored progress for one learner
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProgress {
    pub user_id: String,
    pub total_xp: i64,
    pub accuracy: Option<f64>,
    pub vocabulary: Option<f64>,
    pub grammar: Option<f64>,
    pub pronunciation: Option<f64>,
    pub fluency: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

impl UserProgress {
    /// Stored total as an engine value; the column is constrained to >= 0
    pub fn total_xp(&self) -> u64 {
        u64::try_from(self.total_xp).unwrap_or(0)
    }

    pub fn skills(&self) -> SkillSnapshot {
        SkillSnapshot {
            accuracy: self.accuracy,
            vocabulary: self.vocabulary,
            grammar: self.grammar,
            pronunciation: self.pronunciation,
            fluency: self.fluency,
        }
    }
}

/// One entry of the append-only award ledger
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct XpAward {
    pub guid: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub action: String,
    #[serde(rename = "baseXP")]
    pub base_xp: i64,
    pub multiplier: f64,
    #[serde(rename = "awardedXP")]
    pub awarded_xp: i64,
    #[serde(rename = "totalXPAfter")]
    pub total_xp_after: i64,
    #[serde(rename = "leveledUp")]
    pub leveled_up: bool,
    pub reason: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}
