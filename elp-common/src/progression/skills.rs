//! Skill averaging and progress summaries

use serde::{Deserialize, Serialize};

use super::{get_level_info, ProgressSummary};

/// Per-skill scores (0-100); every skill is optional
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grammar: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fluency: Option<f64>,
}

impl SkillSnapshot {
    /// Skill names paired with their scores, in a fixed order
    pub fn entries(&self) -> [(&'static str, Option<f64>); 5] {
        [
            ("accuracy", self.accuracy),
            ("vocabulary", self.vocabulary),
            ("grammar", self.grammar),
            ("pronunciation", self.pronunciation),
            ("fluency", self.fluency),
        ]
    }

    /// Scores that are present
    pub fn values(&self) -> impl Iterator<Item = f64> {
        self.entries().into_iter().filter_map(|(_, score)| score)
    }

    pub fn is_empty(&self) -> bool {
        self.values().next().is_none()
    }

    /// Overlay the scores present in `update` onto this snapshot
    pub fn merge(&self, update: &SkillSnapshot) -> SkillSnapshot {
        SkillSnapshot {
            accuracy: update.accuracy.or(self.accuracy),
            vocabulary: update.vocabulary.or(self.vocabulary),
            grammar: update.grammar.or(self.grammar),
            pronunciation: update.pronunciation.or(self.pronunciation),
            fluency: update.fluency.or(self.fluency),
        }
    }
}

/// Mean of the present skill scores, rounded; 0 for an empty snapshot
///
/// # Examples
///
/// ```
/// use elp_common::progression::{average_skill_level, SkillSnapshot};
///
/// assert_eq!(average_skill_level(&SkillSnapshot::default()), 0);
///
/// let skills = SkillSnapshot {
///     accuracy: Some(80.0),
///     grammar: Some(60.0),
///     ..Default::default()
/// };
/// assert_eq!(average_skill_level(&skills), 70);
/// ```
pub fn average_skill_level(skills: &SkillSnapshot) -> u32 {
    let (sum, count) = skills
        .values()
        .fold((0.0_f64, 0_u32), |(sum, count), score| (sum + score, count + 1));

    if count == 0 {
        return 0;
    }

    (sum / f64::from(count)).round().max(0.0) as u32
}

/// Display-ready record for a total-XP value and skill snapshot
pub fn progress_summary(total_xp: u64, skills: &SkillSnapshot) -> ProgressSummary {
    ProgressSummary {
        level_info: get_level_info(total_xp),
        total_xp,
        average_skill_level: average_skill_level(skills),
        skills: *skills,
    }
}
