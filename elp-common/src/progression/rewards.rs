//! Reward calculation
//!
//! Base XP comes from a fixed action table (built once, read-only afterwards).
//! Contextual multipliers are an ordered list of [`MultiplierRule`]s matched
//! by substring against the action identifier; every matching rule applies,
//! in list order, to the multiplier produced by the previous one.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use super::XpReward;

/// Base XP for actions missing from the reward table
pub const DEFAULT_BASE_XP: u64 = 5;

/// Base XP per known action
static BASE_XP_REWARDS: Lazy<BTreeMap<&'static str, u64>> = Lazy::new(|| {
    [
        // Conversation
        ("send_message", 10),
        ("voice_message", 15),
        ("receive_feedback", 5),
        ("quick_response", 10),
        ("thoughtful_response", 15),
        ("complete_conversation", 50),
        ("long_conversation", 75),
        ("first_conversation", 100),
        // Consistency
        ("daily_streak", 15),
        ("weekly_streak", 50),
        ("monthly_streak", 100),
        // Language quality
        ("perfect_grammar", 20),
        ("grammar_improvement", 15),
        ("new_vocabulary", 10),
        ("vocabulary_mastery", 30),
        ("high_accuracy", 25),
        ("accuracy_improvement", 15),
        ("pronunciation_practice", 10),
        // Lessons
        ("complete_lesson", 40),
    ]
    .into_iter()
    .collect()
});

/// Base XP for `action`, if the action is in the reward table
pub fn base_xp_for(action: &str) -> Option<u64> {
    BASE_XP_REWARDS.get(action).copied()
}

/// Every known action with its base XP, sorted by action name
pub fn reward_table() -> impl Iterator<Item = (&'static str, u64)> {
    BASE_XP_REWARDS.iter().map(|(action, xp)| (*action, *xp))
}

/// Contextual multiplier adjustment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiplierRule {
    /// Short identifier for logs
    pub name: &'static str,
    /// Rule fires when the action contains any of these
    pub keywords: &'static [&'static str],
    /// Factor applied to the incoming multiplier
    pub factor: f64,
    /// Upper bound on the resulting multiplier
    pub cap: Option<f64>,
}

impl MultiplierRule {
    pub fn matches(&self, action: &str) -> bool {
        self.keywords.iter().any(|keyword| action.contains(keyword))
    }

    pub fn apply(&self, multiplier: f64) -> f64 {
        let scaled = multiplier * self.factor;
        match self.cap {
            Some(cap) => scaled.min(cap),
            None => scaled,
        }
    }
}

/// Multiplier rules in evaluation order
pub static MULTIPLIER_RULES: [MultiplierRule; 3] = [
    MultiplierRule {
        name: "streak",
        keywords: &["streak"],
        factor: 1.5,
        cap: None,
    },
    MultiplierRule {
        name: "engagement",
        keywords: &["conversation", "response"],
        factor: 1.2,
        cap: Some(2.0),
    },
    MultiplierRule {
        name: "language_quality",
        keywords: &["accuracy", "grammar", "vocabulary"],
        factor: 1.1,
        cap: Some(1.8),
    },
];

/// Rules that fire for `action`, in evaluation order
pub fn matching_rules(action: &str) -> impl Iterator<Item = &'static MultiplierRule> + '_ {
    MULTIPLIER_RULES.iter().filter(move |rule| rule.matches(action))
}

/// Apply every matching rule to `multiplier`
pub fn adjust_multiplier(action: &str, multiplier: f64) -> f64 {
    matching_rules(action).fold(multiplier, |m, rule| rule.apply(m))
}

/// Calculate the XP reward for a learner action
///
/// `custom_xp` overrides the table lookup; unknown actions fall back to
/// [`DEFAULT_BASE_XP`]. Contextual rules still apply to both.
///
/// # Examples
///
/// ```
/// use elp_common::progression::calculate_xp_reward;
///
/// let reward = calculate_xp_reward("daily_streak", 1.0, None);
/// assert_eq!(reward.base_xp, 15);
/// assert_eq!(reward.multiplier, 1.5);
/// assert_eq!(reward.total_xp, 23);
/// assert_eq!(reward.reason, "daily streak (+23 XP) x1.5");
/// ```
pub fn calculate_xp_reward(action: &str, multiplier: f64, custom_xp: Option<u64>) -> XpReward {
    let base_xp = custom_xp
        .or_else(|| base_xp_for(action))
        .unwrap_or(DEFAULT_BASE_XP);

    let multiplier = adjust_multiplier(action, multiplier);
    // f64::round rounds half away from zero
    let total_xp = (base_xp as f64 * multiplier).round().max(0.0) as u64;

    XpReward {
        total_xp,
        reason: format_reason(action, total_xp, multiplier),
        base_xp,
        multiplier,
    }
}

fn format_reason(action: &str, total_xp: u64, multiplier: f64) -> String {
    let mut reason = format!("{} (+{} XP)", action.replace('_', " "), total_xp);
    if multiplier != 1.0 {
        reason.push_str(&format!(" x{}", multiplier));
    }
    reason
}
