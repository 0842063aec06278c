//! Boundary validation
//!
//! The engine assumes non-negative, finite inputs. Everything arriving over
//! HTTP passes through these checks first; failures become `400 Bad Request`.

use elp_common::progression::SkillSnapshot;

use super::ApiError;

/// Largest accepted XP value (2^53 - 1, exact in every JSON client)
pub const MAX_TOTAL_XP: u64 = 9_007_199_254_740_991;

/// Largest accepted caller multiplier
pub const MAX_MULTIPLIER: f64 = 100.0;

/// Longest accepted action identifier
pub const MAX_ACTION_LEN: usize = 100;

/// Longest accepted user identifier
pub const MAX_USER_ID_LEN: usize = 128;

/// Default and maximum page size for ledger listings
pub const DEFAULT_AWARD_LIMIT: i64 = 20;
pub const MAX_AWARD_LIMIT: i64 = 100;

pub fn xp_value(field: &str, value: i64) -> Result<u64, ApiError> {
    let xp = u64::try_from(value)
        .map_err(|_| ApiError::BadRequest(format!("{} must be non-negative", field)))?;
    if xp > MAX_TOTAL_XP {
        return Err(ApiError::BadRequest(format!(
            "{} must not exceed {}",
            field, MAX_TOTAL_XP
        )));
    }
    Ok(xp)
}

pub fn level(field: &str, value: i64) -> Result<u32, ApiError> {
    if value < 1 {
        return Err(ApiError::BadRequest(format!("{} must be at least 1", field)));
    }
    u32::try_from(value).map_err(|_| ApiError::BadRequest(format!("{} is out of range", field)))
}

/// Caller multiplier, defaulting to 1.0
pub fn multiplier(value: Option<f64>) -> Result<f64, ApiError> {
    let m = value.unwrap_or(1.0);
    if !m.is_finite() || m < 0.0 {
        return Err(ApiError::BadRequest(
            "multiplier must be a finite, non-negative number".to_string(),
        ));
    }
    if m > MAX_MULTIPLIER {
        return Err(ApiError::BadRequest(format!(
            "multiplier must not exceed {}",
            MAX_MULTIPLIER
        )));
    }
    Ok(m)
}

pub fn custom_xp(value: Option<i64>) -> Result<Option<u64>, ApiError> {
    value.map(|v| xp_value("customXP", v)).transpose()
}

/// Trimmed, non-empty action identifier
pub fn action(value: &str) -> Result<&str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::BadRequest("action must not be empty".to_string()));
    }
    if trimmed.len() > MAX_ACTION_LEN {
        return Err(ApiError::BadRequest(format!(
            "action must be at most {} characters",
            MAX_ACTION_LEN
        )));
    }
    Ok(trimmed)
}

/// Every present score must be finite and within 0-100
pub fn skills(snapshot: &SkillSnapshot) -> Result<(), ApiError> {
    for (name, score) in snapshot.entries() {
        if let Some(score) = score {
            if !score.is_finite() || !(0.0..=100.0).contains(&score) {
                return Err(ApiError::BadRequest(format!(
                    "{} must be between 0 and 100",
                    name
                )));
            }
        }
    }
    Ok(())
}

/// Letters, digits, `-`, `_` and `.` only
pub fn user_id(value: &str) -> Result<(), ApiError> {
    let valid = !value.is_empty()
        && value.len() <= MAX_USER_ID_LEN
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if !valid {
        return Err(ApiError::BadRequest(format!("invalid user id: {:?}", value)));
    }
    Ok(())
}

pub fn award_limit(value: Option<i64>) -> Result<i64, ApiError> {
    match value {
        None => Ok(DEFAULT_AWARD_LIMIT),
        Some(limit) if (1..=MAX_AWARD_LIMIT).contains(&limit) => Ok(limit),
        Some(_) => Err(ApiError::BadRequest(format!(
            "limit must be between 1 and {}",
            MAX_AWARD_LIMIT
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xp_value() {
        assert_eq!(xp_value("totalXP", 0).unwrap(), 0);
        assert_eq!(xp_value("totalXP", 1500).unwrap(), 1500);
        assert!(xp_value("totalXP", -1).is_err());
        assert!(xp_value("totalXP", i64::MAX).is_err());
    }

    #[test]
    fn test_level() {
        assert_eq!(level("level", 1).unwrap(), 1);
        assert!(level("level", 0).is_err());
        assert!(level("level", -3).is_err());
        assert!(level("level", i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn test_multiplier() {
        assert_eq!(multiplier(None).unwrap(), 1.0);
        assert_eq!(multiplier(Some(0.0)).unwrap(), 0.0);
        assert!(multiplier(Some(-0.5)).is_err());
        assert!(multiplier(Some(f64::NAN)).is_err());
        assert!(multiplier(Some(f64::INFINITY)).is_err());
        assert_eq!(multiplier(Some(MAX_MULTIPLIER)).unwrap(), MAX_MULTIPLIER);
        assert!(multiplier(Some(1e300)).is_err());
    }

    #[test]
    fn test_action() {
        assert_eq!(action("  send_message ").unwrap(), "send_message");
        assert!(action("   ").is_err());
        assert!(action(&"x".repeat(MAX_ACTION_LEN + 1)).is_err());
    }

    #[test]
    fn test_skills() {
        let ok = SkillSnapshot {
            accuracy: Some(0.0),
            fluency: Some(100.0),
            ..Default::default()
        };
        assert!(skills(&ok).is_ok());

        let bad = SkillSnapshot {
            grammar: Some(101.0),
            ..Default::default()
        };
        let err = skills(&bad).unwrap_err();
        assert!(err.to_string().contains("grammar"));
    }

    #[test]
    fn test_user_id() {
        assert!(user_id("learner-42").is_ok());
        assert!(user_id("a.b_c").is_ok());
        assert!(user_id("").is_err());
        assert!(user_id("has space").is_err());
        assert!(user_id(&"u".repeat(MAX_USER_ID_LEN + 1)).is_err());
    }

    #[test]
    fn test_award_limit() {
        assert_eq!(award_limit(None).unwrap(), DEFAULT_AWARD_LIMIT);
        assert_eq!(award_limit(Some(5)).unwrap(), 5);
        assert!(award_limit(Some(0)).is_err());
        assert!(award_limit(Some(MAX_AWARD_LIMIT + 1)).is_err());
    }
}
