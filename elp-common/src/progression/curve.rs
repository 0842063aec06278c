//! Level curve and XP/level conversions
//!
//! Level `L` (for `L >= 2`) costs `floor(500 * 1.1^(L-2))` XP on top of the
//! previous level. Level 1 is the floor and costs nothing.
//!
//! | Level | Bucket | Cumulative |
//! |-------|--------|------------|
//! | 1     | 0      | 0          |
//! | 2     | 500    | 500        |
//! | 3     | 550    | 1050       |
//! | 4     | 605    | 1655       |
//! | 5     | 665    | 2320       |
//!
//! All values saturate at `u64::MAX` instead of overflowing.

use super::LevelInfo;

/// XP needed to go from level 1 to level 2
pub const BASE_LEVEL_XP: f64 = 500.0;

/// Geometric growth of the per-level bucket
pub const LEVEL_GROWTH: f64 = 1.1;

/// XP required to go from level `level - 1` to `level`
///
/// # Examples
///
/// ```
/// use elp_common::progression::xp_for_level;
///
/// assert_eq!(xp_for_level(1), 0);
/// assert_eq!(xp_for_level(2), 500);
/// assert_eq!(xp_for_level(3), 550);
/// ```
pub fn xp_for_level(level: u32) -> u64 {
    if level <= 1 {
        return 0;
    }

    let raw = BASE_LEVEL_XP * LEVEL_GROWTH.powf(f64::from(level - 2));
    // `as` saturates for values beyond u64::MAX
    raw.floor() as u64
}

/// Total XP needed to have reached `level`
///
/// Running sum of the buckets of levels `2..=level`, so that
/// `total_xp_for_level(L + 1) - total_xp_for_level(L) == xp_for_level(L + 1)`.
pub fn total_xp_for_level(level: u32) -> u64 {
    let mut total: u64 = 0;
    for l in 2..=level {
        total = total.saturating_add(xp_for_level(l));
        if total == u64::MAX {
            break;
        }
    }
    total
}

/// Highest level whose cumulative threshold is `<= total_xp`
///
/// Walks the curve one level at a time, carrying the running threshold of the
/// next candidate level.
///
/// # Examples
///
/// ```
/// use elp_common::progression::level_from_xp;
///
/// assert_eq!(level_from_xp(0), 1);
/// assert_eq!(level_from_xp(499), 1);
/// assert_eq!(level_from_xp(500), 2);
/// assert_eq!(level_from_xp(1050), 3);
/// ```
pub fn level_from_xp(total_xp: u64) -> u32 {
    let mut level: u32 = 1;
    let mut next_threshold = xp_for_level(2);

    while next_threshold <= total_xp {
        if next_threshold == u64::MAX || level == u32::MAX {
            break;
        }
        level += 1;
        next_threshold = next_threshold.saturating_add(xp_for_level(level.saturating_add(1)));
    }

    level
}

/// XP earned inside `level`
///
/// Saturates at 0 when `level` sits above `total_xp`.
pub fn current_level_xp(total_xp: u64, level: u32) -> u64 {
    total_xp.saturating_sub(total_xp_for_level(level))
}

/// Remaining XP from `total_xp` to the start of `level + 1`
///
/// Negative only when `level` was not derived from `total_xp`, which callers
/// must treat as a contract violation.
pub fn xp_to_next_level(total_xp: u64, level: u32) -> i64 {
    let next = i128::from(total_xp_for_level(level.saturating_add(1)));
    let remaining = next - i128::from(total_xp);
    remaining.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

/// Level, in-level XP, bucket size and progress for a total-XP value
///
/// # Examples
///
/// ```
/// use elp_common::progression::get_level_info;
///
/// let info = get_level_info(750);
/// assert_eq!(info.level, 2);
/// assert_eq!(info.current_xp, 250);
/// assert_eq!(info.xp_to_next_level, 550);
/// assert_eq!(info.progress_percentage, 45);
/// ```
pub fn get_level_info(total_xp: u64) -> LevelInfo {
    let level = level_from_xp(total_xp);
    let current_xp = current_level_xp(total_xp, level);
    let bucket = xp_for_level(level.saturating_add(1));

    LevelInfo {
        level,
        current_xp,
        xp_to_next_level: bucket,
        progress_percentage: progress_percentage(current_xp, bucket),
    }
}

/// True when `new_xp` lands on a higher level than `old_xp`
pub fn check_level_up(old_xp: u64, new_xp: u64) -> bool {
    level_from_xp(new_xp) > level_from_xp(old_xp)
}

fn progress_percentage(current_xp: u64, bucket: u64) -> u8 {
    if bucket == 0 {
        return 0;
    }

    let pct = (current_xp as f64 / bucket as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xp_for_level_curve() {
        assert_eq!(xp_for_level(0), 0);
        assert_eq!(xp_for_level(1), 0);
        assert_eq!(xp_for_level(2), 500);
        assert_eq!(xp_for_level(3), 550);
        assert_eq!(xp_for_level(4), 605);
        assert_eq!(xp_for_level(5), 665);
        assert_eq!(xp_for_level(6), 732);
    }

    #[test]
    fn test_xp_for_level_saturates() {
        assert_eq!(xp_for_level(u32::MAX), u64::MAX);
    }

    #[test]
    fn test_total_xp_for_level() {
        assert_eq!(total_xp_for_level(1), 0);
        assert_eq!(total_xp_for_level(2), 500);
        assert_eq!(total_xp_for_level(3), 1050);
        assert_eq!(total_xp_for_level(4), 1655);
        assert_eq!(total_xp_for_level(5), 2320);
    }

    #[test]
    fn test_total_xp_for_huge_level_terminates() {
        assert_eq!(total_xp_for_level(u32::MAX), u64::MAX);
    }

    #[test]
    fn test_level_from_xp_boundaries() {
        assert_eq!(level_from_xp(0), 1);
        assert_eq!(level_from_xp(499), 1);
        assert_eq!(level_from_xp(500), 2);
        assert_eq!(level_from_xp(1049), 2);
        assert_eq!(level_from_xp(1050), 3);
        assert_eq!(level_from_xp(2319), 4);
        assert_eq!(level_from_xp(2320), 5);
    }

    #[test]
    fn test_level_from_max_xp_terminates() {
        let level = level_from_xp(u64::MAX);
        assert!(level > 1);
    }

    #[test]
    fn test_current_level_xp() {
        assert_eq!(current_level_xp(750, 2), 250);
        assert_eq!(current_level_xp(0, 1), 0);
        // Level above the total saturates
        assert_eq!(current_level_xp(100, 3), 0);
    }

    #[test]
    fn test_xp_to_next_level_remaining() {
        assert_eq!(xp_to_next_level(750, 2), 300);
        assert_eq!(xp_to_next_level(0, 1), 500);
        assert_eq!(xp_to_next_level(500, 2), 550);
    }

    #[test]
    fn test_xp_to_next_level_negative_on_wrong_level() {
        assert_eq!(xp_to_next_level(2000, 1), -1500);
    }

    #[test]
    fn test_level_info_bucket_differs_from_remaining() {
        let info = get_level_info(750);
        assert_eq!(info.xp_to_next_level, 550);
        assert_eq!(xp_to_next_level(750, info.level), 300);
    }

    #[test]
    fn test_level_info_at_zero() {
        let info = get_level_info(0);
        assert_eq!(
            info,
            LevelInfo {
                level: 1,
                current_xp: 0,
                xp_to_next_level: 500,
                progress_percentage: 0,
            }
        );
    }

    #[test]
    fn test_level_info_progress_rounding() {
        // 499 / 500 = 99.8% rounds to 100
        assert_eq!(get_level_info(499).progress_percentage, 100);
        // 250 / 500 = 50%
        assert_eq!(get_level_info(250).progress_percentage, 50);
    }

    #[test]
    fn test_progress_percentage_zero_bucket() {
        assert_eq!(progress_percentage(10, 0), 0);
    }

    #[test]
    fn test_check_level_up() {
        assert!(check_level_up(490, 510));
        assert!(check_level_up(0, 5000));
        assert!(!check_level_up(510, 600));
        assert!(!check_level_up(700, 700));
        // XP loss never counts as a level up
        assert!(!check_level_up(1100, 400));
    }
}
