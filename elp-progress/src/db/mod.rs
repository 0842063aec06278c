//! Persistence of learner progress
//!
//! The engine never touches storage; this layer owns stored XP totals, skill
//! snapshots and the award ledger.
//!
//! Awards run inside one transaction whose first statement is a write, so the
//! SQLite write lock is held before the stored total is read. Concurrent
//! awards for the same learner serialize on that lock instead of losing
//! updates.

use chrono::Utc;
use elp_common::db::{UserProgress, XpAward};
use elp_common::progression::{check_level_up, SkillSnapshot, XpReward};
use elp_common::Result;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

/// Outcome of applying one reward to a stored total
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedAward {
    pub previous_total_xp: u64,
    pub total_xp: u64,
    pub leveled_up: bool,
}

/// Load stored progress for `user_id`
pub async fn fetch_progress(db: &SqlitePool, user_id: &str) -> Result<Option<UserProgress>> {
    let progress = sqlx::query_as::<_, UserProgress>(
        "SELECT user_id, total_xp, accuracy, vocabulary, grammar, pronunciation, fluency,
                created_at, updated_at
         FROM user_progress WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(progress)
}

/// Add `reward` to the stored total and append a ledger entry
///
/// Unknown learners start from 0. The new total saturates at `max_total_xp`;
/// a stored total already above the cap is kept and the award adds nothing.
pub async fn apply_award(
    db: &SqlitePool,
    user_id: &str,
    action: &str,
    reward: &XpReward,
    max_total_xp: u64,
) -> Result<AppliedAward> {
    let now = Utc::now().to_rfc3339();
    let mut tx = db.begin().await?;

    // Write first: takes the database write lock before the read below
    sqlx::query(
        "INSERT OR IGNORE INTO user_progress (user_id, total_xp, created_at, updated_at)
         VALUES (?, 0, ?, ?)",
    )
    .bind(user_id)
    .bind(&now)
    .bind(&now)
    .execute(&mut *tx)
    .await?;

    let stored: i64 = sqlx::query_scalar("SELECT total_xp FROM user_progress WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

    let previous_total_xp = u64::try_from(stored).unwrap_or(0);
    // The cap never lowers a total that is already above it
    let total_xp = previous_total_xp
        .saturating_add(reward.total_xp)
        .min(max_total_xp.max(previous_total_xp));
    let leveled_up = check_level_up(previous_total_xp, total_xp);

    sqlx::query("UPDATE user_progress SET total_xp = ?, updated_at = ? WHERE user_id = ?")
        .bind(to_db_xp(total_xp))
        .bind(&now)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        "INSERT INTO xp_awards
            (guid, user_id, action, base_xp, multiplier, awarded_xp, total_xp_after,
             leveled_up, reason, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(action)
    .bind(to_db_xp(reward.base_xp))
    .bind(reward.multiplier)
    .bind(to_db_xp(total_xp.saturating_sub(previous_total_xp)))
    .bind(to_db_xp(total_xp))
    .bind(leveled_up)
    .bind(&reward.reason)
    .bind(&now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    if leveled_up {
        info!("User {} leveled up at {} XP", user_id, total_xp);
    } else {
        debug!("User {} now at {} XP", user_id, total_xp);
    }

    Ok(AppliedAward {
        previous_total_xp,
        total_xp,
        leveled_up,
    })
}

/// Merge `update` into the stored skill snapshot and return the stored row
pub async fn save_skills(
    db: &SqlitePool,
    user_id: &str,
    update: &SkillSnapshot,
) -> Result<UserProgress> {
    let now = Utc::now().to_rfc3339();

    // COALESCE keeps stored scores for skills absent from the update
    sqlx::query(
        "INSERT INTO user_progress
            (user_id, total_xp, accuracy, vocabulary, grammar, pronunciation, fluency,
             created_at, updated_at)
         VALUES (?, 0, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(user_id) DO UPDATE SET
            accuracy = COALESCE(excluded.accuracy, accuracy),
            vocabulary = COALESCE(excluded.vocabulary, vocabulary),
            grammar = COALESCE(excluded.grammar, grammar),
            pronunciation = COALESCE(excluded.pronunciation, pronunciation),
            fluency = COALESCE(excluded.fluency, fluency),
            updated_at = excluded.updated_at",
    )
    .bind(user_id)
    .bind(update.accuracy)
    .bind(update.vocabulary)
    .bind(update.grammar)
    .bind(update.pronunciation)
    .bind(update.fluency)
    .bind(&now)
    .bind(&now)
    .execute(db)
    .await?;

    fetch_progress(db, user_id)
        .await?
        .ok_or_else(|| elp_common::Error::Internal(format!("progress row for {} vanished", user_id)))
}

/// Most recent ledger entries for `user_id`, newest first
pub async fn recent_awards(db: &SqlitePool, user_id: &str, limit: i64) -> Result<Vec<XpAward>> {
    let awards = sqlx::query_as::<_, XpAward>(
        "SELECT guid, user_id, action, base_xp, multiplier, awarded_xp, total_xp_after,
                leveled_up, reason, created_at
         FROM xp_awards WHERE user_id = ?
         ORDER BY seq DESC
         LIMIT ?",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(db)
    .await?;

    Ok(awards)
}

/// XP values are capped well below i64::MAX before they reach storage
fn to_db_xp(xp: u64) -> i64 {
    i64::try_from(xp).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use elp_common::db::init::init_database;
    use elp_common::progression::calculate_xp_reward;

    async fn test_db() -> (tempfile::TempDir, SqlitePool) {
        let dir = tempfile::tempdir().unwrap();
        let pool = init_database(&dir.path().join("elp.db")).await.unwrap();
        (dir, pool)
    }

    #[tokio::test]
    async fn test_unknown_user_has_no_row() {
        let (_dir, db) = test_db().await;
        assert!(fetch_progress(&db, "nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_apply_award_accumulates() {
        let (_dir, db) = test_db().await;
        let reward = calculate_xp_reward("complete_lesson", 1.0, Some(300));

        let first = apply_award(&db, "u1", "complete_lesson", &reward, u64::MAX).await.unwrap();
        assert_eq!(first.previous_total_xp, 0);
        assert_eq!(first.total_xp, 300);
        assert!(!first.leveled_up);

        let second = apply_award(&db, "u1", "complete_lesson", &reward, u64::MAX).await.unwrap();
        assert_eq!(second.previous_total_xp, 300);
        assert_eq!(second.total_xp, 600);
        assert!(second.leveled_up);

        let stored = fetch_progress(&db, "u1").await.unwrap().unwrap();
        assert_eq!(stored.total_xp(), 600);
    }

    #[tokio::test]
    async fn test_apply_award_saturates() {
        let (_dir, db) = test_db().await;
        let reward = calculate_xp_reward("send_message", 1.0, Some(80));

        let applied = apply_award(&db, "u1", "send_message", &reward, 50).await.unwrap();
        assert_eq!(applied.total_xp, 50);

        let awards = recent_awards(&db, "u1", 10).await.unwrap();
        assert_eq!(awards[0].awarded_xp, 50);
    }

    #[tokio::test]
    async fn test_apply_award_keeps_total_above_cap() {
        let (_dir, db) = test_db().await;
        let reward = calculate_xp_reward("send_message", 1.0, Some(80));

        apply_award(&db, "u1", "send_message", &reward, 1000).await.unwrap();
        let applied = apply_award(&db, "u1", "send_message", &reward, 50).await.unwrap();
        assert_eq!(applied.previous_total_xp, 80);
        assert_eq!(applied.total_xp, 80);
        assert!(!applied.leveled_up);

        let awards = recent_awards(&db, "u1", 1).await.unwrap();
        assert_eq!(awards[0].awarded_xp, 0);
        assert_eq!(awards[0].total_xp_after, 80);
    }

    #[tokio::test]
    async fn test_ledger_newest_first() {
        let (_dir, db) = test_db().await;
        for action in ["send_message", "daily_streak", "perfect_grammar"] {
            let reward = calculate_xp_reward(action, 1.0, None);
            apply_award(&db, "u1", action, &reward, u64::MAX).await.unwrap();
        }

        let awards = recent_awards(&db, "u1", 2).await.unwrap();
        assert_eq!(awards.len(), 2);
        assert_eq!(awards[0].action, "perfect_grammar");
        assert_eq!(awards[1].action, "daily_streak");
        assert_eq!(awards[0].total_xp_after, 10 + 23 + 22);
    }

    #[tokio::test]
    async fn test_save_skills_merges() {
        let (_dir, db) = test_db().await;

        let first = SkillSnapshot {
            accuracy: Some(80.0),
            grammar: Some(50.0),
            ..Default::default()
        };
        save_skills(&db, "u1", &first).await.unwrap();

        let second = SkillSnapshot {
            grammar: Some(70.0),
            ..Default::default()
        };
        let stored = save_skills(&db, "u1", &second).await.unwrap();

        let skills = stored.skills();
        assert_eq!(skills.accuracy, Some(80.0));
        assert_eq!(skills.grammar, Some(70.0));
        assert_eq!(stored.total_xp(), 0);
    }
}
