use crate::schema::challenge_progress;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Number of tasks a category is measured against when computing
/// percentage-complete.
pub const TOTAL_TASKS: i64 = 50;

#[derive(Insertable, Debug)]
#[diesel(table_name = challenge_progress)]
pub struct NewChallengeProgress {
    pub user_id: i64,
    pub challenge_id: i64,
    pub completed: bool,
    pub completed_at: DateTime<Utc>,
    pub attempts: i32,
    pub last_attempt: DateTime<Utc>,
}

/// Derived per-category progress view. Never persisted; recomputed on
/// every read from the completed progress rows.
#[derive(Deserialize, Serialize, Debug)]
pub struct CategoryProgressSummary {
    pub percentage: i32,
    pub level: i32,
    pub current_difficulty: String,
    pub completed_tasks: i64,
    pub total_tasks: i64,
    pub last_completed: String,
}

impl CategoryProgressSummary {
    /// Builds the summary from the number of completed challenges in the
    /// category and the title of the most recently completed one.
    pub fn from_completed(completed_tasks: i64, last_completed: Option<String>) -> Self {
        let level = progress_level(completed_tasks);

        CategoryProgressSummary {
            percentage: progress_percentage(completed_tasks),
            level,
            current_difficulty: tier_for_level(level).to_string(),
            completed_tasks,
            total_tasks: TOTAL_TASKS,
            last_completed: last_completed.unwrap_or_else(|| "None".to_string()),
        }
    }
}

pub fn progress_percentage(completed_tasks: i64) -> i32 {
    ((completed_tasks as f64 / TOTAL_TASKS as f64) * 100.0).round() as i32
}

/// One level per ten completed challenges, starting at level 1.
pub fn progress_level(completed_tasks: i64) -> i32 {
    (completed_tasks / 10) as i32 + 1
}

pub fn tier_for_level(level: i32) -> &'static str {
    if level >= 4 {
        "Advanced"
    } else if level >= 2 {
        "Intermediate"
    } else {
        "Beginner"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_bounds() {
        assert_eq!(progress_percentage(0), 0);
        assert_eq!(progress_percentage(1), 2);
        assert_eq!(progress_percentage(25), 50);
        assert_eq!(progress_percentage(50), 100);
    }

    #[test]
    fn test_level_steps() {
        assert_eq!(progress_level(0), 1);
        assert_eq!(progress_level(9), 1);
        assert_eq!(progress_level(10), 2);
        assert_eq!(progress_level(39), 4);
        assert_eq!(progress_level(50), 6);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(tier_for_level(1), "Beginner");
        assert_eq!(tier_for_level(2), "Intermediate");
        assert_eq!(tier_for_level(3), "Intermediate");
        assert_eq!(tier_for_level(4), "Advanced");
        assert_eq!(tier_for_level(6), "Advanced");
    }

    #[test]
    fn test_summary_empty_category() {
        let summary = CategoryProgressSummary::from_completed(0, None);
        assert_eq!(summary.percentage, 0);
        assert_eq!(summary.level, 1);
        assert_eq!(summary.current_difficulty, "Beginner");
        assert_eq!(summary.completed_tasks, 0);
        assert_eq!(summary.total_tasks, TOTAL_TASKS);
        assert_eq!(summary.last_completed, "None");
    }

    #[test]
    fn test_summary_intermediate() {
        let summary =
            CategoryProgressSummary::from_completed(12, Some("Flexbox Layout".to_string()));
        assert_eq!(summary.percentage, 24);
        assert_eq!(summary.level, 2);
        assert_eq!(summary.current_difficulty, "Intermediate");
        assert_eq!(summary.last_completed, "Flexbox Layout");
    }
}
