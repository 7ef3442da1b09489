use crate::schema::quiz_results;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// Challenge difficulty tier. Stored in the database as a lowercase tag
/// on both `challenges` and `quiz_results`.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Point value a challenge of this tier is worth when none is given
    /// at creation time.
    pub fn default_points(self) -> i32 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Medium => 20,
            Difficulty::Hard => 30,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize, Serialize, Debug, Queryable)]
pub struct ChallengeData {
    pub id: i64,
    pub category_id: i64,
    pub quiz_type_id: i64,
    pub difficulty: String,
    pub title: String,
    pub description: String,
    pub points: i32,
    pub answer: String,
    pub explanation: Option<String>,
    pub time_limit: Option<i32>,
    pub options: Option<JsonValue>,
}

/// Full challenge listing, grouped by tier.
#[derive(Deserialize, Serialize, Debug)]
pub struct ChallengeCatalogResponse {
    pub easy: Vec<ChallengeData>,
    pub medium: Vec<ChallengeData>,
    pub hard: Vec<ChallengeData>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = quiz_results)]
pub struct NewQuizResult {
    pub user_id: i64,
    pub challenge_id: i64,
    pub difficulty: String,
    pub completed_at: DateTime<Utc>,
    pub score: i32,
    pub time_taken: Option<i32>,
    pub is_correct: bool,
}

/// A row of the append-only submission log, echoed back to the caller
/// after a submission is recorded.
#[derive(Deserialize, Serialize, Debug, Queryable)]
pub struct QuizResultData {
    pub id: i64,
    pub user_id: i64,
    pub challenge_id: i64,
    pub difficulty: String,
    pub completed_at: DateTime<Utc>,
    pub score: i32,
    pub time_taken: Option<i32>,
    pub is_correct: bool,
}

#[derive(Deserialize, Serialize, Debug, Queryable)]
pub struct LeaderboardEntry {
    pub username: String,
    pub total_points: i32,
    pub rank: String,
}
