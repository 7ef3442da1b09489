use crate::model::quiz::Difficulty;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct SubmitResultPayload {
    pub challenge_id: i64,
    pub difficulty: Difficulty,
    pub is_correct: bool,
    /// Seconds the caller spent on the challenge, if tracked.
    pub time_taken: Option<i32>,
}

#[derive(Deserialize, Debug)]
pub struct GetChallengeParams {
    pub challenge_id: i64,
}

#[derive(Deserialize, Debug)]
pub struct GetLeaderboardParams {
    pub limit: Option<i64>,
}
