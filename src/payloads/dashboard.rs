use crate::model::quiz::Difficulty;
use serde::Deserialize;
use serde_json::Value as JsonValue;

#[derive(Deserialize, Debug)]
pub struct CreateChallengePayload {
    pub category_id: i64,
    pub quiz_type_id: i64,
    pub difficulty: Difficulty,
    pub title: String,
    pub description: String,
    /// Defaults to the tier's standard value (easy 10, medium 20, hard 30)
    /// when omitted.
    pub points: Option<i32>,
    pub answer: String,
    pub explanation: Option<String>,
    pub time_limit: Option<i32>,
    pub options: Option<JsonValue>,
}
