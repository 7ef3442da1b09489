use crate::schema::{categories, challenges, quiz_types};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Insertable, Debug)]
#[diesel(table_name = challenges)]
pub struct NewChallenge {
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

#[derive(Insertable, Debug)]
#[diesel(table_name = categories)]
pub struct NewCategory {
    pub name: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = quiz_types)]
pub struct NewQuizType {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Queryable)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Deserialize, Serialize, Debug, Queryable)]
pub struct QuizType {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}
