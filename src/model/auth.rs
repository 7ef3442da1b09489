use crate::schema::users;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Insertable, Debug)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub total_points: i32,
    pub rank: String,
    // created_at has a DB default (CURRENT_TIMESTAMP)
}

/// Public user fields, safe to return to clients.
#[derive(Deserialize, Serialize, Debug, Queryable)]
pub struct UserData {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub total_points: i32,
    pub rank: String,
}

/// Same selection as [`UserData`] plus the stored hash, used only by the
/// login path to verify credentials.
#[derive(Debug, Queryable)]
pub struct UserCredentials {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub total_points: i32,
    pub rank: String,
}

impl From<UserCredentials> for UserData {
    fn from(row: UserCredentials) -> Self {
        UserData {
            id: row.id,
            username: row.username,
            email: row.email,
            created_at: row.created_at,
            total_points: row.total_points,
            rank: row.rank,
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserData,
}
