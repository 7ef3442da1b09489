use super::helper;
use crate::auth::SessionUser;
use crate::model::auth::UserData;
use crate::model::progress::CategoryProgressSummary;
use crate::payloads::profile::GetCategorySummaryParams;
use crate::{
    errors::AppError,
    response::ApiResponse,
    schema::{
        challenge_progress::dsl as progress_dsl, challenges::dsl as challenges_dsl,
        users::dsl as users_dsl,
    },
};
use axum::Extension;
use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use deadpool_diesel::postgres::Pool;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

// Fixed subject categories seeded by init_defaults.
const HTML_CATEGORY_ID: i64 = 1;
const CSS_CATEGORY_ID: i64 = 2;
const JAVASCRIPT_CATEGORY_ID: i64 = 3;

#[derive(Deserialize, Serialize, Debug)]
pub struct ProgressOverview {
    pub html: CategoryProgressSummary,
    pub css: CategoryProgressSummary,
    pub javascript: CategoryProgressSummary,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ProfileResponse {
    pub username: String,
    pub email: String,
    pub total_points: i32,
    pub rank: String,
    pub progress: ProgressOverview,
}

/// Retrieves the authenticated user's profile: public user fields plus a
/// progress summary for each of the three fixed subject categories.
///
/// Returns (wrapped in `ApiResponse`)
/// * `ProfileResponse` (200 OK).
/// * `401 Unauthorized`: If no valid session token is presented.
/// * `404 Not Found`: If the session's user no longer exists.
/// * `500 Internal Server Error`: If a database error occurs.
#[instrument(skip(pool, user))]
pub async fn get_profile(
    State(pool): State<Pool>,
    Extension(user): Extension<SessionUser>,
) -> Result<ApiResponse<ProfileResponse>, AppError> {
    let user_id = user.0;
    info!("Fetching profile for user_id: {}", user_id);

    let user_data = helper::run_query(&pool, move |conn_sync| {
        users_dsl::users
            .find(user_id)
            .select((
                users_dsl::id,
                users_dsl::username,
                users_dsl::email,
                users_dsl::created_at,
                users_dsl::total_points,
                users_dsl::rank,
            ))
            .first::<UserData>(conn_sync)
            .optional()
    })
    .await?;

    let user_data = match user_data {
        Some(data) => data,
        None => {
            warn!("User with ID {} not found for profile fetch", user_id);
            return Err(AppError::NotFound(format!(
                "User with ID {} not found.",
                user_id
            )));
        }
    };

    let progress = ProgressOverview {
        html: load_category_summary(&pool, user_id, HTML_CATEGORY_ID).await?,
        css: load_category_summary(&pool, user_id, CSS_CATEGORY_ID).await?,
        javascript: load_category_summary(&pool, user_id, JAVASCRIPT_CATEGORY_ID).await?,
    };

    info!(
        "Successfully fetched profile for user_id: {} ({} total points)",
        user_id, user_data.total_points
    );
    Ok(ApiResponse::ok(ProfileResponse {
        username: user_data.username,
        email: user_data.email,
        total_points: user_data.total_points,
        rank: user_data.rank,
        progress,
    }))
}

/// Retrieves the authenticated user's progress summary for one category.
///
/// Query Parameters:
/// * `category_id`: The ID of the subject category.
///
/// Returns (wrapped in `ApiResponse`)
/// * `CategoryProgressSummary` (200 OK). A category with no completed
///   challenges yields 0%, level 1, "Beginner" and "None".
/// * `401 Unauthorized`: If no valid session token is presented.
/// * `500 Internal Server Error`: If a database error occurs.
#[instrument(skip(pool, user, params))]
pub async fn get_category_summary(
    State(pool): State<Pool>,
    Extension(user): Extension<SessionUser>,
    Query(params): Query<GetCategorySummaryParams>,
) -> Result<ApiResponse<CategoryProgressSummary>, AppError> {
    let user_id = user.0;
    let category_id = params.category_id;
    info!(
        "Fetching category summary for user_id: {}, category_id: {}",
        user_id, category_id
    );

    let summary = load_category_summary(&pool, user_id, category_id).await?;

    info!(
        "Successfully computed summary for user_id: {}, category_id: {}. Completed: {}, level: {}",
        user_id, category_id, summary.completed_tasks, summary.level
    );
    Ok(ApiResponse::ok(summary))
}

/// Derives a category summary from the user's completed progress rows.
///
/// Progress rows are unique per (user, challenge), so repeated correct
/// submissions never inflate the completed count.
async fn load_category_summary(
    pool: &Pool,
    user_id: i64,
    category_id: i64,
) -> Result<CategoryProgressSummary, AppError> {
    let completed_rows = helper::run_query(pool, move |conn_sync| {
        progress_dsl::challenge_progress
            .inner_join(
                challenges_dsl::challenges.on(progress_dsl::challenge_id.eq(challenges_dsl::id)),
            )
            .filter(progress_dsl::user_id.eq(user_id))
            .filter(progress_dsl::completed.eq(true))
            .filter(challenges_dsl::category_id.eq(category_id))
            .order(progress_dsl::completed_at.desc())
            .select((challenges_dsl::title, progress_dsl::completed_at))
            .load::<(String, DateTime<Utc>)>(conn_sync)
    })
    .await?;

    let completed_tasks = completed_rows.len() as i64;
    let last_completed = completed_rows.into_iter().next().map(|(title, _)| title);

    Ok(CategoryProgressSummary::from_completed(
        completed_tasks,
        last_completed,
    ))
}
