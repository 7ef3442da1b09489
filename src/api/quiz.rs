use super::helper;
use crate::auth::SessionUser;
use crate::model::progress::NewChallengeProgress;
use crate::model::quiz::{
    ChallengeCatalogResponse, ChallengeData, LeaderboardEntry, NewQuizResult, QuizResultData,
};
use crate::payloads::quiz::{GetChallengeParams, GetLeaderboardParams, SubmitResultPayload};
use crate::{
    errors::AppError,
    response::ApiResponse,
    schema::{
        challenge_progress::dsl as progress_dsl, challenges::dsl as challenges_dsl,
        quiz_results::dsl as results_dsl, users::dsl as users_dsl,
    },
};
use anyhow::anyhow;
use axum::Extension;
use axum::extract::{Query, State};
use axum::response::Json;
use chrono::Utc;
use deadpool_diesel::postgres::Pool;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::{debug, error, info, instrument, warn};

const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;

/// Lists the full challenge catalog, grouped by difficulty tier.
///
/// Returns (wrapped in `ApiResponse`)
/// * `ChallengeCatalogResponse`: All challenges, grouped easy/medium/hard (200 OK).
/// * `500 Internal Server Error`: If a database error occurs.
#[instrument(skip(pool))]
pub async fn get_challenges(
    State(pool): State<Pool>,
) -> Result<ApiResponse<ChallengeCatalogResponse>, AppError> {
    info!("Fetching challenge catalog");

    let challenges = helper::run_query(&pool, |conn_sync| {
        challenges_dsl::challenges
            .order(challenges_dsl::id.asc())
            .load::<ChallengeData>(conn_sync)
    })
    .await?;

    let mut catalog = ChallengeCatalogResponse {
        easy: Vec::new(),
        medium: Vec::new(),
        hard: Vec::new(),
    };
    for challenge in challenges {
        match challenge.difficulty.as_str() {
            "easy" => catalog.easy.push(challenge),
            "medium" => catalog.medium.push(challenge),
            "hard" => catalog.hard.push(challenge),
            other => {
                warn!(
                    "Challenge {} has unrecognized difficulty tag '{}', skipping",
                    challenge.id, other
                );
            }
        }
    }

    info!(
        "Successfully fetched challenge catalog: {} easy, {} medium, {} hard",
        catalog.easy.len(),
        catalog.medium.len(),
        catalog.hard.len()
    );
    Ok(ApiResponse::ok(catalog))
}

/// Fetches a single challenge by ID, across all tiers.
///
/// Query Parameters:
/// * `challenge_id`: The ID of the challenge.
///
/// Returns (wrapped in `ApiResponse`)
/// * `ChallengeData`: The challenge (200 OK).
/// * `404 Not Found`: If no challenge has the given ID.
/// * `500 Internal Server Error`: If a database error occurs.
#[instrument(skip(pool, params))]
pub async fn get_challenge(
    State(pool): State<Pool>,
    Query(params): Query<GetChallengeParams>,
) -> Result<ApiResponse<ChallengeData>, AppError> {
    let challenge_id = params.challenge_id;
    info!("Fetching challenge with id: {}", challenge_id);

    let challenge = helper::run_query(&pool, move |conn_sync| {
        challenges_dsl::challenges
            .find(challenge_id)
            .first::<ChallengeData>(conn_sync)
            .optional()
    })
    .await?;

    match challenge {
        Some(challenge) => {
            info!("Successfully fetched challenge {}", challenge_id);
            Ok(ApiResponse::ok(challenge))
        }
        None => {
            warn!("Challenge with ID {} not found", challenge_id);
            Err(AppError::NotFound(format!(
                "Challenge with ID {} not found.",
                challenge_id
            )))
        }
    }
}

/// Records a quiz submission for the authenticated user, awards points and
/// upserts the per-challenge progress row.
///
/// Every submission against an existing challenge is appended to the
/// `quiz_results` log, correct or not. Points and progress are only touched
/// for correct answers; repeating a correct submission re-awards points and
/// keeps incrementing the attempt counter.
///
/// Request Body: `SubmitResultPayload`
///
/// Returns (wrapped in `ApiResponse`)
/// * `QuizResultData`: The recorded result row (200 OK).
/// * `401 Unauthorized`: If no valid session token is presented.
/// * `404 Not Found`: If no challenge matches the (ID, difficulty) pair.
///   Nothing is written in that case.
/// * `500 Internal Server Error`: If a database error or transaction failure occurs.
#[instrument(skip(pool, user, payload))]
pub async fn submit_result(
    State(pool): State<Pool>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<SubmitResultPayload>,
) -> Result<ApiResponse<QuizResultData>, AppError> {
    info!(
        "Attempting submission for challenge_id: {} ({}) by user_id: {}, correct: {}",
        payload.challenge_id, payload.difficulty, user.0, payload.is_correct
    );
    debug!("Submit result payload: {:?}", payload);

    let conn = pool.get().await?;
    let transaction_result: Result<QuizResultData, AppError> = conn
        .interact(move |conn_sync| {
            conn_sync.transaction(|transaction_conn| {
                let user_id = user.0;
                let challenge_id = payload.challenge_id;
                let difficulty = payload.difficulty;

                let challenge_points = challenges_dsl::challenges
                    .filter(challenges_dsl::id.eq(challenge_id))
                    .filter(challenges_dsl::difficulty.eq(difficulty.as_str()))
                    .select(challenges_dsl::points)
                    .first::<i32>(transaction_conn)
                    .optional()?;

                let challenge_points = match challenge_points {
                    Some(points) => points,
                    None => {
                        warn!(
                            "Challenge {} not found in tier '{}'. Rejecting submission.",
                            challenge_id, difficulty
                        );
                        return Err(AppError::NotFound(format!(
                            "Challenge with ID {} not found for difficulty '{}'.",
                            challenge_id, difficulty
                        )));
                    }
                };

                let now_ts = Utc::now();
                let new_result = NewQuizResult {
                    user_id,
                    challenge_id,
                    difficulty: difficulty.as_str().to_string(),
                    completed_at: now_ts,
                    score: i32::from(payload.is_correct),
                    time_taken: payload.time_taken,
                    is_correct: payload.is_correct,
                };

                let result_row = diesel::insert_into(results_dsl::quiz_results)
                    .values(&new_result)
                    .get_result::<QuizResultData>(transaction_conn)
                    .map_err(|e| {
                        if let DieselError::DatabaseError(
                            DatabaseErrorKind::ForeignKeyViolation,
                            _,
                        ) = e
                        {
                            error!("Foreign key violation during result insert: {:?}", e);
                            AppError::NotFound(format!("User with ID {} not found.", user_id))
                        } else {
                            AppError::from(e)
                        }
                    })?;

                if payload.is_correct {
                    info!(
                        "Correct submission for challenge {} by user {}. Awarding {} points.",
                        challenge_id, user_id, challenge_points
                    );

                    let rows_affected = diesel::update(users_dsl::users.find(user_id))
                        .set(
                            users_dsl::total_points
                                .eq(users_dsl::total_points + challenge_points),
                        )
                        .execute(transaction_conn)?;

                    if rows_affected != 1 {
                        error!(
                            "Failed to update points for user {}: Expected 1 row affected, got {}",
                            user_id, rows_affected
                        );
                        return Err(AppError::InternalServerError(anyhow!(
                            "Failed to update points, inconsistent state."
                        )));
                    }

                    let new_progress = NewChallengeProgress {
                        user_id,
                        challenge_id,
                        completed: true,
                        completed_at: now_ts,
                        attempts: 1,
                        last_attempt: now_ts,
                    };

                    diesel::insert_into(progress_dsl::challenge_progress)
                        .values(&new_progress)
                        .on_conflict((progress_dsl::user_id, progress_dsl::challenge_id))
                        .do_update()
                        .set((
                            progress_dsl::completed.eq(true),
                            progress_dsl::completed_at.eq(now_ts),
                            progress_dsl::attempts.eq(progress_dsl::attempts + 1),
                            progress_dsl::last_attempt.eq(now_ts),
                        ))
                        .execute(transaction_conn)?;
                }

                Ok(result_row)
            })
        })
        .await?;

    transaction_result.map(ApiResponse::ok)
}

/// Retrieves the top users ordered by total points.
///
/// Query Parameters:
/// * `limit`: Maximum number of entries to return (optional, default 10).
///
/// Returns (wrapped in `ApiResponse`)
/// * `Vec<LeaderboardEntry>`: Users ordered by points descending; ties are
///   broken by user ID ascending (200 OK).
/// * `500 Internal Server Error`: If a database error occurs.
#[instrument(skip(pool, params))]
pub async fn get_leaderboard(
    State(pool): State<Pool>,
    Query(params): Query<GetLeaderboardParams>,
) -> Result<ApiResponse<Vec<LeaderboardEntry>>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT);
    info!("Fetching leaderboard with limit: {}", limit);

    let entries = helper::run_query(&pool, move |conn_sync| {
        users_dsl::users
            .order((users_dsl::total_points.desc(), users_dsl::id.asc()))
            .select((users_dsl::username, users_dsl::total_points, users_dsl::rank))
            .limit(limit)
            .load::<LeaderboardEntry>(conn_sync)
    })
    .await?;

    info!("Successfully fetched {} leaderboard entries", entries.len());
    Ok(ApiResponse::ok(entries))
}
