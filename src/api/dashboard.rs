use super::helper;
use crate::auth::SessionUser;
use crate::model::dashboard::{Category, NewCategory, NewChallenge, NewQuizType, QuizType};
use crate::payloads::dashboard::CreateChallengePayload;
use crate::{
    errors::AppError,
    response::ApiResponse,
    schema::{
        categories::dsl as categories_dsl, challenges::dsl as challenges_dsl,
        quiz_types::dsl as quiz_types_dsl,
    },
};
use axum::Extension;
use axum::extract::State;
use axum::response::Json;
use deadpool_diesel::postgres::Pool;
use diesel::dsl::exists;
use diesel::prelude::*;
use tracing::{debug, error, info, instrument};

/// Lists all subject categories.
///
/// Returns (wrapped in `ApiResponse`)
/// * `Vec<Category>` (200 OK).
/// * `500 Internal Server Error`: If a database error occurs.
#[instrument(skip(pool))]
pub async fn get_categories(
    State(pool): State<Pool>,
) -> Result<ApiResponse<Vec<Category>>, AppError> {
    info!("Fetching categories");

    let categories = helper::run_query(&pool, |conn_sync| {
        categories_dsl::categories
            .order(categories_dsl::id.asc())
            .load::<Category>(conn_sync)
    })
    .await?;

    info!("Successfully fetched {} categories", categories.len());
    Ok(ApiResponse::ok(categories))
}

/// Lists all quiz types.
///
/// Returns (wrapped in `ApiResponse`)
/// * `Vec<QuizType>` (200 OK).
/// * `500 Internal Server Error`: If a database error occurs.
#[instrument(skip(pool))]
pub async fn get_quiz_types(
    State(pool): State<Pool>,
) -> Result<ApiResponse<Vec<QuizType>>, AppError> {
    info!("Fetching quiz types");

    let quiz_types = helper::run_query(&pool, |conn_sync| {
        quiz_types_dsl::quiz_types
            .order(quiz_types_dsl::id.asc())
            .load::<QuizType>(conn_sync)
    })
    .await?;

    info!("Successfully fetched {} quiz types", quiz_types.len());
    Ok(ApiResponse::ok(quiz_types))
}

/// Creates a new challenge in the tier given by the payload's difficulty.
///
/// Request Body: `CreateChallengePayload`
///
/// Returns (wrapped in `ApiResponse`)
/// * `i64`: The ID of the newly created challenge (200 OK).
/// * `401 Unauthorized`: If no valid session token is presented.
/// * `404 Not Found`: If the category or quiz type does not exist.
/// * `500 Internal Server Error`: If a database error occurs.
#[instrument(skip(pool, user, payload))]
pub async fn create_challenge(
    State(pool): State<Pool>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<CreateChallengePayload>,
) -> Result<ApiResponse<i64>, AppError> {
    info!(
        "Attempting to create {} challenge '{}' in category {} by user {}",
        payload.difficulty, payload.title, payload.category_id, user.0
    );
    debug!("Create challenge payload: {:?}", payload);

    let category_exists = helper::run_query(&pool, {
        let category_id = payload.category_id;
        move |conn_sync| {
            diesel::select(exists(categories_dsl::categories.find(category_id)))
                .get_result::<bool>(conn_sync)
        }
    })
    .await?;

    if !category_exists {
        error!(
            "Cannot create challenge: Category with ID {} not found.",
            payload.category_id
        );
        return Err(AppError::NotFound(format!(
            "Category with ID {} not found.",
            payload.category_id
        )));
    }

    let quiz_type_exists = helper::run_query(&pool, {
        let quiz_type_id = payload.quiz_type_id;
        move |conn_sync| {
            diesel::select(exists(quiz_types_dsl::quiz_types.find(quiz_type_id)))
                .get_result::<bool>(conn_sync)
        }
    })
    .await?;

    if !quiz_type_exists {
        error!(
            "Cannot create challenge: Quiz type with ID {} not found.",
            payload.quiz_type_id
        );
        return Err(AppError::NotFound(format!(
            "Quiz type with ID {} not found.",
            payload.quiz_type_id
        )));
    }

    let points = payload
        .points
        .unwrap_or_else(|| payload.difficulty.default_points());

    let new_challenge = NewChallenge {
        category_id: payload.category_id,
        quiz_type_id: payload.quiz_type_id,
        difficulty: payload.difficulty.as_str().to_string(),
        title: payload.title,
        description: payload.description,
        points,
        answer: payload.answer,
        explanation: payload.explanation,
        time_limit: payload.time_limit,
        options: payload.options,
    };

    let challenge_id = helper::run_query(&pool, move |conn_sync| {
        diesel::insert_into(challenges_dsl::challenges)
            .values(&new_challenge)
            .returning(challenges_dsl::id)
            .get_result::<i64>(conn_sync)
    })
    .await?;

    info!(
        "Successfully created challenge with id: {} ({} points)",
        challenge_id, points
    );
    Ok(ApiResponse::ok(challenge_id))
}

/// Seeds the default quiz types and subject categories. Safe to call
/// repeatedly: existing rows are left untouched.
///
/// Returns (wrapped in `ApiResponse`)
/// * `()` (200 OK).
/// * `401 Unauthorized`: If no valid session token is presented.
/// * `500 Internal Server Error`: If a database error occurs.
#[instrument(skip(pool, user))]
pub async fn init_defaults(
    State(pool): State<Pool>,
    Extension(user): Extension<SessionUser>,
) -> Result<ApiResponse<()>, AppError> {
    info!("Seeding default quiz types and categories (user {})", user.0);

    helper::run_query(&pool, |conn_sync| {
        let default_quiz_types = vec![
            NewQuizType {
                name: "Time Trial Quiz".to_string(),
                description: Some("Complete the quiz within a time limit".to_string()),
            },
            NewQuizType {
                name: "Spell Type Quiz".to_string(),
                description: Some("Test your spelling skills".to_string()),
            },
            NewQuizType {
                name: "Identification Quiz".to_string(),
                description: Some("Identify the correct answer".to_string()),
            },
            NewQuizType {
                name: "Multiple Choice Quiz".to_string(),
                description: Some("Select the correct answer from options".to_string()),
            },
        ];

        diesel::insert_into(quiz_types_dsl::quiz_types)
            .values(&default_quiz_types)
            .on_conflict(quiz_types_dsl::name)
            .do_nothing()
            .execute(conn_sync)?;

        let default_categories = vec![
            NewCategory {
                name: "HTML Basics".to_string(),
            },
            NewCategory {
                name: "CSS Fundamentals".to_string(),
            },
            NewCategory {
                name: "JavaScript Core".to_string(),
            },
            NewCategory {
                name: "Web Development".to_string(),
            },
        ];

        diesel::insert_into(categories_dsl::categories)
            .values(&default_categories)
            .on_conflict(categories_dsl::name)
            .do_nothing()
            .execute(conn_sync)
    })
    .await?;

    info!("Successfully seeded default quiz types and categories");
    Ok(ApiResponse::ok(()))
}
