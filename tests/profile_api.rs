use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zentry_server::model::progress::CategoryProgressSummary;
use zentry_server::response::ApiResponse;

mod helpers;
use helpers::{
    create_test_category, create_test_challenge, create_test_progress, create_test_quiz_type,
    create_test_user, mint_token, set_user_points, setup_test_environment,
};

fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4())
}

// mirror of the handler's response shapes; deserialization-only on the
// test side
#[derive(Deserialize, Serialize, Debug)]
struct ProgressOverview {
    html: CategoryProgressSummary,
    css: CategoryProgressSummary,
    javascript: CategoryProgressSummary,
}

#[derive(Deserialize, Serialize, Debug)]
struct ProfileResponse {
    username: String,
    email: String,
    total_points: i32,
    rank: String,
    progress: ProgressOverview,
}

// get_category_summary

#[tokio::test]
async fn test_get_category_summary_empty_category() {
    let (server, pool) = setup_test_environment().await;
    let user_id = create_test_user(&pool, &unique_email("empty"), "Password1").await;
    let category_id = create_test_category(&pool, "Empty Category").await;

    let response = server
        .get("/profile/get_category_summary")
        .authorization_bearer(&mint_token(user_id))
        .add_query_param("category_id", category_id)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: ApiResponse<CategoryProgressSummary> = response.json();
    let summary = body.data.expect("expected summary");
    assert_eq!(summary.percentage, 0);
    assert_eq!(summary.level, 1);
    assert_eq!(summary.current_difficulty, "Beginner");
    assert_eq!(summary.completed_tasks, 0);
    assert_eq!(summary.total_tasks, 50);
    assert_eq!(summary.last_completed, "None");
}

#[tokio::test]
async fn test_get_category_summary_counts_and_last_completed() {
    let (server, pool) = setup_test_environment().await;
    let user_id = create_test_user(&pool, &unique_email("summary"), "Password1").await;
    let category_id = create_test_category(&pool, "Summary Category").await;
    let other_category_id = create_test_category(&pool, "Other Category").await;
    let quiz_type_id = create_test_quiz_type(&pool, "Summary Type").await;

    let base = Utc::now() - Duration::hours(24);
    for i in 0..12 {
        let challenge_id = create_test_challenge(
            &pool,
            category_id,
            quiz_type_id,
            "easy",
            &format!("Challenge {}", i),
            10,
        )
        .await;
        create_test_progress(&pool, user_id, challenge_id, base + Duration::hours(i)).await;
    }

    // a completed challenge in another category must not count
    let foreign_challenge_id = create_test_challenge(
        &pool,
        other_category_id,
        quiz_type_id,
        "easy",
        "Foreign Challenge",
        10,
    )
    .await;
    create_test_progress(&pool, user_id, foreign_challenge_id, Utc::now()).await;

    let response = server
        .get("/profile/get_category_summary")
        .authorization_bearer(&mint_token(user_id))
        .add_query_param("category_id", category_id)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: ApiResponse<CategoryProgressSummary> = response.json();
    let summary = body.data.expect("expected summary");
    assert_eq!(summary.completed_tasks, 12);
    assert_eq!(summary.percentage, 24);
    assert_eq!(summary.level, 2);
    assert_eq!(summary.current_difficulty, "Intermediate");
    assert_eq!(summary.last_completed, "Challenge 11");
}

#[tokio::test]
async fn test_get_category_summary_advanced_tier() {
    let (server, pool) = setup_test_environment().await;
    let user_id = create_test_user(&pool, &unique_email("advanced"), "Password1").await;
    let category_id = create_test_category(&pool, "Advanced Category").await;
    let quiz_type_id = create_test_quiz_type(&pool, "Advanced Type").await;

    let base = Utc::now() - Duration::hours(48);
    for i in 0..30 {
        let challenge_id = create_test_challenge(
            &pool,
            category_id,
            quiz_type_id,
            "hard",
            &format!("Hard {}", i),
            30,
        )
        .await;
        create_test_progress(&pool, user_id, challenge_id, base + Duration::minutes(i)).await;
    }

    let response = server
        .get("/profile/get_category_summary")
        .authorization_bearer(&mint_token(user_id))
        .add_query_param("category_id", category_id)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: ApiResponse<CategoryProgressSummary> = response.json();
    let summary = body.data.expect("expected summary");
    assert_eq!(summary.completed_tasks, 30);
    assert_eq!(summary.percentage, 60);
    assert_eq!(summary.level, 4);
    assert_eq!(summary.current_difficulty, "Advanced");
}

#[tokio::test]
async fn test_get_category_summary_unauthorized_without_token() {
    let (server, _pool) = setup_test_environment().await;

    let response = server
        .get("/profile/get_category_summary")
        .add_query_param("category_id", 1)
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

// get_profile

#[tokio::test]
async fn test_get_profile_includes_three_category_summaries() {
    let (server, pool) = setup_test_environment().await;
    let email = unique_email("profile");
    let user_id = create_test_user(&pool, &email, "Password1").await;
    set_user_points(&pool, user_id, 70).await;

    let response = server
        .get("/profile/get_profile")
        .authorization_bearer(&mint_token(user_id))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: ApiResponse<ProfileResponse> = response.json();
    let profile = body.data.expect("expected profile");
    assert_eq!(profile.email, email);
    assert!(email.starts_with(&profile.username));
    assert_eq!(profile.total_points, 70);
    assert_eq!(profile.rank, "Beginner");
    // no progress rows yet: all three summaries are at their floor
    assert_eq!(profile.progress.html.level, 1);
    assert_eq!(profile.progress.css.level, 1);
    assert_eq!(profile.progress.javascript.level, 1);
    assert_eq!(profile.progress.html.last_completed, "None");
}

#[tokio::test]
async fn test_get_profile_unauthorized_without_token() {
    let (server, _pool) = setup_test_environment().await;

    let response = server.get("/profile/get_profile").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_profile_not_found_for_deleted_user() {
    let (server, _pool) = setup_test_environment().await;

    // valid token for a user id that has no row
    let response = server
        .get("/profile/get_profile")
        .authorization_bearer(&mint_token(999999))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
