use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;
use zentry_server::model::dashboard::{Category, QuizType};
use zentry_server::model::quiz::ChallengeData;
use zentry_server::response::ApiResponse;

mod helpers;
use helpers::{
    create_test_category, create_test_quiz_type, create_test_user, mint_token,
    setup_test_environment,
};

fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4())
}

// get_categories / get_quiz_types

#[tokio::test]
async fn test_get_categories_success() {
    let (server, pool) = setup_test_environment().await;
    let category_id = create_test_category(&pool, "Listed Category").await;

    let response = server.get("/dashboard/get_categories").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: ApiResponse<Vec<Category>> = response.json();
    let categories = body.data.expect("expected categories");
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].id, category_id);
    assert_eq!(categories[0].name, "Listed Category");
}

#[tokio::test]
async fn test_get_quiz_types_success() {
    let (server, pool) = setup_test_environment().await;
    let quiz_type_id = create_test_quiz_type(&pool, "Listed Type").await;

    let response = server.get("/dashboard/get_quiz_types").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: ApiResponse<Vec<QuizType>> = response.json();
    let quiz_types = body.data.expect("expected quiz types");
    assert_eq!(quiz_types.len(), 1);
    assert_eq!(quiz_types[0].id, quiz_type_id);
}

// create_challenge

#[tokio::test]
async fn test_create_challenge_with_default_tier_points() {
    let (server, pool) = setup_test_environment().await;
    let user_id = create_test_user(&pool, &unique_email("creator"), "Password1").await;
    let category_id = create_test_category(&pool, "Creation Category").await;
    let quiz_type_id = create_test_quiz_type(&pool, "Creation Type").await;

    // no points given: the medium tier default (20) applies
    let response = server
        .post("/dashboard/create_challenge")
        .authorization_bearer(&mint_token(user_id))
        .json(&json!({
            "category_id": category_id,
            "quiz_type_id": quiz_type_id,
            "difficulty": "medium",
            "title": "Defaulted Points",
            "description": "Uses the tier default",
            "answer": "42"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: ApiResponse<i64> = response.json();
    let challenge_id = body.data.expect("expected challenge id");

    let fetched = server
        .get("/quiz/get_challenge")
        .add_query_param("challenge_id", challenge_id)
        .await;
    let fetched_body: ApiResponse<ChallengeData> = fetched.json();
    let challenge = fetched_body.data.expect("expected challenge");
    assert_eq!(challenge.points, 20);
    assert_eq!(challenge.difficulty, "medium");
}

#[tokio::test]
async fn test_create_challenge_with_explicit_points_and_options() {
    let (server, pool) = setup_test_environment().await;
    let user_id = create_test_user(&pool, &unique_email("explicit"), "Password1").await;
    let category_id = create_test_category(&pool, "Explicit Category").await;
    let quiz_type_id = create_test_quiz_type(&pool, "Explicit Type").await;

    let response = server
        .post("/dashboard/create_challenge")
        .authorization_bearer(&mint_token(user_id))
        .json(&json!({
            "category_id": category_id,
            "quiz_type_id": quiz_type_id,
            "difficulty": "hard",
            "title": "Explicit Points",
            "description": "Multiple choice",
            "answer": "b",
            "points": 45,
            "time_limit": 60,
            "options": ["a", "b", "c"]
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: ApiResponse<i64> = response.json();
    let challenge_id = body.data.expect("expected challenge id");

    let fetched = server
        .get("/quiz/get_challenge")
        .add_query_param("challenge_id", challenge_id)
        .await;
    let fetched_body: ApiResponse<ChallengeData> = fetched.json();
    let challenge = fetched_body.data.expect("expected challenge");
    assert_eq!(challenge.points, 45);
    assert_eq!(challenge.time_limit, Some(60));
    assert_eq!(challenge.options, Some(json!(["a", "b", "c"])));
}

#[tokio::test]
async fn test_create_challenge_not_found_unknown_category() {
    let (server, pool) = setup_test_environment().await;
    let user_id = create_test_user(&pool, &unique_email("badcat"), "Password1").await;
    let quiz_type_id = create_test_quiz_type(&pool, "BadCat Type").await;

    let response = server
        .post("/dashboard/create_challenge")
        .authorization_bearer(&mint_token(user_id))
        .json(&json!({
            "category_id": 999999,
            "quiz_type_id": quiz_type_id,
            "difficulty": "easy",
            "title": "Orphan",
            "description": "No such category",
            "answer": "42"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_challenge_unauthorized_without_token() {
    let (server, pool) = setup_test_environment().await;
    let category_id = create_test_category(&pool, "Anon Category").await;
    let quiz_type_id = create_test_quiz_type(&pool, "Anon Type").await;

    let response = server
        .post("/dashboard/create_challenge")
        .json(&json!({
            "category_id": category_id,
            "quiz_type_id": quiz_type_id,
            "difficulty": "easy",
            "title": "Anonymous",
            "description": "Should be refused",
            "answer": "42"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

// init_defaults

#[tokio::test]
async fn test_init_defaults_seeds_and_is_idempotent() {
    let (server, pool) = setup_test_environment().await;
    let user_id = create_test_user(&pool, &unique_email("seeder"), "Password1").await;

    let first = server
        .post("/dashboard/init_defaults")
        .authorization_bearer(&mint_token(user_id))
        .await;
    assert_eq!(first.status_code(), StatusCode::OK);

    // second run must not duplicate the defaults
    let second = server
        .post("/dashboard/init_defaults")
        .authorization_bearer(&mint_token(user_id))
        .await;
    assert_eq!(second.status_code(), StatusCode::OK);

    let categories_response = server.get("/dashboard/get_categories").await;
    let categories_body: ApiResponse<Vec<Category>> = categories_response.json();
    let categories = categories_body.data.expect("expected categories");
    assert_eq!(categories.len(), 4);
    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "HTML Basics",
            "CSS Fundamentals",
            "JavaScript Core",
            "Web Development"
        ]
    );

    let types_response = server.get("/dashboard/get_quiz_types").await;
    let types_body: ApiResponse<Vec<QuizType>> = types_response.json();
    assert_eq!(types_body.data.expect("expected quiz types").len(), 4);
}

#[tokio::test]
async fn test_init_defaults_unauthorized_without_token() {
    let (server, _pool) = setup_test_environment().await;

    let response = server.post("/dashboard/init_defaults").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}
