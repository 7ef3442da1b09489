use crate::auth::AuthKeys;
use crate::cli::Args;
use anyhow::Context;
use axum::Router;
use axum::extract::FromRef;
use axum::middleware;
use axum::routing::{get, post};
use deadpool_diesel::Runtime;
use deadpool_diesel::postgres::{Manager, Pool};
use tracing::info;

pub mod auth;
pub mod cli;
pub mod model;
pub mod payloads;
pub mod response;
pub mod schema;

mod api;
mod errors;

#[derive(Clone)]
pub struct AppState {
    pub pool: Pool,
    pub auth: AuthKeys,
}

impl FromRef<AppState> for Pool {
    fn from_ref(state: &AppState) -> Pool {
        state.pool.clone()
    }
}

impl FromRef<AppState> for AuthKeys {
    fn from_ref(state: &AppState) -> AuthKeys {
        state.auth.clone()
    }
}

pub fn init_router(args: &Args) -> anyhow::Result<Router> {
    info!("Initializing database pool...");
    let pool = init_pool(&args.connection_str, args.db_pool_max_size)
        .context("Failed to initialize database pool")?;

    info!("Initializing session key material...");
    let keys = AuthKeys::new(&args.jwt_secret, args.token_expiry_hours);

    info!("Initializing router...");
    Ok(init_router_internal(pool, keys))
}

pub fn init_test_router(pool: Pool, keys: AuthKeys) -> Router {
    init_router_internal(pool, keys)
}

fn init_router_internal(pool: Pool, keys: AuthKeys) -> Router {
    let auth_api = auth_routes();
    let quiz_api = quiz_routes(keys.clone());
    let profile_api = profile_routes(keys.clone());
    let dashboard_api = dashboard_routes(keys.clone());

    Router::new()
        .nest("/auth", auth_api)
        .nest("/quiz", quiz_api)
        .nest("/profile", profile_api)
        .nest("/dashboard", dashboard_api)
        .with_state(AppState { pool, auth: keys })
}

fn init_pool(conn_str: &str, max_size: u32) -> anyhow::Result<Pool> {
    let manager = Manager::new(conn_str, Runtime::Tokio1);
    let pool = Pool::builder(manager).max_size(max_size as usize).build()?;
    Ok(pool)
}

fn auth_routes() -> Router<AppState> {
    // public routes
    Router::new()
        .route("/register", post(api::auth::register))
        .route("/login", post(api::auth::login))
}

fn quiz_routes(keys: AuthKeys) -> Router<AppState> {
    // protected routes
    let protected = Router::new()
        .route("/submit_result", post(api::quiz::submit_result))
        .route_layer(middleware::from_fn_with_state(keys, auth::require_session));

    // public routes
    Router::new()
        .route("/get_challenges", get(api::quiz::get_challenges))
        .route("/get_challenge", get(api::quiz::get_challenge))
        .route("/get_leaderboard", get(api::quiz::get_leaderboard))
        .merge(protected)
}

fn profile_routes(keys: AuthKeys) -> Router<AppState> {
    // protected routes
    Router::new()
        .route("/get_profile", get(api::profile::get_profile))
        .route(
            "/get_category_summary",
            get(api::profile::get_category_summary),
        )
        .route_layer(middleware::from_fn_with_state(keys, auth::require_session))
}

fn dashboard_routes(keys: AuthKeys) -> Router<AppState> {
    // protected routes
    let protected = Router::new()
        .route("/create_challenge", post(api::dashboard::create_challenge))
        .route("/init_defaults", post(api::dashboard::init_defaults))
        .route_layer(middleware::from_fn_with_state(keys, auth::require_session));

    // public routes
    Router::new()
        .route("/get_categories", get(api::dashboard::get_categories))
        .route("/get_quiz_types", get(api::dashboard::get_quiz_types))
        .merge(protected)
}
