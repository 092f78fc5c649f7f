pub mod auth;
pub mod conversations;
pub mod daily_picks;
pub mod interests;
pub mod likes;
pub mod users;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::utils::Config;

pub use auth::CurrentUser;

pub fn create_router(pool: PgPool, config: Config) -> Router {
    let cors_layer = create_cors_layer(&config);
    let app_state = (pool, config);

    Router::new()
        .route("/health", get(health_check))
        // Identity and interests
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route("/api/users/me", put(users::update_me))
        .route("/api/users/{id}", get(users::get_user))
        .route("/api/users/by-world/{address}", get(users::get_user_by_world_address))
        .route("/api/users/me/world-address", put(users::link_world_address))
        .route(
            "/api/users/me/interests",
            get(users::get_my_interests).put(users::replace_my_interests),
        )
        .route(
            "/api/interests",
            get(interests::list_interests).post(interests::create_interest),
        )
        // Likes and matches
        .route(
            "/api/likes",
            get(likes::list_likes_received).post(likes::record_like),
        )
        .route("/api/matches", get(likes::get_matches))
        // Daily picks
        .route("/api/daily-picks", get(daily_picks::get_daily_picks))
        .route("/api/daily-picks/refresh", post(daily_picks::refresh_daily_picks))
        // Messaging
        .route("/api/messages", post(conversations::send_message))
        .route("/api/conversations", get(conversations::list_conversations))
        .route(
            "/api/conversations/{id}/messages",
            get(conversations::list_messages),
        )
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

fn create_cors_layer(config: &Config) -> CorsLayer {
    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(false);

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if !origins.is_empty() {
        cors = cors.allow_origin(origins);
    } else {
        // Default to permissive for development
        cors = cors.allow_origin(Any);
    }

    cors
}

async fn health_check() -> &'static str {
    "OK"
}
