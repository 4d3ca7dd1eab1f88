// src/routes.rs

use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{quiz, result},
    state::AppState,
};

async fn home() -> &'static str {
    "Quiz API is running!"
}

/// Assembles the main application router.
///
/// * Nests the quiz and result sub-routers under /api.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database Pool + Config).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let quiz_routes = Router::new()
        .route("/", post(quiz::create_quiz).get(quiz::list_quizzes))
        .route("/{id}", get(quiz::get_quiz))
        .route("/{id}/submit", post(result::submit_answers))
        .route("/{id}/results", get(result::list_results));

    let result_routes = Router::new().route("/{id}", get(result::get_result));

    Router::new()
        .route("/", get(home))
        .nest("/api/quizzes", quiz_routes)
        .nest("/api/results", result_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
