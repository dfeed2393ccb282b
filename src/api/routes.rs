use axum::{middleware, routing::get, Router};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::exercises::exercise_routes;
use super::health::health_check;
use super::sessions::session_routes;
use super::stats::stats_routes;
use super::workouts::workout_routes;
use crate::auth::{jwt_auth_middleware, JwtValidator};
use crate::services::{ExerciseService, SessionService, StatsService, WorkoutService};

pub fn create_routes(db: PgPool, jwt_secret: &str) -> Router {
    let validator = JwtValidator::new(jwt_secret);

    let api = Router::new()
        .nest("/exercises", exercise_routes(ExerciseService::new(db.clone())))
        .nest("/workouts", workout_routes(WorkoutService::new(db.clone())))
        .nest("/sessions", session_routes(SessionService::new(db.clone())))
        .nest("/stats", stats_routes(StatsService::new(db.clone())))
        .layer(middleware::from_fn_with_state(
            validator,
            jwt_auth_middleware,
        ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .with_state(db)
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
