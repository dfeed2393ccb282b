use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::{ExerciseStats, FrequencyBucket, SessionStats};
use crate::services::StatsService;

pub fn stats_routes(service: StatsService) -> Router {
    Router::new()
        .route("/summary", get(session_summary))
        .route("/exercises", get(exercise_stats))
        .route("/frequency", get(frequency))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
struct ExerciseStatsQuery {
    exercise_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
struct FrequencyQuery {
    days: Option<i64>,
}

async fn session_summary(
    State(service): State<StatsService>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SessionStats>, AppError> {
    let stats = service.get_session_stats(user.0).await?;
    Ok(Json(stats))
}

async fn exercise_stats(
    State(service): State<StatsService>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ExerciseStatsQuery>,
) -> Result<Json<Vec<ExerciseStats>>, AppError> {
    let stats = service.get_exercise_stats(user.0, query.exercise_id).await?;
    Ok(Json(stats))
}

async fn frequency(
    State(service): State<StatsService>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<FrequencyQuery>,
) -> Result<Json<Vec<FrequencyBucket>>, AppError> {
    let buckets = service
        .get_frequency(user.0, query.days.unwrap_or(90))
        .await?;
    Ok(Json(buckets))
}
