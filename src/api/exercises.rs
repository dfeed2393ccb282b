use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Extension, Router,
};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::{
    CreateExercise, Exercise, ExerciseFilters, MuscleGroupCount, UpdateExercise,
};
use crate::services::ExerciseService;

pub fn exercise_routes(service: ExerciseService) -> Router {
    Router::new()
        .route("/", get(list_exercises).post(create_exercise))
        .route("/counts", get(muscle_group_counts))
        .route(
            "/:id",
            put(update_exercise).get(get_exercise).delete(delete_exercise),
        )
        .with_state(service)
}

async fn list_exercises(
    State(service): State<ExerciseService>,
    Extension(user): Extension<AuthUser>,
    Query(filters): Query<ExerciseFilters>,
) -> Result<Json<Vec<Exercise>>, AppError> {
    let exercises = service.get_exercises(user.0, filters).await?;
    Ok(Json(exercises))
}

async fn get_exercise(
    State(service): State<ExerciseService>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Exercise>, AppError> {
    let exercise = service.get_exercise_by_id(user.0, id).await?;
    Ok(Json(exercise))
}

async fn create_exercise(
    State(service): State<ExerciseService>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateExercise>,
) -> Result<(StatusCode, Json<Exercise>), AppError> {
    let exercise = service.create_exercise(user.0, request).await?;
    Ok((StatusCode::CREATED, Json(exercise)))
}

async fn update_exercise(
    State(service): State<ExerciseService>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateExercise>,
) -> Result<Json<Exercise>, AppError> {
    let exercise = service.update_exercise(user.0, id, request).await?;
    Ok(Json(exercise))
}

async fn delete_exercise(
    State(service): State<ExerciseService>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    service.delete_exercise(user.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn muscle_group_counts(
    State(service): State<ExerciseService>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<MuscleGroupCount>>, AppError> {
    let counts = service.count_by_muscle_group(user.0).await?;
    Ok(Json(counts))
}
