use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::{
    AddWorkoutExercise, CreateWorkout, ReorderWorkoutExercise, UpdateWorkout, Workout,
    WorkoutExercise, WorkoutFilters, WorkoutWithExercises,
};
use crate::services::WorkoutService;

pub fn workout_routes(service: WorkoutService) -> Router {
    Router::new()
        .route("/", get(list_workouts).post(create_workout))
        .route(
            "/:id",
            get(get_workout).put(update_workout).delete(delete_workout),
        )
        .route("/:id/exercises", post(add_exercise))
        .route("/:id/exercises/reorder", put(reorder_exercises))
        .route(
            "/:id/exercises/:workout_exercise_id",
            axum::routing::delete(remove_exercise),
        )
        .with_state(service)
}

async fn list_workouts(
    State(service): State<WorkoutService>,
    Extension(user): Extension<AuthUser>,
    Query(filters): Query<WorkoutFilters>,
) -> Result<Json<Vec<WorkoutWithExercises>>, AppError> {
    let workouts = service.get_workouts(user.0, filters).await?;
    Ok(Json(workouts))
}

async fn get_workout(
    State(service): State<WorkoutService>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkoutWithExercises>, AppError> {
    let workout = service.get_workout_by_id(user.0, id).await?;
    Ok(Json(workout))
}

async fn create_workout(
    State(service): State<WorkoutService>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateWorkout>,
) -> Result<(StatusCode, Json<WorkoutWithExercises>), AppError> {
    let workout = service.create_workout(user.0, request).await?;
    Ok((StatusCode::CREATED, Json(workout)))
}

async fn update_workout(
    State(service): State<WorkoutService>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateWorkout>,
) -> Result<Json<Workout>, AppError> {
    let workout = service.update_workout(user.0, id, request).await?;
    Ok(Json(workout))
}

async fn delete_workout(
    State(service): State<WorkoutService>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    service.delete_workout(user.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_exercise(
    State(service): State<WorkoutService>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddWorkoutExercise>,
) -> Result<(StatusCode, Json<WorkoutExercise>), AppError> {
    let row = service.add_exercise(user.0, id, request).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

async fn remove_exercise(
    State(service): State<WorkoutService>,
    Extension(user): Extension<AuthUser>,
    Path((id, workout_exercise_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    service
        .remove_exercise(user.0, id, workout_exercise_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn reorder_exercises(
    State(service): State<WorkoutService>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(items): Json<Vec<ReorderWorkoutExercise>>,
) -> Result<StatusCode, AppError> {
    service.reorder_exercises(user.0, id, items).await?;
    Ok(StatusCode::NO_CONTENT)
}
