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
    CreateSession, CreateSet, ReorderSet, Session, SessionFilters, SessionStatus,
    SessionWithDetails, SetWithExercise, UpdateSession, UpdateSet,
};
use crate::services::SessionService;

pub fn session_routes(service: SessionService) -> Router {
    Router::new()
        .route("/", get(list_sessions).post(create_session))
        .route(
            "/:id",
            get(get_session).put(update_session).delete(delete_session),
        )
        .route("/:id/complete", post(complete_session))
        .route("/:id/cancel", post(cancel_session))
        .route("/:id/pause", post(pause_session))
        .route("/:id/resume", post(resume_session))
        .route("/:id/sets", post(add_set))
        .route("/:id/sets/reorder", put(reorder_sets))
        .route(
            "/:id/sets/:set_id",
            put(update_set).delete(remove_set),
        )
        .with_state(service)
}

async fn list_sessions(
    State(service): State<SessionService>,
    Extension(user): Extension<AuthUser>,
    Query(filters): Query<SessionFilters>,
) -> Result<Json<Vec<SessionWithDetails>>, AppError> {
    let sessions = service.get_sessions(user.0, filters).await?;
    Ok(Json(sessions))
}

async fn get_session(
    State(service): State<SessionService>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionWithDetails>, AppError> {
    let session = service.get_session_by_id(user.0, id).await?;
    Ok(Json(session))
}

async fn create_session(
    State(service): State<SessionService>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateSession>,
) -> Result<(StatusCode, Json<Session>), AppError> {
    let session = service.create_session(user.0, request).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn update_session(
    State(service): State<SessionService>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSession>,
) -> Result<Json<Session>, AppError> {
    let session = service.update_session(user.0, id, request).await?;
    Ok(Json(session))
}

async fn delete_session(
    State(service): State<SessionService>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    service.delete_session(user.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn complete_session(
    State(service): State<SessionService>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Session>, AppError> {
    let session = service
        .transition_session(user.0, id, SessionStatus::Completed)
        .await?;
    Ok(Json(session))
}

async fn cancel_session(
    State(service): State<SessionService>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Session>, AppError> {
    let session = service
        .transition_session(user.0, id, SessionStatus::Cancelled)
        .await?;
    Ok(Json(session))
}

async fn pause_session(
    State(service): State<SessionService>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Session>, AppError> {
    let session = service
        .transition_session(user.0, id, SessionStatus::Paused)
        .await?;
    Ok(Json(session))
}

async fn resume_session(
    State(service): State<SessionService>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Session>, AppError> {
    let session = service
        .transition_session(user.0, id, SessionStatus::Active)
        .await?;
    Ok(Json(session))
}

async fn add_set(
    State(service): State<SessionService>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateSet>,
) -> Result<(StatusCode, Json<SetWithExercise>), AppError> {
    let set = service.add_set(user.0, id, request).await?;
    Ok((StatusCode::CREATED, Json(set)))
}

async fn update_set(
    State(service): State<SessionService>,
    Extension(user): Extension<AuthUser>,
    Path((id, set_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateSet>,
) -> Result<Json<SetWithExercise>, AppError> {
    let set = service.update_set(user.0, id, set_id, request).await?;
    Ok(Json(set))
}

async fn remove_set(
    State(service): State<SessionService>,
    Extension(user): Extension<AuthUser>,
    Path((id, set_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    service.remove_set(user.0, id, set_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn reorder_sets(
    State(service): State<SessionService>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(items): Json<Vec<ReorderSet>>,
) -> Result<StatusCode, AppError> {
    service.reorder_sets(user.0, id, items).await?;
    Ok(StatusCode::NO_CONTENT)
}
