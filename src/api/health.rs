use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};
use sqlx::PgPool;

/// Liveness plus a database round trip.
pub async fn health_check(State(db): State<PgPool>) -> (StatusCode, Json<Value>) {
    let db_ok = sqlx::query("SELECT 1").execute(&db).await.is_ok();
    let status = if db_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if db_ok { "ok" } else { "degraded" },
            "database": db_ok,
        })),
    )
}
