use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    CreateSession, CreateSet, ReorderSet, Session, SessionFilters, SessionSort, SessionStatus,
    SessionWithDetails, Set, SetWithExercise, UpdateSession, UpdateSet,
};

const SESSION_COLUMNS: &str = "id, user_id, workout_id, status, started_at, ended_at, \
                               duration_minutes, notes, created_at";

#[derive(Clone)]
pub struct SessionService {
    db: PgPool,
}

impl SessionService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Start a session for a workout: status active, clock running.
    pub async fn create_session(
        &self,
        user_id: Uuid,
        request: CreateSession,
    ) -> Result<Session, AppError> {
        let workout: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM workouts WHERE id = $1 AND user_id = $2")
                .bind(request.workout_id)
                .bind(user_id)
                .fetch_optional(&self.db)
                .await?;
        workout.ok_or(AppError::NotFound("workout"))?;

        let session = sqlx::query_as::<_, Session>(&format!(
            r#"
            INSERT INTO sessions (user_id, workout_id, status, started_at, notes)
            VALUES ($1, $2, 'active', $3, $4)
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(request.workout_id)
        .bind(Utc::now())
        .bind(request.notes)
        .fetch_one(&self.db)
        .await?;

        info!(session_id = %session.id, workout_id = %session.workout_id, "started session");
        Ok(session)
    }

    pub async fn get_sessions(
        &self,
        user_id: Uuid,
        filters: SessionFilters,
    ) -> Result<Vec<SessionWithDetails>, AppError> {
        let mut query = format!(
            "SELECT s.id, s.user_id, s.workout_id, s.status, s.started_at, s.ended_at, \
                    s.duration_minutes, s.notes, s.created_at, w.name AS workout_name \
             FROM sessions s \
             JOIN workouts w ON w.id = s.workout_id \
             WHERE s.user_id = $1"
        );
        let mut param_count = 2;

        if filters.workout_id.is_some() {
            query.push_str(&format!(" AND s.workout_id = ${param_count}"));
            param_count += 1;
        }
        if filters.date_from.is_some() {
            query.push_str(&format!(" AND s.started_at::date >= ${param_count}"));
            param_count += 1;
        }
        if filters.date_to.is_some() {
            query.push_str(&format!(" AND s.started_at::date <= ${param_count}"));
            param_count += 1;
        }
        if filters.status.is_some() {
            query.push_str(&format!(" AND s.status = ${param_count}"));
        }

        query.push_str(match filters.sort {
            SessionSort::DateAsc => " ORDER BY s.started_at ASC",
            SessionSort::DurationAsc => " ORDER BY s.duration_minutes ASC NULLS FIRST",
            SessionSort::DurationDesc => " ORDER BY s.duration_minutes DESC NULLS LAST",
            SessionSort::WorkoutNameAsc => " ORDER BY w.name ASC",
            SessionSort::WorkoutNameDesc => " ORDER BY w.name DESC",
            // Volume ordering happens after the sets are loaded.
            SessionSort::DateDesc | SessionSort::VolumeAsc | SessionSort::VolumeDesc => {
                " ORDER BY s.started_at DESC"
            }
        });

        let mut query_builder = sqlx::query_as::<_, SessionRow>(&query).bind(user_id);
        if let Some(workout_id) = filters.workout_id {
            query_builder = query_builder.bind(workout_id);
        }
        if let Some(date_from) = filters.date_from {
            query_builder = query_builder.bind(date_from);
        }
        if let Some(date_to) = filters.date_to {
            query_builder = query_builder.bind(date_to);
        }
        if let Some(status) = filters.status {
            query_builder = query_builder.bind(status);
        }

        let rows = query_builder.fetch_all(&self.db).await?;

        let session_ids: Vec<Uuid> = rows.iter().map(|r| r.session.id).collect();
        let sets = self.get_sets_for_sessions(&session_ids).await?;

        let mut by_session: HashMap<Uuid, Vec<SetWithExercise>> = HashMap::new();
        for set in sets {
            by_session.entry(set.session_id).or_default().push(set);
        }

        let mut result: Vec<SessionWithDetails> = rows
            .into_iter()
            .map(|row| {
                let mut own = by_session.remove(&row.session.id).unwrap_or_default();
                own.sort_by_key(|s| s.order_index);
                assemble(row, own)
            })
            .collect();

        match filters.sort {
            SessionSort::VolumeAsc => {
                result.sort_by(|a, b| a.total_volume.total_cmp(&b.total_volume))
            }
            SessionSort::VolumeDesc => {
                result.sort_by(|a, b| b.total_volume.total_cmp(&a.total_volume))
            }
            _ => {}
        }

        Ok(result)
    }

    pub async fn get_session_by_id(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<SessionWithDetails, AppError> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT s.id, s.user_id, s.workout_id, s.status, s.started_at, s.ended_at, \
                    s.duration_minutes, s.notes, s.created_at, w.name AS workout_name \
             FROM sessions s \
             JOIN workouts w ON w.id = s.workout_id \
             WHERE s.id = $1 AND s.user_id = $2",
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::NotFound("session"))?;

        let mut sets = self.get_sets_for_sessions(&[session_id]).await?;
        sets.sort_by_key(|s| s.order_index);

        Ok(assemble(row, sets))
    }

    pub async fn update_session(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        request: UpdateSession,
    ) -> Result<Session, AppError> {
        request.validate()?;

        let session = sqlx::query_as::<_, Session>(&format!(
            r#"
            UPDATE sessions
            SET notes = COALESCE($3, notes),
                duration_minutes = COALESCE($4, duration_minutes)
            WHERE id = $1 AND user_id = $2
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(session_id)
        .bind(user_id)
        .bind(request.notes)
        .bind(request.duration_minutes)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::NotFound("session"))?;

        Ok(session)
    }

    pub async fn delete_session(&self, user_id: Uuid, session_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1 AND user_id = $2")
            .bind(session_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("session"));
        }
        Ok(())
    }

    /// Apply a lifecycle transition. Terminal transitions stamp `ended_at`;
    /// completing a session derives `duration_minutes` when the client did
    /// not track it.
    pub async fn transition_session(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        next: SessionStatus,
    ) -> Result<Session, AppError> {
        let current = self.get_session_row(user_id, session_id).await?;

        if !current.status.can_transition_to(next) {
            return Err(AppError::validation(format!(
                "cannot transition session from {} to {}",
                current.status.as_str(),
                next.as_str()
            )));
        }

        let now = Utc::now();
        let (ended_at, duration_minutes) = match next {
            SessionStatus::Completed => {
                let duration = current.duration_minutes.unwrap_or_else(|| {
                    ((now - current.started_at).num_seconds() / 60) as i32
                });
                (Some(now), Some(duration))
            }
            SessionStatus::Cancelled => (Some(now), current.duration_minutes),
            SessionStatus::Active | SessionStatus::Paused => (None, current.duration_minutes),
        };

        let session = sqlx::query_as::<_, Session>(&format!(
            r#"
            UPDATE sessions
            SET status = $3, ended_at = $4, duration_minutes = $5
            WHERE id = $1 AND user_id = $2
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(session_id)
        .bind(user_id)
        .bind(next)
        .bind(ended_at)
        .bind(duration_minutes)
        .fetch_one(&self.db)
        .await?;

        info!(session_id = %session_id, status = next.as_str(), "session transition");
        Ok(session)
    }

    /// Append a set. Only an active session accepts sets; the exercise must
    /// be visible to the session's owner.
    pub async fn add_set(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        request: CreateSet,
    ) -> Result<SetWithExercise, AppError> {
        request.validate()?;

        let session = self.get_session_row(user_id, session_id).await?;
        if !session.status.accepts_sets() {
            return Err(AppError::validation(format!(
                "only an active session accepts new sets (status: {})",
                session.status.as_str()
            )));
        }

        let visible: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM exercises WHERE id = $1 AND (user_id = $2 OR user_id IS NULL)",
        )
        .bind(request.exercise_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        visible.ok_or(AppError::NotFound("exercise"))?;

        let order_index = match request.order_index {
            Some(order) => order,
            None => {
                let max: Option<i32> =
                    sqlx::query_scalar("SELECT MAX(order_index) FROM sets WHERE session_id = $1")
                        .bind(session_id)
                        .fetch_one(&self.db)
                        .await?;
                max.unwrap_or(0) + 1
            }
        };

        let set = sqlx::query_as::<_, Set>(
            r#"
            INSERT INTO sets (session_id, exercise_id, weight, reps, notes, rest_time_seconds, order_index)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, session_id, exercise_id, weight, reps, notes, rest_time_seconds,
                      order_index, completed
            "#,
        )
        .bind(session_id)
        .bind(request.exercise_id)
        .bind(request.weight)
        .bind(request.reps)
        .bind(request.notes)
        .bind(request.rest_time_seconds)
        .bind(order_index)
        .fetch_one(&self.db)
        .await?;

        self.get_set_with_exercise(set.id).await
    }

    pub async fn update_set(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        set_id: Uuid,
        request: UpdateSet,
    ) -> Result<SetWithExercise, AppError> {
        request.validate()?;
        self.assert_set_owned(user_id, session_id, set_id).await?;

        sqlx::query(
            r#"
            UPDATE sets
            SET weight = COALESCE($2, weight),
                reps = COALESCE($3, reps),
                notes = COALESCE($4, notes),
                rest_time_seconds = COALESCE($5, rest_time_seconds),
                completed = COALESCE($6, completed),
                order_index = COALESCE($7, order_index)
            WHERE id = $1
            "#,
        )
        .bind(set_id)
        .bind(request.weight)
        .bind(request.reps)
        .bind(request.notes)
        .bind(request.rest_time_seconds)
        .bind(request.completed)
        .bind(request.order_index)
        .execute(&self.db)
        .await?;

        self.get_set_with_exercise(set_id).await
    }

    pub async fn remove_set(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        set_id: Uuid,
    ) -> Result<(), AppError> {
        self.assert_set_owned(user_id, session_id, set_id).await?;

        sqlx::query("DELETE FROM sets WHERE id = $1")
            .bind(set_id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    pub async fn reorder_sets(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        items: Vec<ReorderSet>,
    ) -> Result<(), AppError> {
        self.get_session_row(user_id, session_id).await?;

        for item in items {
            sqlx::query("UPDATE sets SET order_index = $3 WHERE id = $1 AND session_id = $2")
                .bind(item.set_id)
                .bind(session_id)
                .bind(item.new_order)
                .execute(&self.db)
                .await?;
        }
        Ok(())
    }

    async fn get_session_row(&self, user_id: Uuid, session_id: Uuid) -> Result<Session, AppError> {
        let session = sqlx::query_as::<_, Session>(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = $1 AND user_id = $2"
        ))
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::NotFound("session"))?;

        Ok(session)
    }

    async fn assert_set_owned(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        set_id: Uuid,
    ) -> Result<(), AppError> {
        let exists: Option<Uuid> = sqlx::query_scalar(
            "SELECT st.id FROM sets st \
             JOIN sessions s ON s.id = st.session_id \
             WHERE st.id = $1 AND st.session_id = $2 AND s.user_id = $3",
        )
        .bind(set_id)
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        exists.map(|_| ()).ok_or(AppError::NotFound("set"))
    }

    async fn get_set_with_exercise(&self, set_id: Uuid) -> Result<SetWithExercise, AppError> {
        let set = sqlx::query_as::<_, SetWithExercise>(
            "SELECT st.id, st.session_id, st.exercise_id, st.weight, st.reps, st.notes, \
                    st.rest_time_seconds, st.order_index, st.completed, \
                    e.name AS exercise_name, e.muscle_group, e.exercise_type \
             FROM sets st \
             JOIN exercises e ON e.id = st.exercise_id \
             WHERE st.id = $1",
        )
        .bind(set_id)
        .fetch_one(&self.db)
        .await?;

        Ok(set)
    }

    async fn get_sets_for_sessions(
        &self,
        session_ids: &[Uuid],
    ) -> Result<Vec<SetWithExercise>, AppError> {
        if session_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sets = sqlx::query_as::<_, SetWithExercise>(
            "SELECT st.id, st.session_id, st.exercise_id, st.weight, st.reps, st.notes, \
                    st.rest_time_seconds, st.order_index, st.completed, \
                    e.name AS exercise_name, e.muscle_group, e.exercise_type \
             FROM sets st \
             JOIN exercises e ON e.id = st.exercise_id \
             WHERE st.session_id = ANY($1)",
        )
        .bind(session_ids)
        .fetch_all(&self.db)
        .await?;

        Ok(sets)
    }
}

/// Session joined with its workout name, as listings fetch it.
#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    #[sqlx(flatten)]
    session: Session,
    workout_name: String,
}

fn assemble(row: SessionRow, sets: Vec<SetWithExercise>) -> SessionWithDetails {
    let total_volume = sets.iter().map(SetWithExercise::volume).sum();
    SessionWithDetails {
        session: row.session,
        workout_name: row.workout_name,
        total_sets: sets.len(),
        total_volume,
        sets,
    }
}
