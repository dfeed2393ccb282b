use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    CreateExercise, Exercise, ExerciseFilters, MuscleGroupCount, UpdateExercise,
};

const EXERCISE_COLUMNS: &str =
    "id, user_id, name, muscle_group, exercise_type, notes, created_at, deleted_at";

#[derive(Clone)]
pub struct ExerciseService {
    db: PgPool,
}

impl ExerciseService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create_exercise(
        &self,
        user_id: Uuid,
        request: CreateExercise,
    ) -> Result<Exercise, AppError> {
        request.validate()?;

        let exercise = sqlx::query_as::<_, Exercise>(&format!(
            r#"
            INSERT INTO exercises (user_id, name, muscle_group, exercise_type, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {EXERCISE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(request.name.trim())
        .bind(request.muscle_group)
        .bind(request.exercise_type)
        .bind(request.notes)
        .fetch_one(&self.db)
        .await?;

        info!(exercise_id = %exercise.id, "created exercise");
        Ok(exercise)
    }

    /// Active (non-deleted) exercises visible to the user: their own plus
    /// the global catalog. Ordered by name.
    pub async fn get_exercises(
        &self,
        user_id: Uuid,
        filters: ExerciseFilters,
    ) -> Result<Vec<Exercise>, AppError> {
        let mut query = format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises \
             WHERE (user_id = $1 OR user_id IS NULL) AND deleted_at IS NULL"
        );
        let mut param_count = 2;

        if filters.muscle_group.is_some() {
            query.push_str(&format!(" AND muscle_group = ${param_count}"));
            param_count += 1;
        }
        if filters.exercise_type.is_some() {
            query.push_str(&format!(" AND exercise_type = ${param_count}"));
            param_count += 1;
        }
        if filters.search.is_some() {
            query.push_str(&format!(" AND name ILIKE ${param_count}"));
        }

        query.push_str(" ORDER BY name");

        let mut query_builder = sqlx::query_as::<_, Exercise>(&query).bind(user_id);

        if let Some(muscle_group) = filters.muscle_group {
            query_builder = query_builder.bind(muscle_group);
        }
        if let Some(exercise_type) = filters.exercise_type {
            query_builder = query_builder.bind(exercise_type);
        }
        if let Some(search) = filters.search {
            query_builder = query_builder.bind(format!("%{search}%"));
        }

        let exercises = query_builder.fetch_all(&self.db).await?;
        Ok(exercises)
    }

    /// Fetch by id, soft-deleted rows included so historical set references
    /// stay resolvable.
    pub async fn get_exercise_by_id(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
    ) -> Result<Exercise, AppError> {
        let exercise = sqlx::query_as::<_, Exercise>(&format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises \
             WHERE id = $1 AND (user_id = $2 OR user_id IS NULL)"
        ))
        .bind(exercise_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::NotFound("exercise"))?;

        Ok(exercise)
    }

    pub async fn update_exercise(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
        request: UpdateExercise,
    ) -> Result<Exercise, AppError> {
        request.validate()?;

        let existing = self.get_exercise_by_id(user_id, exercise_id).await?;
        if existing.is_global() {
            return Err(AppError::Forbidden);
        }

        let exercise = sqlx::query_as::<_, Exercise>(&format!(
            r#"
            UPDATE exercises
            SET name = COALESCE($3, name),
                muscle_group = COALESCE($4, muscle_group),
                exercise_type = COALESCE($5, exercise_type),
                notes = COALESCE($6, notes)
            WHERE id = $1 AND user_id = $2
            RETURNING {EXERCISE_COLUMNS}
            "#
        ))
        .bind(exercise_id)
        .bind(user_id)
        .bind(request.name.map(|n| n.trim().to_string()))
        .bind(request.muscle_group)
        .bind(request.exercise_type)
        .bind(request.notes)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::NotFound("exercise"))?;

        Ok(exercise)
    }

    /// Soft delete: historical sets keep referencing the row.
    pub async fn delete_exercise(&self, user_id: Uuid, exercise_id: Uuid) -> Result<(), AppError> {
        let existing = self.get_exercise_by_id(user_id, exercise_id).await?;
        if existing.is_global() {
            return Err(AppError::Forbidden);
        }

        sqlx::query("UPDATE exercises SET deleted_at = $3 WHERE id = $1 AND user_id = $2")
            .bind(exercise_id)
            .bind(user_id)
            .bind(Utc::now())
            .execute(&self.db)
            .await?;

        info!(exercise_id = %exercise_id, "soft-deleted exercise");
        Ok(())
    }

    pub async fn count_by_muscle_group(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<MuscleGroupCount>, AppError> {
        let counts = sqlx::query_as::<_, MuscleGroupCount>(
            "SELECT muscle_group, COUNT(*) AS count FROM exercises \
             WHERE (user_id = $1 OR user_id IS NULL) AND deleted_at IS NULL \
             GROUP BY muscle_group ORDER BY count DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(counts)
    }
}
