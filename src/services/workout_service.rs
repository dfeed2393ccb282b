use sqlx::PgPool;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    AddWorkoutExercise, CreateWorkout, ReorderWorkoutExercise, UpdateWorkout, Workout,
    WorkoutExercise, WorkoutExerciseDetail, WorkoutFilters, WorkoutSort, WorkoutWithExercises,
};

#[derive(Clone)]
pub struct WorkoutService {
    db: PgPool,
}

impl WorkoutService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create_workout(
        &self,
        user_id: Uuid,
        request: CreateWorkout,
    ) -> Result<WorkoutWithExercises, AppError> {
        request.validate()?;

        // Check the initial exercises up front so a bad id does not leave a
        // half-composed workout behind.
        for exercise_id in &request.exercise_ids {
            self.assert_exercise_visible(user_id, *exercise_id).await?;
        }

        let workout = sqlx::query_as::<_, Workout>(
            "INSERT INTO workouts (user_id, name) VALUES ($1, $2) \
             RETURNING id, user_id, name, created_at",
        )
        .bind(user_id)
        .bind(request.name.trim())
        .fetch_one(&self.db)
        .await?;

        for (position, exercise_id) in request.exercise_ids.iter().enumerate() {
            self.insert_workout_exercise(workout.id, *exercise_id, position as i32 + 1)
                .await?;
        }

        info!(workout_id = %workout.id, "created workout");
        self.get_workout_by_id(user_id, workout.id).await
    }

    pub async fn get_workouts(
        &self,
        user_id: Uuid,
        filters: WorkoutFilters,
    ) -> Result<Vec<WorkoutWithExercises>, AppError> {
        let mut query =
            "SELECT id, user_id, name, created_at FROM workouts WHERE user_id = $1".to_string();

        if filters.search.is_some() {
            query.push_str(" AND name ILIKE $2");
        }

        query.push_str(match filters.sort {
            WorkoutSort::NameAsc => " ORDER BY name ASC",
            WorkoutSort::NameDesc => " ORDER BY name DESC",
            WorkoutSort::CreatedAtAsc => " ORDER BY created_at ASC",
            // Exercise-count ordering happens after the join rows are loaded.
            WorkoutSort::CreatedAtDesc
            | WorkoutSort::ExerciseCountAsc
            | WorkoutSort::ExerciseCountDesc => " ORDER BY created_at DESC",
        });

        let mut query_builder = sqlx::query_as::<_, Workout>(&query).bind(user_id);
        if let Some(search) = &filters.search {
            query_builder = query_builder.bind(format!("%{search}%"));
        }
        let workouts = query_builder.fetch_all(&self.db).await?;

        let workout_ids: Vec<Uuid> = workouts.iter().map(|w| w.id).collect();
        let exercises = self.get_exercises_for_workouts(&workout_ids).await?;

        let mut by_workout: HashMap<Uuid, Vec<WorkoutExerciseDetail>> = HashMap::new();
        for detail in exercises {
            by_workout.entry(detail.workout_id).or_default().push(detail);
        }

        let mut result: Vec<WorkoutWithExercises> = workouts
            .into_iter()
            .map(|workout| {
                let mut own = by_workout.remove(&workout.id).unwrap_or_default();
                own.sort_by_key(|e| e.order_index);
                WorkoutWithExercises {
                    exercise_count: own.len(),
                    exercises: own,
                    workout,
                }
            })
            .collect();

        match filters.sort {
            WorkoutSort::ExerciseCountAsc => result.sort_by_key(|w| w.exercise_count),
            WorkoutSort::ExerciseCountDesc => {
                result.sort_by_key(|w| std::cmp::Reverse(w.exercise_count))
            }
            _ => {}
        }

        Ok(result)
    }

    pub async fn get_workout_by_id(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
    ) -> Result<WorkoutWithExercises, AppError> {
        let workout = sqlx::query_as::<_, Workout>(
            "SELECT id, user_id, name, created_at FROM workouts WHERE id = $1 AND user_id = $2",
        )
        .bind(workout_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::NotFound("workout"))?;

        let mut exercises = self.get_exercises_for_workouts(&[workout.id]).await?;
        exercises.sort_by_key(|e| e.order_index);

        Ok(WorkoutWithExercises {
            exercise_count: exercises.len(),
            exercises,
            workout,
        })
    }

    pub async fn update_workout(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
        request: UpdateWorkout,
    ) -> Result<Workout, AppError> {
        request.validate()?;

        let workout = sqlx::query_as::<_, Workout>(
            "UPDATE workouts SET name = COALESCE($3, name) \
             WHERE id = $1 AND user_id = $2 \
             RETURNING id, user_id, name, created_at",
        )
        .bind(workout_id)
        .bind(user_id)
        .bind(request.name.map(|n| n.trim().to_string()))
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::NotFound("workout"))?;

        Ok(workout)
    }

    pub async fn delete_workout(&self, user_id: Uuid, workout_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1 AND user_id = $2")
            .bind(workout_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("workout"));
        }

        info!(workout_id = %workout_id, "deleted workout");
        Ok(())
    }

    /// Append an exercise to a workout. When no order is given the exercise
    /// lands after the current last one.
    pub async fn add_exercise(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
        request: AddWorkoutExercise,
    ) -> Result<WorkoutExercise, AppError> {
        self.assert_owned(user_id, workout_id).await?;
        self.assert_exercise_visible(user_id, request.exercise_id)
            .await?;

        let order_index = match request.order_index {
            Some(order) => order,
            None => {
                let max: Option<i32> = sqlx::query_scalar(
                    "SELECT MAX(order_index) FROM workout_exercises WHERE workout_id = $1",
                )
                .bind(workout_id)
                .fetch_one(&self.db)
                .await?;
                max.unwrap_or(0) + 1
            }
        };

        let row = sqlx::query_as::<_, WorkoutExercise>(
            "INSERT INTO workout_exercises (workout_id, exercise_id, order_index) \
             VALUES ($1, $2, $3) \
             RETURNING id, workout_id, exercise_id, order_index",
        )
        .bind(workout_id)
        .bind(request.exercise_id)
        .bind(order_index)
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    pub async fn remove_exercise(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
        workout_exercise_id: Uuid,
    ) -> Result<(), AppError> {
        self.assert_owned(user_id, workout_id).await?;

        let result =
            sqlx::query("DELETE FROM workout_exercises WHERE id = $1 AND workout_id = $2")
                .bind(workout_exercise_id)
                .bind(workout_id)
                .execute(&self.db)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("workout exercise"));
        }
        Ok(())
    }

    pub async fn reorder_exercises(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
        items: Vec<ReorderWorkoutExercise>,
    ) -> Result<(), AppError> {
        self.assert_owned(user_id, workout_id).await?;

        for item in items {
            sqlx::query(
                "UPDATE workout_exercises SET order_index = $3 WHERE id = $1 AND workout_id = $2",
            )
            .bind(item.workout_exercise_id)
            .bind(workout_id)
            .bind(item.new_order)
            .execute(&self.db)
            .await?;
        }
        Ok(())
    }

    async fn assert_owned(&self, user_id: Uuid, workout_id: Uuid) -> Result<(), AppError> {
        let exists: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM workouts WHERE id = $1 AND user_id = $2")
                .bind(workout_id)
                .bind(user_id)
                .fetch_optional(&self.db)
                .await?;

        exists.map(|_| ()).ok_or(AppError::NotFound("workout"))
    }

    /// A workout may only reference exercises its owner can see: their own
    /// live exercises or the global catalog. Soft-deleted exercises are out.
    async fn assert_exercise_visible(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
    ) -> Result<(), AppError> {
        let visible: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM exercises \
             WHERE id = $1 AND (user_id = $2 OR user_id IS NULL) AND deleted_at IS NULL",
        )
        .bind(exercise_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        visible.map(|_| ()).ok_or(AppError::NotFound("exercise"))
    }

    async fn insert_workout_exercise(
        &self,
        workout_id: Uuid,
        exercise_id: Uuid,
        order_index: i32,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO workout_exercises (workout_id, exercise_id, order_index) \
             VALUES ($1, $2, $3)",
        )
        .bind(workout_id)
        .bind(exercise_id)
        .bind(order_index)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn get_exercises_for_workouts(
        &self,
        workout_ids: &[Uuid],
    ) -> Result<Vec<WorkoutExerciseDetail>, AppError> {
        if workout_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, WorkoutExerciseDetail>(
            "SELECT we.id, we.workout_id, we.exercise_id, we.order_index, \
                    e.name AS exercise_name, e.muscle_group, e.exercise_type \
             FROM workout_exercises we \
             JOIN exercises e ON e.id = we.exercise_id \
             WHERE we.workout_id = ANY($1)",
        )
        .bind(workout_ids)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }
}
