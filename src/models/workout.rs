use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Workout {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Join row tying an exercise into a workout. `order_index` is a display
/// sequence hint, not a strictly enforced unique position.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkoutExercise {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub exercise_id: Uuid,
    pub order_index: i32,
}

/// Join row plus the exercise fields listings want to show.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WorkoutExerciseDetail {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub exercise_id: Uuid,
    pub order_index: i32,
    pub exercise_name: String,
    pub muscle_group: Option<String>,
    pub exercise_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkoutWithExercises {
    #[serde(flatten)]
    pub workout: Workout,
    pub exercises: Vec<WorkoutExerciseDetail>,
    pub exercise_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorkout {
    pub name: String,
    /// Optional initial exercises, appended in the given order.
    #[serde(default)]
    pub exercise_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateWorkout {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddWorkoutExercise {
    pub exercise_id: Uuid,
    pub order_index: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReorderWorkoutExercise {
    pub workout_exercise_id: Uuid,
    pub new_order: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutSort {
    NameAsc,
    NameDesc,
    CreatedAtAsc,
    #[default]
    CreatedAtDesc,
    ExerciseCountAsc,
    ExerciseCountDesc,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkoutFilters {
    pub search: Option<String>,
    #[serde(default)]
    pub sort: WorkoutSort,
}
