use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Canonical muscle group vocabulary. Free-text values are rejected at
/// validation time so filters stay meaningful.
pub const MUSCLE_GROUPS: &[&str] = &[
    "Chest",
    "Back",
    "Shoulders",
    "Biceps",
    "Triceps",
    "Quadriceps",
    "Hamstrings",
    "Glutes",
    "Abs",
    "Cardio",
];

pub const EXERCISE_TYPES: &[&str] = &[
    "Free Weight",
    "Machine",
    "Bodyweight",
    "Cardio",
    "Functional",
    "Stretching",
];

/// An exercise definition. `user_id = None` marks a global exercise shared
/// with every user and read-only to all of them. `deleted_at` implements
/// soft delete: deleted exercises disappear from listings but stay
/// resolvable by id for historical set references.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Exercise {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub muscle_group: Option<String>,
    pub exercise_type: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Exercise {
    pub fn is_global(&self) -> bool {
        self.user_id.is_none()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExercise {
    pub name: String,
    pub muscle_group: Option<String>,
    pub exercise_type: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateExercise {
    pub name: Option<String>,
    pub muscle_group: Option<String>,
    pub exercise_type: Option<String>,
    pub notes: Option<String>,
}

/// Listing filters; all optional and combined with AND.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExerciseFilters {
    pub muscle_group: Option<String>,
    pub exercise_type: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct MuscleGroupCount {
    pub muscle_group: Option<String>,
    pub count: i64,
}
