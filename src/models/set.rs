use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One logged unit of weight × reps within a session.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Set {
    pub id: Uuid,
    pub session_id: Uuid,
    pub exercise_id: Uuid,
    pub weight: f64,
    pub reps: i32,
    pub notes: Option<String>,
    pub rest_time_seconds: Option<i32>,
    pub order_index: i32,
    pub completed: bool,
}

/// Set plus the exercise fields session views show alongside it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SetWithExercise {
    pub id: Uuid,
    pub session_id: Uuid,
    pub exercise_id: Uuid,
    pub weight: f64,
    pub reps: i32,
    pub notes: Option<String>,
    pub rest_time_seconds: Option<i32>,
    pub order_index: i32,
    pub completed: bool,
    pub exercise_name: String,
    pub muscle_group: Option<String>,
    pub exercise_type: Option<String>,
}

impl SetWithExercise {
    pub fn volume(&self) -> f64 {
        self.weight * f64::from(self.reps)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSet {
    pub exercise_id: Uuid,
    pub weight: f64,
    pub reps: i32,
    pub notes: Option<String>,
    pub rest_time_seconds: Option<i32>,
    pub order_index: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSet {
    pub weight: Option<f64>,
    pub reps: Option<i32>,
    pub notes: Option<String>,
    pub rest_time_seconds: Option<i32>,
    pub completed: Option<bool>,
    pub order_index: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReorderSet {
    pub set_id: Uuid,
    pub new_order: i32,
}
