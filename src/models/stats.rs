use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

/// Aggregate view over a user's completed sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStats {
    pub total_sessions: i64,
    pub total_volume: f64,
    pub average_duration_minutes: f64,
    /// Most frequent workout name, empty when there are no sessions.
    pub favorite_workout: String,
    pub current_streak: i64,
    pub best_streak: i64,
    pub sessions_this_week: i64,
    pub sessions_this_month: i64,
}

impl SessionStats {
    pub fn empty() -> Self {
        Self {
            total_sessions: 0,
            total_volume: 0.0,
            average_duration_minutes: 0.0,
            favorite_workout: String::new(),
            current_streak: 0,
            best_streak: 0,
            sessions_this_week: 0,
            sessions_this_month: 0,
        }
    }
}

/// Per-exercise progress aggregates across all logged sets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseStats {
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub total_sets: i64,
    pub total_reps: i64,
    pub total_volume: f64,
    pub max_weight: f64,
    /// Mean over sets with nonzero weight; 0 when none qualify.
    pub average_weight: f64,
    pub last_session_date: Option<NaiveDate>,
    /// Average weight of the 5 most recent sets vs the preceding 5, as a
    /// percentage delta. 0 when either window is empty or the older
    /// average is 0.
    pub progress_percentage: f64,
}

/// One day in the workout-frequency heatmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyBucket {
    pub date: NaiveDate,
    pub sessions: i64,
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u32,
    /// Week row relative to the window start, breaking on Sundays.
    pub week_index: i64,
}
