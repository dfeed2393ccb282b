use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::set::SetWithExercise;

/// Lifecycle state of a workout session. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
    Cancelled,
    Paused,
}

impl SessionStatus {
    /// Whether a transition to `next` is allowed. Completed and cancelled
    /// are terminal; pause/resume only toggles between active and paused.
    pub fn can_transition_to(self, next: SessionStatus) -> bool {
        use SessionStatus::*;
        matches!(
            (self, next),
            (Active, Completed)
                | (Active, Cancelled)
                | (Active, Paused)
                | (Paused, Active)
                | (Paused, Completed)
                | (Paused, Cancelled)
        )
    }

    /// Only an active session accepts new sets.
    pub fn accepts_sets(self) -> bool {
        self == SessionStatus::Active
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
            SessionStatus::Paused => "paused",
        }
    }
}

/// One timed instance of performing a workout.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub workout_id: Uuid,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionWithDetails {
    #[serde(flatten)]
    pub session: Session,
    pub workout_name: String,
    pub sets: Vec<SetWithExercise>,
    pub total_sets: usize,
    /// Σ weight × reps across the session's sets.
    pub total_volume: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSession {
    pub workout_id: Uuid,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSession {
    pub notes: Option<String>,
    pub duration_minutes: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionSort {
    DateAsc,
    #[default]
    DateDesc,
    DurationAsc,
    DurationDesc,
    VolumeAsc,
    VolumeDesc,
    WorkoutNameAsc,
    WorkoutNameDesc,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionFilters {
    pub workout_id: Option<Uuid>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub status: Option<SessionStatus>,
    #[serde(default)]
    pub sort: SessionSort,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_session_can_complete_cancel_or_pause() {
        assert!(SessionStatus::Active.can_transition_to(SessionStatus::Completed));
        assert!(SessionStatus::Active.can_transition_to(SessionStatus::Cancelled));
        assert!(SessionStatus::Active.can_transition_to(SessionStatus::Paused));
    }

    #[test]
    fn paused_session_can_resume_or_finish() {
        assert!(SessionStatus::Paused.can_transition_to(SessionStatus::Active));
        assert!(SessionStatus::Paused.can_transition_to(SessionStatus::Completed));
        assert!(SessionStatus::Paused.can_transition_to(SessionStatus::Cancelled));
    }

    #[test]
    fn terminal_states_reject_all_transitions() {
        for next in [
            SessionStatus::Active,
            SessionStatus::Completed,
            SessionStatus::Cancelled,
            SessionStatus::Paused,
        ] {
            assert!(!SessionStatus::Completed.can_transition_to(next));
            assert!(!SessionStatus::Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn only_active_accepts_sets() {
        assert!(SessionStatus::Active.accepts_sets());
        assert!(!SessionStatus::Paused.accepts_sets());
        assert!(!SessionStatus::Completed.accepts_sets());
        assert!(!SessionStatus::Cancelled.accepts_sets());
    }
}
