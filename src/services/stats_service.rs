use chrono::{Datelike, Duration, NaiveDate, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{ExerciseStats, FrequencyBucket, SessionStats};

/// A completed session reduced to the fields the aggregates need.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CompletedSessionRow {
    pub date: NaiveDate,
    pub duration_minutes: Option<i32>,
    pub workout_name: String,
    pub volume: f64,
}

/// One logged set with its session date, the unit of per-exercise stats.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExerciseSetRow {
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub weight: f64,
    pub reps: i32,
    pub date: NaiveDate,
}

/// Number of most-recent sets compared against the preceding window for the
/// progress percentage.
const PROGRESS_WINDOW: usize = 5;

#[derive(Clone)]
pub struct StatsService {
    db: PgPool,
}

impl StatsService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn get_session_stats(&self, user_id: Uuid) -> Result<SessionStats, AppError> {
        let rows = self.fetch_completed_sessions(user_id).await?;
        Ok(compute_session_stats(&rows, Utc::now().date_naive()))
    }

    pub async fn get_exercise_stats(
        &self,
        user_id: Uuid,
        exercise_id: Option<Uuid>,
    ) -> Result<Vec<ExerciseStats>, AppError> {
        let mut query = "SELECT st.exercise_id, e.name AS exercise_name, st.weight, st.reps, \
                                s.started_at::date AS date \
                         FROM sets st \
                         JOIN sessions s ON s.id = st.session_id \
                         JOIN exercises e ON e.id = st.exercise_id \
                         WHERE s.user_id = $1"
            .to_string();
        if exercise_id.is_some() {
            query.push_str(" AND st.exercise_id = $2");
        }

        let mut query_builder = sqlx::query_as::<_, ExerciseSetRow>(&query).bind(user_id);
        if let Some(exercise_id) = exercise_id {
            query_builder = query_builder.bind(exercise_id);
        }
        let rows = query_builder.fetch_all(&self.db).await?;

        Ok(compute_exercise_stats(rows))
    }

    pub async fn get_frequency(
        &self,
        user_id: Uuid,
        days: i64,
    ) -> Result<Vec<FrequencyBucket>, AppError> {
        if !(1..=365).contains(&days) {
            return Err(AppError::validation("days: must be between 1 and 365"));
        }

        let today = Utc::now().date_naive();
        let window_start = today - Duration::days(days - 1);

        let dates: Vec<NaiveDate> = sqlx::query_scalar(
            "SELECT started_at::date FROM sessions \
             WHERE user_id = $1 AND status = 'completed' AND started_at::date >= $2",
        )
        .bind(user_id)
        .bind(window_start)
        .fetch_all(&self.db)
        .await?;

        Ok(compute_frequency(&dates, window_start, days))
    }

    async fn fetch_completed_sessions(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CompletedSessionRow>, AppError> {
        let rows = sqlx::query_as::<_, CompletedSessionRow>(
            "SELECT s.started_at::date AS date, s.duration_minutes, w.name AS workout_name, \
                    COALESCE(SUM(st.weight * st.reps), 0) AS volume \
             FROM sessions s \
             JOIN workouts w ON w.id = s.workout_id \
             LEFT JOIN sets st ON st.session_id = s.id \
             WHERE s.user_id = $1 AND s.status = 'completed' \
             GROUP BY s.id, w.name \
             ORDER BY s.started_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }
}

/// Aggregate completed sessions into the dashboard summary. Single pass per
/// figure over rows already in memory; empty input yields zeroed stats.
pub fn compute_session_stats(rows: &[CompletedSessionRow], today: NaiveDate) -> SessionStats {
    if rows.is_empty() {
        return SessionStats::empty();
    }

    let total_sessions = rows.len() as i64;
    let total_volume: f64 = rows.iter().map(|r| r.volume).sum();
    let total_duration: i64 = rows
        .iter()
        .map(|r| i64::from(r.duration_minutes.unwrap_or(0)))
        .sum();
    let average_duration_minutes = total_duration as f64 / rows.len() as f64;

    let week_start = today - Duration::days(6);
    let month_start = today - Duration::days(29);
    let sessions_this_week = rows.iter().filter(|r| r.date >= week_start).count() as i64;
    let sessions_this_month = rows.iter().filter(|r| r.date >= month_start).count() as i64;

    let mut workout_counts: HashMap<&str, i64> = HashMap::new();
    for row in rows {
        *workout_counts.entry(row.workout_name.as_str()).or_default() += 1;
    }
    let favorite_workout = workout_counts
        .into_iter()
        // Ties resolve to the lexicographically smaller name so the result
        // is deterministic.
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(name, _)| name.to_string())
        .unwrap_or_default();

    let (current_streak, best_streak) = compute_streaks(rows.iter().map(|r| r.date), today);

    SessionStats {
        total_sessions,
        total_volume,
        average_duration_minutes,
        favorite_workout,
        current_streak,
        best_streak,
        sessions_this_week,
        sessions_this_month,
    }
}

/// Day-streak counting over completed-session dates. Consecutive calendar
/// days extend a streak; a gap of more than one day breaks it. The current
/// streak only counts when the latest session was today or yesterday.
pub fn compute_streaks(dates: impl IntoIterator<Item = NaiveDate>, today: NaiveDate) -> (i64, i64) {
    let mut days: Vec<NaiveDate> = dates.into_iter().collect();
    days.sort_unstable_by(|a, b| b.cmp(a));
    days.dedup();

    if days.is_empty() {
        return (0, 0);
    }

    let mut best = 0i64;
    let mut run = 1i64;
    for pair in days.windows(2) {
        if (pair[0] - pair[1]).num_days() == 1 {
            run += 1;
        } else {
            best = best.max(run);
            run = 1;
        }
    }
    best = best.max(run);

    let current = if (today - days[0]).num_days() <= 1 {
        let mut streak = 1i64;
        for pair in days.windows(2) {
            if (pair[0] - pair[1]).num_days() == 1 {
                streak += 1;
            } else {
                break;
            }
        }
        streak
    } else {
        0
    };

    (current, best)
}

/// Group sets by exercise and derive totals, extremes, and the recent-vs-
/// older progress percentage. Output is ordered by total volume descending.
pub fn compute_exercise_stats(rows: Vec<ExerciseSetRow>) -> Vec<ExerciseStats> {
    let mut groups: HashMap<Uuid, Vec<ExerciseSetRow>> = HashMap::new();
    for row in rows {
        groups.entry(row.exercise_id).or_default().push(row);
    }

    let mut stats: Vec<ExerciseStats> = groups
        .into_iter()
        .map(|(exercise_id, mut sets)| {
            // Most recent first; the progress windows slice off this order.
            sets.sort_by(|a, b| b.date.cmp(&a.date));

            let total_sets = sets.len() as i64;
            let total_reps: i64 = sets.iter().map(|s| i64::from(s.reps)).sum();
            let total_volume: f64 = sets.iter().map(|s| s.weight * f64::from(s.reps)).sum();

            let weights: Vec<f64> = sets.iter().map(|s| s.weight).filter(|w| *w > 0.0).collect();
            let max_weight = weights.iter().copied().fold(0.0, f64::max);
            let average_weight = if weights.is_empty() {
                0.0
            } else {
                weights.iter().sum::<f64>() / weights.len() as f64
            };

            ExerciseStats {
                exercise_id,
                exercise_name: sets[0].exercise_name.clone(),
                total_sets,
                total_reps,
                total_volume,
                max_weight,
                average_weight,
                last_session_date: sets.first().map(|s| s.date),
                progress_percentage: progress_percentage(&sets),
            }
        })
        .collect();

    stats.sort_by(|a, b| b.total_volume.total_cmp(&a.total_volume));
    stats
}

/// Percentage delta between the average weight of the most recent window and
/// the preceding one. Zero-weight sets are ignored inside each window; an
/// empty window or a zero older average yields 0 rather than a division
/// by zero.
fn progress_percentage(sets_recent_first: &[ExerciseSetRow]) -> f64 {
    let recent = &sets_recent_first[..sets_recent_first.len().min(PROGRESS_WINDOW)];
    let older = if sets_recent_first.len() > PROGRESS_WINDOW {
        &sets_recent_first[PROGRESS_WINDOW..sets_recent_first.len().min(2 * PROGRESS_WINDOW)]
    } else {
        &[]
    };

    let avg = |window: &[ExerciseSetRow]| {
        let weights: Vec<f64> = window.iter().map(|s| s.weight).filter(|w| *w > 0.0).collect();
        if weights.is_empty() {
            None
        } else {
            Some(weights.iter().sum::<f64>() / weights.len() as f64)
        }
    };

    match (avg(recent), avg(older)) {
        (Some(recent_avg), Some(older_avg)) if older_avg > 0.0 => {
            (recent_avg - older_avg) / older_avg * 100.0
        }
        _ => 0.0,
    }
}

/// Bucket completed-session dates into one entry per day across the trailing
/// window, carrying the weekday and a week row index for heatmap layout.
pub fn compute_frequency(
    dates: &[NaiveDate],
    window_start: NaiveDate,
    days: i64,
) -> Vec<FrequencyBucket> {
    let mut per_day: HashMap<NaiveDate, i64> = HashMap::new();
    for date in dates {
        *per_day.entry(*date).or_default() += 1;
    }

    // Week rows break on Sundays, offset by where in the week the window starts.
    let start_offset = i64::from(window_start.weekday().num_days_from_sunday());

    (0..days)
        .map(|i| {
            let date = window_start + Duration::days(i);
            FrequencyBucket {
                date,
                sessions: per_day.get(&date).copied().unwrap_or(0),
                day_of_week: date.weekday().num_days_from_sunday(),
                week_index: (start_offset + i) / 7,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn session(d: NaiveDate, workout: &str, volume: f64, duration: Option<i32>) -> CompletedSessionRow {
        CompletedSessionRow {
            date: d,
            duration_minutes: duration,
            workout_name: workout.to_string(),
            volume,
        }
    }

    fn set(exercise: Uuid, weight: f64, reps: i32, d: NaiveDate) -> ExerciseSetRow {
        ExerciseSetRow {
            exercise_id: exercise,
            exercise_name: "Bench Press".to_string(),
            weight,
            reps,
            date: d,
        }
    }

    #[test]
    fn empty_input_yields_zeroed_stats() {
        let stats = compute_session_stats(&[], date(2024, 6, 1));
        assert_eq!(stats, SessionStats::empty());
    }

    #[test]
    fn sums_volume_and_averages_duration() {
        let today = date(2024, 6, 10);
        let rows = vec![
            session(date(2024, 6, 9), "Push", 1200.0, Some(60)),
            session(date(2024, 6, 8), "Pull", 800.0, Some(30)),
        ];
        let stats = compute_session_stats(&rows, today);
        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.total_volume, 2000.0);
        assert_eq!(stats.average_duration_minutes, 45.0);
    }

    #[test]
    fn favorite_workout_is_most_frequent() {
        let today = date(2024, 6, 10);
        let rows = vec![
            session(date(2024, 6, 1), "Push", 0.0, None),
            session(date(2024, 5, 20), "Pull", 0.0, None),
            session(date(2024, 5, 10), "Pull", 0.0, None),
        ];
        let stats = compute_session_stats(&rows, today);
        assert_eq!(stats.favorite_workout, "Pull");
    }

    #[test]
    fn trailing_window_counts() {
        let today = date(2024, 6, 30);
        let rows = vec![
            session(date(2024, 6, 30), "Push", 0.0, None),
            session(date(2024, 6, 25), "Push", 0.0, None),
            session(date(2024, 6, 5), "Push", 0.0, None),
            session(date(2024, 4, 1), "Push", 0.0, None),
        ];
        let stats = compute_session_stats(&rows, today);
        assert_eq!(stats.sessions_this_week, 2);
        assert_eq!(stats.sessions_this_month, 3);
    }

    #[test]
    fn consecutive_days_increment_streak() {
        let today = date(2024, 6, 10);
        let days = [date(2024, 6, 10), date(2024, 6, 9), date(2024, 6, 8)];
        assert_eq!(compute_streaks(days, today), (3, 3));
    }

    #[test]
    fn gap_over_one_day_resets_streak() {
        let today = date(2024, 6, 10);
        let days = [
            date(2024, 6, 10),
            date(2024, 6, 9),
            // Two-day gap here.
            date(2024, 6, 6),
            date(2024, 6, 5),
            date(2024, 6, 4),
        ];
        let (current, best) = compute_streaks(days, today);
        assert_eq!(current, 2);
        assert_eq!(best, 3);
    }

    #[test]
    fn current_streak_tolerates_resting_today() {
        let today = date(2024, 6, 10);
        let days = [date(2024, 6, 9), date(2024, 6, 8)];
        assert_eq!(compute_streaks(days, today), (2, 2));
    }

    #[test]
    fn stale_streak_does_not_count_as_current() {
        let today = date(2024, 6, 10);
        let days = [date(2024, 6, 5), date(2024, 6, 4), date(2024, 6, 3)];
        let (current, best) = compute_streaks(days, today);
        assert_eq!(current, 0);
        assert_eq!(best, 3);
    }

    #[test]
    fn multiple_sessions_on_one_day_count_once_for_streaks() {
        let today = date(2024, 6, 10);
        let days = [date(2024, 6, 10), date(2024, 6, 10), date(2024, 6, 9)];
        assert_eq!(compute_streaks(days, today), (2, 2));
    }

    #[test]
    fn no_sessions_means_no_streak() {
        assert_eq!(compute_streaks([], date(2024, 6, 10)), (0, 0));
    }

    #[test]
    fn exercise_totals_and_extremes() {
        let ex = Uuid::new_v4();
        let d = date(2024, 6, 1);
        let rows = vec![set(ex, 100.0, 5, d), set(ex, 80.0, 10, d), set(ex, 0.0, 12, d)];
        let stats = compute_exercise_stats(rows);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].total_sets, 3);
        assert_eq!(stats[0].total_reps, 27);
        assert_eq!(stats[0].total_volume, 1300.0);
        assert_eq!(stats[0].max_weight, 100.0);
        // Zero-weight set is excluded from the average.
        assert_eq!(stats[0].average_weight, 90.0);
        assert_eq!(stats[0].last_session_date, Some(d));
    }

    #[test]
    fn equal_windows_yield_zero_progress() {
        let ex = Uuid::new_v4();
        let mut rows = Vec::new();
        for i in 0..10 {
            rows.push(set(ex, 100.0, 5, date(2024, 6, 1) + Duration::days(i)));
        }
        let stats = compute_exercise_stats(rows);
        assert_eq!(stats[0].progress_percentage, 0.0);
    }

    #[test]
    fn progress_reflects_recent_weight_increase() {
        let ex = Uuid::new_v4();
        let mut rows = Vec::new();
        // Older window at 100, recent window at 110: +10%.
        for i in 0..5 {
            rows.push(set(ex, 100.0, 5, date(2024, 6, 1) + Duration::days(i)));
        }
        for i in 5..10 {
            rows.push(set(ex, 110.0, 5, date(2024, 6, 1) + Duration::days(i)));
        }
        let stats = compute_exercise_stats(rows);
        assert!((stats[0].progress_percentage - 10.0).abs() < 1e-9);
    }

    #[test]
    fn all_zero_weights_yield_zero_progress() {
        let ex = Uuid::new_v4();
        let rows: Vec<ExerciseSetRow> = (0..10)
            .map(|i| set(ex, 0.0, 10, date(2024, 6, 1) + Duration::days(i)))
            .collect();
        let stats = compute_exercise_stats(rows);
        assert_eq!(stats[0].progress_percentage, 0.0);
    }

    #[test]
    fn too_few_sets_yield_zero_progress() {
        let ex = Uuid::new_v4();
        let rows = vec![set(ex, 100.0, 5, date(2024, 6, 1))];
        let stats = compute_exercise_stats(rows);
        assert_eq!(stats[0].progress_percentage, 0.0);
    }

    #[test]
    fn exercise_stats_ordered_by_volume() {
        let heavy = Uuid::new_v4();
        let light = Uuid::new_v4();
        let d = date(2024, 6, 1);
        let rows = vec![set(light, 10.0, 5, d), set(heavy, 100.0, 5, d)];
        let stats = compute_exercise_stats(rows);
        assert_eq!(stats[0].exercise_id, heavy);
        assert_eq!(stats[1].exercise_id, light);
    }

    #[test]
    fn frequency_covers_every_day_in_window() {
        let start = date(2024, 6, 1);
        let buckets = compute_frequency(&[], start, 14);
        assert_eq!(buckets.len(), 14);
        assert!(buckets.iter().all(|b| b.sessions == 0));
        assert_eq!(buckets[0].date, start);
        assert_eq!(buckets[13].date, date(2024, 6, 14));
    }

    #[test]
    fn frequency_counts_sessions_per_day() {
        let start = date(2024, 6, 1);
        let dates = [date(2024, 6, 2), date(2024, 6, 2), date(2024, 6, 5)];
        let buckets = compute_frequency(&dates, start, 7);
        assert_eq!(buckets[1].sessions, 2);
        assert_eq!(buckets[4].sessions, 1);
        assert_eq!(buckets[0].sessions, 0);
    }

    #[test]
    fn frequency_week_rows_break_on_sunday() {
        // 2024-06-01 is a Saturday; the next day starts week row 1.
        let start = date(2024, 6, 1);
        let buckets = compute_frequency(&[], start, 3);
        assert_eq!(buckets[0].day_of_week, 6);
        assert_eq!(buckets[0].week_index, 0);
        assert_eq!(buckets[1].day_of_week, 0);
        assert_eq!(buckets[1].week_index, 1);
        assert_eq!(buckets[2].week_index, 1);
    }
}
