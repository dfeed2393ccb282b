use crate::errors::AppError;

use super::exercise::{CreateExercise, UpdateExercise, EXERCISE_TYPES, MUSCLE_GROUPS};
use super::session::UpdateSession;
use super::set::{CreateSet, UpdateSet};
use super::workout::{CreateWorkout, UpdateWorkout};

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 100;
const NOTES_MAX: usize = 500;

fn check_name(name: &str, errors: &mut Vec<String>) {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        errors.push("name: is required".to_string());
    } else if trimmed.len() < NAME_MIN {
        errors.push(format!("name: must be at least {NAME_MIN} characters"));
    } else if trimmed.len() > NAME_MAX {
        errors.push(format!("name: must be at most {NAME_MAX} characters"));
    }
}

fn check_notes(notes: &Option<String>, errors: &mut Vec<String>) {
    if let Some(notes) = notes {
        if notes.len() > NOTES_MAX {
            errors.push(format!("notes: must be at most {NOTES_MAX} characters"));
        }
    }
}

fn check_vocabulary(field: &str, value: &Option<String>, allowed: &[&str], errors: &mut Vec<String>) {
    if let Some(value) = value {
        if !allowed.contains(&value.as_str()) {
            errors.push(format!("{field}: unknown value '{value}'"));
        }
    }
}

fn finish(errors: Vec<String>) -> Result<(), AppError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors.join(", ")))
    }
}

impl CreateExercise {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = Vec::new();
        check_name(&self.name, &mut errors);
        check_vocabulary("muscle_group", &self.muscle_group, MUSCLE_GROUPS, &mut errors);
        check_vocabulary("exercise_type", &self.exercise_type, EXERCISE_TYPES, &mut errors);
        check_notes(&self.notes, &mut errors);
        finish(errors)
    }
}

impl UpdateExercise {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = Vec::new();
        if let Some(name) = &self.name {
            check_name(name, &mut errors);
        }
        check_vocabulary("muscle_group", &self.muscle_group, MUSCLE_GROUPS, &mut errors);
        check_vocabulary("exercise_type", &self.exercise_type, EXERCISE_TYPES, &mut errors);
        check_notes(&self.notes, &mut errors);
        finish(errors)
    }
}

impl CreateWorkout {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = Vec::new();
        check_name(&self.name, &mut errors);
        finish(errors)
    }
}

impl UpdateWorkout {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = Vec::new();
        if let Some(name) = &self.name {
            check_name(name, &mut errors);
        }
        finish(errors)
    }
}

impl UpdateSession {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = Vec::new();
        check_notes(&self.notes, &mut errors);
        if let Some(duration) = self.duration_minutes {
            if duration < 0 {
                errors.push("duration_minutes: must be non-negative".to_string());
            }
        }
        finish(errors)
    }
}

impl CreateSet {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = Vec::new();
        if self.weight < 0.0 {
            errors.push("weight: must be non-negative".to_string());
        }
        // reps 0 is allowed: planned placeholder sets start empty.
        if self.reps < 0 {
            errors.push("reps: must be non-negative".to_string());
        }
        if let Some(rest) = self.rest_time_seconds {
            if rest < 0 {
                errors.push("rest_time_seconds: must be non-negative".to_string());
            }
        }
        check_notes(&self.notes, &mut errors);
        finish(errors)
    }
}

impl UpdateSet {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = Vec::new();
        if let Some(weight) = self.weight {
            if weight < 0.0 {
                errors.push("weight: must be non-negative".to_string());
            }
        }
        if let Some(reps) = self.reps {
            if reps < 0 {
                errors.push("reps: must be non-negative".to_string());
            }
        }
        if let Some(rest) = self.rest_time_seconds {
            if rest < 0 {
                errors.push("rest_time_seconds: must be non-negative".to_string());
            }
        }
        check_notes(&self.notes, &mut errors);
        finish(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(name: &str) -> CreateExercise {
        CreateExercise {
            name: name.to_string(),
            muscle_group: Some("Chest".to_string()),
            exercise_type: Some("Free Weight".to_string()),
            notes: None,
        }
    }

    #[test]
    fn accepts_valid_exercise() {
        assert!(exercise("Bench Press").validate().is_ok());
    }

    #[test]
    fn rejects_short_and_empty_names() {
        assert!(exercise("").validate().is_err());
        assert!(exercise("  ").validate().is_err());
        assert!(exercise("a").validate().is_err());
    }

    #[test]
    fn rejects_unknown_muscle_group() {
        let mut ex = exercise("Bench Press");
        ex.muscle_group = Some("Forearms".to_string());
        assert!(ex.validate().is_err());
    }

    #[test]
    fn rejects_oversized_notes() {
        let mut ex = exercise("Bench Press");
        ex.notes = Some("x".repeat(501));
        assert!(ex.validate().is_err());
    }

    #[test]
    fn set_rejects_negative_weight_but_allows_zero_reps() {
        let mut set = CreateSet {
            exercise_id: uuid::Uuid::new_v4(),
            weight: 0.0,
            reps: 0,
            notes: None,
            rest_time_seconds: None,
            order_index: None,
        };
        assert!(set.validate().is_ok());
        set.weight = -1.0;
        assert!(set.validate().is_err());
    }
}
