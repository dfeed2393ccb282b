// Business logic services

pub mod exercise_service;
pub mod session_service;
pub mod stats_service;
pub mod workout_service;

pub use exercise_service::ExerciseService;
pub use session_service::SessionService;
pub use stats_service::StatsService;
pub use workout_service::WorkoutService;
