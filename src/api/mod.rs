// API routes and handlers

pub mod exercises;
pub mod health;
pub mod routes;
pub mod sessions;
pub mod stats;
pub mod workouts;
