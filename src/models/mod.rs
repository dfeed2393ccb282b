// Data models and request/response types

pub mod exercise;
pub mod session;
pub mod set;
pub mod stats;
pub mod validation;
pub mod workout;

pub use exercise::*;
pub use session::*;
pub use set::*;
pub use stats::*;
pub use workout::*;
