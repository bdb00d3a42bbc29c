//! Workout session engine: active-session edits, rest timer, personal
//! records and the small calculators used around them.

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod record;
pub mod session;
pub mod store;
pub mod timer;
pub mod tracker;
pub mod types;
pub mod utils;

pub use error::{SessionError, SessionResult};
pub use models::AppState;
pub use tracker::Tracker;
