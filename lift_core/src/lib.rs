#![forbid(unsafe_code)]

//! Core domain model and business logic for the Lift workout tracker.
//!
//! This crate provides:
//! - Domain types (workouts, days, exercises, sets, suggestions)
//! - Persistence (key/value adapter, file and in-memory backends)
//! - Progression engine
//! - Workout store (the aggregate that ties the above together)
//! - Completed-workout history by period
//! - Preset workouts and CSV export

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod clock;
pub mod storage;
pub mod progression;
pub mod store;
pub mod history;
pub mod presets;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use clock::{Clock, ManualClock, SystemClock};
pub use storage::{CollectionKey, FileStore, KeyValueStore, MemoryStore, Persistence};
pub use progression::{analyze, latest_session};
pub use store::WorkoutStore;
pub use history::{group_completed, PastWorkouts, Period};
pub use presets::{get_preset_catalog, PresetCatalog};
