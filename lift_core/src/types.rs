//! Core domain types for the Lift workout tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Workout plans (workouts, days, exercises)
//! - Logged sets
//! - Progression suggestions
//!
//! Every persisted struct uses container-level `#[serde(default)]` so that
//! records written by older or newer versions still decode: missing fields
//! take their default and unknown fields are ignored. Defaults are fixed
//! values (nil ids, the Unix epoch), so the same bytes always decode to the
//! same data; [`derived_id`] then turns nil ids into stable ones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Namespace for ids derived from a record's position in storage
const DERIVED_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6c1f_5e0a_93b2_4d57_a8e4_2f0c_71d9_b346);

/// Deterministic id for a record that was stored without one
pub fn derived_id(parent: &str, index: usize) -> Uuid {
    Uuid::new_v5(&DERIVED_ID_NAMESPACE, format!("{}/{}", parent, index).as_bytes())
}

fn fill_id(id: &mut Uuid, parent: &str, index: usize) {
    if id.is_nil() {
        *id = derived_id(parent, index);
    }
}

// ============================================================================
// Plan Types
// ============================================================================

/// How an exercise progresses once the rep target is met
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionStrategy {
    /// Add the weight increment, keep the rep target
    #[default]
    Weight,
    /// Keep the weight, add one rep
    Reps,
    /// Add the weight increment and one rep
    Both,
}

/// A named movement with its set/rep/weight protocol
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub target_sets: u32,
    pub rest_seconds: u32,
    pub custom_rest_seconds: Option<u32>,
    pub strategy: ProgressionStrategy,
    pub weight_increment: f64,
    pub target_reps: u32,
    pub last_progression_date: Option<DateTime<Utc>>,
}

impl Default for Exercise {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            name: String::new(),
            target_sets: 3,
            rest_seconds: 90,
            custom_rest_seconds: None,
            strategy: ProgressionStrategy::Weight,
            weight_increment: 5.0,
            target_reps: 8,
            last_progression_date: None,
        }
    }
}

impl Exercise {
    /// Create an exercise with a fresh id and default protocol
    pub fn new(name: impl Into<String>, target_sets: u32, target_reps: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            target_sets,
            target_reps,
            ..Self::default()
        }
    }

    pub fn with_strategy(mut self, strategy: ProgressionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_increment(mut self, weight_increment: f64) -> Self {
        self.weight_increment = weight_increment;
        self
    }

    pub fn with_rest(mut self, rest_seconds: u32) -> Self {
        self.rest_seconds = rest_seconds;
        self
    }

    /// Rest period to use between sets, honoring the custom override
    pub fn effective_rest_seconds(&self) -> u32 {
        self.custom_rest_seconds.unwrap_or(self.rest_seconds)
    }
}

/// A training day: an ordered list of exercises
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Day {
    pub id: Uuid,
    pub name: String,
    pub exercises: Vec<Exercise>,
}

impl Default for Day {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            name: String::new(),
            exercises: Vec::new(),
        }
    }
}

impl Day {
    pub fn new(name: impl Into<String>, exercises: Vec<Exercise>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            exercises,
        }
    }
}

/// A workout plan, or a completed snapshot of one
///
/// Templates have no `completion_date`. Completed snapshots carry the time
/// they were logged and the id of the template they were copied from.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Workout {
    pub id: Uuid,
    pub name: String,
    pub days: Vec<Day>,
    pub completion_date: Option<DateTime<Utc>>,
    pub template_id: Option<Uuid>,
}

impl Default for Workout {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            name: String::new(),
            days: Vec::new(),
            completion_date: None,
            template_id: None,
        }
    }
}

impl Workout {
    pub fn new(name: impl Into<String>, days: Vec<Day>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            days,
            completion_date: None,
            template_id: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completion_date.is_some()
    }

    /// Iterate over every exercise in day order
    pub fn exercises(&self) -> impl Iterator<Item = &Exercise> {
        self.days.iter().flat_map(|day| day.exercises.iter())
    }

    pub fn exercises_mut(&mut self) -> impl Iterator<Item = &mut Exercise> {
        self.days.iter_mut().flat_map(|day| day.exercises.iter_mut())
    }

    /// Replace nil workout, day and exercise ids with derived ones
    ///
    /// `scope` and `index` locate the workout in its collection.
    pub fn fill_missing_ids(&mut self, scope: &str, index: usize) {
        fill_id(&mut self.id, scope, index);
        let workout_id = self.id.to_string();
        for (d, day) in self.days.iter_mut().enumerate() {
            fill_id(&mut day.id, &workout_id, d);
            let day_id = day.id.to_string();
            for (e, exercise) in day.exercises.iter_mut().enumerate() {
                fill_id(&mut exercise.id, &day_id, e);
            }
        }
    }

    /// Copy this workout as a completed snapshot stamped at `completed_at`
    ///
    /// The snapshot gets its own id; exercise ids are kept so the snapshot
    /// still lines up with the set history.
    pub fn completed_copy(&self, completed_at: DateTime<Utc>) -> Workout {
        Workout {
            id: Uuid::new_v4(),
            name: self.name.clone(),
            days: self.days.clone(),
            completion_date: Some(completed_at),
            template_id: Some(self.template_id.unwrap_or(self.id)),
        }
    }
}

// ============================================================================
// Logging Types
// ============================================================================

/// One logged performance of an exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkoutSet {
    pub id: Uuid,
    pub weight: f64,
    pub reps: u32,
    pub created_at: DateTime<Utc>,
}

impl Default for WorkoutSet {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            weight: 0.0,
            reps: 0,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

impl WorkoutSet {
    /// Create a set stamped at the given time
    ///
    /// Negative or non-finite weights are clamped to zero.
    pub fn new(weight: f64, reps: u32, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            weight: if weight.is_finite() { weight.max(0.0) } else { 0.0 },
            reps,
            created_at,
        }
    }

    /// Replace a nil id with one derived from the owning exercise
    pub fn fill_missing_id(&mut self, exercise_id: Uuid, index: usize) {
        fill_id(&mut self.id, &exercise_id.to_string(), index);
    }

    /// A zero-weight, zero-rep entry created while a session is in progress
    pub fn is_placeholder(&self) -> bool {
        self.weight == 0.0 && self.reps == 0
    }
}

/// A proposed next-session target for one exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProgressionSuggestion {
    pub id: Uuid,
    pub exercise_id: Uuid,
    pub suggested_weight: f64,
    pub suggested_reps: u32,
    pub message: String,
}

impl Default for ProgressionSuggestion {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            exercise_id: Uuid::nil(),
            suggested_weight: 0.0,
            suggested_reps: 0,
            message: String::new(),
        }
    }
}

impl ProgressionSuggestion {
    /// Repair ids of a suggestion stored under `exercise_id`
    pub fn fill_missing_ids(&mut self, exercise_id: Uuid) {
        if self.exercise_id.is_nil() {
            self.exercise_id = exercise_id;
        }
        fill_id(&mut self.id, &format!("suggestion/{}", exercise_id), 0);
    }

    /// Whether two suggestions propose the same target for the same exercise
    pub fn same_target(&self, other: &ProgressionSuggestion) -> bool {
        self.exercise_id == other.exercise_id
            && self.suggested_weight == other.suggested_weight
            && self.suggested_reps == other.suggested_reps
            && self.message == other.message
    }
}

// ============================================================================
// Collections
// ============================================================================

/// Logged sets keyed by exercise id, in insertion order
pub type SetHistory = HashMap<Uuid, Vec<WorkoutSet>>;

/// Live suggestion per exercise id
pub type SuggestionMap = HashMap<Uuid, ProgressionSuggestion>;
