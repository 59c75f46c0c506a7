//! The workout store: owner of every collection and the only mutator.
//!
//! Each mutating method updates memory, re-runs the progression engine for
//! the exercises it touched, then persists. None of them can fail: storage
//! problems are logged and the in-memory state stays authoritative for the
//! life of the process.

use crate::clock::{Clock, SystemClock};
use crate::config::ProgressionConfig;
use crate::history::{group_completed, PastWorkouts};
use crate::progression::analyze;
use crate::storage::{CollectionKey, KeyValueStore, Persistence};
use crate::{
    presets, Exercise, ProgressionStrategy, ProgressionSuggestion, SetHistory, SuggestionMap,
    Workout, WorkoutSet,
};
use chrono::Utc;
use std::collections::HashSet;
use uuid::Uuid;

pub struct WorkoutStore<S: KeyValueStore> {
    workouts: Vec<Workout>,
    completed_workouts: Vec<Workout>,
    previous_sets: SetHistory,
    suggestions: SuggestionMap,
    persistence: Persistence<S>,
    /// Collections that have held data, and so are written even when empty
    populated: HashSet<CollectionKey>,
    config: ProgressionConfig,
    clock: Box<dyn Clock>,
}

impl<S: KeyValueStore> WorkoutStore<S> {
    /// Load all collections from `backend` using the system clock
    pub fn open(backend: S, config: ProgressionConfig) -> Self {
        Self::open_with_clock(backend, config, SystemClock)
    }

    /// Load all collections, then rebuild suggestions for every exercise
    ///
    /// Missing or corrupt records become empty collections.
    pub fn open_with_clock(backend: S, config: ProgressionConfig, clock: impl Clock + 'static) -> Self {
        let persistence = Persistence::new(backend);

        let workouts: Vec<Workout> = persistence.load_collection(CollectionKey::Workouts);
        let completed_workouts: Vec<Workout> =
            persistence.load_collection(CollectionKey::CompletedWorkouts);
        let previous_sets: SetHistory = persistence.load_collection(CollectionKey::PreviousSets);
        let suggestions: SuggestionMap =
            persistence.load_collection(CollectionKey::ProgressionSuggestions);

        let mut store = Self {
            workouts,
            completed_workouts,
            previous_sets,
            suggestions,
            persistence,
            populated: HashSet::new(),
            config,
            clock: Box::new(clock),
        };
        store.fill_missing_ids();
        store.mark_populated();

        tracing::info!(
            "Loaded {} workouts, {} completed, {} exercise histories, {} suggestions",
            store.workouts.len(),
            store.completed_workouts.len(),
            store.previous_sets.len(),
            store.suggestions.len()
        );

        store.check_all_progressions();
        store
    }

    // ------------------------------------------------------------------------
    // Read accessors
    // ------------------------------------------------------------------------

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn completed_workouts(&self) -> &[Workout] {
        &self.completed_workouts
    }

    pub fn set_history(&self) -> &SetHistory {
        &self.previous_sets
    }

    /// Logged sets for an exercise in insertion order (empty if none)
    pub fn sets(&self, exercise_id: Uuid) -> &[WorkoutSet] {
        self.previous_sets
            .get(&exercise_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Logged sets for an exercise, oldest first
    pub fn sorted_sets(&self, exercise_id: Uuid) -> Vec<WorkoutSet> {
        let mut sets = self.sets(exercise_id).to_vec();
        sets.sort_by_key(|s| s.created_at);
        sets
    }

    pub fn suggestion(&self, exercise_id: Uuid) -> Option<&ProgressionSuggestion> {
        self.suggestions.get(&exercise_id)
    }

    pub fn suggestions(&self) -> &SuggestionMap {
        &self.suggestions
    }

    pub fn find_workout(&self, workout_id: Uuid) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id == workout_id)
    }

    /// Look up an exercise among the templates
    pub fn find_exercise(&self, exercise_id: Uuid) -> Option<&Exercise> {
        self.workouts
            .iter()
            .flat_map(|w| w.exercises())
            .find(|e| e.id == exercise_id)
    }

    /// Completed workouts grouped into this week, month, year and older
    pub fn past_workouts(&self) -> PastWorkouts<'_> {
        group_completed(&self.completed_workouts, self.clock.now())
    }

    pub fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    pub fn backend(&self) -> &S {
        self.persistence.backend()
    }

    pub fn backend_mut(&mut self) -> &mut S {
        self.persistence.backend_mut()
    }

    pub fn into_backend(self) -> S {
        self.persistence.into_inner()
    }

    // ------------------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------------------

    /// Append a workout template
    pub fn add_workout(&mut self, workout: Workout) {
        tracing::debug!("Adding workout {} ({})", workout.name, workout.id);
        let exercise_ids: Vec<Uuid> = workout.exercises().map(|e| e.id).collect();
        self.workouts.push(workout);

        for id in exercise_ids {
            self.check_progression(id);
        }
        self.persist();
    }

    /// Instantiate a built-in preset as a new template
    pub fn add_preset(&mut self, name: &str) -> Option<Uuid> {
        let workout = presets::get_preset_catalog().instantiate(name)?;
        let id = workout.id;
        self.add_workout(workout);
        Some(id)
    }

    /// Record a completed copy of `workout`, stamped with the current time
    ///
    /// The template itself is left in place.
    pub fn complete_workout(&mut self, workout: &Workout) -> Workout {
        let snapshot = workout.completed_copy(self.clock.now().with_timezone(&Utc));
        tracing::debug!(
            "Completed workout {} as snapshot {}",
            workout.name,
            snapshot.id
        );
        self.completed_workouts.push(snapshot.clone());
        self.persist();
        snapshot
    }

    /// Append a set to an exercise's history and re-check its progression
    pub fn add_set(&mut self, exercise_id: Uuid, set: WorkoutSet) {
        tracing::debug!(
            "Logging set {} x {} for exercise {}",
            set.weight,
            set.reps,
            exercise_id
        );
        self.previous_sets.entry(exercise_id).or_default().push(set);
        self.check_progression(exercise_id);
        self.persist();
    }

    /// Log a set stamped with the current time
    pub fn log_set(&mut self, exercise_id: Uuid, weight: f64, reps: u32) -> WorkoutSet {
        let set = WorkoutSet::new(weight, reps, self.clock.now().with_timezone(&Utc));
        self.add_set(exercise_id, set.clone());
        set
    }

    /// Correct the weight and reps of a set that was already logged
    ///
    /// Returns false if no such set exists.
    pub fn update_set(&mut self, exercise_id: Uuid, set_id: Uuid, weight: f64, reps: u32) -> bool {
        let Some(set) = self
            .previous_sets
            .get_mut(&exercise_id)
            .and_then(|sets| sets.iter_mut().find(|s| s.id == set_id))
        else {
            return false;
        };

        let corrected = WorkoutSet::new(weight, reps, set.created_at);
        set.weight = corrected.weight;
        set.reps = corrected.reps;

        self.check_progression(exercise_id);
        self.persist();
        true
    }

    /// Overwrite an exercise's whole set list
    pub fn replace_sets(&mut self, exercise_id: Uuid, sets: Vec<WorkoutSet>) {
        self.previous_sets.insert(exercise_id, sets);
        self.check_progression(exercise_id);
        self.persist();
    }

    /// Change how an exercise progresses
    ///
    /// A target of zero reps is raised to one, and a non-finite or
    /// non-positive increment keeps the current one. Returns false if no
    /// template carries the exercise.
    pub fn update_exercise_settings(
        &mut self,
        exercise_id: Uuid,
        target_reps: u32,
        weight_increment: f64,
        strategy: ProgressionStrategy,
    ) -> bool {
        let mut found = false;
        for exercise in self
            .workouts
            .iter_mut()
            .flat_map(|w| w.exercises_mut())
            .filter(|e| e.id == exercise_id)
        {
            exercise.target_reps = target_reps.max(1);
            if weight_increment.is_finite() && weight_increment > 0.0 {
                exercise.weight_increment = weight_increment;
            }
            exercise.strategy = strategy;
            found = true;
        }

        if !found {
            return false;
        }

        tracing::debug!("Updated progression settings for exercise {}", exercise_id);
        self.check_progression(exercise_id);
        self.persist();
        true
    }

    /// Consume the live suggestion and start the exercise's cooldown
    pub fn accept_suggestion(&mut self, exercise_id: Uuid) -> Option<ProgressionSuggestion> {
        let suggestion = self.suggestions.remove(&exercise_id)?;
        let now = self.clock.now().with_timezone(&Utc);

        for exercise in self
            .workouts
            .iter_mut()
            .flat_map(|w| w.exercises_mut())
            .filter(|e| e.id == exercise_id)
        {
            exercise.last_progression_date = Some(now);
        }

        tracing::info!("Accepted progression for exercise {}", exercise_id);
        self.persist();
        Some(suggestion)
    }

    /// Remove the live suggestion without starting a cooldown
    pub fn dismiss_suggestion(&mut self, exercise_id: Uuid) -> bool {
        let removed = self.suggestions.remove(&exercise_id).is_some();
        if removed {
            self.persist();
        }
        removed
    }

    /// Re-run the progression engine over every template exercise
    ///
    /// A result matching the live suggestion keeps the existing one, so
    /// repeated calls on unchanged data leave the mapping identical.
    pub fn check_all_progressions(&mut self) {
        let exercise_ids: Vec<Uuid> = self
            .workouts
            .iter()
            .flat_map(|w| w.exercises())
            .map(|e| e.id)
            .collect();

        let mut changed = false;
        for id in exercise_ids {
            changed |= self.check_progression(id);
        }

        if changed {
            self.persist();
        }
    }

    /// Write every collection that has held data
    pub fn flush(&mut self) {
        self.persist();
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    /// Run the engine for one exercise and upsert its suggestion.
    /// Returns whether the suggestion mapping changed.
    fn check_progression(&mut self, exercise_id: Uuid) -> bool {
        let Some(exercise) = self.find_exercise(exercise_id) else {
            tracing::debug!("Exercise {} is not in any template, skipping", exercise_id);
            return false;
        };

        let Some(suggestion) = analyze(
            exercise,
            self.sets(exercise_id),
            self.clock.now(),
            &self.config,
        ) else {
            return false;
        };

        if self
            .suggestions
            .get(&exercise_id)
            .is_some_and(|current| current.same_target(&suggestion))
        {
            return false;
        }

        tracing::info!(
            "New suggestion for {}: {} x {}",
            exercise.name,
            suggestion.suggested_weight,
            suggestion.suggested_reps
        );
        self.suggestions.insert(exercise_id, suggestion);
        true
    }

    /// Give stable ids to records that were stored without one
    fn fill_missing_ids(&mut self) {
        for (i, workout) in self.workouts.iter_mut().enumerate() {
            workout.fill_missing_ids(CollectionKey::Workouts.as_str(), i);
        }
        for (i, workout) in self.completed_workouts.iter_mut().enumerate() {
            workout.fill_missing_ids(CollectionKey::CompletedWorkouts.as_str(), i);
        }
        for (exercise_id, sets) in self.previous_sets.iter_mut() {
            for (i, set) in sets.iter_mut().enumerate() {
                set.fill_missing_id(*exercise_id, i);
            }
        }
        for (exercise_id, suggestion) in self.suggestions.iter_mut() {
            suggestion.fill_missing_ids(*exercise_id);
        }
    }

    fn mark_populated(&mut self) {
        if !self.workouts.is_empty() {
            self.populated.insert(CollectionKey::Workouts);
        }
        if !self.completed_workouts.is_empty() {
            self.populated.insert(CollectionKey::CompletedWorkouts);
        }
        if !self.previous_sets.is_empty() {
            self.populated.insert(CollectionKey::PreviousSets);
        }
        if !self.suggestions.is_empty() {
            self.populated.insert(CollectionKey::ProgressionSuggestions);
        }
    }

    /// Save collections, skipping any that have never held data so an
    /// empty startup state cannot clobber records written earlier.
    fn persist(&mut self) {
        self.mark_populated();

        for key in CollectionKey::ALL {
            if !self.populated.contains(&key) {
                continue;
            }
            let saved = match key {
                CollectionKey::Workouts => self.persistence.save_collection(key, &self.workouts),
                CollectionKey::CompletedWorkouts => {
                    self.persistence.save_collection(key, &self.completed_workouts)
                }
                CollectionKey::PreviousSets => {
                    self.persistence.save_collection(key, &self.previous_sets)
                }
                CollectionKey::ProgressionSuggestions => {
                    self.persistence.save_collection(key, &self.suggestions)
                }
            };
            if !saved {
                tracing::warn!("{} not persisted; in-memory state is unchanged", key);
            }
        }
    }
}
