//! Progression logic for suggesting heavier or longer sets.
//!
//! The engine is a pure function of an exercise, its logged sets and the
//! current time. It looks only at the latest calendar day of logging and
//! proposes a progression when that session met the set and rep targets:
//! - `weight`: add the weight increment, hold the rep target
//! - `reps`: hold the weight, add one rep
//! - `both`: add the increment and one rep
//!
//! A progression accepted within the cooldown window blocks new
//! suggestions regardless of performance.

use crate::config::{ProgressionConfig, WeightUnit};
use crate::{Exercise, ProgressionStrategy, ProgressionSuggestion, WorkoutSet};
use chrono::{DateTime, FixedOffset, Utc};
use uuid::Uuid;

/// Select the sets logged on the same calendar day as the most recent one
///
/// Days are taken in `offset`, so a set at 23:30 and one at 00:30 the next
/// morning belong to different sessions.
pub fn latest_session<'a>(sets: &'a [WorkoutSet], offset: &FixedOffset) -> Vec<&'a WorkoutSet> {
    let Some(latest) = sets.iter().map(|s| s.created_at).max() else {
        return Vec::new();
    };
    let day = latest.with_timezone(offset).date_naive();

    sets.iter()
        .filter(|s| s.created_at.with_timezone(offset).date_naive() == day)
        .collect()
}

/// Whether an accepted progression is still inside the cooldown window
pub fn in_cooldown(exercise: &Exercise, now: DateTime<Utc>, cooldown_days: i64) -> bool {
    match exercise.last_progression_date {
        Some(last) => (now - last).num_days() < cooldown_days,
        None => false,
    }
}

/// Evaluate an exercise's history and propose the next target, if any
pub fn analyze(
    exercise: &Exercise,
    sets: &[WorkoutSet],
    now: DateTime<FixedOffset>,
    config: &ProgressionConfig,
) -> Option<ProgressionSuggestion> {
    let candidates: Vec<WorkoutSet> = if config.skip_placeholder_sets {
        sets.iter().filter(|s| !s.is_placeholder()).cloned().collect()
    } else {
        sets.to_vec()
    };

    if candidates.is_empty() {
        return None;
    }

    let session = latest_session(&candidates, now.offset());
    if session.len() < exercise.target_sets as usize {
        tracing::debug!(
            "{}: {} of {} sets logged in latest session, not evaluating",
            exercise.name,
            session.len(),
            exercise.target_sets
        );
        return None;
    }

    let count = session.len();
    let average_weight = session.iter().map(|s| s.weight).sum::<f64>() / count as f64;
    // Integer mean, truncating
    let average_reps = (session.iter().map(|s| u64::from(s.reps)).sum::<u64>() / count as u64) as u32;

    if in_cooldown(exercise, now.with_timezone(&Utc), config.cooldown_days) {
        tracing::debug!("{}: progression cooldown active", exercise.name);
        return None;
    }

    if average_reps < exercise.target_reps {
        tracing::debug!(
            "{}: averaging {} reps, target is {}",
            exercise.name,
            average_reps,
            exercise.target_reps
        );
        return None;
    }

    let increment = format_weight(exercise.weight_increment, config.weight_unit);
    let (suggested_weight, suggested_reps, message) = match exercise.strategy {
        ProgressionStrategy::Weight => (
            average_weight + exercise.weight_increment,
            exercise.target_reps,
            format!("Great work! Increase weight by {} next session.", increment),
        ),
        ProgressionStrategy::Reps => (
            average_weight,
            average_reps.saturating_add(1),
            "Great work! Add 1 rep per set next session.".to_string(),
        ),
        ProgressionStrategy::Both => (
            average_weight + exercise.weight_increment,
            average_reps.saturating_add(1),
            format!(
                "Great work! Increase weight by {} and add 1 rep per set next session.",
                increment
            ),
        ),
    };

    Some(ProgressionSuggestion {
        id: Uuid::new_v4(),
        exercise_id: exercise.id,
        suggested_weight,
        suggested_reps,
        message,
    })
}

fn format_weight(weight: f64, unit: WeightUnit) -> String {
    format!("{} {}", weight, unit)
}
