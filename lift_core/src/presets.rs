//! Built-in workout programs.
//!
//! Presets are static blueprints. Instantiating one produces a fresh
//! [`Workout`] template with newly generated ids, so the same preset can be
//! added any number of times.

use crate::{Day, Exercise, ProgressionStrategy, Workout};
use once_cell::sync::Lazy;

/// Cached preset catalog - built once and reused across all operations
static PRESET_CATALOG: Lazy<PresetCatalog> = Lazy::new(build_preset_catalog);

/// Get a reference to the cached preset catalog
pub fn get_preset_catalog() -> &'static PresetCatalog {
    &PRESET_CATALOG
}

#[derive(Clone, Debug)]
pub struct PresetExercise {
    pub name: &'static str,
    pub sets: u32,
    pub reps: u32,
    pub rest_seconds: u32,
    pub strategy: ProgressionStrategy,
    pub weight_increment: f64,
}

#[derive(Clone, Debug)]
pub struct PresetDay {
    pub name: &'static str,
    pub exercises: Vec<PresetExercise>,
}

#[derive(Clone, Debug)]
pub struct PresetWorkout {
    pub name: &'static str,
    pub description: &'static str,
    pub days: Vec<PresetDay>,
}

impl PresetWorkout {
    /// Build a workout template with fresh ids
    pub fn instantiate(&self) -> Workout {
        let days = self
            .days
            .iter()
            .map(|day| {
                let exercises = day
                    .exercises
                    .iter()
                    .map(|e| {
                        Exercise::new(e.name, e.sets, e.reps)
                            .with_rest(e.rest_seconds)
                            .with_strategy(e.strategy)
                            .with_increment(e.weight_increment)
                    })
                    .collect();
                Day::new(day.name, exercises)
            })
            .collect();
        Workout::new(self.name, days)
    }
}

#[derive(Clone, Debug)]
pub struct PresetCatalog {
    pub presets: Vec<PresetWorkout>,
}

impl PresetCatalog {
    /// Find a preset by name, ignoring case
    pub fn get(&self, name: &str) -> Option<&PresetWorkout> {
        self.presets
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn instantiate(&self, name: &str) -> Option<Workout> {
        let preset = self.get(name);
        if preset.is_none() {
            tracing::warn!("Unknown preset: {}", name);
        }
        preset.map(PresetWorkout::instantiate)
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (i, preset) in self.presets.iter().enumerate() {
            if preset.name.is_empty() {
                errors.push(format!("Preset #{} has empty name", i));
            }
            if self.presets[..i]
                .iter()
                .any(|p| p.name.eq_ignore_ascii_case(preset.name))
            {
                errors.push(format!("Duplicate preset name '{}'", preset.name));
            }
            if preset.days.is_empty() {
                errors.push(format!("Preset '{}' has no days", preset.name));
            }

            for day in &preset.days {
                if day.exercises.is_empty() {
                    errors.push(format!(
                        "Preset '{}': day '{}' has no exercises",
                        preset.name, day.name
                    ));
                }
                for exercise in &day.exercises {
                    if exercise.sets == 0 || exercise.reps == 0 {
                        errors.push(format!(
                            "Preset '{}': '{}' needs positive set and rep targets",
                            preset.name, exercise.name
                        ));
                    }
                    if exercise.weight_increment <= 0.0 {
                        errors.push(format!(
                            "Preset '{}': '{}' has non-positive weight increment",
                            preset.name, exercise.name
                        ));
                    }
                }
            }
        }

        errors
    }
}

fn ex(
    name: &'static str,
    sets: u32,
    reps: u32,
    rest_seconds: u32,
    strategy: ProgressionStrategy,
    weight_increment: f64,
) -> PresetExercise {
    PresetExercise {
        name,
        sets,
        reps,
        rest_seconds,
        strategy,
        weight_increment,
    }
}

fn build_preset_catalog() -> PresetCatalog {
    use ProgressionStrategy::{Both, Reps, Weight};

    let presets = vec![
        PresetWorkout {
            name: "Full Body 5x5",
            description: "Three compound lifts per day, alternating A/B sessions",
            days: vec![
                PresetDay {
                    name: "Workout A",
                    exercises: vec![
                        ex("Squat", 5, 5, 180, Weight, 5.0),
                        ex("Bench Press", 5, 5, 180, Weight, 5.0),
                        ex("Barbell Row", 5, 5, 180, Weight, 5.0),
                    ],
                },
                PresetDay {
                    name: "Workout B",
                    exercises: vec![
                        ex("Squat", 5, 5, 180, Weight, 5.0),
                        ex("Overhead Press", 5, 5, 180, Weight, 5.0),
                        ex("Deadlift", 1, 5, 240, Weight, 10.0),
                    ],
                },
            ],
        },
        PresetWorkout {
            name: "Push Pull Legs",
            description: "Six-day hypertrophy split",
            days: vec![
                PresetDay {
                    name: "Push",
                    exercises: vec![
                        ex("Bench Press", 4, 8, 150, Weight, 5.0),
                        ex("Overhead Press", 3, 10, 120, Both, 2.5),
                        ex("Triceps Pushdown", 3, 12, 60, Reps, 2.5),
                    ],
                },
                PresetDay {
                    name: "Pull",
                    exercises: vec![
                        ex("Deadlift", 3, 5, 180, Weight, 10.0),
                        ex("Pull-up", 3, 8, 120, Reps, 2.5),
                        ex("Barbell Curl", 3, 12, 60, Reps, 2.5),
                    ],
                },
                PresetDay {
                    name: "Legs",
                    exercises: vec![
                        ex("Squat", 4, 8, 180, Weight, 5.0),
                        ex("Romanian Deadlift", 3, 10, 120, Both, 5.0),
                        ex("Calf Raise", 3, 15, 60, Reps, 5.0),
                    ],
                },
            ],
        },
        PresetWorkout {
            name: "Upper Lower",
            description: "Four-day split alternating upper and lower body",
            days: vec![
                PresetDay {
                    name: "Upper",
                    exercises: vec![
                        ex("Bench Press", 4, 6, 150, Weight, 5.0),
                        ex("Barbell Row", 4, 8, 120, Weight, 5.0),
                        ex("Dumbbell Shoulder Press", 3, 10, 90, Both, 2.5),
                    ],
                },
                PresetDay {
                    name: "Lower",
                    exercises: vec![
                        ex("Squat", 4, 6, 180, Weight, 5.0),
                        ex("Leg Curl", 3, 12, 60, Reps, 5.0),
                        ex("Walking Lunge", 3, 10, 90, Reps, 5.0),
                    ],
                },
            ],
        },
    ];

    PresetCatalog { presets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_catalog_validates() {
        let errors = get_preset_catalog().validate();
        assert!(
            errors.is_empty(),
            "Preset catalog has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_lookup_ignores_case() {
        let catalog = get_preset_catalog();
        assert!(catalog.get("push pull legs").is_some());
        assert!(catalog.get("  UPPER LOWER ").is_some());
        assert!(catalog.get("Bro Split").is_none());
    }

    #[test]
    fn test_instances_have_unique_ids() {
        let catalog = get_preset_catalog();
        let first = catalog.instantiate("Full Body 5x5").unwrap();
        let second = catalog.instantiate("Full Body 5x5").unwrap();

        assert_ne!(first.id, second.id);

        let mut ids = HashSet::new();
        for workout in [&first, &second] {
            for day in &workout.days {
                assert!(ids.insert(day.id));
            }
            for exercise in workout.exercises() {
                assert!(ids.insert(exercise.id), "duplicate id {}", exercise.id);
            }
        }
    }

    #[test]
    fn test_instance_preserves_protocol() {
        let workout = get_preset_catalog().instantiate("Push Pull Legs").unwrap();
        assert_eq!(workout.days.len(), 3);
        assert!(workout.completion_date.is_none());

        let ohp = workout
            .exercises()
            .find(|e| e.name == "Overhead Press")
            .unwrap();
        assert_eq!(ohp.target_sets, 3);
        assert_eq!(ohp.target_reps, 10);
        assert_eq!(ohp.strategy, ProgressionStrategy::Both);
        assert_eq!(ohp.weight_increment, 2.5);
        assert_eq!(ohp.rest_seconds, 120);
    }

    #[test]
    fn test_validate_flags_problems() {
        let catalog = PresetCatalog {
            presets: vec![PresetWorkout {
                name: "Broken",
                description: "",
                days: vec![PresetDay {
                    name: "Empty",
                    exercises: vec![],
                }],
            }],
        };
        let errors = catalog.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("no exercises"));
    }
}
