use clap::{Parser, Subcommand};
use lift_core::*;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "lift")]
#[command(about = "Strength training log with progressive overload suggestions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in workout presets
    Presets,

    /// Add a built-in preset as a workout template
    AddPreset {
        /// Preset name (case-insensitive)
        name: String,
    },

    /// List workout templates with their exercise ids
    Workouts,

    /// Log a set for an exercise
    Log {
        #[arg(long)]
        exercise: Uuid,

        #[arg(long)]
        weight: f64,

        #[arg(long)]
        reps: u32,
    },

    /// Record a completed session of a workout template
    Complete {
        workout: Uuid,
    },

    /// Show live progression suggestions
    Suggestions,

    /// Accept the suggestion for an exercise and start its cooldown
    Accept {
        exercise: Uuid,
    },

    /// Change an exercise's rep target, weight increment or strategy
    Configure {
        exercise: Uuid,

        #[arg(long)]
        target_reps: Option<u32>,

        #[arg(long)]
        increment: Option<f64>,

        /// weight, reps or both
        #[arg(long)]
        strategy: Option<String>,
    },

    /// List completed workouts by week, month and year
    Past,

    /// Show the logged sets for an exercise, oldest first
    History {
        exercise: Uuid,
    },

    /// Export all logged sets to a CSV file
    Export {
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    lift_core::logging::init_with_level("warn");

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {}", data_dir.display());

    if let Commands::Presets = cli.command {
        cmd_presets();
        return Ok(());
    }

    let mut store = WorkoutStore::open(FileStore::new(&data_dir), config.progression.clone());
    let result = run(&mut store, cli.command);

    // Writes are synchronous; this makes sure the final state is on disk
    store.flush();
    if let Err(e) = &result {
        tracing::debug!("Command failed: {}", e);
    }
    result
}

fn run(store: &mut WorkoutStore<FileStore>, command: Commands) -> Result<()> {
    match command {
        Commands::Presets => cmd_presets(),
        Commands::AddPreset { name } => {
            let id = store.add_preset(&name).ok_or_else(|| {
                Error::Preset(format!("No preset named '{}' (see `lift presets`)", name))
            })?;
            println!("✓ Added '{}' as workout {}", name, id);
        }
        Commands::Workouts => cmd_workouts(store),
        Commands::Log {
            exercise,
            weight,
            reps,
        } => cmd_log(store, exercise, weight, reps),
        Commands::Complete { workout } => {
            let template = store
                .find_workout(workout)
                .cloned()
                .ok_or_else(|| Error::NotFound(format!("No workout with id {}", workout)))?;
            let snapshot = store.complete_workout(&template);
            println!("✓ Workout '{}' completed ({})", template.name, snapshot.id);
        }
        Commands::Suggestions => cmd_suggestions(store),
        Commands::Accept { exercise } => match store.accept_suggestion(exercise) {
            Some(suggestion) => {
                println!(
                    "✓ Next target: {} x {}",
                    suggestion.suggested_weight, suggestion.suggested_reps
                );
            }
            None => println!("No suggestion for exercise {}", exercise),
        },
        Commands::Configure {
            exercise,
            target_reps,
            increment,
            strategy,
        } => cmd_configure(store, exercise, target_reps, increment, strategy)?,
        Commands::Past => cmd_past(store),
        Commands::History { exercise } => cmd_history(store, exercise),
        Commands::Export { path } => {
            let count = export::sets_to_csv(store, &path)?;
            println!("✓ Exported {} sets to {}", count, path.display());
        }
    }
    Ok(())
}

fn cmd_presets() {
    for preset in &get_preset_catalog().presets {
        println!("{} - {}", preset.name, preset.description);
        for day in &preset.days {
            let names: Vec<_> = day.exercises.iter().map(|e| e.name).collect();
            println!("  {}: {}", day.name, names.join(", "));
        }
    }
}

fn cmd_workouts(store: &WorkoutStore<FileStore>) {
    if store.workouts().is_empty() {
        println!("No workouts yet. Try `lift add-preset \"Full Body 5x5\"`.");
        return;
    }

    for workout in store.workouts() {
        println!("{}  {}", workout.id, workout.name);
        for day in &workout.days {
            println!("  {}", day.name);
            for exercise in &day.exercises {
                println!(
                    "    {}  {} ({}x{}, {:?}, rest {}s)",
                    exercise.id,
                    exercise.name,
                    exercise.target_sets,
                    exercise.target_reps,
                    exercise.strategy,
                    exercise.effective_rest_seconds()
                );
            }
        }
    }
}

fn cmd_log(store: &mut WorkoutStore<FileStore>, exercise: Uuid, weight: f64, reps: u32) {
    let before = store.suggestion(exercise).cloned();
    let set = store.log_set(exercise, weight, reps);
    println!("✓ Logged {} x {}", set.weight, set.reps);

    if store.find_exercise(exercise).is_none() {
        println!("  (exercise {} is not part of any workout)", exercise);
    }

    if let Some(suggestion) = store.suggestion(exercise) {
        if before.as_ref() != Some(suggestion) {
            println!("  → {}", suggestion.message);
        }
    }
}

fn cmd_suggestions(store: &WorkoutStore<FileStore>) {
    if store.suggestions().is_empty() {
        println!("No suggestions yet.");
        return;
    }

    for (exercise_id, suggestion) in store.suggestions() {
        let name = store
            .find_exercise(*exercise_id)
            .map(|e| e.name.as_str())
            .unwrap_or("unknown exercise");
        println!(
            "{}  {}: {} x {} - {}",
            exercise_id,
            name,
            suggestion.suggested_weight,
            suggestion.suggested_reps,
            suggestion.message
        );
    }
}

fn cmd_history(store: &WorkoutStore<FileStore>, exercise: Uuid) {
    let sets = store.sorted_sets(exercise);
    if sets.is_empty() {
        println!("No sets logged for {}", exercise);
        return;
    }

    for set in sets {
        println!(
            "{}  {} x {}",
            set.created_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M"),
            set.weight,
            set.reps
        );
    }
}

fn cmd_configure(
    store: &mut WorkoutStore<FileStore>,
    exercise_id: Uuid,
    target_reps: Option<u32>,
    increment: Option<f64>,
    strategy: Option<String>,
) -> Result<()> {
    let current = store
        .find_exercise(exercise_id)
        .cloned()
        .ok_or_else(|| Error::NotFound(format!("No exercise with id {}", exercise_id)))?;

    let strategy = strategy
        .as_ref()
        .and_then(|s| match s.to_lowercase().as_str() {
            "weight" => Some(ProgressionStrategy::Weight),
            "reps" => Some(ProgressionStrategy::Reps),
            "both" => Some(ProgressionStrategy::Both),
            _ => {
                tracing::warn!("Unknown strategy '{}', keeping {:?}", s, current.strategy);
                None
            }
        })
        .unwrap_or(current.strategy);

    store.update_exercise_settings(
        exercise_id,
        target_reps.unwrap_or(current.target_reps),
        increment.unwrap_or(current.weight_increment),
        strategy,
    );

    if let Some(updated) = store.find_exercise(exercise_id) {
        println!(
            "✓ {}: {} reps, +{} {}, {:?}",
            updated.name,
            updated.target_reps,
            updated.weight_increment,
            store.config().weight_unit,
            updated.strategy
        );
    }
    if let Some(suggestion) = store.suggestion(exercise_id) {
        println!("  → {}", suggestion.message);
    }
    Ok(())
}

fn cmd_past(store: &WorkoutStore<FileStore>) {
    let past = store.past_workouts();
    if past.is_empty() {
        println!("No completed workouts yet.");
        return;
    }

    for period in Period::ALL {
        let workouts = past.get(period);
        if workouts.is_empty() {
            continue;
        }
        println!("{}", period.label());
        for workout in workouts {
            let Some(completed_at) = workout.completion_date else {
                continue;
            };
            let first_day = workout.days.first().map(|d| d.name.as_str()).unwrap_or("-");
            println!(
                "  {}  {} ({})",
                completed_at
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d"),
                workout.name,
                first_day
            );
        }
    }
}
