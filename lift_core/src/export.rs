//! CSV export of the logged set history.

use crate::storage::KeyValueStore;
use crate::{Result, WorkoutStore};
use std::fs::File;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    exercise_id: String,
    exercise_name: String,
    set_id: String,
    created_at: String,
    weight: f64,
    reps: u32,
}

/// Write every logged set to `path`, oldest first
///
/// Exercise names come from the templates, falling back to completed
/// snapshots for exercises no template still carries. Returns the number
/// of rows written.
pub fn sets_to_csv<S: KeyValueStore>(store: &WorkoutStore<S>, path: &Path) -> Result<usize> {
    let mut rows: Vec<(chrono::DateTime<chrono::Utc>, CsvRow)> = Vec::new();

    for (exercise_id, sets) in store.set_history() {
        let exercise_name = store
            .find_exercise(*exercise_id)
            .or_else(|| {
                store
                    .completed_workouts()
                    .iter()
                    .flat_map(|w| w.exercises())
                    .find(|e| e.id == *exercise_id)
            })
            .map(|e| e.name.clone())
            .unwrap_or_default();

        for set in sets {
            rows.push((
                set.created_at,
                CsvRow {
                    exercise_id: exercise_id.to_string(),
                    exercise_name: exercise_name.clone(),
                    set_id: set.id.to_string(),
                    created_at: set.created_at.to_rfc3339(),
                    weight: set.weight,
                    reps: set.reps,
                },
            ));
        }
    }

    rows.sort_by(|a, b| a.0.cmp(&b.0));

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for (_, row) in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;

    tracing::info!("Exported {} sets to {:?}", rows.len(), path);
    Ok(rows.len())
}
