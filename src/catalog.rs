//! Exercise catalog, routines and body measurements.
//!
//! These sit around the session core: sessions only ever see exercise ids
//! and routine templates.

use anyhow::{Context, Result};
use serde::Deserialize;
use strsim::jaro_winkler;

use crate::{
    error::{SessionError, SessionResult},
    models::{AppState, BodyMeasurement, EpochMillis, Exercise, Routine, RoutineExercise, new_id},
    types::Muscle,
};

const MIN_NAME_SIMILARITY: f64 = 0.85;

fn builtin(id: &str, name: &str, muscle: Muscle, description: &str, tips: &[&str]) -> Exercise {
    Exercise {
        id: id.to_string(),
        name: name.to_string(),
        muscle,
        description: Some(description.to_string()),
        tips: tips.iter().map(|t| t.to_string()).collect(),
    }
}

/// Exercises every fresh state starts with.
pub fn builtin_exercises() -> Vec<Exercise> {
    vec![
        builtin(
            "bench-press",
            "Bench Press",
            Muscle::Chest,
            "Barbell press lying on a flat bench.",
            &["Retract the shoulder blades", "Touch the lower chest", "Keep feet planted"],
        ),
        builtin(
            "squat",
            "Back Squat",
            Muscle::Legs,
            "Barbell squat with the bar on the upper back.",
            &["Brace before descending", "Knees track over toes", "Hit parallel or below"],
        ),
        builtin(
            "deadlift",
            "Deadlift",
            Muscle::Back,
            "Conventional barbell pull from the floor.",
            &["Bar over mid-foot", "Neutral spine", "Push the floor away"],
        ),
        builtin(
            "overhead-press",
            "Overhead Press",
            Muscle::Shoulders,
            "Standing barbell press from the front rack.",
            &["Squeeze glutes", "Head through at lockout"],
        ),
        builtin(
            "barbell-row",
            "Barbell Row",
            Muscle::Back,
            "Bent-over row to the lower ribs.",
            &["Hinge to roughly 45 degrees", "Pull with the elbows"],
        ),
        builtin(
            "pull-up",
            "Pull-up",
            Muscle::Back,
            "Overhand bodyweight pull to the bar.",
            &["Full hang at the bottom", "Chin over the bar"],
        ),
        builtin(
            "hip-thrust",
            "Hip Thrust",
            Muscle::Glutes,
            "Barbell hip extension with the back on a bench.",
            &["Tuck the chin", "Pause at the top"],
        ),
        builtin(
            "barbell-curl",
            "Barbell Curl",
            Muscle::Arms,
            "Standing curl with a straight or EZ bar.",
            &["Elbows pinned", "No hip swing"],
        ),
        builtin(
            "plank",
            "Plank",
            Muscle::Core,
            "Static hold on forearms and toes.",
            &["Ribs down", "Squeeze glutes"],
        ),
        builtin(
            "push-up",
            "Push-up",
            Muscle::Home,
            "Bodyweight press from the floor.",
            &["Body in one line", "Elbows at about 45 degrees"],
        ),
    ]
}

/// Creates a user exercise and puts it first in the catalog.
pub fn add_custom_exercise<'a>(
    state: &'a mut AppState,
    name: &str,
    muscle: Muscle,
    description: Option<String>,
    now: EpochMillis,
) -> &'a Exercise {
    let suffix = new_id();
    let exercise = Exercise {
        id: format!("custom_{now}_{}", &suffix[..8]),
        name: name.trim().to_string(),
        muscle,
        description: Some(
            description
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| "Custom exercise created by the user.".to_string()),
        ),
        tips: vec!["Custom exercise".to_string()],
    };
    log::info!("added custom exercise {} ({})", exercise.name, exercise.id);
    state.exercises.insert(0, exercise);
    &state.exercises[0]
}

/// Finds an exercise by id, by case-insensitive name or by 1-based position.
pub fn find_exercise<'a>(state: &'a AppState, key: &str) -> SessionResult<&'a Exercise> {
    let key = key.trim();
    state
        .exercises
        .iter()
        .find(|e| e.id == key)
        .or_else(|| state.exercises.iter().find(|e| e.name.eq_ignore_ascii_case(key)))
        .or_else(|| {
            key.parse::<usize>()
                .ok()
                .and_then(|idx| idx.checked_sub(1))
                .and_then(|idx| state.exercises.get(idx))
        })
        .ok_or_else(|| SessionError::UnknownExercise(key.to_string()))
}

/// Closest catalog name to a mistyped `key`, if one is close enough.
pub fn suggest_exercise<'a>(state: &'a AppState, key: &str) -> Option<&'a Exercise> {
    let key = key.trim().to_lowercase();
    state
        .exercises
        .iter()
        .map(|e| (e, jaro_winkler(&key, &e.name.to_lowercase())))
        .filter(|(_, score)| *score >= MIN_NAME_SIMILARITY)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(e, _)| e)
}

pub fn find_routine<'a>(state: &'a AppState, key: &str) -> SessionResult<&'a Routine> {
    let key = key.trim();
    state
        .routines
        .iter()
        .find(|r| r.id == key)
        .or_else(|| state.routines.iter().find(|r| r.name.eq_ignore_ascii_case(key)))
        .or_else(|| {
            key.parse::<usize>()
                .ok()
                .and_then(|idx| idx.checked_sub(1))
                .and_then(|idx| state.routines.get(idx))
        })
        .ok_or_else(|| SessionError::UnknownRoutine(key.to_string()))
}

#[derive(Debug, Deserialize)]
struct RoutineImport {
    #[serde(default)]
    routine: Vec<RoutineToml>,
}

#[derive(Debug, Deserialize)]
struct RoutineToml {
    name: String,
    description: Option<String>,
    color: Option<String>,
    #[serde(default)]
    home: bool,
    #[serde(default)]
    exercises: Vec<RoutineExerciseToml>,
}

#[derive(Debug, Deserialize)]
struct RoutineExerciseToml {
    exercise: String,
    #[serde(default = "default_target_sets")]
    sets: u32,
    #[serde(default)]
    reps: Option<String>,
}

fn default_target_sets() -> u32 {
    3
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: Vec<String>,
    pub skipped: Vec<String>,
}

/// Adds the `[[routine]]` tables of a TOML document.
///
/// Routines whose name already exists are skipped; an exercise reference
/// that matches nothing in the catalog fails the whole import.
pub fn import_routines(state: &mut AppState, toml_str: &str) -> Result<ImportSummary> {
    let import: RoutineImport = toml::from_str(toml_str)
        .context("Failed to parse TOML: expected `[[routine]]` entries")?;

    let catalog: &AppState = state;
    let mut parsed = Vec::new();
    for r in import.routine {
        let exercises = r
            .exercises
            .iter()
            .map(|e| {
                let ex = find_exercise(catalog, &e.exercise)
                    .with_context(|| format!("routine `{}`", r.name))?;
                Ok(RoutineExercise {
                    exercise_id: ex.id.clone(),
                    target_sets: e.sets,
                    target_reps: e.reps.clone().unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        parsed.push(Routine {
            id: new_id(),
            name: r.name.trim().to_string(),
            exercises,
            color: r.color.unwrap_or_else(|| "indigo".to_string()),
            description: r.description,
            is_home: r.home,
        });
    }

    let mut summary = ImportSummary::default();
    for routine in parsed {
        if state
            .routines
            .iter()
            .any(|r| r.name.eq_ignore_ascii_case(&routine.name))
        {
            summary.skipped.push(routine.name);
        } else {
            summary.added.push(routine.name.clone());
            state.routines.push(routine);
        }
    }
    Ok(summary)
}

pub fn delete_routine(state: &mut AppState, id: &str) -> Option<Routine> {
    let idx = state.routines.iter().position(|r| r.id == id)?;
    Some(state.routines.remove(idx))
}

/// Records a body measurement, keeping the list newest first.
pub fn add_measurement(
    state: &mut AppState,
    weight: f64,
    body_fat: Option<f64>,
    notes: Option<String>,
    now: EpochMillis,
) -> &BodyMeasurement {
    let id = new_id();
    state.measurements.push(BodyMeasurement {
        id: id.clone(),
        date: now,
        weight: if weight.is_finite() && weight > 0.0 { weight } else { 0.0 },
        body_fat: body_fat.filter(|b| b.is_finite() && *b >= 0.0),
        notes,
    });
    state.measurements.sort_by(|a, b| b.date.cmp(&a.date));
    state
        .measurements
        .iter()
        .find(|m| m.id == id)
        .unwrap_or(&state.measurements[0])
}

/// Deletes by id or id prefix. Ambiguous prefixes delete nothing.
pub fn delete_measurement(state: &mut AppState, id: &str) -> Option<BodyMeasurement> {
    let matches: Vec<usize> = state
        .measurements
        .iter()
        .enumerate()
        .filter(|(_, m)| m.id == id || m.id.starts_with(id))
        .map(|(i, _)| i)
        .collect();
    match matches.as_slice() {
        [idx] => Some(state.measurements.remove(*idx)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTINES: &str = r#"
        [[routine]]
        name = "Push"
        description = "Chest and shoulders"

        [[routine.exercises]]
        exercise = "bench-press"
        sets = 4
        reps = "6-8"

        [[routine.exercises]]
        exercise = "overhead press"

        [[routine]]
        name = "Pull"
        home = true

        [[routine.exercises]]
        exercise = "Pull-up"
        reps = "max"
    "#;

    #[test]
    fn builtin_ids_are_unique() {
        let exercises = builtin_exercises();
        let mut ids: Vec<_> = exercises.iter().map(|e| &e.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), exercises.len());
    }

    #[test]
    fn find_exercise_by_id_name_or_index() {
        let state = AppState::default();
        assert_eq!(find_exercise(&state, "squat").unwrap().id, "squat");
        assert_eq!(find_exercise(&state, "bench press").unwrap().id, "bench-press");
        assert_eq!(find_exercise(&state, "1").unwrap().id, "bench-press");
        assert_eq!(
            find_exercise(&state, "zercher").unwrap_err(),
            SessionError::UnknownExercise("zercher".into())
        );
    }

    #[test]
    fn suggestion_for_misspelled_name() {
        let state = AppState::default();
        assert_eq!(suggest_exercise(&state, "Dedlift").unwrap().id, "deadlift");
        assert!(suggest_exercise(&state, "qqqq").is_none());
    }

    #[test]
    fn custom_exercise_goes_first() {
        let mut state = AppState::default();
        let id = add_custom_exercise(&mut state, " Landmine Press ", Muscle::Shoulders, None, 42)
            .id
            .clone();
        assert!(id.starts_with("custom_42_"));
        assert_eq!(state.exercises[0].name, "Landmine Press");
        assert_eq!(
            state.exercises[0].description.as_deref(),
            Some("Custom exercise created by the user.")
        );
    }

    #[test]
    fn import_resolves_exercises_and_skips_duplicates() {
        let mut state = AppState::default();
        let summary = import_routines(&mut state, ROUTINES).unwrap();
        assert_eq!(summary.added, vec!["Push".to_string(), "Pull".to_string()]);

        let push = find_routine(&state, "push").unwrap();
        assert_eq!(push.exercises.len(), 2);
        assert_eq!(push.exercises[0].exercise_id, "bench-press");
        assert_eq!(push.exercises[0].target_sets, 4);
        assert_eq!(push.exercises[1].exercise_id, "overhead-press");
        assert_eq!(push.exercises[1].target_sets, 3);
        assert!(find_routine(&state, "2").unwrap().is_home);

        let again = import_routines(&mut state, ROUTINES).unwrap();
        assert!(again.added.is_empty());
        assert_eq!(again.skipped.len(), 2);
        assert_eq!(state.routines.len(), 2);
    }

    #[test]
    fn import_with_unknown_exercise_adds_nothing() {
        let mut state = AppState::default();
        let bad = r#"
            [[routine]]
            name = "Odd"
            [[routine.exercises]]
            exercise = "zercher squat"
        "#;
        assert!(import_routines(&mut state, bad).is_err());
        assert!(state.routines.is_empty());
    }

    #[test]
    fn delete_routine_by_id() {
        let mut state = AppState::default();
        import_routines(&mut state, ROUTINES).unwrap();
        let id = state.routines[0].id.clone();
        assert_eq!(delete_routine(&mut state, &id).unwrap().name, "Push");
        assert!(delete_routine(&mut state, &id).is_none());
        assert_eq!(state.routines.len(), 1);
    }

    #[test]
    fn measurements_are_newest_first() {
        let mut state = AppState::default();
        add_measurement(&mut state, 80.0, None, None, 100);
        add_measurement(&mut state, 79.5, Some(15.0), None, 300);
        add_measurement(&mut state, 81.0, None, None, 200);
        let dates: Vec<_> = state.measurements.iter().map(|m| m.date).collect();
        assert_eq!(dates, vec![300, 200, 100]);

        let id = state.measurements[1].id.clone();
        assert_eq!(delete_measurement(&mut state, &id).unwrap().weight, 81.0);
        assert_eq!(state.measurements.len(), 2);
        assert!(delete_measurement(&mut state, "").is_none());
    }
}
