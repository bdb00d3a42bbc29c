use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Muscle;

/// Milliseconds since the Unix epoch.
pub type EpochMillis = i64;

/// Rest duration used when the configured default is zero.
pub const FALLBACK_REST_SECONDS: u32 = 90;

/// Name given to sessions started without a routine.
pub const FREE_SESSION_NAME: &str = "Free session";

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Catalog entry. Sessions reference it by id only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub muscle: Muscle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tips: Vec<String>,
}

/// One performed or planned set.
/// Numeric fields are never negative; "no value" is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSet {
    pub id: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub reps: u32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub is_warmup: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ExerciseSet {
    /// Zeroed, uncompleted working set.
    pub fn empty() -> Self {
        Self {
            id: new_id(),
            weight: 0.0,
            reps: 0,
            completed: false,
            is_warmup: false,
            rpe: None,
            notes: None,
        }
    }

    pub fn volume(&self) -> f64 {
        self.weight * self.reps as f64
    }

    /// Whether the set counts towards volume.
    pub fn is_working(&self) -> bool {
        self.completed && !self.is_warmup
    }
}

/// Sets of one exercise within one workout. Set order is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseLog {
    pub exercise_id: String,
    #[serde(default)]
    pub sets: Vec<ExerciseSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A workout session, either the active one or an archived history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLog {
    pub id: String,
    pub start_time: EpochMillis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<EpochMillis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routine_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub exercises: Vec<ExerciseLog>,
    /// Exercise ids flagged as new personal records during this session.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<String>,
}

impl WorkoutLog {
    /// Wall-clock length of a finished session.
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.end_time
            .map(|end| chrono::Duration::milliseconds(end - self.start_time))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineExercise {
    pub exercise_id: String,
    pub target_sets: u32,
    /// Free-form target such as "8-12".
    pub target_reps: String,
}

/// Named template used to seed a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub exercises: Vec<RoutineExercise>,
    #[serde(default)]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_home: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyMeasurement {
    pub id: String,
    pub date: EpochMillis,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_fat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub dark_mode: bool,
    pub sound_enabled: bool,
    pub haptics_enabled: bool,
    /// Seconds; zero means "use the fallback".
    pub default_rest_timer: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: true,
            sound_enabled: true,
            haptics_enabled: true,
            default_rest_timer: FALLBACK_REST_SECONDS,
        }
    }
}

impl Settings {
    pub fn rest_seconds(&self) -> u32 {
        if self.default_rest_timer == 0 {
            FALLBACK_REST_SECONDS
        } else {
            self.default_rest_timer
        }
    }
}

/// Whole-application snapshot handed to and from the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppState {
    pub exercises: Vec<Exercise>,
    pub routines: Vec<Routine>,
    /// Most recent first.
    pub history: Vec<WorkoutLog>,
    /// Most recent first.
    pub measurements: Vec<BodyMeasurement>,
    pub active_workout: Option<WorkoutLog>,
    pub settings: Settings,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            exercises: crate::catalog::builtin_exercises(),
            routines: Vec::new(),
            history: Vec::new(),
            measurements: Vec::new(),
            active_workout: None,
            settings: Settings::default(),
        }
    }
}

impl AppState {
    pub fn exercise(&self, id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == id)
    }

    /// Display name for an exercise id, falling back to the id itself.
    pub fn exercise_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.exercise(id).map(|e| e.name.as_str()).unwrap_or(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_settings_keys_fall_back_to_defaults() {
        let json = r#"{ "settings": { "soundEnabled": false } }"#;
        let state: AppState = serde_json::from_str(json).unwrap();
        assert!(!state.settings.sound_enabled);
        assert!(state.settings.haptics_enabled);
        assert_eq!(state.settings.default_rest_timer, 90);
        assert!(state.active_workout.is_none());
        assert!(!state.exercises.is_empty());
    }

    #[test]
    fn zero_rest_uses_fallback() {
        let settings = Settings {
            default_rest_timer: 0,
            ..Settings::default()
        };
        assert_eq!(settings.rest_seconds(), FALLBACK_REST_SECONDS);

        let settings = Settings {
            default_rest_timer: 45,
            ..Settings::default()
        };
        assert_eq!(settings.rest_seconds(), 45);
    }

    #[test]
    fn parses_app_export_workout() {
        let json = r#"{
            "id": "1700000000000",
            "startTime": 1700000000000,
            "endTime": 1700003600000,
            "name": "Push",
            "exercises": [
                { "exerciseId": "bench", "sets": [
                    { "id": "a", "weight": 80, "reps": 5, "completed": true },
                    { "id": "b", "weight": 40, "reps": 10, "completed": true, "isWarmup": true }
                ] }
            ]
        }"#;
        let log: WorkoutLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.exercises[0].sets.len(), 2);
        assert!(log.exercises[0].sets[1].is_warmup);
        assert!(!log.exercises[0].sets[0].is_warmup);
        assert_eq!(log.duration().unwrap().num_minutes(), 60);
        assert!(log.records.is_empty());
    }

    #[test]
    fn working_set_requires_completion_and_no_warmup() {
        let mut set = ExerciseSet::empty();
        set.weight = 100.0;
        set.reps = 5;
        assert!(!set.is_working());
        set.completed = true;
        assert!(set.is_working());
        assert_eq!(set.volume(), 500.0);
        set.is_warmup = true;
        assert!(!set.is_working());
    }
}
