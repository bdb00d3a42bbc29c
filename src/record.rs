//! Personal records and "ghost" comparisons against finished sessions.
//!
//! Both lookups read history only; the active session never counts.

use crate::models::{ExerciseSet, WorkoutLog};

/// Heaviest completed weight for `exercise_id` across `history`, warmups
/// included, or 0 if it was never completed.
pub fn previous_best(history: &[WorkoutLog], exercise_id: &str) -> f64 {
    history
        .iter()
        .flat_map(|log| &log.exercises)
        .filter(|ex| ex.exercise_id == exercise_id)
        .flat_map(|ex| &ex.sets)
        .filter(|set| set.completed)
        .map(|set| set.weight)
        .fold(0.0, f64::max)
}

/// Outcome of checking a freshly completed set against history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordCheck {
    pub weight: f64,
    pub previous_best: f64,
}

impl RecordCheck {
    pub fn is_record(&self) -> bool {
        self.weight > 0.0 && self.weight > self.previous_best
    }
}

pub fn check(history: &[WorkoutLog], exercise_id: &str, weight: f64) -> RecordCheck {
    RecordCheck {
        weight,
        previous_best: previous_best(history, exercise_id),
    }
}

/// Most recent completed set at position `set_index` for `exercise_id`.
///
/// Sessions are scanned newest first; within a session only the first log
/// of the exercise is considered.
pub fn ghost<'a>(
    history: &'a [WorkoutLog],
    exercise_id: &str,
    set_index: usize,
) -> Option<&'a ExerciseSet> {
    history.iter().find_map(|log| {
        log.exercises
            .iter()
            .find(|ex| ex.exercise_id == exercise_id)
            .and_then(|ex| ex.sets.get(set_index))
            .filter(|set| set.completed)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExerciseLog;

    fn set(weight: f64, reps: u32, completed: bool, warmup: bool) -> ExerciseSet {
        ExerciseSet {
            weight,
            reps,
            completed,
            is_warmup: warmup,
            ..ExerciseSet::empty()
        }
    }

    fn log(start: i64, exercises: Vec<(&str, Vec<ExerciseSet>)>) -> WorkoutLog {
        WorkoutLog {
            id: start.to_string(),
            start_time: start,
            end_time: Some(start + 1),
            routine_id: None,
            name: "test".into(),
            exercises: exercises
                .into_iter()
                .map(|(id, sets)| ExerciseLog {
                    exercise_id: id.into(),
                    sets,
                    notes: None,
                })
                .collect(),
            records: Vec::new(),
        }
    }

    fn sample_history() -> Vec<WorkoutLog> {
        vec![
            log(
                3,
                vec![
                    ("bench", vec![set(85.0, 3, false, false), set(80.0, 5, true, false)]),
                    ("squat", vec![set(120.0, 5, true, false)]),
                ],
            ),
            log(
                2,
                vec![
                    ("bench", vec![set(60.0, 8, true, true), set(75.0, 5, true, false)]),
                    ("bench", vec![set(82.5, 2, true, false)]),
                ],
            ),
            log(1, vec![("bench", vec![set(70.0, 5, true, false)])]),
        ]
    }

    #[test]
    fn best_ignores_incomplete_sets() {
        let history = sample_history();
        // 85 was never completed; 82.5 sits in a repeated log of the same exercise.
        assert_eq!(previous_best(&history, "bench"), 82.5);
        assert_eq!(previous_best(&history, "squat"), 120.0);
    }

    #[test]
    fn best_is_zero_without_history() {
        assert_eq!(previous_best(&[], "bench"), 0.0);
        assert_eq!(previous_best(&sample_history(), "deadlift"), 0.0);
    }

    #[test]
    fn best_counts_completed_warmups() {
        let history = vec![log(
            1,
            vec![("row", vec![set(100.0, 1, true, true), set(80.0, 5, true, false)])],
        )];
        assert_eq!(previous_best(&history, "row"), 100.0);
        assert!(!check(&history, "row", 90.0).is_record());
        assert!(check(&history, "row", 102.5).is_record());
    }

    #[test]
    fn best_is_order_independent() {
        let mut history = sample_history();
        history.reverse();
        assert_eq!(previous_best(&history, "bench"), 82.5);
    }

    #[test]
    fn record_check() {
        let history = sample_history();
        assert!(check(&history, "bench", 83.0).is_record());
        assert!(!check(&history, "bench", 82.5).is_record());
        assert!(check(&history, "deadlift", 40.0).is_record());
        assert!(!check(&history, "deadlift", 0.0).is_record());
    }

    #[test]
    fn ghost_uses_latest_completed_set_at_position() {
        let history = sample_history();
        let first = ghost(&history, "bench", 0).unwrap();
        // Newest session's first set was not completed, so the previous session answers.
        assert_eq!(first.weight, 60.0);
        let second = ghost(&history, "bench", 1).unwrap();
        assert_eq!(second.weight, 80.0);
        assert!(ghost(&history, "bench", 5).is_none());
        assert!(ghost(&history, "deadlift", 0).is_none());
    }
}
