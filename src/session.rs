//! Edits to the in-progress workout.
//!
//! Every edit takes the current session by reference and returns a new one;
//! the input is never touched, so earlier snapshots stay valid.

use crate::{
    error::{SessionError, SessionResult},
    models::{ExerciseLog, ExerciseSet, WorkoutLog},
    record,
    timer::Cue,
};

/// RPE given to sets created during a session.
pub const DEFAULT_RPE: f32 = 8.0;

/// One field of a set together with its new value.
#[derive(Debug, Clone, PartialEq)]
pub enum SetField {
    Weight(f64),
    Reps(u32),
    Completed(bool),
    Warmup(bool),
    Rpe(Option<f32>),
    Notes(Option<String>),
}

impl SetField {
    /// Builds a field edit from raw user input.
    ///
    /// Only an unknown field name is an error; bad numbers become 0 and an
    /// unreadable RPE clears it.
    pub fn parse(field: &str, raw: &str) -> SessionResult<Self> {
        let field = field.trim().to_ascii_lowercase();
        let raw = raw.trim();
        Ok(match field.as_str() {
            "weight" | "w" | "kg" => Self::Weight(crate::utils::parse_weight(raw)),
            "reps" | "r" => Self::Reps(crate::utils::parse_reps(raw)),
            "completed" | "done" => Self::Completed(parse_flag(raw)),
            "warmup" | "iswarmup" | "is-warmup" | "is_warmup" => Self::Warmup(parse_flag(raw)),
            "rpe" => Self::Rpe(raw.replace(',', ".").parse::<f32>().ok()),
            "notes" | "note" => Self::Notes(Some(raw.to_string())),
            _ => return Err(SessionError::UnknownField(field)),
        })
    }

    fn apply(self, set: &mut ExerciseSet) {
        match self {
            Self::Weight(w) => set.weight = if w.is_finite() && w > 0.0 { w } else { 0.0 },
            Self::Reps(r) => set.reps = r,
            Self::Completed(c) => set.completed = c,
            Self::Warmup(w) => set.is_warmup = w,
            Self::Rpe(rpe) => set.rpe = rpe.filter(|r| r.is_finite()).map(|r| r.clamp(1.0, 10.0)),
            Self::Notes(notes) => set.notes = notes.filter(|n| !n.trim().is_empty()),
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "1" | "on" | "x"
    )
}

/// Side effect requested by an edit, for the caller to carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Start the rest countdown with the configured default.
    StartRest,
    /// First set this session to beat the historical best for the exercise.
    NewRecord {
        exercise_id: String,
        weight: f64,
        previous_best: f64,
    },
    Cue(Cue),
}

/// Result of [`update_set`]: the replacement session and what it triggered.
#[derive(Debug, Clone, PartialEq)]
pub struct Edit {
    pub session: WorkoutLog,
    pub effects: Vec<Effect>,
}

fn check_exercise(session: &WorkoutLog, index: usize) -> SessionResult<()> {
    if index < session.exercises.len() {
        Ok(())
    } else {
        Err(SessionError::ExerciseOutOfRange {
            index,
            len: session.exercises.len(),
        })
    }
}

fn check_set(session: &WorkoutLog, exercise: usize, index: usize) -> SessionResult<()> {
    check_exercise(session, exercise)?;
    let len = session.exercises[exercise].sets.len();
    if index < len {
        Ok(())
    } else {
        Err(SessionError::SetOutOfRange {
            exercise,
            index,
            len,
        })
    }
}

fn working_set() -> ExerciseSet {
    ExerciseSet {
        rpe: Some(DEFAULT_RPE),
        ..ExerciseSet::empty()
    }
}

/// Appends `exercise_id` with one empty set. Repeats are allowed.
pub fn add_exercise(session: &WorkoutLog, exercise_id: &str) -> WorkoutLog {
    let mut next = session.clone();
    next.exercises.push(ExerciseLog {
        exercise_id: exercise_id.to_string(),
        sets: vec![working_set()],
        notes: None,
    });
    next
}

pub fn remove_exercise(session: &WorkoutLog, index: usize) -> SessionResult<WorkoutLog> {
    check_exercise(session, index)?;
    let mut next = session.clone();
    next.exercises.remove(index);
    Ok(next)
}

/// Appends a set that copies weight and reps from the last one.
pub fn add_set(session: &WorkoutLog, exercise: usize) -> SessionResult<WorkoutLog> {
    check_exercise(session, exercise)?;
    let mut next = session.clone();
    let log = &mut next.exercises[exercise];
    let (weight, reps) = log
        .sets
        .last()
        .map(|prev| (prev.weight, prev.reps))
        .unwrap_or((0.0, 0));
    log.sets.push(ExerciseSet {
        weight,
        reps,
        ..working_set()
    });
    Ok(next)
}

pub fn remove_set(session: &WorkoutLog, exercise: usize, set: usize) -> SessionResult<WorkoutLog> {
    check_set(session, exercise, set)?;
    let mut next = session.clone();
    next.exercises[exercise].sets.remove(set);
    Ok(next)
}

pub fn note_exercise(
    session: &WorkoutLog,
    exercise: usize,
    note: Option<String>,
) -> SessionResult<WorkoutLog> {
    check_exercise(session, exercise)?;
    let mut next = session.clone();
    next.exercises[exercise].notes = note.filter(|n| !n.trim().is_empty());
    Ok(next)
}

/// Sets one field of one set.
///
/// Completing a working set that was not completed before requests a rest
/// period and checks it against `history` for a personal record. An
/// exercise is flagged as a record at most once per session.
pub fn update_set(
    session: &WorkoutLog,
    history: &[WorkoutLog],
    exercise: usize,
    set: usize,
    field: SetField,
) -> SessionResult<Edit> {
    check_set(session, exercise, set)?;

    let mut next = session.clone();
    let mut effects = Vec::new();
    let exercise_id = next.exercises[exercise].exercise_id.clone();
    let target = &next.exercises[exercise].sets[set];

    let completes = matches!(field, SetField::Completed(true)) && !target.completed && !target.is_warmup;
    if completes {
        effects.push(Effect::StartRest);

        let weight = target.weight;
        if weight > 0.0 {
            let check = record::check(history, &exercise_id, weight);
            if check.is_record() && !next.records.contains(&exercise_id) {
                log::info!(
                    "new personal record for {exercise_id}: {weight}kg (previous {}kg)",
                    check.previous_best
                );
                next.records.push(exercise_id.clone());
                effects.push(Effect::NewRecord {
                    exercise_id,
                    weight,
                    previous_best: check.previous_best,
                });
                effects.push(Effect::Cue(Cue::PersonalRecord));
            }
        }
    }

    field.apply(&mut next.exercises[exercise].sets[set]);
    Ok(Edit {
        session: next,
        effects,
    })
}

/// Total kg moved in completed working sets. Warmups and open sets never count.
pub fn current_volume(session: &WorkoutLog) -> f64 {
    session
        .exercises
        .iter()
        .flat_map(|ex| &ex.sets)
        .filter(|set| set.is_working())
        .map(ExerciseSet::volume)
        .sum()
}

/// `(completed, total)` counts over working and warmup sets alike.
pub fn progress(session: &WorkoutLog) -> (usize, usize) {
    let sets = session.exercises.iter().flat_map(|ex| &ex.sets);
    let total = sets.clone().count();
    let done = sets.filter(|s| s.completed).count();
    (done, total)
}
