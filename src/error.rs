use thiserror::Error;

/// Precondition violations reported by the session core.
///
/// None of these are fatal: the operation is refused and the state it was
/// applied to is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no active session")]
    NoActiveSession,

    #[error("exercise index {index} out of range (session has {len})")]
    ExerciseOutOfRange { index: usize, len: usize },

    #[error("set index {index} out of range for exercise {exercise} (it has {len})")]
    SetOutOfRange {
        exercise: usize,
        index: usize,
        len: usize,
    },

    #[error("unknown set field `{0}`")]
    UnknownField(String),

    #[error("no routine matching `{0}`")]
    UnknownRoutine(String),

    #[error("no exercise matching `{0}`")]
    UnknownExercise(String),
}

pub type SessionResult<T> = Result<T, SessionError>;
