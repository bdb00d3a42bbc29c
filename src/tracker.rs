//! Session lifecycle and the single writer of [`AppState`].
//!
//! A [`Tracker`] owns the application snapshot and the one rest timer that
//! belongs to the active session. Every mutation goes through it and bumps
//! [`Tracker::revision`], which is what the storage side watches to decide
//! whether a fresh snapshot has to be written.

use crate::{
    catalog,
    error::{SessionError, SessionResult},
    models::{AppState, EpochMillis, ExerciseLog, ExerciseSet, FREE_SESSION_NAME, Routine, WorkoutLog, new_id},
    record,
    session::{self, Effect, SetField},
    timer::{Cue, RestTimer, Signal},
};

/// Builds a fresh session, seeded with one empty set per routine exercise.
pub fn new_session(routine: Option<&Routine>, now: EpochMillis) -> WorkoutLog {
    WorkoutLog {
        id: new_id(),
        start_time: now,
        end_time: None,
        routine_id: routine.map(|r| r.id.clone()),
        name: routine
            .map(|r| r.name.clone())
            .unwrap_or_else(|| FREE_SESSION_NAME.to_string()),
        exercises: routine
            .map(|r| {
                r.exercises
                    .iter()
                    .map(|re| ExerciseLog {
                        exercise_id: re.exercise_id.clone(),
                        sets: vec![ExerciseSet::empty()],
                        notes: None,
                    })
                    .collect()
            })
            .unwrap_or_default(),
        records: Vec::new(),
    }
}

/// Effects of a set edit after the tracker has carried out the rest request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Applied {
    pub effects: Vec<Effect>,
    /// Signals the user's settings allow, in emission order.
    pub signals: Vec<Signal>,
}

impl Applied {
    pub fn started_rest(&self) -> bool {
        self.effects.contains(&Effect::StartRest)
    }

    pub fn new_record(&self) -> Option<(&str, f64, f64)> {
        self.effects.iter().find_map(|e| match e {
            Effect::NewRecord {
                exercise_id,
                weight,
                previous_best,
            } => Some((exercise_id.as_str(), *weight, *previous_best)),
            _ => None,
        })
    }
}

/// The session that was just archived.
#[derive(Debug, Clone, PartialEq)]
pub struct Finished {
    pub workout: WorkoutLog,
    pub volume: f64,
    pub signals: Vec<Signal>,
}

#[derive(Debug, Default)]
pub struct Tracker {
    state: AppState,
    timer: RestTimer,
    revision: u64,
}

impl Tracker {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            timer: RestTimer::new(),
            revision: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn into_state(self) -> AppState {
        self.state
    }

    /// Increases on every successful mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn timer(&self) -> &RestTimer {
        &self.timer
    }

    pub fn active(&self) -> Option<&WorkoutLog> {
        self.state.active_workout.as_ref()
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    fn admit(&self, signals: impl IntoIterator<Item = Signal>) -> Vec<Signal> {
        signals
            .into_iter()
            .filter(|s| s.allowed(&self.state.settings))
            .collect()
    }

    fn require_active(&self) -> SessionResult<&WorkoutLog> {
        self.state
            .active_workout
            .as_ref()
            .ok_or(SessionError::NoActiveSession)
    }

    /// Swaps in a new active session produced from the current one.
    fn replace_active<F>(&mut self, edit: F) -> SessionResult<()>
    where
        F: FnOnce(&WorkoutLog) -> SessionResult<WorkoutLog>,
    {
        let next = edit(self.require_active()?)?;
        self.state.active_workout = Some(next);
        self.touch();
        Ok(())
    }

    //
    // Lifecycle
    //

    /// Starts a session, replacing any active one without archiving it.
    pub fn start(&mut self, routine: Option<&Routine>, now: EpochMillis) -> &WorkoutLog {
        if let Some(old) = &self.state.active_workout {
            log::warn!("replacing active session {} ({})", old.name, old.id);
        }
        let workout = new_session(routine, now);
        log::info!("started session {} ({})", workout.name, workout.id);

        self.timer.cancel();
        self.touch();
        self.state.active_workout.insert(workout)
    }

    /// Starts a session from a routine looked up by id, name or 1-based index.
    pub fn start_routine(&mut self, key: &str, now: EpochMillis) -> SessionResult<&WorkoutLog> {
        let routine = catalog::find_routine(&self.state, key)?.clone();
        Ok(self.start(Some(&routine), now))
    }

    /// Drops the active session without writing history.
    pub fn cancel(&mut self) -> Option<WorkoutLog> {
        self.timer.cancel();
        let dropped = self.state.active_workout.take()?;
        log::info!("cancelled session {} ({})", dropped.name, dropped.id);
        self.touch();
        Some(dropped)
    }

    /// Stamps the end time and moves the active session to the head of history.
    pub fn finish(&mut self, now: EpochMillis) -> SessionResult<Finished> {
        let mut workout = self
            .state
            .active_workout
            .take()
            .ok_or(SessionError::NoActiveSession)?;
        workout.end_time = Some(now.max(workout.start_time));
        self.timer.cancel();

        let volume = session::current_volume(&workout);
        log::info!(
            "finished session {} ({}): {volume}kg, {} record(s)",
            workout.name,
            workout.id,
            workout.records.len()
        );
        self.state.history.insert(0, workout.clone());
        self.touch();

        Ok(Finished {
            workout,
            volume,
            signals: self.admit([Signal::Sound(Cue::WorkoutFinish)]),
        })
    }

    //
    // In-session edits
    //

    pub fn add_exercise(&mut self, exercise_id: &str) -> SessionResult<()> {
        self.replace_active(|s| Ok(session::add_exercise(s, exercise_id)))
    }

    pub fn remove_exercise(&mut self, index: usize) -> SessionResult<()> {
        self.replace_active(|s| session::remove_exercise(s, index))
    }

    pub fn add_set(&mut self, exercise: usize) -> SessionResult<()> {
        self.replace_active(|s| session::add_set(s, exercise))
    }

    pub fn remove_set(&mut self, exercise: usize, set: usize) -> SessionResult<()> {
        self.replace_active(|s| session::remove_set(s, exercise, set))
    }

    pub fn note_exercise(&mut self, exercise: usize, note: Option<String>) -> SessionResult<()> {
        self.replace_active(|s| session::note_exercise(s, exercise, note))
    }

    /// Applies a set edit and carries out the rest request it may produce.
    pub fn update_set(
        &mut self,
        exercise: usize,
        set: usize,
        field: SetField,
    ) -> SessionResult<Applied> {
        let edit = session::update_set(
            self.require_active()?,
            &self.state.history,
            exercise,
            set,
            field,
        )?;
        self.state.active_workout = Some(edit.session);
        self.touch();

        let mut signals = Vec::new();
        for effect in &edit.effects {
            match effect {
                Effect::StartRest => {
                    let seconds = self.state.settings.rest_seconds();
                    signals.extend(self.timer.start(seconds));
                }
                Effect::Cue(cue) => signals.push(Signal::Sound(*cue)),
                Effect::NewRecord { .. } => {}
            }
        }

        Ok(Applied {
            signals: self.admit(signals),
            effects: edit.effects,
        })
    }

    /// Volume of the active session, 0 without one.
    pub fn volume(&self) -> f64 {
        self.active().map(session::current_volume).unwrap_or(0.0)
    }

    /// Previous session's completed set at the same position.
    pub fn ghost(&self, exercise: usize, set: usize) -> Option<&ExerciseSet> {
        let log = self.active()?.exercises.get(exercise)?;
        record::ghost(&self.state.history, &log.exercise_id, set)
    }

    //
    // Rest timer
    //

    /// Starts the rest countdown manually; `None` uses the configured default.
    pub fn start_rest(&mut self, seconds: Option<u32>) -> SessionResult<Vec<Signal>> {
        self.require_active()?;
        let seconds = seconds.unwrap_or_else(|| self.state.settings.rest_seconds());
        let signals = self.timer.start(seconds);
        Ok(self.admit(signals))
    }

    /// One scheduler tick. Does nothing without an active session.
    pub fn tick(&mut self) -> Vec<Signal> {
        if self.state.active_workout.is_none() {
            self.timer.cancel();
            return Vec::new();
        }
        let signals = self.timer.tick();
        self.admit(signals)
    }

    pub fn extend_rest(&mut self, seconds: u32) -> bool {
        self.timer.extend(seconds)
    }

    pub fn cancel_rest(&mut self) {
        self.timer.cancel();
    }

    pub fn show_rest(&mut self) {
        self.timer.show();
    }

    pub fn hide_rest(&mut self) {
        self.timer.hide();
    }

    //
    // Everything else
    //

    /// Catalog, routine, measurement and settings edits.
    ///
    /// `f` must leave `active_workout` and `history` alone; those belong to
    /// the lifecycle methods above.
    pub fn modify<R>(&mut self, f: impl FnOnce(&mut AppState) -> R) -> R {
        let out = f(&mut self.state);
        self.touch();
        out
    }

    /// Replaces the whole snapshot (import or factory reset).
    pub fn replace_state(&mut self, state: AppState) {
        self.timer.cancel();
        self.state = state;
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RoutineExercise, Settings};

    fn routine(n: usize) -> Routine {
        Routine {
            id: "r1".into(),
            name: "Legs".into(),
            exercises: (0..n)
                .map(|i| RoutineExercise {
                    exercise_id: format!("ex{i}"),
                    target_sets: 3,
                    target_reps: "8-12".into(),
                })
                .collect(),
            color: "indigo".into(),
            description: None,
            is_home: false,
        }
    }

    fn tracker() -> Tracker {
        Tracker::new(AppState::default())
    }

    /// Active session with one bench set of `weight` x 5 ready to complete.
    fn with_bench(weight: f64) -> Tracker {
        let mut t = tracker();
        t.start(None, 1_000);
        t.add_exercise("bench-press").unwrap();
        t.update_set(0, 0, SetField::Weight(weight)).unwrap();
        t.update_set(0, 0, SetField::Reps(5)).unwrap();
        t
    }

    #[test]
    fn routine_seeds_one_empty_set_per_exercise() {
        let mut t = tracker();
        let s = t.start(Some(&routine(3)), 5_000);
        assert_eq!(s.name, "Legs");
        assert_eq!(s.routine_id.as_deref(), Some("r1"));
        assert_eq!(s.start_time, 5_000);
        assert_eq!(s.exercises.len(), 3);
        for log in &s.exercises {
            assert_eq!(log.sets.len(), 1);
            let set = &log.sets[0];
            assert_eq!((set.weight, set.reps), (0.0, 0));
            assert!(!set.completed && !set.is_warmup);
        }
    }

    #[test]
    fn free_session_is_empty() {
        let mut t = tracker();
        let s = t.start(None, 0);
        assert_eq!(s.name, FREE_SESSION_NAME);
        assert!(s.routine_id.is_none());
        assert!(s.exercises.is_empty());
    }

    #[test]
    fn second_start_replaces_without_archiving() {
        let mut t = tracker();
        let first = t.start(None, 1).id.clone();
        let second = t.start(Some(&routine(1)), 2).id.clone();
        assert_ne!(first, second);
        assert_eq!(t.active().unwrap().id, second);
        assert!(t.state().history.is_empty());
    }

    #[test]
    fn replacing_a_session_stops_its_rest() {
        let mut t = with_bench(50.0);
        t.start_rest(Some(30)).unwrap();
        assert!(t.timer().is_counting());
        t.start(None, 2_000);
        assert!(!t.timer().is_counting());
        assert!(!t.timer().is_visible());
        assert!(t.tick().is_empty());
    }

    #[test]
    fn finish_archives_at_head_of_history() {
        let mut t = with_bench(100.0);
        t.update_set(0, 0, SetField::Completed(true)).unwrap();
        let finished = t.finish(4_000).unwrap();
        assert_eq!(finished.volume, 500.0);
        assert_eq!(finished.signals, vec![Signal::Sound(Cue::WorkoutFinish)]);
        assert!(t.active().is_none());
        assert_eq!(t.state().history.len(), 1);

        let head = &t.state().history[0];
        assert_eq!(head.id, finished.workout.id);
        assert!(head.end_time.unwrap() >= head.start_time);

        t.start(None, 5_000);
        let next = t.finish(6_000).unwrap();
        assert_eq!(t.state().history[0].id, next.workout.id);
        assert_eq!(t.state().history[1].id, finished.workout.id);
    }

    #[test]
    fn finish_without_session_is_reported_and_harmless() {
        let mut t = tracker();
        t.start(None, 0);
        t.finish(10).unwrap();
        let before = t.state().clone();
        let revision = t.revision();
        assert_eq!(t.finish(20).unwrap_err(), SessionError::NoActiveSession);
        assert_eq!(t.state(), &before);
        assert_eq!(t.revision(), revision);
    }

    #[test]
    fn end_time_never_precedes_start() {
        let mut t = tracker();
        t.start(None, 10_000);
        let finished = t.finish(9_000).unwrap();
        assert_eq!(finished.workout.end_time, Some(10_000));
    }

    #[test]
    fn cancel_discards_without_history() {
        let mut t = with_bench(60.0);
        t.update_set(0, 0, SetField::Completed(true)).unwrap();
        assert!(t.timer().is_counting());
        assert!(t.cancel().is_some());
        assert!(t.active().is_none());
        assert!(t.state().history.is_empty());
        assert!(!t.timer().is_counting());
        assert!(t.cancel().is_none());
    }

    #[test]
    fn edits_without_session_fail() {
        let mut t = tracker();
        assert_eq!(t.add_exercise("squat"), Err(SessionError::NoActiveSession));
        assert_eq!(t.add_set(0), Err(SessionError::NoActiveSession));
        assert_eq!(
            t.update_set(0, 0, SetField::Reps(3)).unwrap_err(),
            SessionError::NoActiveSession
        );
        assert_eq!(t.revision(), 0);
    }

    #[test]
    fn completing_a_set_starts_the_default_rest() {
        let mut t = with_bench(0.0);
        t.modify(|s| s.settings.default_rest_timer = 120);
        let applied = t.update_set(0, 0, SetField::Completed(true)).unwrap();
        assert!(applied.started_rest());
        assert_eq!(applied.signals, vec![Signal::Sound(Cue::RestStart)]);
        assert_eq!(t.timer().remaining(), Some(120));
        assert!(t.timer().is_visible());
    }

    #[test]
    fn record_reported_once_per_session() {
        let mut t = with_bench(80.0);
        t.update_set(0, 0, SetField::Completed(true)).unwrap();
        t.finish(2_000).unwrap();

        t.start(None, 3_000);
        t.add_exercise("bench-press").unwrap();
        t.update_set(0, 0, SetField::Weight(85.0)).unwrap();
        t.add_set(0).unwrap();
        t.update_set(0, 1, SetField::Weight(87.5)).unwrap();

        let first = t.update_set(0, 0, SetField::Completed(true)).unwrap();
        assert_eq!(first.new_record(), Some(("bench-press", 85.0, 80.0)));
        assert!(first.signals.contains(&Signal::Sound(Cue::PersonalRecord)));

        let second = t.update_set(0, 1, SetField::Completed(true)).unwrap();
        assert!(second.new_record().is_none());
        assert!(!second.signals.contains(&Signal::Sound(Cue::PersonalRecord)));

        let finished = t.finish(4_000).unwrap();
        assert_eq!(finished.workout.records, vec!["bench-press".to_string()]);
    }

    #[test]
    fn muted_settings_drop_sounds() {
        let mut t = with_bench(50.0);
        t.modify(|s| {
            s.settings = Settings {
                sound_enabled: false,
                haptics_enabled: false,
                ..Settings::default()
            }
        });
        let applied = t.update_set(0, 0, SetField::Completed(true)).unwrap();
        assert!(applied.signals.is_empty());
        assert!(applied.new_record().is_some());
        assert!(t.finish(5_000).unwrap().signals.is_empty());
    }

    #[test]
    fn timer_stops_with_the_session() {
        let mut t = with_bench(50.0);
        t.start_rest(Some(30)).unwrap();
        t.finish(2_000).unwrap();
        assert!(!t.timer().is_counting());
        assert!(t.tick().is_empty());
        assert_eq!(t.start_rest(Some(30)), Err(SessionError::NoActiveSession));
    }

    #[test]
    fn tick_runs_the_countdown() {
        let mut t = with_bench(50.0);
        t.start_rest(Some(3)).unwrap();
        assert!(t.extend_rest(2));
        assert_eq!(t.tick(), Vec::new());
        assert_eq!(t.tick(), vec![Signal::Sound(Cue::Tick)]);
        t.tick();
        t.tick();
        let last = t.tick();
        assert!(last.contains(&Signal::Sound(Cue::CountdownStart)));
        assert!(last.contains(&Signal::Haptic(&crate::timer::EXPIRY_VIBRATION)));
        assert!(!t.extend_rest(10));
    }

    #[test]
    fn ghost_reads_previous_session() {
        let mut t = with_bench(70.0);
        t.update_set(0, 0, SetField::Completed(true)).unwrap();
        t.finish(2_000).unwrap();

        t.start(None, 3_000);
        t.add_exercise("bench-press").unwrap();
        let ghost = t.ghost(0, 0).unwrap();
        assert_eq!((ghost.weight, ghost.reps), (70.0, 5));
        assert!(t.ghost(0, 1).is_none());
        assert!(t.ghost(3, 0).is_none());
    }

    #[test]
    fn volume_tracks_active_session() {
        let mut t = tracker();
        assert_eq!(t.volume(), 0.0);
        let mut t2 = with_bench(40.0);
        t2.update_set(0, 0, SetField::Completed(true)).unwrap();
        assert_eq!(t2.volume(), 200.0);
        t.replace_state(t2.into_state());
        assert_eq!(t.volume(), 200.0);
    }

    #[test]
    fn start_routine_by_name() {
        let mut t = tracker();
        t.modify(|s| s.routines.push(routine(2)));
        assert_eq!(t.start_routine("legs", 0).unwrap().exercises.len(), 2);
        assert_eq!(
            t.start_routine("arms", 0).unwrap_err(),
            SessionError::UnknownRoutine("arms".into())
        );
    }

    #[test]
    fn history_entries_are_not_touched_by_later_edits() {
        let mut t = with_bench(60.0);
        t.update_set(0, 0, SetField::Completed(true)).unwrap();
        t.finish(2_000).unwrap();
        let archived = t.state().history[0].clone();

        t.start(None, 3_000);
        t.add_exercise("bench-press").unwrap();
        t.update_set(0, 0, SetField::Weight(200.0)).unwrap();
        t.remove_exercise(0).unwrap();
        assert_eq!(t.state().history[0], archived);
    }
}
