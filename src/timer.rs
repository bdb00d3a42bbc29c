//! Rest countdown between sets.
//!
//! The timer never sleeps or spawns anything itself: an external scheduler
//! calls [`RestTimer::tick`] once per second while it is counting, and the
//! caller dispatches the returned [`Signal`]s.

use crate::models::Settings;

/// Vibration pattern requested when a rest period ends, in ms.
pub const EXPIRY_VIBRATION: [u32; 3] = [200, 100, 200];

/// Remaining seconds at or below which every tick is audible.
const TICK_CUE_FROM: u32 = 3;

/// Named sounds; synthesis is up to whoever plays them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    RestStart,
    Tick,
    CountdownStart,
    WorkoutFinish,
    PersonalRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Sound(Cue),
    Haptic(&'static [u32]),
}

impl Signal {
    /// Whether the user's settings let this signal through.
    pub fn allowed(&self, settings: &Settings) -> bool {
        match self {
            Self::Sound(_) => settings.sound_enabled,
            Self::Haptic(_) => settings.haptics_enabled,
        }
    }
}

/// Output device for signals (speaker, terminal bell, vibration motor).
pub trait CueSink {
    fn play(&mut self, cue: Cue);
    fn vibrate(&mut self, pattern: &[u32]);
}

pub fn dispatch<S: CueSink + ?Sized>(sink: &mut S, signals: &[Signal]) {
    for signal in signals {
        match signal {
            Signal::Sound(cue) => sink.play(*cue),
            Signal::Haptic(pattern) => sink.vibrate(pattern),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimerState {
    #[default]
    Idle,
    Counting(u32),
}

/// Countdown plus an independent "shown" flag: hiding the display does not
/// stop the clock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestTimer {
    state: TimerState,
    visible: bool,
}

impl RestTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining(&self) -> Option<u32> {
        match self.state {
            TimerState::Idle => None,
            TimerState::Counting(secs) => Some(secs),
        }
    }

    pub fn is_counting(&self) -> bool {
        matches!(self.state, TimerState::Counting(_))
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// (Re)starts the countdown and shows it. A running countdown is replaced.
    pub fn start(&mut self, seconds: u32) -> Vec<Signal> {
        self.state = TimerState::Counting(seconds);
        self.visible = true;
        log::debug!("rest timer started: {seconds}s");
        vec![Signal::Sound(Cue::RestStart)]
    }

    /// Advances the countdown by one second.
    ///
    /// Reaching zero signals expiry and returns the timer to idle in the same
    /// call; there is no observable zero state.
    pub fn tick(&mut self) -> Vec<Signal> {
        let TimerState::Counting(remaining) = self.state else {
            return Vec::new();
        };

        let next = remaining.saturating_sub(1);
        if next == 0 {
            self.state = TimerState::Idle;
            self.visible = false;
            log::debug!("rest timer expired");
            return vec![
                Signal::Sound(Cue::CountdownStart),
                Signal::Haptic(&EXPIRY_VIBRATION),
            ];
        }

        self.state = TimerState::Counting(next);
        if next <= TICK_CUE_FROM {
            vec![Signal::Sound(Cue::Tick)]
        } else {
            Vec::new()
        }
    }

    /// Adds time to a running countdown. Returns `false` when idle.
    pub fn extend(&mut self, seconds: u32) -> bool {
        match &mut self.state {
            TimerState::Counting(remaining) => {
                *remaining = remaining.saturating_add(seconds);
                true
            }
            TimerState::Idle => false,
        }
    }

    /// Stops and hides the countdown without any cue.
    pub fn cancel(&mut self) {
        self.state = TimerState::Idle;
        self.visible = false;
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}
