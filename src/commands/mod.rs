use std::io::{self, BufRead, Write};

use anyhow::{Result, anyhow};
use colored::Colorize;
use irontrack::{
    Tracker,
    models::EpochMillis,
    store::{self, DB},
    timer::{Cue, CueSink, Signal, dispatch},
};

pub mod config;
pub mod db;
pub mod exercise;
pub mod measure;
pub mod routine;
pub mod session;
pub mod settings;
pub mod timer;
pub mod tools;

/// Open database plus the tracker loaded from it.
pub struct Ctx {
    pub pool: DB,
    pub tracker: Tracker,
    saved_revision: u64,
}

impl Ctx {
    pub async fn load(pool: DB) -> Result<Self> {
        let tracker = Tracker::new(store::load(&pool).await?);
        let saved_revision = tracker.revision();
        Ok(Self {
            pool,
            tracker,
            saved_revision,
        })
    }

    /// Writes the snapshot if anything changed since the last write.
    pub async fn persist(&mut self) -> Result<()> {
        if self.tracker.revision() != self.saved_revision {
            store::save(&self.pool, self.tracker.state()).await?;
            self.saved_revision = self.tracker.revision();
        }
        Ok(())
    }

    pub fn play(&self, signals: &[Signal]) {
        dispatch(&mut TerminalCues, signals);
    }
}

pub fn now_ms() -> EpochMillis {
    chrono::Utc::now().timestamp_millis()
}

/// Converts a 1-based CLI index to a 0-based one.
pub fn zero_based(idx: usize, what: &str) -> Result<usize> {
    idx.checked_sub(1)
        .ok_or_else(|| anyhow!("{what} index must be ≥ 1"))
}

/// Asks on stdin unless `assume_yes` is set.
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    print!("{} {} [y/N] ", "confirm:".yellow().bold(), prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

pub fn fmt_kg(w: f64) -> String {
    format!("{w}kg")
}

/// Plays cues as terminal output; there is no vibration motor here.
pub struct TerminalCues;

impl CueSink for TerminalCues {
    fn play(&mut self, cue: Cue) {
        match cue {
            Cue::RestStart => eprint!("\x07"),
            Cue::Tick => eprint!("\x07"),
            Cue::CountdownStart => eprintln!("\x07{}", "GO!".green().bold()),
            Cue::PersonalRecord => eprintln!("\x07{}", "🏆 new personal record!".yellow().bold()),
            Cue::WorkoutFinish => eprintln!("\x07{}", "🎉 workout complete".green().bold()),
        }
    }

    fn vibrate(&mut self, pattern: &[u32]) {
        log::debug!("vibration requested: {pattern:?}");
    }
}
