use once_cell::sync::Lazy;
use std::{collections::HashSet, fmt::Display, str::FromStr};
use strsim::jaro_winkler;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Muscle category of a catalog exercise.
///
/// The Spanish aliases accept snapshots exported by the mobile app.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Muscle {
    #[serde(alias = "Pecho")]
    Chest,
    #[serde(alias = "Espalda")]
    Back,
    #[serde(alias = "Piernas")]
    Legs,
    #[serde(alias = "Glúteos")]
    Glutes,
    #[serde(alias = "Hombros")]
    Shoulders,
    #[serde(alias = "Brazos")]
    Arms,
    #[serde(alias = "Abdominales")]
    Core,
    #[serde(alias = "Cardio")]
    Cardio,
    #[serde(alias = "En Casa")]
    Home,
    #[serde(alias = "Otro")]
    Other,
}

impl Display for Muscle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Chest => "chest",
            Self::Back => "back",
            Self::Legs => "legs",
            Self::Glutes => "glutes",
            Self::Shoulders => "shoulders",
            Self::Arms => "arms",
            Self::Core => "core",
            Self::Cardio => "cardio",
            Self::Home => "home",
            Self::Other => "other",
        };

        write!(f, "{}", s)
    }
}

impl FromStr for Muscle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let canon = canonical_muscle(s).ok_or_else(|| format!("unknown muscle `{s}`"))?;
        Ok(match canon.as_str() {
            "chest" => Self::Chest,
            "back" => Self::Back,
            "legs" => Self::Legs,
            "glutes" => Self::Glutes,
            "shoulders" => Self::Shoulders,
            "arms" => Self::Arms,
            "core" => Self::Core,
            "cardio" => Self::Cardio,
            "home" => Self::Home,
            _ => Self::Other,
        })
    }
}

pub static ALLOWED_MUSCLES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "chest",
        "back",
        "legs",
        "glutes",
        "shoulders",
        "arms",
        "core",
        "cardio",
        "home",
        "other",
    ])
});

/// Returns the canonical lowercase muscle name or `None` if not allowed.
pub fn canonical_muscle<S: AsRef<str>>(m: S) -> Option<String> {
    let m = m.as_ref().trim().to_ascii_lowercase();
    if ALLOWED_MUSCLES.contains(m.as_str()) {
        Some(m)
    } else {
        None
    }
}

/// Return the closest allowed muscle for `input`
/// if similarity ≥ 0.80 *and* clearly better than the runner-up.
/// Otherwise return `None` (no suggestion shown).
pub fn best_muscle_suggestion(input: &str) -> Option<&'static str> {
    let inp = input.trim().to_ascii_lowercase();
    if inp.is_empty() {
        return None;
    }

    let mut scores: Vec<(&'static str, f64)> = ALLOWED_MUSCLES
        .iter()
        .copied()
        .map(|m| (m, jaro_winkler(&inp, m)))
        .collect();

    // Highest score first.
    scores.sort_by(|a, b| b.1.total_cmp(&a.1));

    let (best_muscle, best_score) = scores[0];
    let second_score = scores.get(1).map(|(_, s)| *s).unwrap_or(0.0);

    const MIN_SCORE: f64 = 0.80;
    const GAP: f64 = 0.02;

    if best_score >= MIN_SCORE && best_score - second_score >= GAP {
        Some(best_muscle)
    } else {
        None
    }
}
