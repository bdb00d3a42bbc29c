use anyhow::Result;
use colored::Colorize;
use irontrack::{
    catalog,
    types::{ALLOWED_MUSCLES, Muscle, best_muscle_suggestion, canonical_muscle},
};
use itertools::Itertools;

use super::{Ctx, now_ms};
use crate::cli::ExerciseCmd;

fn unknown_muscle(raw: &str) {
    println!("{} unknown muscle `{}`", "error:".red().bold(), raw);
    if let Some(s) = best_muscle_suggestion(raw) {
        println!("  did you mean `{}`?", s.green());
    }
    println!(
        "  allowed: {}",
        ALLOWED_MUSCLES.iter().sorted().join(", ").dimmed()
    );
}

pub async fn handle(cmd: ExerciseCmd, ctx: &mut Ctx) -> Result<()> {
    match cmd {
        ExerciseCmd::Add { name, muscle, desc } => {
            if name.trim().is_empty() {
                println!("{} exercise name must not be empty", "error:".red().bold());
                return Ok(());
            }
            let Ok(muscle) = muscle.parse::<Muscle>() else {
                unknown_muscle(&muscle);
                return Ok(());
            };
            if catalog::find_exercise(ctx.tracker.state(), &name).is_ok() {
                println!(
                    "{} Exercise \"{}\" already exists — use `ex list` to view all exercises",
                    "warning:".yellow().bold(),
                    name
                );
                return Ok(());
            }

            let id = ctx.tracker.modify(|state| {
                catalog::add_custom_exercise(state, &name, muscle, desc, now_ms())
                    .id
                    .clone()
            });
            println!("{} Exercise \"{}\" added ({})", "info:".blue().bold(), name.trim(), id.dimmed());
        }

        ExerciseCmd::List { muscle } => {
            let filter = match muscle.as_deref() {
                Some(raw) => match canonical_muscle(raw) {
                    Some(m) => Some(m),
                    None => {
                        unknown_muscle(raw);
                        return Ok(());
                    }
                },
                None => None,
            };

            let state = ctx.tracker.state();
            let rows: Vec<_> = state
                .exercises
                .iter()
                .enumerate()
                .filter(|(_, e)| filter.as_deref().is_none_or(|m| e.muscle.to_string() == m))
                .collect();

            if rows.is_empty() {
                println!("{}", "  (no exercises found)".dimmed());
                return Ok(());
            }

            println!("{}", "Exercises:".cyan().bold());
            let idx_w = state.exercises.len().to_string().len();
            for (i, e) in rows {
                println!(
                    " {} • {} {}",
                    format!("{:>width$}", i + 1, width = idx_w).yellow(),
                    e.name.bold(),
                    format!("[{}]", e.muscle).dimmed()
                );
            }
        }

        ExerciseCmd::Show { exercise } => {
            let key = exercise.join(" ");
            let state = ctx.tracker.state();
            let ex = match catalog::find_exercise(state, &key) {
                Ok(ex) => ex,
                Err(e) => {
                    println!("{} {}", "error:".red().bold(), e);
                    if let Some(s) = catalog::suggest_exercise(state, &key) {
                        println!("  did you mean `{}`?", s.name.green());
                    }
                    return Ok(());
                }
            };

            println!("{} {}", ex.name.bold(), format!("[{}]", ex.muscle).dimmed());
            if let Some(d) = &ex.description {
                println!("  {}", d);
            }
            for tip in &ex.tips {
                println!("  {} {}", "•".cyan(), tip);
            }

            let best = irontrack::record::previous_best(&state.history, &ex.id);
            if best > 0.0 {
                println!("  {} {}kg", "best:".yellow().bold(), best);
            }
        }
    }

    Ok(())
}
