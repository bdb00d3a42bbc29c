use anyhow::{Context, Result};
use colored::Colorize;
use irontrack::catalog;

use super::{Ctx, confirm};
use crate::cli::RoutineCmd;

pub async fn handle(cmd: RoutineCmd, ctx: &mut Ctx) -> Result<()> {
    match cmd {
        RoutineCmd::Import { files } => {
            if files.is_empty() {
                println!("{} no files given", "warning:".yellow().bold());
                return Ok(());
            }

            for file in files {
                let toml_str = tokio::fs::read_to_string(&file)
                    .await
                    .with_context(|| format!("Could not read file: `{}`", file))?;

                match ctx.tracker.modify(|state| catalog::import_routines(state, &toml_str)) {
                    Ok(summary) => {
                        for name in &summary.added {
                            println!("{} routine `{}` imported", "ok:".green().bold(), name);
                        }
                        for name in &summary.skipped {
                            println!(
                                "{} routine `{}` already exists, skipped",
                                "warning:".yellow().bold(),
                                name
                            );
                        }
                        if summary.added.is_empty() && summary.skipped.is_empty() {
                            println!(
                                "{} no [[routine]] entries found in {}",
                                "warning:".yellow().bold(),
                                file
                            );
                        }
                    }
                    Err(e) => println!("{} {}: {:#}", "error:".red().bold(), file, e),
                }
            }
        }

        RoutineCmd::List => {
            let state = ctx.tracker.state();
            if state.routines.is_empty() {
                println!("{}", "  (no routines found — import one with `routine import`)".dimmed());
                return Ok(());
            }

            println!("{}", "Routines:".cyan().bold());
            for (i, r) in state.routines.iter().enumerate() {
                let desc = r
                    .description
                    .as_deref()
                    .map(|d| format!("– {d}").dimmed().to_string())
                    .unwrap_or_default();
                let home = if r.is_home { " 🏠" } else { "" };
                println!(
                    " {} • {}{} {} {}",
                    format!("{}", i + 1).yellow(),
                    r.name.bold(),
                    home,
                    desc,
                    format!("({} exercises)", r.exercises.len()).dimmed()
                );
            }
        }

        RoutineCmd::Show { routine } => {
            let state = ctx.tracker.state();
            let r = match catalog::find_routine(state, &routine) {
                Ok(r) => r,
                Err(e) => {
                    println!("{} {}", "error:".red().bold(), e);
                    return Ok(());
                }
            };

            println!("{} {}", "Routine:".cyan().bold(), r.name.bold());
            if let Some(d) = &r.description {
                println!("  {}", d.dimmed());
            }
            for (i, re) in r.exercises.iter().enumerate() {
                let reps = if re.target_reps.is_empty() {
                    String::new()
                } else {
                    format!(" × {}", re.target_reps)
                };
                println!(
                    " {} • {} — {} sets{}",
                    format!("{}", i + 1).yellow(),
                    state.exercise_name(&re.exercise_id).bold(),
                    re.target_sets,
                    reps
                );
            }
        }

        RoutineCmd::Delete { routine, yes } => {
            let (id, name) = match catalog::find_routine(ctx.tracker.state(), &routine) {
                Ok(r) => (r.id.clone(), r.name.clone()),
                Err(e) => {
                    println!("{} {}", "error:".red().bold(), e);
                    return Ok(());
                }
            };
            if !confirm(&format!("delete routine `{name}`?"), yes)? {
                return Ok(());
            }
            if ctx
                .tracker
                .modify(|state| catalog::delete_routine(state, &id))
                .is_some()
            {
                println!("{} routine `{}` deleted", "ok:".green().bold(), name);
            }
        }
    }

    Ok(())
}
