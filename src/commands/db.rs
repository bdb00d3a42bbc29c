use anyhow::{Context, Result};
use colored::Colorize;
use irontrack::{AppState, store};

use super::{Ctx, confirm};
use crate::cli::DbCmd;

const DEFAULT_EXPORT: &str = "irontrack-export.json";

pub async fn handle(cmd: DbCmd, ctx: &mut Ctx) -> Result<()> {
    match cmd {
        DbCmd::Export { file } => {
            let path = file.unwrap_or_else(|| DEFAULT_EXPORT.to_string());
            let json = store::export_json(ctx.tracker.state())?;
            tokio::fs::write(&path, json)
                .await
                .with_context(|| format!("Failed to write export to `{}`", path))?;
            println!("{} exported to {}", "ok:".green().bold(), path);
        }

        DbCmd::Import { file } => {
            let json = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Could not read file: `{}`", file))?;
            let state = store::import_json(&json)?;
            let summary = format!(
                "{} workouts, {} routines, {} exercises",
                state.history.len(),
                state.routines.len(),
                state.exercises.len()
            );
            ctx.tracker.replace_state(state);
            println!("{} imported {}", "ok:".green().bold(), summary);
        }

        DbCmd::Reset { yes } => {
            if !confirm("erase all history, routines and custom exercises?", yes)? {
                println!("{} nothing changed", "info:".blue().bold());
                return Ok(());
            }
            ctx.tracker.replace_state(AppState::default());
            println!("{} factory reset complete", "ok:".green().bold());
        }
    }

    Ok(())
}
