use anyhow::Result;
use chrono::{Local, TimeZone};
use colored::Colorize;
use irontrack::{catalog, utils::parse_weight};

use super::{Ctx, now_ms};
use crate::cli::MeasureCmd;

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

pub async fn handle(cmd: MeasureCmd, ctx: &mut Ctx) -> Result<()> {
    match cmd {
        MeasureCmd::Add {
            weight,
            body_fat,
            note,
        } => {
            let weight = parse_weight(&weight);
            if weight <= 0.0 {
                println!("{} weight must be greater than 0", "error:".red().bold());
                return Ok(());
            }
            let body_fat = body_fat.as_deref().map(parse_weight).filter(|b| *b > 0.0);

            let id = ctx.tracker.modify(|state| {
                catalog::add_measurement(state, weight, body_fat, note, now_ms())
                    .id
                    .clone()
            });
            println!("{} logged {}kg ({})", "ok:".green().bold(), weight, short_id(&id).dimmed());
        }

        MeasureCmd::List => {
            let ms = &ctx.tracker.state().measurements;
            if ms.is_empty() {
                println!("{}", "  (no measurements yet)".dimmed());
                return Ok(());
            }

            println!("{}", "Measurements:".cyan().bold());
            for (i, m) in ms.iter().enumerate() {
                let date = Local
                    .timestamp_millis_opt(m.date)
                    .single()
                    .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "?".into());
                let fat = m.body_fat.map(|b| format!(" · {b}% fat")).unwrap_or_default();

                // Change relative to the previous (older) entry.
                let delta = ms
                    .get(i + 1)
                    .map(|prev| m.weight - prev.weight)
                    .filter(|d| d.abs() >= 0.05)
                    .map(|d| {
                        let s = format!(" ({d:+.1})");
                        (if d < 0.0 { s.green() } else { s.red() }).to_string()
                    })
                    .unwrap_or_default();

                println!(
                    " {} {} {}kg{}{} {}",
                    short_id(&m.id).dimmed(),
                    date,
                    m.weight.to_string().bold(),
                    delta,
                    fat,
                    m.notes.as_deref().unwrap_or("").dimmed()
                );
            }
        }

        MeasureCmd::Delete { id } => {
            match ctx
                .tracker
                .modify(|state| catalog::delete_measurement(state, &id))
            {
                Some(m) => println!("{} deleted {}kg entry", "ok:".green().bold(), m.weight),
                None => println!(
                    "{} no single measurement matches `{}`",
                    "error:".red().bold(),
                    id
                ),
            }
        }
    }

    Ok(())
}
