use std::{io::Write, time::Duration};

use anyhow::Result;
use colored::Colorize;
use irontrack::utils::format_clock;

use super::Ctx;

/// `irontrack timer [SECONDS]`
pub async fn handle(ctx: &mut Ctx, seconds: Option<u32>) -> Result<()> {
    match ctx.tracker.start_rest(seconds) {
        Ok(signals) => ctx.play(&signals),
        Err(e) => {
            println!("{} {}", "error:".red().bold(), e);
            return Ok(());
        }
    }
    run(ctx).await
}

/// Drives the tracker's rest timer once per second until it expires or
/// Ctrl-C skips it.
pub async fn run(ctx: &mut Ctx) -> Result<()> {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    // The first tick of a tokio interval completes immediately.
    interval.tick().await;

    while let Some(remaining) = ctx.tracker.timer().remaining() {
        print!(
            "\r{} {}   ",
            "resting".cyan().bold(),
            format_clock(remaining as u64).bold()
        );
        std::io::stdout().flush()?;

        tokio::select! {
            _ = interval.tick() => {
                let signals = ctx.tracker.tick();
                ctx.play(&signals);
            }
            _ = tokio::signal::ctrl_c() => {
                ctx.tracker.cancel_rest();
                println!("\r{} rest skipped      ", "info:".blue().bold());
                return Ok(());
            }
        }
    }

    println!("\r{} rest over, next set      ", "ok:".green().bold());
    Ok(())
}
