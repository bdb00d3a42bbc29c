use anyhow::Result;
use colored::Colorize;
use irontrack::models::Settings;

use super::Ctx;
use crate::cli::SettingsCmd;

fn parse_switch(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn on_off(b: bool) -> colored::ColoredString {
    if b { "on".green() } else { "off".red() }
}

fn print(settings: &Settings) {
    println!("{}", "Settings:".cyan().bold());
    println!("  {:<10} {}", "sound", on_off(settings.sound_enabled));
    println!("  {:<10} {}", "haptics", on_off(settings.haptics_enabled));
    println!("  {:<10} {}", "dark-mode", on_off(settings.dark_mode));
    println!("  {:<10} {}s", "rest", settings.default_rest_timer);
}

pub async fn handle(cmd: SettingsCmd, ctx: &mut Ctx) -> Result<()> {
    match cmd {
        SettingsCmd::Show => print(&ctx.tracker.state().settings),

        SettingsCmd::Set { key, val } => {
            let key = key.to_ascii_lowercase();
            if key == "rest" {
                let Ok(secs) = val.trim().trim_end_matches('s').parse::<u32>() else {
                    println!("{} rest must be a whole number of seconds", "error:".red().bold());
                    return Ok(());
                };
                ctx.tracker.modify(|s| s.settings.default_rest_timer = secs);
            } else {
                let Some(on) = parse_switch(&val) else {
                    println!("{} expected on/off, got `{}`", "error:".red().bold(), val);
                    return Ok(());
                };
                let applied = ctx.tracker.modify(|s| {
                    let slot = match key.as_str() {
                        "sound" => &mut s.settings.sound_enabled,
                        "haptics" => &mut s.settings.haptics_enabled,
                        "dark-mode" | "dark" | "theme" => &mut s.settings.dark_mode,
                        _ => return false,
                    };
                    *slot = on;
                    true
                });
                if !applied {
                    println!(
                        "{} unknown setting `{}` (sound, haptics, dark-mode, rest)",
                        "error:".red().bold(),
                        key
                    );
                    return Ok(());
                }
            }
            println!("{} set `{}` = `{}`", "info:".blue().bold(), key.green(), val);
        }

        SettingsCmd::Rest { delta } => {
            let secs = ctx.tracker.modify(|s| {
                let next = (s.settings.default_rest_timer as i64 + delta).clamp(0, u32::MAX as i64);
                s.settings.default_rest_timer = next as u32;
                s.settings.default_rest_timer
            });
            println!("{} default rest is now {}s", "info:".blue().bold(), secs);
        }

        SettingsCmd::ToggleTheme => {
            let dark = ctx.tracker.modify(|s| {
                s.settings.dark_mode = !s.settings.dark_mode;
                s.settings.dark_mode
            });
            println!(
                "{} theme is now {}",
                "info:".blue().bold(),
                if dark { "dark" } else { "light" }
            );
        }
    }

    Ok(())
}
