use crate::cli::ConfigCmd;
use anyhow::Result;
use colored::Colorize;
use irontrack::config::{Config, DB_PATH_KEY};

pub async fn handle(cmd: ConfigCmd) -> Result<()> {
    let config_path = Config::default_path()?;
    let mut cfg = Config::load(&config_path)?;

    match cmd {
        ConfigCmd::List => {
            println!("{}", "Config:".cyan().bold());
            if cfg.map.is_empty() {
                println!("  {}", "(no config set)".dimmed());
            }
            for (k, v) in &cfg.map {
                println!("  {} = {}", k.green(), v);
            }
            if !cfg.map.contains_key(DB_PATH_KEY) {
                println!(
                    "  {} = {} {}",
                    DB_PATH_KEY.green(),
                    cfg.db_path()?.display(),
                    "(default)".dimmed()
                );
            }
        }

        ConfigCmd::Get { key } => match cfg.map.get(&key) {
            Some(val) => println!("{}", val),
            None if key == DB_PATH_KEY => println!("{}", cfg.db_path()?.display()),
            None => println!("{} key `{}` not found", "warning:".yellow().bold(), key),
        },

        ConfigCmd::Set { key, val } => {
            cfg.map.insert(key.clone(), val.clone());
            cfg.save(&config_path)?;
            println!("{} set `{}` = `{}`", "info:".blue().bold(), key.green(), val);
        }

        ConfigCmd::Unset { key } => {
            if cfg.map.remove(&key).is_some() {
                cfg.save(&config_path)?;
                println!("{} removed `{}`", "info:".blue().bold(), key.green());
            } else {
                println!("{} key `{}` not found", "warning:".yellow().bold(), key);
            }
        }
    }

    Ok(())
}
