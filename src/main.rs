use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use commands::Ctx;
use irontrack::{config::Config, store};

mod cli;
mod commands;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    // These never touch the snapshot.
    let cmd = match cli.cmd {
        Commands::Config(cmd) => return commands::config::handle(cmd).await,
        Commands::Tools(cmd) => return commands::tools::handle(cmd).await,
        other => other,
    };

    let db_path = match cli.db {
        Some(p) => PathBuf::from(p),
        None => Config::load(&Config::default_path()?)?.db_path()?,
    };
    log::debug!("using database {}", db_path.display());

    let pool = store::open(&db_path).await?;
    let mut ctx = Ctx::load(pool).await?;

    let outcome = match cmd {
        Commands::Session(cmd) => commands::session::handle(cmd, &mut ctx).await,
        Commands::Timer { seconds } => commands::timer::handle(&mut ctx, seconds).await,
        Commands::Exercise(cmd) => commands::exercise::handle(cmd, &mut ctx).await,
        Commands::Routine(cmd) => commands::routine::handle(cmd, &mut ctx).await,
        Commands::Measure(cmd) => commands::measure::handle(cmd, &mut ctx).await,
        Commands::Settings(cmd) => commands::settings::handle(cmd, &mut ctx).await,
        Commands::Db(cmd) => commands::db::handle(cmd, &mut ctx).await,
        Commands::Config(_) | Commands::Tools(_) => unreachable!("handled above"),
    };

    // Whatever was applied before a failure is still kept.
    ctx.persist().await?;
    outcome
}
