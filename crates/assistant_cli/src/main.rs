//! Interactive personal assistant entry point.
//!
//! # Responsibility
//! - Resolve configuration from flags, environment and platform defaults.
//! - Initialize file logging, open the snapshot database and run the menu.

mod commands;
mod console;
mod interrupt;
mod render;
mod session;

use anyhow::{Context, Result};
use assistant_core::{init_logging, AppConfig, ConfigOverrides};
use clap::Parser;
use console::LineConsole;
use log::info;
use session::Session;
use std::path::PathBuf;

const FAREWELL: &str = "Have a nice day!";

/// Contacts and notes in your terminal.
#[derive(Debug, Parser)]
#[command(name = "assistant", version, about)]
struct Cli {
    /// Directory holding the snapshot database.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory for rotated log files.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// One of trace, debug, info, warn, error.
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::resolve(ConfigOverrides {
        data_dir: cli.data_dir,
        log_dir: cli.log_dir,
        log_level: cli.log_level,
    })
    .context("failed to resolve configuration")?;
    config
        .ensure_dirs()
        .context("failed to prepare data directories")?;

    if let Err(err) = init_logging(config.log_level, &config.log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }
    info!(
        "event=app_start module=cli status=ok version={}",
        assistant_core::core_version()
    );

    let db_path = config.db_path();
    let mut session = Session::open(config)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;
    interrupt::install(FAREWELL);
    let mut console = LineConsole::stdio();
    commands::menu::run(&mut session, &mut console);

    println!("{FAREWELL}");
    info!(
        "event=app_exit module=cli status=ok data_dir={}",
        session.config.data_dir.display()
    );
    assistant_core::flush_logging();
    Ok(())
}
