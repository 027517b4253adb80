//! Binary entry point: read the configuration, route logs to a file (the
//! terminal belongs to the TUI), load the workbook once, and run the event
//! loop until the user quits.
use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use anyhow::Context;
use jazzclub_booking::{run_app, App, AppConfig, Store};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    init_logging(&config)?;
    info!(
        workbook = %config.workbook_path.display(),
        weekday_locale = ?config.weekday_locale,
        "jazzclub-booking starting"
    );

    let mut store = Store::new(&config.workbook_path);
    let tables = store.load_all().context("failed to load booking workbook")?;

    let mut app = App::new(store, tables, config.weekday_locale);
    run_app(&mut app)
}

fn init_logging(config: &AppConfig) -> anyhow::Result<()> {
    if let Some(parent) = config.log_path.parent() {
        fs::create_dir_all(parent).context("failed to create log directory")?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
        .with_context(|| format!("failed to open log file {}", config.log_path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();
    Ok(())
}
