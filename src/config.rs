//! Runtime configuration, read from the command line and the environment.
//!
//! - first CLI argument or `JAZZCLUB_WORKBOOK`: path of the backing workbook
//!   (default `Jazzclub_Booking_Tool_Optimized.xlsx` in the working directory)
//! - `JAZZCLUB_WEEKDAY_LOCALE`: `de` (default) or `en`, the language of the
//!   derived `Wochentag` column
//! - `JAZZCLUB_LOG_FILE`: log destination (default
//!   `~/.jazzclub-booking/booking.log`)

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::ConfigError;
use crate::tables::WeekdayLocale;

/// Workbook used when neither the command line nor the environment names one.
pub const DEFAULT_WORKBOOK: &str = "Jazzclub_Booking_Tool_Optimized.xlsx";
/// Folder name used beneath the user's home directory for the log file.
const DATA_DIR_NAME: &str = ".jazzclub-booking";
const LOG_FILE_NAME: &str = "booking.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub workbook_path: PathBuf,
    pub weekday_locale: WeekdayLocale,
    pub log_path: PathBuf,
}

impl AppConfig {
    /// Load from the process arguments and environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_sources(std::env::args().nth(1), |key| std::env::var(key).ok())
    }

    /// Load from an explicit workbook argument and variable lookup.
    pub fn from_sources<F>(workbook_arg: Option<String>, var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let workbook_path = workbook_arg
            .or_else(|| var("JAZZCLUB_WORKBOOK"))
            .filter(|path| !path.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_WORKBOOK), PathBuf::from);

        let weekday_locale = match var("JAZZCLUB_WEEKDAY_LOCALE") {
            None => WeekdayLocale::default(),
            Some(raw) => parse_locale(&raw)?,
        };

        let log_path = match var("JAZZCLUB_LOG_FILE") {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_log_path()?,
        };

        Ok(Self {
            workbook_path,
            weekday_locale,
            log_path,
        })
    }
}

fn parse_locale(raw: &str) -> Result<WeekdayLocale, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "de" | "de_de" | "german" => Ok(WeekdayLocale::German),
        "en" | "en_us" | "en_gb" | "english" => Ok(WeekdayLocale::English),
        _ => Err(ConfigError::WeekdayLocale(raw.to_string())),
    }
}

fn default_log_path() -> Result<PathBuf, ConfigError> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::HomeDir)?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(LOG_FILE_NAME))
}
