//! Core library surface for the Jazzclub booking dashboard.
//!
//! The workbook is the single source of truth: [`store::Store`] reads every
//! sheet into a [`models::TableCollection`], the [`tables`] modules filter and
//! derive views from it, and [`ui`] drives the terminal front end.
pub mod config;
pub mod currency;
pub mod error;
pub mod models;
pub mod store;
pub mod tables;
pub mod ui;

pub use config::AppConfig;
pub use error::{ConfigError, ParseError, StorageError};
pub use models::{CellValue, Record, Table, TableCollection, TableView};
pub use store::Store;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
