//! Terminal dashboard: view tabs, the filtered booking table, and the entry
//! form, drawn with Ratatui on a crossterm backend.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
