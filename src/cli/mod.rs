pub mod assistant;
pub mod clipboard;
pub mod commands;
pub mod core;
pub mod help;
pub mod io;
pub mod notifier;
pub mod output;
pub mod registry;
mod shell;
pub mod ui;

pub use shell::run_cli;
