//! Command-line surface: arguments, configuration, menu, and output

pub mod args;
pub mod config;
pub mod display;
pub mod menu;
