//! Application wiring and entry point

pub mod cli;
pub mod startup;
