//! Command-line options for the desk session

use clap::Parser;
use std::path::PathBuf;

/// Command-line options
///
/// Config file values fill in anything not given on the command line; the
/// command line always wins.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "attendq")]
#[command(about = "Student procedure ticket desk")]
#[command(version)]
pub struct Args {
    /// Directory holding the CSV ticket files (defaults to the user data dir)
    #[arg(short = 'd', long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Run fully in memory, without reading or writing CSV files
    #[arg(long = "no-persist")]
    pub no_persist: bool,

    /// Force colored output (overrides TTY detection and NO_COLOR)
    #[arg(long = "color")]
    pub color: bool,

    /// Disable colored output
    #[arg(long = "no-color", conflicts_with = "color")]
    pub no_color: bool,

    /// Log level
    #[arg(long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", value_parser = ["text", "json"])]
    pub log_format: Option<String>,
}

impl Args {
    /// Apply configuration file values underneath the parsed flags
    pub fn apply_toml_values(&mut self, config: &toml::Table) {
        if self.data_dir.is_none() {
            if let Some(dir) = config.get("data-dir").and_then(|v| v.as_str()) {
                self.data_dir = Some(PathBuf::from(dir));
            }
        }
        if let Some(no_persist) = config.get("no-persist").and_then(|v| v.as_bool()) {
            self.no_persist = self.no_persist || no_persist;
        }
        if let Some(color) = config.get("color").and_then(|v| v.as_bool()) {
            if !self.color && !self.no_color {
                if color {
                    self.color = true;
                } else {
                    self.no_color = true;
                }
            }
        }
        if self.log_level.is_none() {
            if let Some(level) = config.get("log-level").and_then(|v| v.as_str()) {
                self.log_level = Some(level.to_string());
            }
        }
        if self.log_file.is_none() {
            if let Some(file) = config.get("log-file").and_then(|v| v.as_str()) {
                // magic value "none" disables file logging
                if !file.eq_ignore_ascii_case("none") && file != "-" {
                    self.log_file = Some(PathBuf::from(file));
                }
            }
        }
        if self.log_format.is_none() {
            if let Some(format) = config.get("log-format").and_then(|v| v.as_str()) {
                self.log_format = Some(format.to_string());
            }
        }
    }
}
