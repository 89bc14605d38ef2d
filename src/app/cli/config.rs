//! TOML configuration file discovery and loading

use log::debug;
use std::path::PathBuf;

/// Load the configuration table, if any
///
/// An explicitly named file must exist; the default location
/// (`<config dir>/attendq/attendq.toml`) is optional. Parse failures in an
/// existing file are fatal, a silently ignored config is worse than an
/// aborted start.
pub fn load_config_file(config_file: Option<PathBuf>) -> Option<toml::Table> {
    let config_path = match config_file {
        Some(path) => {
            if !path.exists() {
                eprintln!(
                    "Error: The specified configuration file does not exist: {}",
                    path.display()
                );
                std::process::exit(1);
            }
            Some(path)
        }
        None => {
            let default_path =
                dirs::config_dir().map(|d| d.join("attendq").join("attendq.toml"));
            match default_path {
                Some(path) if path.exists() => Some(path),
                _ => None,
            }
        }
    };

    let path = config_path?;
    match std::fs::read_to_string(&path) {
        Ok(contents) => match toml::from_str::<toml::Table>(&contents) {
            Ok(config) => {
                debug!("loaded configuration from {}", path.display());
                Some(config)
            }
            Err(e) => {
                eprintln!("Error parsing configuration file {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("Error reading configuration file {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

/// Default directory for the CSV ticket files
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("attendq")
}
