use crate::app::cli::args::Args;
use crate::app::cli::config::{default_data_dir, load_config_file};
use crate::app::cli::menu::run_menu;
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::init_logging;
use crate::core::time::SystemClock;
use crate::core::DeskController;
use crate::persist::CsvStore;
use crate::{BUILD_TIME, GIT_HASH};
use clap::Parser;
use std::io::IsTerminal;
use std::sync::Arc;

/// Initialize and run the interactive session
pub fn startup() {
    let mut args = Args::parse();

    if let Some(config) = load_config_file(args.config_file.clone()) {
        args.apply_toml_values(&config);
    }

    let use_color = (args.color || std::io::stdout().is_terminal())
        && !args.no_color
        && std::env::var_os("NO_COLOR").is_none();

    if let Err(e) = init_logging(
        args.log_level.as_deref(),
        args.log_format.as_deref(),
        args.log_file.as_deref().and_then(|p| p.to_str()),
        use_color,
    ) {
        eprintln!("Error initialising logging: {e}");
        std::process::exit(1);
    }

    log::info!("attendq starting (built {BUILD_TIME}, rev {GIT_HASH})");

    let store = if args.no_persist {
        None
    } else {
        Some(CsvStore::new(
            args.data_dir.clone().unwrap_or_else(default_data_dir),
        ))
    };

    let mut desk = DeskController::new(Arc::new(SystemClock), store);
    match desk.load() {
        Ok(count) if count > 0 => println!("{count} tickets restored"),
        Ok(_) => {}
        Err(e) => {
            log_error_with_context(&e, "loading stored tickets");
            eprintln!("Stored tickets could not be read; starting empty.");
        }
    }

    let stdin = std::io::stdin();
    if let Err(e) = run_menu(&mut desk, stdin.lock(), use_color) {
        log::error!("terminal error: {e}");
        std::process::exit(1);
    }

    if let Err(e) = desk.shutdown() {
        log_error_with_context(&e, "saving session");
        eprintln!("Warning: the session could not be fully saved.");
        std::process::exit(1);
    }
}
