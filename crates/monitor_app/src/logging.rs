//! Logger setup for the `transcribe-monitor` binary.
//!
//! Terminal output goes to stderr so it never mixes with rendered progress on
//! stdout. The file sink writes `./transcribe-monitor.log` in the current
//! working directory.

use std::fs::File;
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

pub const LOG_FILE_NAME: &str = "transcribe-monitor.log";

/// Destination for diagnostic log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    /// Write warnings and errors to stderr.
    Terminal,
    /// Stderr plus everything from info up in ./transcribe-monitor.log.
    Both,
}

impl LogDestination {
    pub fn for_file_logging(enabled: bool) -> Self {
        if enabled {
            LogDestination::Both
        } else {
            LogDestination::Terminal
        }
    }
}

/// Install the global logger. Calling it twice leaves the first logger in place.
pub fn initialize(destination: LogDestination) {
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Warn,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if destination == LogDestination::Both {
        if let Some(file_logger) = create_file_logger(LevelFilter::Info, config) {
            loggers.push(file_logger);
        }
    }

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(level: LevelFilter, config: Config) -> Option<Box<WriteLogger<File>>> {
    let log_path = PathBuf::from(".").join(LOG_FILE_NAME);
    match File::create(&log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            None
        }
    }
}
