use std::str::FromStr;

use colored::Colorize;
use log::LevelFilter;
use middleware::logger::ExchangeLog;

pub mod middleware {
    pub mod logger;
}

/// Parses a level name such as `debug` or `warn`, falling back to `Info`.
pub fn parse_level(level: &str) -> LevelFilter {
    LevelFilter::from_str(level.trim()).unwrap_or(LevelFilter::Info)
}

/// Sets up console and file logging.
pub fn setup(level: LevelFilter, log_file: &str) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            let color = match record.level() {
                log::Level::Info => "green",
                log::Level::Warn => "yellow",
                log::Level::Error => "red",
                log::Level::Debug => "magenta",
                log::Level::Trace => "bright black",
            };
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%H:%M:%S]"),
                record.target(),
                record.level().to_string().color(color),
                message
            ))
        })
        .level(level)
        .level_for("hyper", LevelFilter::Off)
        .level_for("hyper_util", LevelFilter::Off)
        .level_for("reqwest", LevelFilter::Warn)
        .chain(std::io::stdout())
        .chain(fern::log_file(log_file)?)
        .apply()?;
    Ok(())
}

/// Starts logging a single request/response exchange with the backend.
pub fn middleware(request_id: &str, method: &str, path: &str) -> ExchangeLog {
    ExchangeLog::new(request_id, method, path)
}
