// src/logging.rs

use crate::config::Config;
use crate::constants::APP_NAME;
use crate::errors::ChatResult;
use crate::models::ApiCallLog;
use flexi_logger::{detailed_format, FileSpec, Logger, LoggerHandle};

/// Starts the file logger. The terminal belongs to the UI, so nothing is
/// written to stderr. Keep the returned handle alive for the whole session.
pub fn init_logging(config: &Config) -> ChatResult<LoggerHandle> {
    std::fs::create_dir_all(&config.log_dir)?;

    let handle = Logger::try_with_str(&config.log_level)?
        .log_to_file(
            FileSpec::default()
                .directory(&config.log_dir)
                .basename(APP_NAME)
                .suppress_timestamp(),
        )
        .append()
        .format(detailed_format)
        .start()?;

    log::info!("logging to {}", config.log_dir.display());
    Ok(handle)
}

/// Logs an API call.
pub fn log_api_call(entry: &ApiCallLog) {
    log::info!("{}", format_api_call(entry));
}

fn format_api_call(entry: &ApiCallLog) -> String {
    format!(
        "[{}] {} - {} - Status: {} - Time: {}ms",
        entry.timestamp.to_rfc3339(),
        entry.endpoint,
        entry.request_summary,
        entry.response_status,
        entry.response_time_ms
    )
}
