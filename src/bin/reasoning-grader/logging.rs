use std::path::PathBuf;

use flexi_logger::{FileSpec, Logger, LoggerHandle};
use reasoning_grader::config::LoggingConfig;

/// Starts logging. `RUST_LOG` overrides the configured level.
///
/// The returned handle must be kept alive for the duration of the run.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<LoggerHandle> {
    let logger = Logger::try_with_env_or_str(&config.level)?;
    let handle = match &config.path {
        Some(path) => {
            let log_path = PathBuf::from(path);
            let directory = log_path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let basename = log_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("reasoning-grader")
                .to_string();
            let suffix = log_path
                .extension()
                .and_then(|s| s.to_str())
                .unwrap_or("log")
                .to_string();
            logger
                .log_to_file(
                    FileSpec::default()
                        .directory(directory)
                        .basename(basename)
                        .suffix(suffix)
                        .suppress_timestamp(),
                )
                .start()?
        }
        None => logger.log_to_stderr().start()?,
    };
    Ok(handle)
}
