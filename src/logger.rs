use snafu::ResultExt as _;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::{registry, EnvFilter};

use crate::config::Config;
use crate::error::{ApplicationError, InitializeLoggerSnafu, LogFileSnafu};

/// Days of JSON logs kept on disk.
const RETAINED_LOG_FILES: usize = 14;

/// Pretty console output plus a daily JSON file in `LOG_DIR`.
///
/// `RUST_LOG` wins over `LOG_FILTER` when both are set. Keep the returned guard
/// alive for as long as the file should be written.
pub fn init(config: &Config) -> Result<WorkerGuard, ApplicationError> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("chaintalk")
        .filename_suffix("log")
        .max_log_files(RETAINED_LOG_FILES)
        .build(&config.log_dir)
        .context(LogFileSnafu {
            directory: config.log_dir.clone(),
        })?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .parse_lossy(&config.log_filter)
    });

    let subscriber = registry()
        .with(filter)
        .with(layer().pretty().with_writer(std::io::stdout))
        .with(layer().with_ansi(false).json().with_writer(writer));
    tracing::subscriber::set_global_default(subscriber).context(InitializeLoggerSnafu)?;

    Ok(guard)
}
