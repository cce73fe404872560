use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const LOG_FILE_PREFIX: &str = "srs-backend";
const MAX_LOG_FILES: usize = 30;

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            enable_file_logs: false,
            log_dir: "./logs".to_string(),
        }
    }
}

/// Installs the global subscriber: human-readable stdout, plus daily-rolling
/// JSON files when enabled.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the process. Calling this again after a subscriber is set is a
/// no-op.
pub fn init_tracing(config: &LogConfig) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let stdout_layer = fmt::layer().with_target(true).with_thread_ids(false);

    let registry = Registry::default().with(env_filter).with(stdout_layer);

    if !config.enable_file_logs {
        tolerate_already_set(registry.try_init());
        return None;
    }

    let appender = match RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(&config.log_dir)
    {
        Ok(appender) => appender,
        Err(e) => {
            // 文件日志不可用时退回仅 stdout
            eprintln!("file logging disabled, cannot open {}: {e}", config.log_dir);
            tolerate_already_set(registry.try_init());
            return None;
        }
    };

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = fmt::layer().with_writer(writer).with_ansi(false).json();
    tolerate_already_set(registry.with(file_layer).try_init());
    Some(guard)
}

fn tolerate_already_set(result: Result<(), tracing_subscriber::util::TryInitError>) {
    if let Err(e) = result {
        let msg = e.to_string();
        if !msg.contains("already been set") {
            eprintln!("failed to initialize tracing: {e}");
        }
    }
}
