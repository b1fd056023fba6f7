//! Tracing setup and server startup.

use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use signup_api::ApiServer;
use signup_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig};

/// Initialize tracing with console output and, when `logging.dir` is set,
/// a daily-rolling log file.
pub(crate) fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let file_layer = match &logging.dir {
        Some(dir) => {
            let log_dir = ConfigLoader::expand_path(&dir.to_string_lossy());
            std::fs::create_dir_all(&log_dir)?;

            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("signup-bridge")
                .filename_suffix("log")
                .max_log_files(30)
                .build(&log_dir)?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // Flushes on drop; keep it for the life of the process.
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(file_layer)
        .init();

    Ok(())
}

/// Run the server in foreground.
pub(crate) async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting signup bridge v{}", env!("CARGO_PKG_VERSION"));

    let validation = ConfigValidator::validate(&config)?;
    for warning in &validation.warnings {
        tracing::warn!("Config warning at {}: {}", warning.path, warning.message);
    }
    if !validation.is_valid() {
        for err in &validation.errors {
            tracing::error!("Config error at {}: {}", err.path, err.message);
        }
        return Err("invalid configuration".into());
    }

    let server = ApiServer::new(config);
    info!("Server address: {}", server.addr());
    server.run().await?;

    Ok(())
}
