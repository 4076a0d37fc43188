use crate::config::ConfigError;
use crate::config::GatewayConfig;
use crate::LogConfigArgs;
use std::io::IsTerminal;
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::util::SubscriberInitExt;

/// The basic subscriber
macro_rules! subscriber_builder {
    () => {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal() && yansi::Condition::no_color())
            .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
    };
}

/// Configures and enables logging taking into account flags, env variables and file config.
///
/// 1. Log config is taken from the `[log]` table of the configuration file first
/// 2. If `RUST_LOG` variable is set, it overrides file-based configuration
/// 3. If `--debug` or `--log-level` flags are set, they override previous steps
pub fn log_init(
    sname: &str,
    flags: &LogConfigArgs,
    config: &GatewayConfig,
) -> Result<(), ConfigError> {
    let logger = logger(sname, flags, config)?;
    logger.init();
    Ok(())
}

fn logger(
    sname: &str,
    flags: &LogConfigArgs,
    config: &GatewayConfig,
) -> Result<Arc<dyn tracing::Subscriber + Send + Sync>, ConfigError> {
    let subscriber = subscriber_builder!();

    if let Some(log_level) = cli_log_level(flags) {
        return Ok(Arc::new(subscriber.with_max_level(log_level).finish()));
    }

    if std::env::var("RUST_LOG").is_ok() {
        return Ok(Arc::new(
            subscriber
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .with_file(true)
                .with_line_number(true)
                .finish(),
        ));
    }

    let log_level = get_log_level_from_config(sname, config)?.unwrap_or(DEFAULT_MAX_LEVEL);
    Ok(Arc::new(subscriber.with_max_level(log_level).finish()))
}

const DEFAULT_MAX_LEVEL: tracing::Level = tracing::Level::INFO;

fn cli_log_level(flags: &LogConfigArgs) -> Option<tracing::Level> {
    flags
        .log_level
        .or(flags.debug.then_some(tracing::Level::DEBUG))
}

/// Return the log level for a given service, if it's defined in the config file. Otherwise return `None`.
pub fn get_log_level_from_config(
    sname: &str,
    config: &GatewayConfig,
) -> Result<Option<tracing::Level>, ConfigError> {
    match config.log.get(sname) {
        Some(ll) => {
            let ll = tracing::Level::from_str(&ll.to_uppercase())
                .map_err(|_| ConfigError::InvalidLogLevel {
                    name: ll.to_string(),
                })?;
            Ok(Some(ll))
        }
        None => Ok(None),
    }
}
