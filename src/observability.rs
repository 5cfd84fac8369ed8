//! Shared logging configuration and initialization.

use std::env;
use std::net::SocketAddr;

use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub const LOG_LEVEL_VAR: &str = "SOCCER_LOG_LEVEL";
pub const LOG_FORMAT_VAR: &str = "SOCCER_LOG_FORMAT";
pub const LOG_TARGET_VAR: &str = "SOCCER_LOG_TARGET";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            include_target: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoggingInitError {
    #[error("logging already initialized: {0}")]
    AlreadyInitialized(#[from] tracing::subscriber::SetGlobalDefaultError),
}

pub fn logging_config_from_env() -> LoggingConfig {
    logging_config_from_lookup(|key| env::var(key).ok())
}

pub fn logging_config_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> LoggingConfig {
    let mut config = LoggingConfig::default();

    if let Some(level) = lookup(LOG_LEVEL_VAR) {
        let trimmed = level.trim();
        if !trimmed.is_empty() {
            config.level = trimmed.to_string();
        }
    }

    if let Some(parsed) = lookup(LOG_FORMAT_VAR).as_deref().and_then(parse_log_format) {
        config.format = parsed;
    }

    if let Some(parsed) = lookup(LOG_TARGET_VAR).as_deref().and_then(parse_bool) {
        config.include_target = parsed;
    }

    config
}

pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingInitError> {
    let env_filter =
        EnvFilter::try_new(config.level.clone()).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(config.include_target)
        .with_ansi(matches!(config.format, LogFormat::Pretty));

    match config.format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
        LogFormat::Pretty => tracing::subscriber::set_global_default(builder.pretty().finish())?,
    }

    Ok(())
}

pub fn log_app_start(config: &LoggingConfig) {
    info!(
        component = "stats_server",
        event = "app.start",
        log_level = %config.level,
        log_format = ?config.format,
        include_target = config.include_target
    );
}

pub fn log_app_bind(bound_addr: SocketAddr) {
    info!(
        component = "stats_server",
        event = "app.bind",
        bind_addr = %bound_addr,
        routes = "/teams,/leagues,/footystats,/football-data"
    );
}

pub fn log_source_selected(source: &str, reason: Option<&str>) {
    match reason {
        Some(reason) => info!(
            component = "stats_server",
            event = "source.selected",
            source,
            reason
        ),
        None => info!(component = "stats_server", event = "source.selected", source),
    }
}

fn parse_log_format(raw: &str) -> Option<LogFormat> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "json" => Some(LogFormat::Json),
        "pretty" => Some(LogFormat::Pretty),
        _ => None,
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    fn env_lock() -> &'static Mutex<()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn with_env_vars<R>(vars: &[(&str, Option<&str>)], f: impl FnOnce() -> R) -> R {
        let _guard = env_lock().lock().expect("env lock should not be poisoned");
        let previous: Vec<(String, Option<String>)> = vars
            .iter()
            .map(|(key, _)| ((*key).to_string(), env::var(key).ok()))
            .collect();

        for (key, value) in vars {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }

        let output = f();

        for (key, value) in previous {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }

        output
    }

    fn lookup_from<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn defaults_when_env_missing() {
        let cfg = with_env_vars(
            &[
                (LOG_LEVEL_VAR, None),
                (LOG_FORMAT_VAR, None),
                (LOG_TARGET_VAR, None),
            ],
            logging_config_from_env,
        );

        assert_eq!(cfg, LoggingConfig::default());
    }

    #[test]
    fn reads_process_environment() {
        let cfg = with_env_vars(
            &[
                (LOG_LEVEL_VAR, Some("debug")),
                (LOG_FORMAT_VAR, Some("JSON")),
                (LOG_TARGET_VAR, Some("off")),
            ],
            logging_config_from_env,
        );

        assert_eq!(cfg.level, "debug");
        assert_eq!(cfg.format, LogFormat::Json);
        assert!(!cfg.include_target);
    }

    #[test]
    fn invalid_format_or_target_falls_back_to_defaults() {
        let vars = [
            (LOG_LEVEL_VAR, "soccer_stats=trace"),
            (LOG_FORMAT_VAR, "yaml"),
            (LOG_TARGET_VAR, "maybe"),
        ];
        let cfg = logging_config_from_lookup(lookup_from(&vars));

        assert_eq!(cfg.level, "soccer_stats=trace");
        assert_eq!(cfg.format, LogFormat::Pretty);
        assert!(cfg.include_target);
    }

    #[test]
    fn blank_level_keeps_default() {
        let vars = [(LOG_LEVEL_VAR, "   ")];
        assert_eq!(logging_config_from_lookup(lookup_from(&vars)).level, "info");
    }

    #[test]
    fn bool_spellings() {
        for raw in ["1", "true", "YES", " on "] {
            assert_eq!(parse_bool(raw), Some(true), "{raw}");
        }
        for raw in ["0", "False", "no", "off"] {
            assert_eq!(parse_bool(raw), Some(false), "{raw}");
        }
        assert_eq!(parse_bool("sometimes"), None);
    }
}
