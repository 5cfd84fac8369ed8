//! Process configuration read once from the environment.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::database::{DatabaseError, DatabaseSource};
use crate::mock_data::{MockDataError, MockDataset};
use crate::observability::{log_source_selected, parse_bool};
use crate::source::RequestContext;
use crate::upstream::{Provider, ProviderClient};

pub const DB_AVAILABLE_VAR: &str = "SOCCER_DB_AVAILABLE";
pub const DB_PATH_VAR: &str = "SOCCER_DB_PATH";
pub const FOOTYSTATS_API_KEY_VAR: &str = "FOOTYSTATS_API_KEY";
pub const FOOTBALL_DATA_API_KEY_VAR: &str = "FOOTBALL_DATA_API_KEY";
pub const FOOTYSTATS_BASE_URL_VAR: &str = "FOOTYSTATS_BASE_URL";
pub const FOOTBALL_DATA_BASE_URL_VAR: &str = "FOOTBALL_DATA_BASE_URL";
pub const BIND_ADDR_VAR: &str = "SOCCER_BIND_ADDR";
pub const MOCK_DATA_PATH_VAR: &str = "SOCCER_MOCK_DATA_PATH";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid boolean for {var}: {value}")]
    InvalidBool { var: &'static str, value: String },
    #[error("invalid bind address {value}: {message}")]
    InvalidBindAddr { value: String, message: String },
    #[error("mock dataset: {0}")]
    MockData(#[from] MockDataError),
    #[error("database: {0}")]
    Database(#[from] DatabaseError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_available: bool,
    pub db_path: Option<PathBuf>,
    pub footystats_api_key: Option<String>,
    pub football_data_api_key: Option<String>,
    pub footystats_base_url: Option<String>,
    pub football_data_base_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub mock_data_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Blank values count as unset. Only the database flag and the bind
    /// address can make parsing fail.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_available = match non_blank(DB_AVAILABLE_VAR) {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidBool {
                var: DB_AVAILABLE_VAR,
                value: raw,
            })?,
            None => false,
        };

        let raw_addr = non_blank(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse::<SocketAddr>()
            .map_err(|err| ConfigError::InvalidBindAddr {
                value: raw_addr.clone(),
                message: err.to_string(),
            })?;

        Ok(Self {
            db_available,
            db_path: non_blank(DB_PATH_VAR).map(PathBuf::from),
            footystats_api_key: non_blank(FOOTYSTATS_API_KEY_VAR),
            football_data_api_key: non_blank(FOOTBALL_DATA_API_KEY_VAR),
            footystats_base_url: non_blank(FOOTYSTATS_BASE_URL_VAR),
            football_data_base_url: non_blank(FOOTBALL_DATA_BASE_URL_VAR),
            bind_addr,
            mock_data_path: non_blank(MOCK_DATA_PATH_VAR).map(PathBuf::from),
        })
    }

    pub fn build_context(&self) -> Result<RequestContext, ConfigError> {
        let mock = match &self.mock_data_path {
            Some(path) => MockDataset::from_path(path)?,
            None => MockDataset::embedded()?,
        };

        let database = match &self.db_path {
            Some(path) => Some(DatabaseSource::open(path)?),
            None => None,
        };

        match (self.db_available, database.is_some()) {
            (true, true) => log_source_selected("database", None),
            (true, false) => {
                warn!(
                    component = "config",
                    event = "config.database_path_missing",
                    var = DB_PATH_VAR
                );
                log_source_selected("database", Some("no database path configured"));
            }
            (false, _) => log_source_selected("mock", Some("database flag not set")),
        }

        Ok(RequestContext {
            db_available: self.db_available,
            database,
            mock: Arc::new(mock),
            footystats: ProviderClient::new(
                Provider::FootyStats,
                self.footystats_base_url.clone(),
                self.footystats_api_key.clone(),
            ),
            football_data: ProviderClient::new(
                Provider::FootballData,
                self.football_data_base_url.clone(),
                self.football_data_api_key.clone(),
            ),
        })
    }
}
