//! Soccer stats core crate.
//!
//! Serves team data from an embedded mock dataset or a SQLite database, proxies
//! and reshapes the FootyStats and football-data providers, and aggregates
//! match lists into chart-ready analytics.

mod analytics;
mod config;
mod database;
mod error;
mod mock_data;
mod model;
mod observability;
mod provider;
mod routes;
mod shaper;
mod source;
mod upstream;
mod view;

pub use analytics::{
    analytics_report, goals_histogram, group_by_league, histogram, home_away_summary, round2,
    top_matches_by_goals, total_goals_distribution, xg_histogram, AnalyticsReport, CategoryRow,
    GoalsBucket, HistogramBin, HomeAwaySummary, MatchTotals, GOALS_BIN_WIDTH, MAX_BINS, TOP_MATCHES,
    XG_BIN_WIDTH,
};
pub use config::{
    AppConfig, ConfigError, BIND_ADDR_VAR, DB_AVAILABLE_VAR, DB_PATH_VAR, DEFAULT_BIND_ADDR,
    FOOTBALL_DATA_API_KEY_VAR, FOOTBALL_DATA_BASE_URL_VAR, FOOTYSTATS_API_KEY_VAR,
    FOOTYSTATS_BASE_URL_VAR, MOCK_DATA_PATH_VAR,
};
pub use database::{ensure_schema, DatabaseError, DatabaseSource};
pub use error::{ApiError, TEAM_NOT_FOUND};
pub use mock_data::{MockDataError, MockDataset};
pub use model::{
    locale_cmp, parse_int_prefix, sort_teams, League, LeagueCount, LeagueSeason, LeagueSummary,
    LeaguesEnvelope, Match, MatchStatus, ProviderTeam, RelatedTeamsEnvelope, SortKey, Team,
    TeamEnvelope, TeamsEnvelope, SOURCE_DATABASE, SOURCE_MOCK, UNKNOWN_NAME,
};
pub use observability::{
    init_logging, log_app_bind, log_app_start, log_source_selected, logging_config_from_env,
    logging_config_from_lookup, LogFormat, LoggingConfig, LoggingInitError,
};
pub use provider::{
    adapter_for, payload_rows, FootballDataAdapter, FootyStatsAdapter, ProviderAdapter,
};
pub use routes::{app_router, DEFAULT_SEASON};
pub use shaper::{
    filter_upcoming, flatten_league_seasons, football_data_leagues_envelope,
    football_data_match_query, football_data_teams_envelope, footystats_leagues_envelope,
    league_counts, shape_league_teams,
};
pub use source::{select_data_source, RequestContext, TeamSource};
pub use upstream::{
    Provider, ProviderClient, RequestOptions, FOOTBALL_DATA_BASE_URL, FOOTYSTATS_BASE_URL,
};
pub use view::{MatchListView, StatusFilter};
