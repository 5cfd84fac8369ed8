//! Provider adapters: normalize each upstream's payloads into the shared model
//! so shaping and aggregation never see provider field names.

use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::model::{
    value_f64, value_i64, value_string, LeagueSeason, Match, MatchStatus, ProviderTeam,
    UNKNOWN_NAME,
};
use crate::upstream::Provider;

pub trait ProviderAdapter: Send + Sync {
    fn provider(&self) -> Provider;
    fn normalize_leagues(&self, payload: &Value) -> Vec<LeagueSeason>;
    fn normalize_teams(&self, payload: &Value) -> Vec<ProviderTeam>;
    fn normalize_matches(&self, payload: &Value) -> Vec<Match>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FootyStatsAdapter;

#[derive(Debug, Clone, Copy, Default)]
pub struct FootballDataAdapter;

pub fn adapter_for(provider: Provider) -> &'static dyn ProviderAdapter {
    match provider {
        Provider::FootyStats => &FootyStatsAdapter,
        Provider::FootballData => &FootballDataAdapter,
    }
}

pub fn payload_rows(payload: &Value) -> &[Value] {
    payload
        .get("data")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

impl ProviderAdapter for FootyStatsAdapter {
    fn provider(&self) -> Provider {
        Provider::FootyStats
    }

    /// League entries carry the display name in `league_name` (falling back to
    /// `name`) and the country at league level; entries without seasons yield
    /// one row keyed by the league id.
    fn normalize_leagues(&self, payload: &Value) -> Vec<LeagueSeason> {
        let mut out = Vec::new();
        for league in payload_rows(payload) {
            let league_id = value_i64(league.get("id"));
            let league_name = match league.get("league_name") {
                Some(Value::String(name)) if !name.is_empty() => name.clone(),
                _ => value_string(league.get("name"), UNKNOWN_NAME),
            };
            let country = value_string(league.get("country"), "");

            match league.get("season").and_then(Value::as_array) {
                Some(seasons) => {
                    for season in seasons {
                        out.push(LeagueSeason {
                            league_id,
                            league_name: league_name.clone(),
                            season_id: value_i64(season.get("id")),
                            year: value_i64(season.get("year")),
                            country: country.clone(),
                        });
                    }
                }
                None => out.push(LeagueSeason {
                    league_id,
                    league_name,
                    season_id: league_id,
                    year: 0,
                    country,
                }),
            }
        }
        out
    }

    fn normalize_teams(&self, payload: &Value) -> Vec<ProviderTeam> {
        match payload.get("data") {
            Some(Value::Array(rows)) => rows.iter().map(team_from_row).collect(),
            Some(row @ Value::Object(_)) => vec![team_from_row(row)],
            _ => Vec::new(),
        }
    }

    fn normalize_matches(&self, payload: &Value) -> Vec<Match> {
        payload_rows(payload).iter().map(match_from_row).collect()
    }
}

impl ProviderAdapter for FootballDataAdapter {
    fn provider(&self) -> Provider {
        Provider::FootballData
    }

    /// Flattens `league -> season[]` into one row per season; the country is
    /// read from the season entry.
    fn normalize_leagues(&self, payload: &Value) -> Vec<LeagueSeason> {
        let mut out = Vec::new();
        for league in payload_rows(payload) {
            let Some(seasons) = league.get("season").and_then(Value::as_array) else {
                continue;
            };
            let league_id = value_i64(league.get("id"));
            let league_name = value_string(league.get("name"), UNKNOWN_NAME);

            for season in seasons {
                out.push(LeagueSeason {
                    league_id,
                    league_name: league_name.clone(),
                    season_id: value_i64(season.get("id")),
                    year: value_i64(season.get("year")),
                    country: value_string(season.get("country"), ""),
                });
            }
        }
        out
    }

    fn normalize_teams(&self, payload: &Value) -> Vec<ProviderTeam> {
        payload_rows(payload).iter().map(team_from_row).collect()
    }

    fn normalize_matches(&self, payload: &Value) -> Vec<Match> {
        payload_rows(payload).iter().map(match_from_row).collect()
    }
}

fn team_from_row(row: &Value) -> ProviderTeam {
    let name = value_string(row.get("name"), UNKNOWN_NAME);
    ProviderTeam {
        team_id: value_i64(row.get("id")),
        clean_name: value_string(row.get("cleanName"), &name),
        name,
        country: value_string(row.get("country"), ""),
        founded: value_i64(row.get("founded")),
        image: value_string(row.get("image"), ""),
        position: value_i64(row.get("table_position")),
        risk: value_f64(row.get("risk")),
    }
}

fn match_from_row(row: &Value) -> Match {
    let kickoff = match value_i64(row.get("date_unix")) {
        0 => None,
        ts => Utc.timestamp_opt(ts, 0).single(),
    };

    Match {
        id: value_i64(row.get("id")),
        home_name: value_string(row.get("home_name"), UNKNOWN_NAME),
        away_name: value_string(row.get("away_name"), UNKNOWN_NAME),
        home_goals: goal_count(row.get("homeGoalCount")),
        away_goals: goal_count(row.get("awayGoalCount")),
        home_xg: value_f64(row.get("team_a_xg")),
        away_xg: value_f64(row.get("team_b_xg")),
        status: MatchStatus::from(value_string(row.get("status"), UNKNOWN_NAME)),
        kickoff,
        stadium_name: value_string(row.get("stadium_name"), UNKNOWN_NAME),
        game_week: value_i64(row.get("game_week")),
    }
}

fn goal_count(value: Option<&Value>) -> u32 {
    value_i64(value).clamp(0, i64::from(u32::MAX)) as u32
}
