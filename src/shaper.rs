//! Per-endpoint response shaping over raw provider payloads.

use serde_json::{json, Map, Value};

use crate::error::ApiError;
use crate::model::{LeagueCount, LeagueSeason, ProviderTeam, Team};
use crate::provider::{payload_rows, FootballDataAdapter, ProviderAdapter};

pub fn league_counts(teams: &[Team]) -> Vec<LeagueCount> {
    let mut counts: Vec<LeagueCount> = Vec::new();
    for team in teams {
        match counts
            .iter_mut()
            .find(|entry| entry.league == team.league_name)
        {
            Some(entry) => entry.count += 1,
            None => counts.push(LeagueCount {
                league: team.league_name.clone(),
                count: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

pub fn flatten_league_seasons(payload: &Value) -> Vec<LeagueSeason> {
    FootballDataAdapter.normalize_leagues(payload)
}

pub fn shape_league_teams(payload: &Value) -> Vec<ProviderTeam> {
    FootballDataAdapter.normalize_teams(payload)
}

pub fn footystats_leagues_envelope(payload: &Value) -> Value {
    json!({
        "leagues": payload_rows(payload),
        "success": payload.get("success").and_then(Value::as_bool).unwrap_or(false),
    })
}

/// Keeps only matches that have not kicked off; every other top-level field of
/// the payload passes through untouched.
pub fn filter_upcoming(payload: Value) -> Value {
    let mut object = match payload {
        Value::Object(object) => object,
        _ => Map::new(),
    };

    let upcoming: Vec<Value> = match object.remove("data") {
        Some(Value::Array(rows)) => rows
            .into_iter()
            .filter(|row| {
                matches!(
                    row.get("status").and_then(Value::as_str),
                    Some("scheduled") | Some("notstarted")
                )
            })
            .collect(),
        _ => Vec::new(),
    };
    object.insert("data".to_string(), Value::Array(upcoming));

    Value::Object(object)
}

pub fn football_data_leagues_envelope(payload: &Value) -> Value {
    json!({
        "leagues": flatten_league_seasons(payload),
        "raw": payload_rows(payload),
    })
}

/// `{teams, raw}`, or the upstream payload wrapped in an error when the
/// provider reports `success: false`.
pub fn football_data_teams_envelope(payload: Value) -> Result<Value, ApiError> {
    let success = payload
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !success {
        return Err(ApiError::UpstreamRejected { data: payload });
    }

    Ok(json!({
        "teams": shape_league_teams(&payload),
        "raw": payload_rows(&payload),
    }))
}

/// Football-data match query parameters; absent, empty and `"0"` team ids are
/// dropped.
pub fn football_data_match_query(
    season_id: &str,
    home_team_id: Option<&str>,
    away_team_id: Option<&str>,
) -> Vec<(&'static str, String)> {
    let mut query = vec![("season_id", season_id.to_string())];
    for (key, value) in [("home_team_id", home_team_id), ("away_team_id", away_team_id)] {
        if let Some(id) = value.filter(|id| !id.is_empty() && *id != "0") {
            query.push((key, id.to_string()));
        }
    }
    query
}
