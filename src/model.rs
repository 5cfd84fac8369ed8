//! Shared domain records served by every data source.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SOURCE_MOCK: &str = "mock";
pub const SOURCE_DATABASE: &str = "database";
pub const UNKNOWN_NAME: &str = "TBD";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub league_id: Option<i64>,
    #[serde(default)]
    pub league_name: Option<String>,
    #[serde(default)]
    pub founded: Option<i32>,
    #[serde(default)]
    pub stadium: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub season: String,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueCount {
    pub league: Option<String>,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueSummary {
    pub name: String,
    pub count: usize,
    pub teams: Vec<Team>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueSeason {
    pub league_id: i64,
    pub league_name: String,
    pub season_id: i64,
    pub year: i64,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderTeam {
    pub team_id: i64,
    pub name: String,
    pub clean_name: String,
    pub country: String,
    pub founded: i64,
    pub image: String,
    pub position: i64,
    pub risk: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MatchStatus {
    Scheduled,
    NotStarted,
    Live,
    Finished,
    Other(String),
}

impl MatchStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Scheduled => "scheduled",
            Self::NotStarted => "notstarted",
            Self::Live => "live",
            Self::Finished => "finished",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_upcoming(&self) -> bool {
        matches!(self, Self::Scheduled | Self::NotStarted)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished)
    }
}

impl From<String> for MatchStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "scheduled" => Self::Scheduled,
            "notstarted" => Self::NotStarted,
            "live" => Self::Live,
            "finished" => Self::Finished,
            _ => Self::Other(raw),
        }
    }
}

impl From<MatchStatus> for String {
    fn from(status: MatchStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Provider-independent match record. Goal counts are only meaningful once the
/// status is `finished`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: i64,
    pub home_name: String,
    pub away_name: String,
    pub home_goals: u32,
    pub away_goals: u32,
    pub home_xg: f64,
    pub away_xg: f64,
    pub status: MatchStatus,
    pub kickoff: Option<DateTime<Utc>>,
    pub stadium_name: String,
    pub game_week: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    NameAsc,
    NameDesc,
    CountryAsc,
    CountryDesc,
}

impl SortKey {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "name_asc" => Some(Self::NameAsc),
            "name_desc" => Some(Self::NameDesc),
            "country_asc" => Some(Self::CountryAsc),
            "country_desc" => Some(Self::CountryDesc),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NameAsc => "name_asc",
            Self::NameDesc => "name_desc",
            Self::CountryAsc => "country_asc",
            Self::CountryDesc => "country_desc",
        }
    }

    pub fn compare(self, a: &Team, b: &Team) -> Ordering {
        match self {
            Self::NameAsc => locale_cmp(&a.name, &b.name),
            Self::NameDesc => locale_cmp(&b.name, &a.name),
            Self::CountryAsc => locale_cmp(&a.country, &b.country),
            Self::CountryDesc => locale_cmp(&b.country, &a.country),
        }
    }
}

/// Case-insensitive ordering where case-only ties put lowercase first.
/// Distinct strings never compare equal. SQLite sorts with this same function
/// through the `LOCALE` collation.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

pub fn sort_teams(teams: &mut [Team], sort: Option<SortKey>) {
    if let Some(key) = sort {
        teams.sort_by(|a, b| key.compare(a, b));
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamsEnvelope {
    pub teams: Vec<Team>,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamEnvelope {
    pub team: Team,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaguesEnvelope {
    pub leagues: Vec<LeagueSummary>,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedTeamsEnvelope {
    pub team_id: String,
    pub team_league: Option<String>,
    pub related_teams: Vec<Team>,
    pub recent_recommendations: Vec<Team>,
    pub league_stats: Vec<LeagueCount>,
    pub source: String,
}

/// Leading-integer parse: `"12abc"` is 12, `"abc"` is `None`.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|value| sign * value)
}

pub fn value_f64(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(raw)) => raw.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

pub fn value_i64(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|v| v.is_finite()).map(|v| v as i64))
            .unwrap_or(0),
        Some(Value::String(raw)) => parse_int_prefix(raw).unwrap_or(0),
        _ => 0,
    }
}

pub fn value_string(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(raw)) if !raw.is_empty() => raw.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => default.to_string(),
    }
}
