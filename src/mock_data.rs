//! Fixed in-memory team dataset used when no database is configured.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::error::{ApiError, TEAM_NOT_FOUND};
use crate::model::{
    parse_int_prefix, sort_teams, RelatedTeamsEnvelope, SortKey, Team, TeamEnvelope,
    TeamsEnvelope, SOURCE_MOCK,
};
use crate::shaper::league_counts;

const EMBEDDED_TEAMS_JSON: &str = include_str!("../data/mock_teams.json");
const RELATED_LIMIT: usize = 3;
const RECENT_LIMIT: usize = 2;

#[derive(Debug, Error)]
pub enum MockDataError {
    #[error("invalid mock dataset json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not read mock dataset {path}: {message}")]
    Io { path: String, message: String },
    #[error("duplicate team id {0} in mock dataset")]
    DuplicateTeamId(i64),
    #[error("league {league_id} is named both {first:?} and {second:?}")]
    InconsistentLeagueName {
        league_id: i64,
        first: String,
        second: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockDataset {
    teams: Vec<Team>,
}

impl MockDataset {
    pub fn new(teams: Vec<Team>) -> Result<Self, MockDataError> {
        validate(&teams)?;
        Ok(Self { teams })
    }

    pub fn embedded() -> Result<Self, MockDataError> {
        Self::from_json(EMBEDDED_TEAMS_JSON)
    }

    pub fn from_json(raw: &str) -> Result<Self, MockDataError> {
        let teams: Vec<Team> = serde_json::from_str(raw)?;
        Self::new(teams)
    }

    pub fn from_path(path: &Path) -> Result<Self, MockDataError> {
        let raw = std::fs::read_to_string(path).map_err(|err| MockDataError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        let dataset = Self::from_json(&raw)?;

        info!(
            component = "mock_data",
            event = "mock.dataset.loaded",
            path = %path.display(),
            team_count = dataset.teams.len()
        );

        Ok(dataset)
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn list_teams(&self, league: Option<&str>, sort: Option<SortKey>) -> TeamsEnvelope {
        let mut teams: Vec<Team> = match league {
            Some(league) => self
                .teams
                .iter()
                .filter(|team| team.league_name.as_deref() == Some(league))
                .cloned()
                .collect(),
            None => self.teams.clone(),
        };
        sort_teams(&mut teams, sort);

        TeamsEnvelope {
            teams,
            source: SOURCE_MOCK.to_string(),
        }
    }

    pub fn get_team(&self, raw_id: &str) -> Result<TeamEnvelope, ApiError> {
        let team = self.find(raw_id)?;
        Ok(TeamEnvelope {
            team: team.clone(),
            source: SOURCE_MOCK.to_string(),
        })
    }

    /// "Recent" teams are the first teams in dataset order; the dataset carries
    /// no creation timestamps.
    pub fn related_teams(&self, raw_id: &str) -> Result<RelatedTeamsEnvelope, ApiError> {
        let team = self.find(raw_id)?;
        let team_league = team.league_name.clone();

        let related_teams = self
            .teams
            .iter()
            .filter(|other| other.league_name == team_league && other.id != team.id)
            .take(RELATED_LIMIT)
            .cloned()
            .collect();

        let recent_recommendations = self
            .teams
            .iter()
            .filter(|other| other.id != team.id)
            .take(RECENT_LIMIT)
            .cloned()
            .collect();

        Ok(RelatedTeamsEnvelope {
            team_id: raw_id.to_string(),
            team_league,
            related_teams,
            recent_recommendations,
            league_stats: league_counts(&self.teams),
            source: SOURCE_MOCK.to_string(),
        })
    }

    fn find(&self, raw_id: &str) -> Result<&Team, ApiError> {
        parse_int_prefix(raw_id)
            .and_then(|id| self.teams.iter().find(|team| team.id == id))
            .ok_or(ApiError::NotFound(TEAM_NOT_FOUND))
    }
}

fn validate(teams: &[Team]) -> Result<(), MockDataError> {
    let mut ids = HashSet::with_capacity(teams.len());
    let mut league_names: HashMap<i64, &str> = HashMap::new();

    for team in teams {
        if !ids.insert(team.id) {
            return Err(MockDataError::DuplicateTeamId(team.id));
        }

        if let (Some(league_id), Some(name)) = (team.league_id, team.league_name.as_deref()) {
            match league_names.get(&league_id) {
                Some(first) if *first != name => {
                    return Err(MockDataError::InconsistentLeagueName {
                        league_id,
                        first: (*first).to_string(),
                        second: name.to_string(),
                    });
                }
                Some(_) => {}
                None => {
                    league_names.insert(league_id, name);
                }
            }
        }
    }

    Ok(())
}
