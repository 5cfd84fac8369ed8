//! Match-list view model with explicit state transitions.

use serde::{Deserialize, Serialize};

use crate::model::Match;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Scheduled,
    Finished,
}

impl StatusFilter {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "scheduled" => Self::Scheduled,
            "finished" => Self::Finished,
            _ => Self::All,
        }
    }

    fn admits(self, m: &Match) -> bool {
        match self {
            Self::All => true,
            Self::Scheduled => m.status.is_upcoming(),
            Self::Finished => m.status.is_finished(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchListView {
    pub status_filter: StatusFilter,
    pub search: String,
}

impl MatchListView {
    pub fn with_status_filter(self, status_filter: StatusFilter) -> Self {
        Self {
            status_filter,
            ..self
        }
    }

    pub fn with_search(self, search: impl Into<String>) -> Self {
        Self {
            search: search.into().trim().to_lowercase(),
            ..self
        }
    }

    pub fn admits(&self, m: &Match) -> bool {
        if !self.status_filter.admits(m) {
            return false;
        }
        if self.search.is_empty() {
            return true;
        }

        [&m.home_name, &m.away_name, &m.stadium_name]
            .iter()
            .any(|field| field.to_lowercase().contains(&self.search))
    }

    pub fn apply(&self, matches: &[Match]) -> Vec<Match> {
        matches.iter().filter(|m| self.admits(m)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MatchStatus;

    fn fixture(home: &str, away: &str, stadium: &str, status: MatchStatus) -> Match {
        Match {
            id: 0,
            home_name: home.to_string(),
            away_name: away.to_string(),
            home_goals: 0,
            away_goals: 0,
            home_xg: 0.0,
            away_xg: 0.0,
            status,
            kickoff: None,
            stadium_name: stadium.to_string(),
            game_week: 1,
        }
    }

    fn matches() -> Vec<Match> {
        vec![
            fixture("Arsenal", "Chelsea", "Emirates Stadium", MatchStatus::Finished),
            fixture("Liverpool", "Everton", "Anfield", MatchStatus::Scheduled),
            fixture("Leeds", "Burnley", "Elland Road", MatchStatus::NotStarted),
            fixture("Fulham", "Brentford", "Craven Cottage", MatchStatus::Live),
        ]
    }

    #[test]
    fn default_view_shows_everything() {
        assert_eq!(MatchListView::default().apply(&matches()).len(), 4);
    }

    #[test]
    fn scheduled_filter_includes_not_started() {
        let view = MatchListView::default().with_status_filter(StatusFilter::Scheduled);
        let names: Vec<_> = view
            .apply(&matches())
            .into_iter()
            .map(|m| m.home_name)
            .collect();
        assert_eq!(names, vec!["Liverpool", "Leeds"]);
    }

    #[test]
    fn search_is_case_insensitive_across_names_and_stadium() {
        let view = MatchListView::default().with_search("  ANFIELD ");
        assert_eq!(view.apply(&matches()).len(), 1);

        let view = view
            .with_search("el")
            .with_status_filter(StatusFilter::Finished);
        let out = view.apply(&matches());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].away_name, "Chelsea");
    }

    #[test]
    fn unknown_filter_parses_as_all() {
        assert_eq!(StatusFilter::parse("Finished"), StatusFilter::Finished);
        assert_eq!(StatusFilter::parse("live"), StatusFilter::All);
    }
}
