//! Chart-ready aggregation over teams and normalized matches.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::model::{locale_cmp, LeagueSummary, Match, Team};

pub const XG_BIN_WIDTH: f64 = 0.5;
pub const GOALS_BIN_WIDTH: f64 = 1.0;
pub const TOP_MATCHES: usize = 20;
// Values past the last bin are folded into it.
pub const MAX_BINS: usize = 200;
const MATCH_LABEL_CHARS: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub range: String,
    pub start: f64,
    pub home: usize,
    pub away: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeAwaySummary {
    pub matches: usize,
    pub home_goals: u64,
    pub away_goals: u64,
    pub home_xg: f64,
    pub away_xg: f64,
    pub home_wins: usize,
    pub away_wins: usize,
    pub draws: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub category: String,
    pub home: f64,
    pub away: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalsBucket {
    pub goals: u32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchTotals {
    #[serde(rename = "match")]
    pub label: String,
    #[serde(rename = "homeXG")]
    pub home_xg: f64,
    pub home_goals: u32,
    #[serde(rename = "awayXG")]
    pub away_xg: f64,
    pub away_goals: u32,
    #[serde(rename = "totalXG")]
    pub total_xg: f64,
    pub total_goals: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub total_matches: usize,
    pub xg_distribution: Vec<HistogramBin>,
    pub goals_distribution: Vec<HistogramBin>,
    pub home_away_summary: HomeAwaySummary,
    pub home_away_stats: Vec<CategoryRow>,
    pub total_goals_distribution: Vec<GoalsBucket>,
    pub xg_vs_goals: Vec<MatchTotals>,
}

pub fn group_by_league(teams: &[Team]) -> Vec<LeagueSummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<LeagueSummary> = Vec::new();

    for team in teams {
        let Some(league) = team.league_name.as_deref().filter(|name| !name.is_empty()) else {
            continue;
        };
        let slot = *index.entry(league).or_insert_with(|| {
            groups.push(LeagueSummary {
                name: league.to_string(),
                count: 0,
                teams: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].teams.push(team.clone());
        groups[slot].count += 1;
    }

    groups.sort_by(|a, b| locale_cmp(&a.name, &b.name));
    groups
}

/// Bins are contiguous from 0 through the bin holding the largest value,
/// capped at `MAX_BINS`. Every value lands in exactly one bin
/// `[start, start + width)`; negative or non-finite values count toward the
/// first bin and anything past the cap toward the last.
pub fn histogram(values: &[(f64, f64)], width: f64) -> Vec<HistogramBin> {
    if values.is_empty() || !width.is_finite() || width <= 0.0 {
        return Vec::new();
    }

    let bin_of = |value: f64| -> usize {
        if value.is_finite() && value > 0.0 {
            ((value / width).floor() as usize).min(MAX_BINS - 1)
        } else {
            0
        }
    };

    let last_bin = values
        .iter()
        .map(|(home, away)| bin_of(*home).max(bin_of(*away)))
        .max()
        .unwrap_or(0);

    let mut bins: Vec<HistogramBin> = (0..=last_bin)
        .map(|idx| {
            let start = idx as f64 * width;
            HistogramBin {
                range: format!("{start:.1}"),
                start,
                home: 0,
                away: 0,
            }
        })
        .collect();

    for (home, away) in values {
        bins[bin_of(*home)].home += 1;
        bins[bin_of(*away)].away += 1;
    }

    bins
}

pub fn xg_histogram(matches: &[Match]) -> Vec<HistogramBin> {
    let values: Vec<(f64, f64)> = matches.iter().map(|m| (m.home_xg, m.away_xg)).collect();
    histogram(&values, XG_BIN_WIDTH)
}

pub fn goals_histogram(matches: &[Match]) -> Vec<HistogramBin> {
    let values: Vec<(f64, f64)> = matches
        .iter()
        .map(|m| (f64::from(m.home_goals), f64::from(m.away_goals)))
        .collect();
    histogram(&values, GOALS_BIN_WIDTH)
}

pub fn home_away_summary(matches: &[Match]) -> HomeAwaySummary {
    let mut summary = HomeAwaySummary {
        matches: matches.len(),
        home_goals: 0,
        away_goals: 0,
        home_xg: 0.0,
        away_xg: 0.0,
        home_wins: 0,
        away_wins: 0,
        draws: 0,
    };

    for m in matches {
        summary.home_goals += u64::from(m.home_goals);
        summary.away_goals += u64::from(m.away_goals);
        summary.home_xg += m.home_xg;
        summary.away_xg += m.away_xg;

        match m.home_goals.cmp(&m.away_goals) {
            std::cmp::Ordering::Greater => summary.home_wins += 1,
            std::cmp::Ordering::Less => summary.away_wins += 1,
            std::cmp::Ordering::Equal => summary.draws += 1,
        }
    }

    summary.home_xg = round2(summary.home_xg);
    summary.away_xg = round2(summary.away_xg);
    summary
}

impl HomeAwaySummary {
    pub fn chart_rows(&self) -> Vec<CategoryRow> {
        let row = |category: &str, home: f64, away: f64| CategoryRow {
            category: category.to_string(),
            home,
            away,
        };

        vec![
            row("Goals", self.home_goals as f64, self.away_goals as f64),
            row("xG", self.home_xg, self.away_xg),
            row("Wins", self.home_wins as f64, self.away_wins as f64),
            row("Draws", self.draws as f64, self.draws as f64),
        ]
    }
}

pub fn total_goals_distribution(matches: &[Match]) -> Vec<GoalsBucket> {
    let mut distribution: BTreeMap<u32, usize> = BTreeMap::new();
    for m in matches {
        *distribution
            .entry(m.home_goals.saturating_add(m.away_goals))
            .or_insert(0) += 1;
    }

    distribution
        .into_iter()
        .map(|(goals, count)| GoalsBucket { goals, count })
        .collect()
}

pub fn top_matches_by_goals(matches: &[Match], limit: usize) -> Vec<MatchTotals> {
    let mut rows: Vec<MatchTotals> = matches
        .iter()
        .map(|m| MatchTotals {
            label: format!(
                "{} vs {}",
                truncate_chars(&m.home_name, MATCH_LABEL_CHARS),
                truncate_chars(&m.away_name, MATCH_LABEL_CHARS)
            ),
            home_xg: round2(m.home_xg),
            home_goals: m.home_goals,
            away_xg: round2(m.away_xg),
            away_goals: m.away_goals,
            total_xg: round2(m.home_xg + m.away_xg),
            total_goals: m.home_goals.saturating_add(m.away_goals),
        })
        .collect();

    rows.sort_by(|a, b| b.total_goals.cmp(&a.total_goals));
    rows.truncate(limit);
    rows
}

pub fn analytics_report(matches: &[Match]) -> Option<AnalyticsReport> {
    let finished: Vec<Match> = matches
        .iter()
        .filter(|m| m.status.is_finished())
        .cloned()
        .collect();
    if finished.is_empty() {
        return None;
    }

    let summary = home_away_summary(&finished);
    Some(AnalyticsReport {
        total_matches: finished.len(),
        xg_distribution: xg_histogram(&finished),
        goals_distribution: goals_histogram(&finished),
        home_away_stats: summary.chart_rows(),
        home_away_summary: summary,
        total_goals_distribution: total_goals_distribution(&finished),
        xg_vs_goals: top_matches_by_goals(&finished, TOP_MATCHES),
    })
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn truncate_chars(value: &str, max: usize) -> &str {
    match value.char_indices().nth(max) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}
