//! Relational team store backed by SQLite.

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rusqlite::{params, params_from_iter, Connection, Row};
use thiserror::Error;
use tracing::{debug, info};

use crate::error::{ApiError, TEAM_NOT_FOUND};
use crate::model::{
    locale_cmp, parse_int_prefix, League, LeagueCount, RelatedTeamsEnvelope, SortKey, Team, TeamEnvelope,
    TeamsEnvelope, SOURCE_DATABASE,
};

const LOCALE_COLLATION: &str = "LOCALE";
const RELATED_LIMIT: i64 = 3;
const RECENT_LIMIT: i64 = 2;

const TEAM_COLUMNS: &str = "
    SELECT
        t.id,
        t.name,
        t.country,
        t.league_id,
        l.name AS league_name,
        t.founded,
        t.stadium,
        t.logo_url,
        t.description
    FROM teams t
    LEFT JOIN leagues l ON t.league_id = l.id
";

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("database connection lock poisoned")]
    LockPoisoned,
    #[error("database task failed: {0}")]
    Join(String),
    #[error("database not configured")]
    NotConfigured,
}

#[derive(Debug, Clone)]
pub struct DatabaseSource {
    conn: Arc<Mutex<Connection>>,
}

impl DatabaseSource {
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path)?;
        ensure_schema(&conn)?;

        info!(
            component = "database",
            event = "database.open",
            path = %path.display()
        );

        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        ensure_schema(&conn)?;
        Self::from_connection(conn)
    }

    // Name sorts must match the mock source, so both go through `locale_cmp`.
    pub fn from_connection(conn: Connection) -> Result<Self, DatabaseError> {
        conn.create_collation(LOCALE_COLLATION, locale_cmp)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn seed_leagues(&self, leagues: &[League]) -> Result<(), DatabaseError> {
        let conn = self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        let mut stmt = conn.prepare(
            "INSERT INTO leagues (id, name, country, season, year) VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for league in leagues {
            stmt.execute(params![
                league.id,
                league.name,
                league.country,
                league.season,
                league.year
            ])?;
        }
        Ok(())
    }

    /// Inserts teams with `created_at` one second apart starting at
    /// `created_at_start`, so later entries are the more recent ones.
    pub fn seed_teams(
        &self,
        teams: &[Team],
        created_at_start: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        let conn = self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        let mut stmt = conn.prepare(
            "
            INSERT INTO teams (
                id, name, country, league_id, founded, stadium, logo_url, description, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ",
        )?;
        for (idx, team) in teams.iter().enumerate() {
            let created_at = created_at_start + ChronoDuration::seconds(idx as i64);
            stmt.execute(params![
                team.id,
                team.name,
                team.country,
                team.league_id,
                team.founded,
                team.stadium,
                team.logo_url,
                team.description,
                created_at.to_rfc3339(),
            ])?;
        }
        Ok(())
    }

    pub async fn list_teams(
        &self,
        league: Option<String>,
        sort: Option<SortKey>,
    ) -> Result<TeamsEnvelope, ApiError> {
        let teams = self
            .run(move |conn| {
                let filter = if league.is_some() {
                    "WHERE l.name = ?1"
                } else {
                    ""
                };
                let sql = format!("{TEAM_COLUMNS} {filter} {}", order_clause(sort));
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params_from_iter(league.iter()), team_from_row)?;
                Ok(rows.collect::<Result<Vec<_>, _>>()?)
            })
            .await?;

        debug!(
            component = "database",
            event = "database.teams.listed",
            team_count = teams.len()
        );

        Ok(TeamsEnvelope {
            teams,
            source: SOURCE_DATABASE.to_string(),
        })
    }

    pub async fn get_team(&self, raw_id: &str) -> Result<TeamEnvelope, ApiError> {
        let id = parse_int_prefix(raw_id).ok_or(ApiError::NotFound(TEAM_NOT_FOUND))?;
        let team = self
            .run(move |conn| find_team(conn, id))
            .await?
            .ok_or(ApiError::NotFound(TEAM_NOT_FOUND))?;

        Ok(TeamEnvelope {
            team,
            source: SOURCE_DATABASE.to_string(),
        })
    }

    pub async fn related_teams(&self, raw_id: &str) -> Result<RelatedTeamsEnvelope, ApiError> {
        let id = parse_int_prefix(raw_id).ok_or(ApiError::NotFound(TEAM_NOT_FOUND))?;
        let related = self
            .run(move |conn| {
                let Some(team) = find_team(conn, id)? else {
                    return Ok(None);
                };

                let related_teams = query_teams(
                    conn,
                    &format!("{TEAM_COLUMNS} WHERE t.league_id = ?1 AND t.id != ?2 LIMIT ?3"),
                    params![team.league_id, id, RELATED_LIMIT],
                )?;
                let recent_teams = query_teams(
                    conn,
                    &format!(
                        "{TEAM_COLUMNS} WHERE t.id != ?1 ORDER BY t.created_at DESC LIMIT ?2"
                    ),
                    params![id, RECENT_LIMIT],
                )?;
                let league_stats = league_counts(conn)?;

                Ok(Some((team, related_teams, recent_teams, league_stats)))
            })
            .await?;

        let Some((team, related_teams, recent_recommendations, league_stats)) = related else {
            return Err(ApiError::NotFound(TEAM_NOT_FOUND));
        };

        Ok(RelatedTeamsEnvelope {
            team_id: raw_id.to_string(),
            team_league: team.league_name,
            related_teams,
            recent_recommendations,
            league_stats,
            source: SOURCE_DATABASE.to_string(),
        })
    }

    async fn run<T, F>(&self, f: F) -> Result<T, DatabaseError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, DatabaseError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| DatabaseError::LockPoisoned)?;
            f(&guard)
        })
        .await
        .map_err(|err| DatabaseError::Join(err.to_string()))?
    }
}

pub fn ensure_schema(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS leagues (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            country TEXT,
            season TEXT,
            year INTEGER
        );
        CREATE TABLE IF NOT EXISTS teams (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            country TEXT,
            league_id INTEGER REFERENCES leagues(id),
            founded INTEGER,
            stadium TEXT,
            logo_url TEXT,
            description TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );
        CREATE INDEX IF NOT EXISTS idx_teams_league_id ON teams (league_id);
        ",
    )?;
    Ok(())
}

fn order_clause(sort: Option<SortKey>) -> &'static str {
    match sort {
        Some(SortKey::NameAsc) => "ORDER BY t.name COLLATE LOCALE ASC",
        Some(SortKey::NameDesc) => "ORDER BY t.name COLLATE LOCALE DESC",
        Some(SortKey::CountryAsc) => "ORDER BY t.country COLLATE LOCALE ASC",
        Some(SortKey::CountryDesc) => "ORDER BY t.country COLLATE LOCALE DESC",
        None => "",
    }
}

fn find_team(conn: &Connection, id: i64) -> Result<Option<Team>, DatabaseError> {
    let mut teams = query_teams(conn, &format!("{TEAM_COLUMNS} WHERE t.id = ?1"), params![id])?;
    Ok(if teams.is_empty() {
        None
    } else {
        Some(teams.swap_remove(0))
    })
}

fn query_teams(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Team>, DatabaseError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, team_from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

fn league_counts(conn: &Connection) -> Result<Vec<LeagueCount>, DatabaseError> {
    let mut stmt = conn.prepare(
        "
        SELECT l.name AS league, COUNT(*) AS count
        FROM teams t
        LEFT JOIN leagues l ON t.league_id = l.id
        GROUP BY l.name
        ORDER BY count DESC, league ASC
        ",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(LeagueCount {
            league: row.get(0)?,
            count: row.get::<_, i64>(1)?.max(0) as u64,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

fn team_from_row(row: &Row<'_>) -> rusqlite::Result<Team> {
    Ok(Team {
        id: row.get(0)?,
        name: row.get(1)?,
        country: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        league_id: row.get(3)?,
        league_name: row.get(4)?,
        founded: row.get(5)?,
        stadium: row.get(6)?,
        logo_url: row.get(7)?,
        description: row.get(8)?,
    })
}
