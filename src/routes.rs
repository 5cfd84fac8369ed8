//! JSON routes over the team sources and the two upstream providers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::analytics::analytics_report;
use crate::error::ApiError;
use crate::model::{LeaguesEnvelope, RelatedTeamsEnvelope, SortKey, TeamEnvelope, TeamsEnvelope};
use crate::provider::adapter_for;
use crate::shaper::{
    filter_upcoming, football_data_leagues_envelope, football_data_match_query,
    football_data_teams_envelope, footystats_leagues_envelope,
};
use crate::source::RequestContext;
use crate::upstream::ProviderClient;
use crate::view::{MatchListView, StatusFilter};

pub const DEFAULT_SEASON: &str = "2024";

type AppState = Arc<RequestContext>;

pub fn app_router(ctx: Arc<RequestContext>) -> Router {
    Router::new()
        .route("/teams", get(list_teams))
        .route("/teams/{id}", get(get_team))
        .route("/teams/{id}/related", get(related_teams))
        .route("/leagues", get(list_leagues))
        .route("/footystats/leagues", get(footystats_leagues))
        .route("/footystats/league-matches/{id}", get(footystats_league_matches))
        .route("/footystats/team-stats/{id}", get(footystats_team_stats))
        .route(
            "/footystats/upcoming-matches/{id}",
            get(footystats_upcoming_matches),
        )
        .route("/footystats/matches/{id}", get(footystats_matches))
        .route("/footystats/analytics/{id}", get(footystats_analytics))
        .route("/football-data/leagues", get(football_data_leagues))
        .route(
            "/football-data/leagues/{id}/matches",
            get(football_data_league_matches),
        )
        .route(
            "/football-data/leagues/{id}/teams",
            get(football_data_league_teams),
        )
        .with_state(ctx)
}

#[derive(Debug, Default, Deserialize)]
pub struct TeamsQuery {
    pub league: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SeasonQuery {
    pub season: Option<String>,
}

impl SeasonQuery {
    fn season(&self) -> String {
        self.season
            .as_deref()
            .map(str::trim)
            .filter(|season| !season.is_empty())
            .unwrap_or(DEFAULT_SEASON)
            .to_string()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MatchListQuery {
    pub season: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FootballDataMatchesQuery {
    pub home_team_id: Option<String>,
    pub away_team_id: Option<String>,
}

async fn list_teams(
    State(ctx): State<AppState>,
    Query(query): Query<TeamsQuery>,
) -> Result<Json<TeamsEnvelope>, ApiError> {
    let league = query.league.filter(|league| !league.is_empty());
    let sort = query.sort.as_deref().and_then(SortKey::parse);
    info!(
        component = "routes",
        event = "http.teams.request",
        league = league.as_deref(),
        sort = sort.map(SortKey::as_str)
    );

    Ok(Json(ctx.list_teams(league, sort).await?))
}

async fn get_team(
    State(ctx): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TeamEnvelope>, ApiError> {
    info!(component = "routes", event = "http.team.request", team_id = %id);
    Ok(Json(ctx.get_team(&id).await?))
}

async fn related_teams(
    State(ctx): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RelatedTeamsEnvelope>, ApiError> {
    info!(
        component = "routes",
        event = "http.team_related.request",
        team_id = %id
    );
    Ok(Json(ctx.related_teams(&id).await?))
}

async fn list_leagues(State(ctx): State<AppState>) -> Result<Json<LeaguesEnvelope>, ApiError> {
    info!(component = "routes", event = "http.leagues.request");
    Ok(Json(ctx.leagues().await?))
}

async fn footystats_leagues(State(ctx): State<AppState>) -> Result<Json<Value>, ApiError> {
    info!(component = "routes", event = "http.footystats_leagues.request");
    let payload = fetch(&ctx.footystats, "leagues", &[]).await?;
    Ok(Json(footystats_leagues_envelope(&payload)))
}

async fn footystats_league_matches(
    State(ctx): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<SeasonQuery>,
) -> Result<Json<Value>, ApiError> {
    let season = query.season();
    info!(
        component = "routes",
        event = "http.footystats_league_matches.request",
        league_id = %id,
        season = %season
    );
    Ok(Json(league_matches(&ctx, id, season).await?))
}

async fn footystats_team_stats(
    State(ctx): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<SeasonQuery>,
) -> Result<Json<Value>, ApiError> {
    let season = query.season();
    info!(
        component = "routes",
        event = "http.footystats_team_stats.request",
        team_id = %id,
        season = %season
    );

    let payload = fetch(
        &ctx.footystats,
        "team-stats",
        &[("team_id", id), ("season", season)],
    )
    .await?;
    Ok(Json(payload))
}

async fn footystats_upcoming_matches(
    State(ctx): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<SeasonQuery>,
) -> Result<Json<Value>, ApiError> {
    let season = query.season();
    info!(
        component = "routes",
        event = "http.footystats_upcoming_matches.request",
        league_id = %id,
        season = %season
    );
    let payload = league_matches(&ctx, id, season).await?;
    Ok(Json(filter_upcoming(payload)))
}

async fn footystats_matches(
    State(ctx): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MatchListQuery>,
) -> Result<Json<Value>, ApiError> {
    let season = SeasonQuery {
        season: query.season,
    }
    .season();
    let view = MatchListView::default()
        .with_status_filter(
            query
                .status
                .as_deref()
                .map(StatusFilter::parse)
                .unwrap_or_default(),
        )
        .with_search(query.search.unwrap_or_default());
    info!(
        component = "routes",
        event = "http.footystats_matches.request",
        league_id = %id,
        season = %season,
        status = ?view.status_filter
    );

    let payload = league_matches(&ctx, id, season).await?;
    let adapter = adapter_for(ctx.footystats.provider());
    let matches = view.apply(&adapter.normalize_matches(&payload));
    Ok(Json(json!({
        "total": matches.len(),
        "matches": matches,
    })))
}

async fn footystats_analytics(
    State(ctx): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<SeasonQuery>,
) -> Result<Json<Value>, ApiError> {
    let season = query.season();
    info!(
        component = "routes",
        event = "http.footystats_analytics.request",
        league_id = %id,
        season = %season
    );

    let payload = league_matches(&ctx, id, season).await?;
    let adapter = adapter_for(ctx.footystats.provider());
    let report = analytics_report(&adapter.normalize_matches(&payload));
    let body = match report {
        Some(report) => serde_json::to_value(report)
            .map_err(|err| ApiError::Internal(err.to_string()))?,
        None => json!({ "report": null }),
    };
    Ok(Json(body))
}

async fn football_data_leagues(State(ctx): State<AppState>) -> Result<Json<Value>, ApiError> {
    info!(component = "routes", event = "http.football_data_leagues.request");
    let payload = fetch(
        &ctx.football_data,
        "league-list",
        &[("chosen_leagues_only", "true".to_string())],
    )
    .await?;
    Ok(Json(football_data_leagues_envelope(&payload)))
}

async fn football_data_league_matches(
    State(ctx): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<FootballDataMatchesQuery>,
) -> Result<Json<Value>, ApiError> {
    info!(
        component = "routes",
        event = "http.football_data_league_matches.request",
        season_id = %id
    );

    let params = football_data_match_query(
        &id,
        query.home_team_id.as_deref(),
        query.away_team_id.as_deref(),
    );
    let payload = fetch(&ctx.football_data, "league-matches", &params).await?;
    Ok(Json(payload))
}

async fn football_data_league_teams(
    State(ctx): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    info!(
        component = "routes",
        event = "http.football_data_league_teams.request",
        league_id = %id
    );

    let payload = fetch(&ctx.football_data, "league-teams", &[("league_id", id)]).await?;
    football_data_teams_envelope(payload)
        .map(Json)
        .inspect_err(|err| log_provider_error(&ctx.football_data, "league-teams", err))
}

async fn league_matches(
    ctx: &RequestContext,
    league_id: String,
    season: String,
) -> Result<Value, ApiError> {
    fetch(
        &ctx.footystats,
        "league-matches",
        &[("league_id", league_id), ("season", season)],
    )
    .await
}

async fn fetch(
    client: &ProviderClient,
    endpoint: &str,
    query: &[(&str, String)],
) -> Result<Value, ApiError> {
    client
        .get_json(endpoint, query)
        .await
        .inspect_err(|err| log_provider_error(client, endpoint, err))
}

fn log_provider_error(client: &ProviderClient, endpoint: &str, err: &ApiError) {
    error!(
        component = "routes",
        event = "provider.error",
        provider = client.provider().as_str(),
        endpoint,
        error = %err
    );
}
