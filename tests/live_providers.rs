#![cfg(feature = "live-provider-tests")]

use soccer_stats::{
    football_data_leagues_envelope, footystats_leagues_envelope, AppConfig, FootyStatsAdapter,
    ProviderAdapter,
};

fn live_config() -> Option<AppConfig> {
    let cfg = AppConfig::from_env().expect("live config should parse");
    if cfg.footystats_api_key.is_none() && cfg.football_data_api_key.is_none() {
        eprintln!("skipping live provider tests: no API keys configured");
        return None;
    }
    Some(cfg)
}

#[tokio::test]
async fn live_footystats_leagues_and_matches_normalize() {
    let Some(cfg) = live_config() else {
        return;
    };
    if cfg.footystats_api_key.is_none() {
        return;
    }
    let ctx = cfg.build_context().expect("context should build");

    let payload = ctx
        .footystats
        .get_json("leagues", &[])
        .await
        .expect("leagues request should succeed");
    let envelope = footystats_leagues_envelope(&payload);
    assert!(envelope["leagues"].is_array());

    let seasons = FootyStatsAdapter.normalize_leagues(&payload);
    let Some(first) = seasons.first() else {
        return;
    };

    let matches = ctx
        .footystats
        .get_json(
            "league-matches",
            &[
                ("league_id", first.season_id.to_string()),
                ("season", "2024".to_string()),
            ],
        )
        .await
        .expect("league matches request should succeed");
    for m in FootyStatsAdapter.normalize_matches(&matches) {
        assert!(!m.home_name.is_empty());
    }
}

#[tokio::test]
async fn live_football_data_league_list_flattens() {
    let Some(cfg) = live_config() else {
        return;
    };
    if cfg.football_data_api_key.is_none() {
        return;
    }
    let ctx = cfg.build_context().expect("context should build");

    let payload = ctx
        .football_data
        .get_json("league-list", &[("chosen_leagues_only", "true".to_string())])
        .await
        .expect("league list request should succeed");
    let envelope = football_data_leagues_envelope(&payload);

    let leagues = envelope["leagues"].as_array().expect("leagues should be an array");
    assert!(leagues.iter().all(|row| row["season_id"].is_i64()));
}
