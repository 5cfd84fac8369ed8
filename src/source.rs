//! Request context and the mock/database selector behind every team route.

use std::future::Future;
use std::sync::Arc;

use tracing::{error, info};

use crate::analytics::group_by_league;
use crate::database::{DatabaseError, DatabaseSource};
use crate::error::ApiError;
use crate::mock_data::MockDataset;
use crate::model::{
    LeaguesEnvelope, RelatedTeamsEnvelope, SortKey, TeamEnvelope, TeamsEnvelope, SOURCE_DATABASE,
    SOURCE_MOCK,
};
use crate::upstream::{Provider, ProviderClient};

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub db_available: bool,
    pub database: Option<DatabaseSource>,
    pub mock: Arc<MockDataset>,
    pub footystats: ProviderClient,
    pub football_data: ProviderClient,
}

impl RequestContext {
    pub fn new(mock: MockDataset) -> Self {
        Self {
            db_available: false,
            database: None,
            mock: Arc::new(mock),
            footystats: ProviderClient::new(Provider::FootyStats, None, None),
            football_data: ProviderClient::new(Provider::FootballData, None, None),
        }
    }

    pub fn with_database(self, database: DatabaseSource) -> Self {
        Self {
            db_available: true,
            database: Some(database),
            ..self
        }
    }

    pub fn with_providers(self, footystats: ProviderClient, football_data: ProviderClient) -> Self {
        Self {
            footystats,
            football_data,
            ..self
        }
    }

    pub fn source_name(&self) -> &'static str {
        if self.db_available {
            SOURCE_DATABASE
        } else {
            SOURCE_MOCK
        }
    }

    pub async fn list_teams(
        &self,
        league: Option<String>,
        sort: Option<SortKey>,
    ) -> Result<TeamsEnvelope, ApiError> {
        let database = TeamSource::Database(self.database.as_ref());
        let mock = TeamSource::Mock(&self.mock);
        let fallback_league = league.clone();

        select_data_source(
            self,
            move || database.list_teams(league, sort),
            move || mock.list_teams(fallback_league, sort),
        )
        .await
    }

    pub async fn get_team(&self, raw_id: &str) -> Result<TeamEnvelope, ApiError> {
        let database = TeamSource::Database(self.database.as_ref());
        let mock = TeamSource::Mock(&self.mock);

        select_data_source(
            self,
            move || database.get_team(raw_id),
            move || mock.get_team(raw_id),
        )
        .await
    }

    pub async fn related_teams(&self, raw_id: &str) -> Result<RelatedTeamsEnvelope, ApiError> {
        let database = TeamSource::Database(self.database.as_ref());
        let mock = TeamSource::Mock(&self.mock);

        select_data_source(
            self,
            move || database.related_teams(raw_id),
            move || mock.related_teams(raw_id),
        )
        .await
    }

    pub async fn leagues(&self) -> Result<LeaguesEnvelope, ApiError> {
        let envelope = self.list_teams(None, Some(SortKey::NameAsc)).await?;
        Ok(LeaguesEnvelope {
            leagues: group_by_league(&envelope.teams),
            source: envelope.source,
        })
    }
}

/// Runs `fallback` when the database flag is off and `primary` otherwise,
/// never both. Failures are logged and handed back for the route to render.
pub async fn select_data_source<T, P, PFut, F, FFut>(
    ctx: &RequestContext,
    primary: P,
    fallback: F,
) -> Result<T, ApiError>
where
    P: FnOnce() -> PFut,
    PFut: Future<Output = Result<T, ApiError>>,
    F: FnOnce() -> FFut,
    FFut: Future<Output = Result<T, ApiError>>,
{
    let source = ctx.source_name();
    let result = if ctx.db_available {
        primary().await
    } else {
        fallback().await
    };

    if let Err(err) = &result {
        if err.is_not_found() {
            info!(
                component = "source",
                event = "datasource.not_found",
                source,
                error = %err
            );
        } else {
            error!(
                component = "source",
                event = "datasource.error",
                source,
                error = %err
            );
        }
    }

    result
}

/// One team API over either backend. A `Database` source without a connection
/// fails every call with `DatabaseError::NotConfigured`.
#[derive(Debug, Clone, Copy)]
pub enum TeamSource<'a> {
    Mock(&'a MockDataset),
    Database(Option<&'a DatabaseSource>),
}

impl<'a> TeamSource<'a> {
    pub async fn list_teams(
        self,
        league: Option<String>,
        sort: Option<SortKey>,
    ) -> Result<TeamsEnvelope, ApiError> {
        match self {
            Self::Mock(mock) => Ok(mock.list_teams(league.as_deref(), sort)),
            Self::Database(db) => connected(db)?.list_teams(league, sort).await,
        }
    }

    pub async fn get_team(self, raw_id: &str) -> Result<TeamEnvelope, ApiError> {
        match self {
            Self::Mock(mock) => mock.get_team(raw_id),
            Self::Database(db) => connected(db)?.get_team(raw_id).await,
        }
    }

    pub async fn related_teams(self, raw_id: &str) -> Result<RelatedTeamsEnvelope, ApiError> {
        match self {
            Self::Mock(mock) => mock.related_teams(raw_id),
            Self::Database(db) => connected(db)?.related_teams(raw_id).await,
        }
    }
}

fn connected(db: Option<&DatabaseSource>) -> Result<&DatabaseSource, ApiError> {
    db.ok_or(ApiError::Database(DatabaseError::NotConfigured))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn mock_ctx() -> RequestContext {
        RequestContext::new(MockDataset::embedded().unwrap())
    }

    #[tokio::test]
    async fn flag_off_never_invokes_primary() {
        let ctx = mock_ctx();
        let primary_called = AtomicBool::new(false);
        let flag = &primary_called;

        let out = select_data_source(
            &ctx,
            move || async move {
                flag.store(true, Ordering::SeqCst);
                Ok("primary")
            },
            || async { Ok("fallback") },
        )
        .await
        .unwrap();

        assert_eq!(out, "fallback");
        assert!(!primary_called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn flag_on_never_invokes_fallback() {
        let ctx = mock_ctx().with_database(DatabaseSource::open_in_memory().unwrap());
        let fallback_called = AtomicBool::new(false);
        let flag = &fallback_called;

        let out = select_data_source(
            &ctx,
            || async { Ok(1) },
            move || async move {
                flag.store(true, Ordering::SeqCst);
                Ok(2)
            },
        )
        .await
        .unwrap();

        assert_eq!(out, 1);
        assert!(!fallback_called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn primary_error_is_returned_without_falling_back() {
        let ctx = mock_ctx().with_database(DatabaseSource::open_in_memory().unwrap());

        let err = select_data_source(
            &ctx,
            || async { Err::<(), _>(ApiError::Internal("boom".to_string())) },
            || async { Ok(()) },
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "boom");
    }

    #[tokio::test]
    async fn flag_on_without_connection_reports_not_configured() {
        let mut ctx = mock_ctx();
        ctx.db_available = true;

        let err = ctx.list_teams(None, None).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Database(DatabaseError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn mock_context_serves_mock_envelopes() {
        let ctx = mock_ctx();

        let teams = ctx.list_teams(None, None).await.unwrap();
        assert_eq!(teams.source, "mock");
        assert_eq!(teams.teams.len(), ctx.mock.teams().len());

        let team = ctx.get_team("1").await.unwrap();
        assert_eq!(team.team.id, 1);

        let err = ctx.get_team("999").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn leagues_group_the_active_source() {
        let ctx = mock_ctx();
        let leagues = ctx.leagues().await.unwrap();

        assert_eq!(leagues.source, "mock");
        let total: usize = leagues.leagues.iter().map(|l| l.count).sum();
        assert_eq!(total, ctx.mock.teams().len());
        let names: Vec<_> = leagues.leagues.iter().map(|l| l.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort_by_key(|name| name.to_lowercase());
        assert_eq!(names, sorted);
    }
}
