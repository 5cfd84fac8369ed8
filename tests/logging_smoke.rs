use std::io;
use std::io::Write;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use soccer_stats::{
    app_router, log_app_bind, log_app_start, log_source_selected, LoggingConfig, MockDataset,
    RequestContext,
};
use tower::util::ServiceExt;
use tracing::dispatcher::with_default;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriter;

#[derive(Clone, Default)]
struct SharedWriter {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedWriter {
    fn output_string(&self) -> String {
        let bytes = self
            .inner
            .lock()
            .expect("writer lock should not be poisoned");
        String::from_utf8_lossy(&bytes).to_string()
    }
}

struct SharedWriterGuard {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl<'a> MakeWriter<'a> for SharedWriter {
    type Writer = SharedWriterGuard;

    fn make_writer(&'a self) -> Self::Writer {
        SharedWriterGuard {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Write for SharedWriterGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut out = self
            .inner
            .lock()
            .expect("writer lock should not be poisoned");
        out.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture_logs(max_level: Level, f: impl FnOnce()) -> String {
    let writer = SharedWriter::default();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_max_level(max_level)
        .with_writer(writer.clone())
        .finish();
    let dispatch = tracing::Dispatch::new(subscriber);

    with_default(&dispatch, f);
    writer.output_string()
}

fn mock_app(ctx: RequestContext) -> Router {
    app_router(Arc::new(ctx))
}

fn mock_ctx() -> RequestContext {
    RequestContext::new(MockDataset::embedded().expect("embedded dataset should load"))
}

/// Drives one GET through the router on a current-thread runtime so the
/// thread-local dispatcher sees every event.
fn get_status(app: Router, uri: &str) -> StatusCode {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("single-thread runtime should build");

    rt.block_on(async {
        app.oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("request should build"),
        )
        .await
        .expect("request should be served")
        .status()
    })
}

#[test]
fn server_lifecycle_helpers_emit_baseline_events() {
    let logs = capture_logs(Level::INFO, || {
        let cfg = LoggingConfig::default();
        log_app_start(&cfg);
        log_source_selected("mock", Some("database flag not set"));
        log_app_bind(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8787));
    });

    assert!(logs.contains("\"event\":\"app.start\""));
    assert!(logs.contains("\"event\":\"source.selected\""));
    assert!(logs.contains("\"event\":\"app.bind\""));
}

#[test]
fn teams_route_emits_http_teams_event() {
    let logs = capture_logs(Level::INFO, || {
        let status = get_status(mock_app(mock_ctx()), "/teams?sort=name_asc");
        assert_eq!(status, StatusCode::OK);
    });

    assert!(logs.contains("\"event\":\"http.teams.request\""));
}

#[test]
fn unknown_team_is_logged_as_not_found_not_error() {
    let logs = capture_logs(Level::INFO, || {
        let status = get_status(mock_app(mock_ctx()), "/teams/999");
        assert_eq!(status, StatusCode::NOT_FOUND);
    });

    assert!(logs.contains("\"event\":\"datasource.not_found\""));
    assert!(!logs.contains("\"event\":\"datasource.error\""));
}

#[test]
fn unreachable_database_emits_datasource_error() {
    let logs = capture_logs(Level::INFO, || {
        let mut ctx = mock_ctx();
        ctx.db_available = true;
        let status = get_status(mock_app(ctx), "/teams");
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    });

    assert!(logs.contains("\"event\":\"datasource.error\""));
    assert!(logs.contains("database not configured"));
}

#[test]
fn provider_failure_emits_provider_error() {
    let logs = capture_logs(Level::INFO, || {
        let status = get_status(mock_app(mock_ctx()), "/footystats/leagues");
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    });

    assert!(logs.contains("\"event\":\"provider.error\""));
    assert!(logs.contains("\"provider\":\"footystats\""));
    assert!(logs.contains("API key not configured"));
}
