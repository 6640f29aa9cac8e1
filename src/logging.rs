use anyhow::Context;
use axum::{
    extract::{MatchedPath, Request},
    http::{Method, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

const LOG_DIR: &str = "storage/logs";

/// Fields shared by the start and end lines of one request.
struct RequestLog {
    id: Uuid,
    method: Method,
    route: String,
    started: Instant,
}

impl RequestLog {
    fn start(req: &Request) -> Self {
        // Matched route keeps ids out of the path label
        let route = req
            .extensions()
            .get::<MatchedPath>()
            .map_or_else(|| req.uri().path(), MatchedPath::as_str)
            .to_string();

        let log = Self {
            id: Uuid::new_v4(),
            method: req.method().clone(),
            route,
            started: Instant::now(),
        };
        info!(request_id = %log.id, method = %log.method, path = %log.route, "Incoming request");
        log
    }

    fn finish(self, status: StatusCode) {
        let latency_ms = self.started.elapsed().as_millis();
        let status_code = status.as_u16();

        if status.is_server_error() {
            error!(request_id = %self.id, method = %self.method, path = %self.route, status = status_code, latency_ms, "Server error");
        } else if status.is_client_error() {
            warn!(request_id = %self.id, method = %self.method, path = %self.route, status = status_code, latency_ms, "Client error");
        } else {
            info!(request_id = %self.id, method = %self.method, path = %self.route, status = status_code, latency_ms, "Request completed");
        }
    }
}

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let log = RequestLog::start(&req);
    let response = next.run(req).await;
    log.finish(response.status());
    response
}

fn default_console_filter() -> EnvFilter {
    EnvFilter::new(format!(
        "{}=info,tower_http=warn,sqlx=warn,axum::rejection=trace",
        env!("CARGO_CRATE_NAME")
    ))
}

/// Installs the global subscriber.
///
/// - console: compact, filtered by `RUST_LOG`
/// - `storage/logs/gradebook.log`: errors only, rotated daily
/// - `storage/logs/gradebook.json`: info and above as JSON, rotated daily
pub fn init_tracing() -> anyhow::Result<()> {
    std::fs::create_dir_all(LOG_DIR).context("Failed to create logs directory")?;

    let console = fmt::layer()
        .compact()
        .with_target(false)
        .with_line_number(true)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_console_filter()));

    let errors = fmt::layer()
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(RollingFileAppender::new(
            Rotation::DAILY,
            LOG_DIR,
            "gradebook.log",
        ))
        .with_filter(EnvFilter::new("error"));

    let json = fmt::layer()
        .json()
        .with_current_span(true)
        .with_writer(RollingFileAppender::new(
            Rotation::DAILY,
            LOG_DIR,
            "gradebook.json",
        ))
        .with_filter(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(console)
        .with(errors)
        .with(json)
        .try_init()
        .context("Failed to install tracing subscriber")
}
