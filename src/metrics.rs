//! Prometheus metrics: HTTP traffic plus a handful of gradebook events.
//!
//! Everything here is a no-op when `OBSERVABILITY_ENABLED` is `false` or
//! `0`, and also when no recorder has been installed (as in tests).

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

const LATENCY_BUCKETS: [f64; 10] = [0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0];
const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

static ENABLED: OnceLock<bool> = OnceLock::new();

pub fn is_observability_enabled() -> bool {
    *ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0"))
            .unwrap_or(true)
    })
}

/// Returns `Ok(None)` when observability is disabled.
pub fn init_metrics() -> anyhow::Result<Option<PrometheusHandle>> {
    if !is_observability_enabled() {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &LATENCY_BUCKETS,
        )?
        .install_recorder()?;

    let upkeep = handle.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(UPKEEP_INTERVAL);
        loop {
            ticker.tick().await;
            upkeep.run_upkeep();
        }
    });

    Ok(Some(handle))
}

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let started = Instant::now();
    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| req.uri().path(), MatchedPath::as_str)
        .to_string();

    let active = gauge!("http_requests_active");
    active.increment(1.0);
    let response = next.run(req).await;
    active.decrement(1.0);

    let status = response.status().as_u16().to_string();
    histogram!("http_request_duration_seconds", "method" => method.clone(), "path" => route.clone())
        .record(started.elapsed().as_secs_f64());
    counter!("http_requests_total", "method" => method, "path" => route, "status" => status)
        .increment(1);

    response
}

pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

/// Countable things that happen in the gradebook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BusinessEvent<'a> {
    UserRegistered { role: &'a str },
    LoginSucceeded { role: &'a str },
    LoginFailed,
    CourseCreated,
    Enrollment { action: &'static str },
    GradesChanged { action: &'static str, count: u64 },
    ReportGenerated { kind: &'static str },
    AccessDenied { role: &'a str },
}

pub fn record(event: BusinessEvent<'_>) {
    if !is_observability_enabled() {
        return;
    }

    match event {
        BusinessEvent::UserRegistered { role } => {
            counter!("users_registered_total", "role" => role.to_string()).increment(1)
        }
        BusinessEvent::LoginSucceeded { role } => {
            counter!("user_logins_total", "role" => role.to_string(), "status" => "success")
                .increment(1)
        }
        BusinessEvent::LoginFailed => {
            counter!("user_logins_total", "role" => "unknown", "status" => "failure").increment(1)
        }
        BusinessEvent::CourseCreated => counter!("courses_created_total").increment(1),
        BusinessEvent::Enrollment { action } => {
            counter!("enrollments_total", "action" => action).increment(1)
        }
        BusinessEvent::GradesChanged { action, count } => {
            counter!("grades_changed_total", "action" => action).increment(count)
        }
        BusinessEvent::ReportGenerated { kind } => {
            counter!("reports_generated_total", "kind" => kind).increment(1)
        }
        BusinessEvent::AccessDenied { role } => {
            counter!("authorization_denied_total", "role" => role.to_string()).increment(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_without_recorder_is_noop() {
        record(BusinessEvent::CourseCreated);
        record(BusinessEvent::GradesChanged {
            action: "deleted",
            count: 3,
        });
    }
}
