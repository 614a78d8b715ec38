//! HTTP Server and Collection Schedule
//!
//! This module wires the exporter together: it binds the metrics endpoint once
//! and then polls the device on a fixed-rate schedule.
//!
//! # Endpoints
//!
//! - `GET /` - HTML landing page with links to metrics and health
//! - `GET /metrics` - Prometheus metrics in text format
//! - `GET /health` - 200 if the last pass succeeded, 503 otherwise
//!
//! # Schedule
//!
//! Passes start at `start + k * interval`. A slow pass does not push later
//! passes back, and a pass that overruns its slot skips the missed ones.
//!
//! # Error Handling
//!
//! A failed pass is fatal: the loop stops, `shelly_up` drops to 0 and the error
//! propagates out of [`start`]. Restarting is left to the process supervisor.

use crate::collector::Collector;
use crate::config::Config;
use crate::metrics::MetricsRegistry;
use crate::shelly::ShellyClient;
use anyhow::Context;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::time::{Duration, Instant};
use tracing::{error, info};

#[derive(Clone)]
struct AppState {
    metrics: MetricsRegistry,
}

/// Fixed-rate deadlines anchored at a start instant
#[derive(Debug, Clone, Copy)]
pub struct FixedRateSchedule {
    start: Instant,
    interval: Duration,
}

impl FixedRateSchedule {
    pub fn new(start: Instant, interval: Duration) -> Self {
        Self {
            start,
            interval: interval.max(Duration::from_nanos(1)),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The first `start + k * interval` strictly after `now`
    pub fn next_deadline(&self, now: Instant) -> Instant {
        let elapsed = now.saturating_duration_since(self.start).as_nanos();
        let periods = elapsed / self.interval.as_nanos() + 1;
        let offset = u64::try_from(periods * self.interval.as_nanos()).unwrap_or(u64::MAX);
        self.start + Duration::from_nanos(offset)
    }
}

pub async fn start(config: Config) -> anyhow::Result<()> {
    let metrics = MetricsRegistry::new()?;
    let client = ShellyClient::new(&config.shelly)?;
    let collector = Collector::new(client, metrics.clone(), config.metrics.unknown_components)?;

    // Start the server
    let addr = format!("{}:{}", config.server.addr, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind metrics endpoint on {}", addr))?;

    info!("Metrics server listening on {}", addr);
    info!("Metrics available at http://{}/metrics", addr);

    let app = router(metrics);
    let server = tokio::spawn(async move { axum::serve(listener, app).await });

    let interval = Duration::from_secs(config.metrics.scrape_interval_seconds);
    tokio::select! {
        result = collect_metrics_loop(&collector, interval) => result,
        result = server => match result {
            Ok(Ok(())) => anyhow::bail!("Metrics server stopped unexpectedly"),
            Ok(Err(e)) => Err(anyhow::Error::new(e).context("Metrics server failed")),
            Err(e) => Err(anyhow::Error::new(e).context("Metrics server task panicked")),
        },
    }
}

/// Build the HTTP router serving `metrics`
pub fn router(metrics: MetricsRegistry) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(AppState { metrics })
}

/// Run passes until one fails
pub async fn collect_metrics_loop(collector: &Collector, interval: Duration) -> anyhow::Result<()> {
    let schedule = FixedRateSchedule::new(Instant::now(), interval);
    let metrics = collector.metrics();

    loop {
        let started = Instant::now();
        match collector.collect().await {
            Ok(_) => {
                metrics.up.set(1.0);
                metrics
                    .last_collection_duration_seconds
                    .set(started.elapsed().as_secs_f64());
            }
            Err(e) => {
                error!("Failed to collect metrics: {}", e);
                metrics.up.set(0.0);
                return Err(e.into());
            }
        }

        let deadline = schedule.next_deadline(Instant::now());
        tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
    }
}

async fn root_handler() -> impl IntoResponse {
    axum::response::Html(
        r#"<html>
<head><title>Shelly Exporter</title></head>
<body>
<h1>Shelly Prometheus Exporter</h1>
<p><a href="/metrics">Metrics</a></p>
<p><a href="/health">Health</a></p>
</body>
</html>"#,
    )
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(metrics) => metrics.into_response(),
        Err(e) => {
            error!("Failed to render metrics: {}", e);
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error rendering metrics: {}", e),
            )
                .into_response()
        }
    }
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let up_value = state.metrics.up.get();

    if up_value > 0.0 {
        (axum::http::StatusCode::OK, "OK")
    } else {
        (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            "Shelly device unreachable",
        )
    }
}
