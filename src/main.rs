mod analytics;
mod backend;
mod config;
mod errors;
mod server;
mod state;

use crate::analytics::aggregate::compute_aggregate_stats;
use crate::analytics::daily::compute_daily_summaries;
use crate::state::*;
use portable_atomic::Ordering;
use std::sync::Arc;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() {
    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("agent_pulse engine starting");

    // Load config
    let cfg = match config::AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    // Create bounded channel into the engine
    let (engine_tx, engine_rx) = mpsc::channel::<EngineEvent>(256);

    // Create shared state
    let app_state = AppState::new(cfg.clone(), engine_tx.clone());

    let session = backend::client::BackendSession::from_config(&cfg);
    let backend_client = backend::client::BackendClient::new(session);

    // ── Spawn tasks ──

    // 1. Performance poller task
    let poller_cfg = cfg.clone();
    let poller_state = app_state.clone();
    tokio::spawn(async move {
        backend::poller::run_performance_poller(poller_cfg, backend_client, poller_state).await;
    });

    // 2. Engine task (recompute analytics on every fetched batch)
    let engine_state = app_state.clone();
    let engine_cfg = cfg.clone();
    tokio::spawn(async move {
        run_engine(engine_state, engine_cfg, engine_rx).await;
    });

    // 3. Axum HTTP + WS server
    let server_state = app_state.clone();
    let port = cfg.server_port;

    let app = axum::Router::new()
        .route("/api/snapshot", axum::routing::get(server::routes::get_snapshot))
        .route("/api/summary", axum::routing::get(server::routes::get_summary))
        .route("/api/stats", axum::routing::get(server::routes::get_stats))
        .route("/api/comparison", axum::routing::get(server::routes::get_comparison))
        .route("/api/counters", axum::routing::get(server::routes::get_counters))
        .route("/ws", axum::routing::get(server::ws::ws_handler))
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .with_state(server_state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!("server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("bind error: {e}");
            std::process::exit(1);
        });

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
    }
}

/// Core engine loop. Receives fetched record batches, reruns the pure
/// analytics pipeline, and publishes the result. No locks, no IO in the
/// computation itself.
async fn run_engine(
    state: Arc<AppState>,
    config: config::AppConfig,
    mut rx: mpsc::Receiver<EngineEvent>,
) {
    tracing::info!("engine task started");

    let mut engine_state = EngineState::Connecting;

    while let Some(event) = rx.recv().await {
        match event {
            EngineEvent::SeriesFetched(series) => {
                if engine_state == EngineState::Connecting {
                    engine_state = EngineState::Serving;
                    tracing::info!(agents = series.len(), "first fetch complete, entering Serving");
                    state.broadcast(WsMessage::EngineStateMsg {
                        state: "serving".into(),
                        reason: "first fetch complete".into(),
                    });
                }

                let snapshot = build_snapshot(engine_state, &series, config.lookback_days);

                for agent in &snapshot.agents {
                    state.broadcast(WsMessage::AgentUpdate {
                        agent_id: agent.agent_id.clone(),
                        agent_name: agent.agent_name.clone(),
                        stats: agent.stats,
                        days: agent.daily.len(),
                    });
                }
                state.broadcast(WsMessage::SnapshotRefresh {
                    generated_at: snapshot.generated_at.clone(),
                    agent_count: snapshot.agents.len(),
                    fleet_stats: snapshot.fleet_stats,
                });

                tracing::info!(
                    agents = snapshot.agents.len(),
                    fleet_runs = snapshot.fleet_stats.total_runs,
                    "snapshot published"
                );

                let _ = state.snapshot_tx.send(snapshot);
                state.counters.snapshots_published.fetch_add(1, Ordering::Relaxed);
            }

            EngineEvent::Shutdown => {
                engine_state = EngineState::Halted;
                tracing::info!(state = %engine_state, "shutdown event received");
                return;
            }
        }
    }

    tracing::info!("engine task shutting down");
}

/// Run the full pipeline over one poll cycle's batches: per-agent daily
/// summaries and rollups, plus fleet-wide figures over the flattened
/// record set.
fn build_snapshot(
    engine_state: EngineState,
    series: &[AgentRecordSet],
    window_days: u32,
) -> AnalyticsSnapshot {
    let mut agents = Vec::with_capacity(series.len());
    let mut all_records = Vec::new();

    for set in series {
        let daily = compute_daily_summaries(&set.records);
        let stats = compute_aggregate_stats(&daily);
        all_records.extend_from_slice(&set.records);
        agents.push(AgentAnalytics {
            agent_id: set.agent_id.clone(),
            agent_name: set.agent_name.clone(),
            daily,
            stats,
        });
    }

    let fleet_daily = compute_daily_summaries(&all_records);
    let fleet_stats = compute_aggregate_stats(&fleet_daily);

    AnalyticsSnapshot {
        engine_state,
        generated_at: chrono::Utc::now().to_rfc3339(),
        window_days,
        agents,
        fleet_daily,
        fleet_stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::PerformanceRecord;

    fn record(date: &str, runs: u64, rate: f64) -> PerformanceRecord {
        PerformanceRecord {
            date: date.parse().unwrap(),
            total_runs: runs,
            success_rate: rate,
            avg_duration_secs: 2.0,
            total_cost: 1.0,
        }
    }

    #[test]
    fn test_build_snapshot_fleet_rollup() {
        let series = vec![
            AgentRecordSet {
                agent_id: "a1".into(),
                agent_name: "A".into(),
                records: vec![record("2024-01-01", 10, 90.0)],
            },
            AgentRecordSet {
                agent_id: "b1".into(),
                agent_name: "B".into(),
                records: vec![record("2024-01-01", 10, 70.0), record("2024-01-02", 5, 100.0)],
            },
        ];

        let snapshot = build_snapshot(EngineState::Serving, &series, 30);

        assert_eq!(snapshot.agents.len(), 2);
        assert_eq!(snapshot.agents[0].stats.total_runs, 10);
        assert_eq!(snapshot.agents[1].stats.total_runs, 15);

        // Fleet view groups both agents' 2024-01-01 records into one day.
        assert_eq!(snapshot.fleet_daily.len(), 2);
        assert_eq!(snapshot.fleet_daily[0].total_runs, 20);
        assert_eq!(snapshot.fleet_daily[0].success_rate, 80.0);
        assert_eq!(snapshot.fleet_stats.total_runs, 25);
        assert_eq!(snapshot.window_days, 30);
    }

    #[test]
    fn test_build_snapshot_empty_cycle() {
        let snapshot = build_snapshot(EngineState::Serving, &[], 30);
        assert!(snapshot.agents.is_empty());
        assert!(snapshot.fleet_daily.is_empty());
        assert_eq!(snapshot.fleet_stats.total_runs, 0);
    }
}
