use crate::analytics::comparison::{
    compute_agent_comparison, AgentDailySeries, ComparisonMetric, FillStrategy,
};
use crate::state::{AnalyticsSnapshot, AppState};
use axum::extract::{Query, State};
use axum::response::Json;
use std::sync::Arc;

#[derive(serde::Deserialize)]
pub struct AgentQuery {
    pub agent: Option<String>,
}

#[derive(serde::Deserialize)]
pub struct ComparisonQuery {
    pub metric: Option<String>,
    pub fill: Option<String>,
}

/// GET /api/snapshot -- full analytics snapshot (from watch channel, no lock)
pub async fn get_snapshot(State(state): State<Arc<AppState>>) -> Json<AnalyticsSnapshot> {
    let snapshot = state.snapshot_rx.borrow().clone();
    Json(snapshot)
}

/// GET /api/summary?agent= -- one agent's daily summaries; fleet-wide when
/// `agent` is omitted. Unknown agents get an empty list, matching the
/// dashboard's empty-state render.
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AgentQuery>,
) -> Json<serde_json::Value> {
    let snapshot = state.snapshot_rx.borrow().clone();
    match params.agent.as_deref() {
        Some(id) => match snapshot.agents.iter().find(|a| a.agent_id == id) {
            Some(agent) => Json(serde_json::json!({
                "agent": &agent.agent_id,
                "summaries": &agent.daily,
            })),
            None => Json(serde_json::json!({ "agent": id, "summaries": [] })),
        },
        None => Json(serde_json::json!({
            "agent": serde_json::Value::Null,
            "summaries": snapshot.fleet_daily,
        })),
    }
}

/// GET /api/stats?agent= -- aggregate KPI rollup, per agent or fleet-wide.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AgentQuery>,
) -> Json<serde_json::Value> {
    let snapshot = state.snapshot_rx.borrow().clone();
    match params.agent.as_deref() {
        Some(id) => match snapshot.agents.iter().find(|a| a.agent_id == id) {
            Some(agent) => {
                Json(serde_json::json!({ "agent": &agent.agent_id, "stats": agent.stats }))
            }
            None => Json(serde_json::json!({ "agent": id, "stats": serde_json::Value::Null })),
        },
        None => Json(serde_json::json!({
            "agent": serde_json::Value::Null,
            "stats": snapshot.fleet_stats,
        })),
    }
}

/// GET /api/comparison?metric=&fill= -- multi-agent comparison table,
/// recomputed on demand from the snapshot's per-agent series. `metric`
/// defaults to success_rate; `fill` defaults per metric.
pub async fn get_comparison(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ComparisonQuery>,
) -> Json<serde_json::Value> {
    let metric = match params.metric.as_deref() {
        None => ComparisonMetric::SuccessRate,
        Some(s) => match ComparisonMetric::parse(s) {
            Some(m) => m,
            None => return Json(serde_json::json!({ "error": format!("unknown metric: {s}") })),
        },
    };
    let fill = match params.fill.as_deref() {
        None => metric.default_fill(),
        Some(s) => match FillStrategy::parse(s) {
            Some(f) => f,
            None => return Json(serde_json::json!({ "error": format!("unknown fill: {s}") })),
        },
    };

    let snapshot = state.snapshot_rx.borrow().clone();
    let series: Vec<AgentDailySeries> = snapshot
        .agents
        .iter()
        .map(|a| AgentDailySeries {
            agent_id: a.agent_id.clone(),
            agent_name: a.agent_name.clone(),
            data: a.daily.clone(),
        })
        .collect();

    let rows = compute_agent_comparison(&series, metric, fill);
    Json(serde_json::json!({ "metric": metric, "fill": fill, "rows": rows }))
}

/// GET /api/counters -- performance counters (lock-free reads)
pub async fn get_counters(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    use portable_atomic::Ordering::Relaxed;
    Json(serde_json::json!({
        "polls_completed": state.counters.polls_completed.load(Relaxed),
        "polls_failed": state.counters.polls_failed.load(Relaxed),
        "records_ingested": state.counters.records_ingested.load(Relaxed),
        "records_rejected": state.counters.records_rejected.load(Relaxed),
        "snapshots_published": state.counters.snapshots_published.load(Relaxed),
        "ws_messages_sent": state.counters.ws_messages_sent.load(Relaxed),
    }))
}
