use crate::analytics::{AggregateStats, DailySummary, PerformanceRecord};
use crate::config::AppConfig;
use portable_atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};

// ── Engine lifecycle ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    Connecting,
    Serving,
    Halted,
}

impl std::fmt::Display for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connecting => write!(f, "connecting"),
            Self::Serving => write!(f, "serving"),
            Self::Halted => write!(f, "halted"),
        }
    }
}

// ── Messages INTO the engine (bounded channel) ──

/// One poll cycle's normalized records for a single agent.
#[derive(Debug, Clone)]
pub struct AgentRecordSet {
    pub agent_id: String,
    pub agent_name: String,
    pub records: Vec<PerformanceRecord>,
}

#[derive(Debug, Clone)]
pub enum EngineEvent {
    SeriesFetched(Vec<AgentRecordSet>),
    Shutdown,
}

// ── Messages OUT of the engine ──

#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "type")]
pub enum WsMessage {
    #[serde(rename = "snapshot_refresh")]
    SnapshotRefresh {
        generated_at: String,
        agent_count: usize,
        fleet_stats: AggregateStats,
    },

    #[serde(rename = "agent_update")]
    AgentUpdate {
        agent_id: String,
        agent_name: String,
        stats: AggregateStats,
        days: usize,
    },

    #[serde(rename = "engine_state")]
    EngineStateMsg { state: String, reason: String },
}

// ── Computed analytics per agent ──

#[derive(Debug, Clone, serde::Serialize)]
pub struct AgentAnalytics {
    pub agent_id: String,
    pub agent_name: String,
    pub daily: Vec<DailySummary>,
    pub stats: AggregateStats,
}

// ── Snapshot for dashboard reads (sent via watch channel) ──

#[derive(Debug, Clone, serde::Serialize)]
pub struct AnalyticsSnapshot {
    pub engine_state: EngineState,
    pub generated_at: String,
    pub window_days: u32,
    pub agents: Vec<AgentAnalytics>,
    pub fleet_daily: Vec<DailySummary>,
    pub fleet_stats: AggregateStats,
}

impl Default for AnalyticsSnapshot {
    fn default() -> Self {
        Self {
            engine_state: EngineState::Connecting,
            generated_at: String::new(),
            window_days: 0,
            agents: Vec::new(),
            fleet_daily: Vec::new(),
            fleet_stats: AggregateStats::default(),
        }
    }
}

// ── Performance counters (lock-free) ──

pub struct PerfCounters {
    pub polls_completed: AtomicU64,
    pub polls_failed: AtomicU64,
    pub records_ingested: AtomicU64,
    pub records_rejected: AtomicU64,
    pub snapshots_published: AtomicU64,
    pub ws_messages_sent: AtomicU64,
}

impl PerfCounters {
    pub fn new() -> Self {
        Self {
            polls_completed: AtomicU64::new(0),
            polls_failed: AtomicU64::new(0),
            records_ingested: AtomicU64::new(0),
            records_rejected: AtomicU64::new(0),
            snapshots_published: AtomicU64::new(0),
            ws_messages_sent: AtomicU64::new(0),
        }
    }
}

// ── Application shared state (channels, not locks) ──

pub struct AppState {
    pub config: AppConfig,

    // Engine -> Dashboard: latest snapshot (watch = single producer, multi consumer)
    pub snapshot_tx: watch::Sender<AnalyticsSnapshot>,
    pub snapshot_rx: watch::Receiver<AnalyticsSnapshot>,

    // Engine -> Dashboard: event stream (broadcast for WS clients)
    pub ws_tx: broadcast::Sender<WsMessage>,

    // Poller -> Engine: bounded event channel
    pub engine_tx: mpsc::Sender<EngineEvent>,

    // Lock-free performance counters
    pub counters: PerfCounters,
}

impl AppState {
    pub fn new(config: AppConfig, engine_tx: mpsc::Sender<EngineEvent>) -> Arc<Self> {
        let (ws_tx, _) = broadcast::channel(1024);
        let (snapshot_tx, snapshot_rx) = watch::channel(AnalyticsSnapshot::default());

        Arc::new(Self {
            config,
            snapshot_tx,
            snapshot_rx,
            ws_tx,
            engine_tx,
            counters: PerfCounters::new(),
        })
    }

    #[inline]
    pub fn broadcast(&self, msg: WsMessage) {
        self.counters.ws_messages_sent.fetch_add(1, Ordering::Relaxed);
        let _ = self.ws_tx.send(msg);
    }
}
