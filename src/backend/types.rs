use serde::{Deserialize, Serialize};

// ── Agent roster ──

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentInfo {
    #[serde(alias = "agentId", alias = "agent_id")]
    pub id: Option<String>,
    #[serde(alias = "agentName", alias = "agent_name", alias = "displayName")]
    pub name: Option<String>,
    pub status: Option<String>,
    pub team: Option<String>,
    pub created_at: Option<String>,
}

impl AgentInfo {
    #[inline]
    pub fn id_str(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }

    /// Display name for charts; falls back to the id when the backend
    /// omits the name field.
    #[inline]
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.id_str(),
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        // A missing status means the backend predates the field; treat as active.
        matches!(self.status.as_deref(), None | Some("active") | Some("enabled"))
    }
}

// ── Raw performance records (wire shape) ──

/// One row as the backend sends it. Every field is optional; normalization
/// into the canonical record happens in `decode`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPerformanceRecord {
    pub date: Option<String>,
    #[serde(alias = "total_runs")]
    pub total_runs: Option<f64>,
    #[serde(alias = "success_rate")]
    pub success_rate: Option<f64>,
    #[serde(alias = "avg_duration")]
    pub avg_duration: Option<f64>,
    #[serde(alias = "total_cost")]
    pub total_cost: Option<f64>,
}

// ── Response envelopes ──

/// The backend is loosely shaped: depending on the endpoint revision, record
/// lists arrive bare or wrapped under one of several keys. Decoding picks
/// whichever shape matches; everything downstream of `decode` sees only the
/// canonical record type.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RecordsEnvelope {
    Bare(Vec<RawPerformanceRecord>),
    Data { data: Vec<RawPerformanceRecord> },
    Records { records: Vec<RawPerformanceRecord> },
    Performance { performance: Vec<RawPerformanceRecord> },
}

impl RecordsEnvelope {
    pub fn into_raw(self) -> Vec<RawPerformanceRecord> {
        match self {
            Self::Bare(rows) => rows,
            Self::Data { data } => data,
            Self::Records { records } => records,
            Self::Performance { performance } => performance,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AgentsEnvelope {
    Bare(Vec<AgentInfo>),
    Agents { agents: Vec<AgentInfo> },
    Data { data: Vec<AgentInfo> },
}

impl AgentsEnvelope {
    pub fn into_agents(self) -> Vec<AgentInfo> {
        match self {
            Self::Bare(agents) => agents,
            Self::Agents { agents } => agents,
            Self::Data { data } => data,
        }
    }
}
