use super::types::{AgentsEnvelope, RecordsEnvelope};
use crate::config::AppConfig;
use crate::errors::{EngineError, EngineResult};
use chrono::NaiveDate;
use reqwest::Client;

/// Session context for backend calls: base URL, bearer token, and the
/// optional organization scope. Built once from config and threaded into the
/// client -- nothing downstream of the boundary reads session state.
#[derive(Debug, Clone)]
pub struct BackendSession {
    pub base_url: String,
    pub api_token: String,
    pub org_id: Option<String>,
}

impl BackendSession {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.backend_base_url.trim_end_matches('/').to_string(),
            api_token: config.backend_api_token.clone(),
            org_id: config.backend_org_id.clone(),
        }
    }
}

/// Backend REST client. All methods return Result, never panic.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    session: BackendSession,
}

impl BackendClient {
    pub fn new(session: BackendSession) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .pool_max_idle_per_host(4)
                .build()
                .unwrap_or_default(),
            session,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> EngineResult<T> {
        let url = format!("{}{}", self.session.base_url, path);
        let mut request = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.session.api_token));
        if let Some(org) = &self.session.org_id {
            request = request.header("X-Org-Id", org);
        }

        let resp = request.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(EngineError::BackendApi {
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<T>().await.map_err(|e| EngineError::Parse(format!("GET {path}: {e}")))
    }

    /// GET /agents -- the roster of agents to track.
    pub async fn get_agents(&self) -> EngineResult<AgentsEnvelope> {
        self.get_json("/agents").await
    }

    /// GET /agents/{id}/performance -- raw per-day records for one agent.
    pub async fn get_performance(
        &self,
        agent_id: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        limit: Option<u32>,
    ) -> EngineResult<RecordsEnvelope> {
        let mut parts: smallvec::SmallVec<[String; 3]> = smallvec::SmallVec::new();
        if let Some(s) = start { parts.push(format!("start={s}")); }
        if let Some(e) = end { parts.push(format!("end={e}")); }
        if let Some(l) = limit { parts.push(format!("limit={l}")); }
        let query = if parts.is_empty() { String::new() } else { format!("?{}", parts.join("&")) };
        self.get_json(&format!("/agents/{agent_id}/performance{query}")).await
    }
}
