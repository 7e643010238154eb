use crate::errors::{EngineError, EngineResult};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend_base_url: String,
    pub backend_api_token: String,
    pub backend_org_id: Option<String>,
    pub poll_interval_secs: u64,
    pub lookback_days: u32,
    pub server_port: u16,
}

impl AppConfig {
    pub fn from_env() -> EngineResult<Self> {
        dotenvy::dotenv().ok();

        let poll_interval_secs = env_var_or("POLL_INTERVAL_SECS", "300")
            .parse::<u64>()
            .map_err(|e| EngineError::Config(format!("POLL_INTERVAL_SECS: {e}")))?;
        if poll_interval_secs == 0 {
            return Err(EngineError::Config("POLL_INTERVAL_SECS must be positive".into()));
        }

        let lookback_days = env_var_or("LOOKBACK_DAYS", "30")
            .parse::<u32>()
            .map_err(|e| EngineError::Config(format!("LOOKBACK_DAYS: {e}")))?;

        let server_port = env_var_or("SERVER_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| EngineError::Config(format!("SERVER_PORT: {e}")))?;

        Ok(Self {
            backend_base_url: env_var("BACKEND_BASE_URL")?,
            backend_api_token: env_var("BACKEND_API_TOKEN")?,
            backend_org_id: std::env::var("BACKEND_ORG_ID").ok().filter(|v| !v.is_empty()),
            poll_interval_secs,
            lookback_days,
            server_port,
        })
    }
}

fn env_var(key: &str) -> EngineResult<String> {
    std::env::var(key).map_err(|_| EngineError::Config(format!("missing env var: {key}")))
}

fn env_var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
