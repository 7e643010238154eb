use super::client::BackendClient;
use super::decode;
use crate::config::AppConfig;
use crate::errors::EngineResult;
use crate::state::{AgentRecordSet, AppState, EngineEvent};
use portable_atomic::Ordering;
use std::sync::Arc;

/// Polls the backend for the agent roster and each agent's performance
/// records over the lookback window, then hands one normalized batch to the
/// engine per cycle.
///
/// Error handling is deliberately plain: a failed cycle (or a failed agent
/// within a cycle) is logged and skipped, and the previous snapshot stays up
/// until the next interval.
pub async fn run_performance_poller(
    config: AppConfig,
    client: BackendClient,
    state: Arc<AppState>,
) {
    tracing::info!(
        interval_secs = config.poll_interval_secs,
        lookback_days = config.lookback_days,
        "performance poller started"
    );

    let mut interval =
        tokio::time::interval(tokio::time::Duration::from_secs(config.poll_interval_secs));

    loop {
        interval.tick().await;

        match poll_once(&config, &client, &state).await {
            Ok(series) => {
                state.counters.polls_completed.fetch_add(1, Ordering::Relaxed);

                if state
                    .engine_tx
                    .send(EngineEvent::SeriesFetched(series))
                    .await
                    .is_err()
                {
                    tracing::error!("engine channel closed, poller shutting down");
                    return;
                }
            }
            Err(e) => {
                state.counters.polls_failed.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(error = %e, "poll cycle failed, keeping previous snapshot");
            }
        }
    }
}

async fn poll_once(
    config: &AppConfig,
    client: &BackendClient,
    state: &Arc<AppState>,
) -> EngineResult<Vec<AgentRecordSet>> {
    let roster = client.get_agents().await?.into_agents();

    let end = chrono::Utc::now().date_naive();
    let start = end - chrono::Days::new(config.lookback_days as u64);

    let mut series = Vec::with_capacity(roster.len());
    for agent in roster.iter().filter(|a| a.is_active()) {
        let agent_id = agent.id_str();
        if agent_id.is_empty() {
            tracing::debug!("skipping roster entry with no id");
            continue;
        }

        match client.get_performance(agent_id, Some(start), Some(end), None).await {
            Ok(envelope) => {
                let outcome = decode::normalize_records(envelope);
                if outcome.rejected > 0 {
                    tracing::warn!(
                        agent = agent_id,
                        rejected = outcome.rejected,
                        "dropped malformed performance records"
                    );
                    state
                        .counters
                        .records_rejected
                        .fetch_add(outcome.rejected as u64, Ordering::Relaxed);
                }
                state
                    .counters
                    .records_ingested
                    .fetch_add(outcome.records.len() as u64, Ordering::Relaxed);

                series.push(AgentRecordSet {
                    agent_id: agent_id.to_string(),
                    agent_name: agent.display_name().to_string(),
                    records: outcome.records,
                });
            }
            // One bad agent must not sink the cycle; fetch the rest.
            Err(e) => {
                tracing::warn!(agent = agent_id, error = %e, "performance fetch failed")
            }
        }
    }

    Ok(series)
}
