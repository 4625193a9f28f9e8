// [libs/domain/orchestrator/src/replace.rs]
//! Replace-brigadier flow (spec §4.7 Replace): re-credentials a brigade in
//! place without touching its addresses or domain binding.

use crate::command::{replace_command, ReplaceFlavors};
use crate::errors::OrchestratorError;
use realm_db::AllocatorRepository;
use realm_models::BrigadeConfig;
use realm_pair_agent::{HostKeyPolicy, PairAgentClient};
use tracing::instrument;
use uuid::Uuid;

#[instrument(skip(allocator, agent, flavors), fields(brigade_id = %brigade_id))]
pub async fn replace_brigadier<P: HostKeyPolicy>(
    allocator: &AllocatorRepository,
    agent: &PairAgentClient<P>,
    brigade_id: Uuid,
    flavors: &ReplaceFlavors,
) -> Result<BrigadeConfig, OrchestratorError> {
    // Step 1: fetch the brigade's control address.
    let mutation = allocator.fetch_for_mutation(brigade_id).await?;

    // Step 2: invoke the pair-agent's `replace` and parse the new configs.
    let command = replace_command(brigade_id, flavors);
    let output = agent.invoke(mutation.control_ip, &command, None).await?;
    let decoded = output.dechunked_stdout()?;
    let configs: BrigadeConfig = serde_json::from_slice(&decoded)?;

    Ok(configs)
}
