// [libs/infra/snapshot/src/collector.rs]
//! Fan-out collection and atomic publish (spec §4.8, §5), grounded on
//! `examples/original_source/cmd/collectsnaps/collect.go` (per-pair
//! command + retry loop) and `examples/original_source/internal/snap/handle.go`
//! (single consumer, atomic hard-link publish, closing the channel signals
//! completion).

use crate::command::fetchsnaps_command;
use crate::errors::SnapshotError;
use crate::psk::GeneratedPsk;
use ipnet::Ipv4Net;
use realm_db::{SnapshotBrigadeRow, SnapshotRepository};
use realm_models::snapshot::{normalize_reported_counts, AggregatedSnaps, IncomingSnaps};
use realm_pair_agent::{HostKeyPolicy, PairAgentClient};
use std::collections::BTreeMap;
use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use uuid::Uuid;

const SEMAPHORE_WIDTH: usize = 16;
const CHANNEL_CAPACITY: usize = 16;
const FETCH_RETRIES: u32 = 3;

pub struct CollectionRequest<'a> {
    pub tag: &'a str,
    pub realm_fp: &'a str,
    pub stime: i64,
    pub maintenance_mode: bool,
    pub endpoint_filter: Option<Ipv4Net>,
}

/// One pair's worth of work: its control IP (the SSH dial target) and the
/// brigade ids it hosts.
struct PairWork {
    control_ip: IpAddr,
    brigade_ids: Vec<Uuid>,
}

fn group_by_pair(rows: Vec<SnapshotBrigadeRow>, endpoint_filter: Option<Ipv4Net>) -> Vec<PairWork> {
    let mut by_pair: BTreeMap<Uuid, PairWork> = BTreeMap::new();

    for row in rows {
        if let Some(net) = endpoint_filter {
            if !net.contains(&row.endpoint_ipv4) {
                continue;
            }
        }

        by_pair
            .entry(row.pair_id)
            .or_insert_with(|| PairWork { control_ip: row.control_ip, brigade_ids: Vec::new() })
            .brigade_ids
            .push(row.brigade_id);
    }

    by_pair.into_values().collect()
}

async fn fetch_with_retries<P: HostKeyPolicy>(
    agent: &PairAgentClient<P>,
    work: &PairWork,
    command: &str,
    stdin: &[u8],
) -> IncomingSnaps {
    let requested = work.brigade_ids.len() as i64;

    for attempt in 1..=FETCH_RETRIES {
        let outcome = match agent.invoke(work.control_ip, command, Some(stdin)).await {
            Ok(output) => output
                .dechunked_stdout()
                .map_err(|e| e.to_string())
                .and_then(|bytes| serde_json::from_slice::<IncomingSnaps>(&bytes).map_err(|e| e.to_string())),
            Err(e) => Err(e.to_string()),
        };

        match outcome {
            Ok(parsed) => return normalize_reported_counts(parsed, requested),
            Err(reason) if attempt < FETCH_RETRIES => {
                tracing::warn!(host = %work.control_ip, attempt, reason, "fetchsnaps attempt failed, retrying");
            }
            Err(reason) => {
                tracing::warn!(host = %work.control_ip, reason, "fetchsnaps attempt failed, giving up");
            }
        }
    }

    normalize_reported_counts(IncomingSnaps { snaps: Vec::new(), total_count: 0, errors_count: 0 }, requested)
}

/// Runs the full collection pass and returns the aggregate before it is
/// published — callers invoke [`publish_aggregate`] to install it.
pub async fn collect<P: HostKeyPolicy>(
    db: &SnapshotRepository,
    agent: Arc<PairAgentClient<P>>,
    psk: &GeneratedPsk,
    request: CollectionRequest<'_>,
) -> Result<AggregatedSnaps, SnapshotError> {
    let rows = db.brigades_by_pair().await?;
    let work_items = group_by_pair(rows, request.endpoint_filter);

    let semaphore = Arc::new(Semaphore::new(SEMAPHORE_WIDTH));
    let (tx, mut rx) = mpsc::channel::<IncomingSnaps>(CHANNEL_CAPACITY);

    let mut handles = Vec::with_capacity(work_items.len());
    for work in work_items {
        let semaphore = semaphore.clone();
        let agent = agent.clone();
        let tx = tx.clone();
        let command = fetchsnaps_command(request.tag, &work.brigade_ids, request.realm_fp, request.stime, request.maintenance_mode);
        let stdin = psk.psk_base64.clone();

        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.expect("semaphore is never closed");
            let incoming = fetch_with_retries(&agent, &work, &command, stdin.as_bytes()).await;
            let _ = tx.send(incoming).await;
        }));
    }
    drop(tx);

    let mut aggregate = AggregatedSnaps::new(psk.encrypted_psk_base64.clone());
    while let Some(incoming) = rx.recv().await {
        aggregate.absorb(incoming);
    }

    for handle in handles {
        let _ = handle.await;
    }

    Ok(aggregate)
}

/// Writes `<tag>.tmp`, hard-links it to `<tag>.json`, unlinks the temp file,
/// then deletes every other file in `output_dir` (spec §4.8 steps 5-6).
pub fn publish_aggregate(output_dir: &Path, tag: &str, aggregate: &AggregatedSnaps) -> Result<(), SnapshotError> {
    let final_path = output_dir.join(format!("{tag}.json"));
    let tmp_path = output_dir.join(format!("{tag}.tmp"));

    let encoded = serde_json::to_vec(aggregate)?;
    std::fs::write(&tmp_path, &encoded)?;

    if final_path.exists() {
        std::fs::remove_file(&final_path)?;
    }
    std::fs::hard_link(&tmp_path, &final_path)?;
    std::fs::remove_file(&tmp_path)?;

    for entry in std::fs::read_dir(output_dir)? {
        let entry = entry?;
        if entry.path() != final_path && entry.file_type()?.is_file() {
            std::fs::remove_file(entry.path())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use realm_models::snapshot::EncryptedBrigade;

    #[test]
    fn groups_rows_by_pair_and_respects_cidr_filter() {
        let pair_a = Uuid::from_u128(1);
        let pair_b = Uuid::from_u128(2);
        let rows = vec![
            SnapshotBrigadeRow {
                brigade_id: Uuid::from_u128(10),
                pair_id: pair_a,
                control_ip: "fd00::1".parse().unwrap(),
                endpoint_ipv4: "198.51.100.1".parse().unwrap(),
            },
            SnapshotBrigadeRow {
                brigade_id: Uuid::from_u128(11),
                pair_id: pair_b,
                control_ip: "fd00::2".parse().unwrap(),
                endpoint_ipv4: "203.0.113.1".parse().unwrap(),
            },
        ];

        let filter: Ipv4Net = "198.51.100.0/24".parse().unwrap();
        let grouped = group_by_pair(rows, Some(filter));

        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].brigade_ids, vec![Uuid::from_u128(10)]);
    }

    #[test]
    fn publish_replaces_previous_snapshot_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let aggregate = AggregatedSnaps::new("epsk".to_string());
        publish_aggregate(dir.path(), "2026-07-29", &aggregate).unwrap();
        assert!(dir.path().join("2026-07-29.json").exists());
        assert!(!dir.path().join("2026-07-29.tmp").exists());

        let mut second = AggregatedSnaps::new("epsk2".to_string());
        second.absorb(IncomingSnaps {
            snaps: vec![EncryptedBrigade { brigade_id: Uuid::from_u128(1), encrypted_blob_base64: "x".to_string() }],
            total_count: 1,
            errors_count: 0,
        });
        publish_aggregate(dir.path(), "2026-07-30", &second).unwrap();

        // Rotation deletes the previous tag's file.
        assert!(!dir.path().join("2026-07-29.json").exists());
        assert!(dir.path().join("2026-07-30.json").exists());
    }
}
