// [libs/domain/models/src/snapshot.rs]
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One brigade's encrypted backup blob, as returned by a pair's
/// `fetchsnaps` invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedBrigade {
    pub brigade_id: Uuid,
    pub encrypted_blob_base64: String,
}

/// The per-pair `fetchsnaps` JSON result, before cross-pair aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingSnaps {
    pub snaps: Vec<EncryptedBrigade>,
    pub total_count: i64,
    pub errors_count: i64,
}

/// The aggregated, atomically-published snapshot file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedSnaps {
    pub snaps: Vec<EncryptedBrigade>,
    pub total_count: i64,
    pub errors_count: i64,
    pub encrypted_psk_base64: String,
    pub update_time: DateTime<Utc>,
}

impl AggregatedSnaps {
    pub fn new(encrypted_psk_base64: String) -> Self {
        Self {
            snaps: Vec::new(),
            total_count: 0,
            errors_count: 0,
            encrypted_psk_base64,
            update_time: Utc::now(),
        }
    }

    /// Folds one pair's (possibly count-corrected) result into the running
    /// aggregate.
    pub fn absorb(&mut self, incoming: IncomingSnaps) {
        self.total_count += incoming.total_count;
        self.errors_count += incoming.errors_count;
        self.snaps.extend(incoming.snaps);
    }
}

/// Corrects a pair's reported counts against how many ids were actually
/// requested from it: mismatches inflate `errors_count` rather than being
/// silently dropped (spec §4.8 step 4).
pub fn normalize_reported_counts(mut incoming: IncomingSnaps, requested_count: i64) -> IncomingSnaps {
    if incoming.total_count != requested_count {
        let delta = requested_count - incoming.total_count;
        incoming.errors_count += delta.max(0);
        incoming.total_count = requested_count;
    }
    incoming
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_short_counts_into_errors() {
        let incoming = IncomingSnaps {
            snaps: vec![],
            total_count: 3,
            errors_count: 0,
        };
        let normalized = normalize_reported_counts(incoming, 5);
        assert_eq!(normalized.total_count, 5);
        assert_eq!(normalized.errors_count, 2);
    }

    #[test]
    fn aggregate_invariant_errors_equals_total_minus_snaps() {
        let mut agg = AggregatedSnaps::new("epsk".to_string());
        agg.absorb(IncomingSnaps {
            snaps: vec![EncryptedBrigade {
                brigade_id: Uuid::from_u128(1),
                encrypted_blob_base64: "abc".to_string(),
            }],
            total_count: 3,
            errors_count: 2,
        });
        assert_eq!(agg.total_count, 3);
        assert_eq!(agg.errors_count, agg.total_count - agg.snaps.len() as i64);
    }
}
