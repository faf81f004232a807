//! Strategy 2: aging the entries of a departed neighbor.
//!
//! Once a neighbor has been gone long enough, every value that routes
//! through it decays exponentially in the time elapsed since the session
//! ended, down to a floor.

use std::collections::HashMap;

use ferry_ens::{ConnectionLedger, ConnectionRecord, NodeId};
use tracing::debug;

use crate::{LearningParams, ValueTable};

/// Age every entry using `next_hop`, given the host's record of the
/// connection to it.
///
/// Does nothing if the connection is unknown, still active, or ended less
/// than `aging_min_elapsed` ago. Returns `true` only if at least one entry
/// was aged.
pub fn age_next_hop(
    table: &mut ValueTable,
    next_hop: NodeId,
    connection: Option<&ConnectionRecord>,
    now: f64,
    params: &LearningParams,
) -> bool {
    let Some(elapsed) = connection.and_then(|record| record.elapsed_since_end(now)) else {
        return false;
    };
    if elapsed < params.aging_min_elapsed {
        return false;
    }

    let factor = params.aging_decay.powf(elapsed);
    let mut aged = 0usize;
    for (_, actions) in table.entries_mut() {
        if let Some(value) = actions.get_mut(&next_hop) {
            *value = (*value * factor).max(params.aging_floor);
            aged += 1;
        }
    }

    if aged > 0 {
        debug!(
            "node {}: aged {} entries via {} after {:.0}s",
            table.owner(),
            aged,
            next_hop,
            elapsed
        );
    }
    aged > 0
}

/// Neighbors waiting for their entries to age.
#[derive(Debug, Clone, Default)]
pub struct AgingScheduler {
    /// neighbor → end of its last session
    pending: HashMap<NodeId, f64>,
}

impl AgingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `neighbor`, overwriting any earlier end time.
    pub fn schedule(&mut self, neighbor: NodeId, end_time: f64) {
        self.pending.insert(neighbor, end_time);
    }

    /// Age every pending neighbor whose threshold has passed.
    ///
    /// A neighbor leaves the queue only once aging was actually applied to
    /// at least one entry. Returns the neighbors that were aged.
    pub fn run(
        &mut self,
        table: &mut ValueTable,
        host: NodeId,
        ledger: &ConnectionLedger,
        now: f64,
        params: &LearningParams,
    ) -> Vec<NodeId> {
        let due: Vec<NodeId> = self
            .pending
            .iter()
            .filter(|(_, end)| now - **end >= params.aging_min_elapsed)
            .map(|(id, _)| *id)
            .collect();

        let mut aged = Vec::new();
        for neighbor in due {
            let connection = ledger.get(host, neighbor);
            if age_next_hop(table, neighbor, connection, now, params) {
                self.pending.remove(&neighbor);
                aged.push(neighbor);
            }
        }
        aged
    }

    pub fn is_pending(&self, neighbor: &NodeId) -> bool {
        self.pending.contains_key(neighbor)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
