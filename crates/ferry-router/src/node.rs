//! State owned by one node.

use ferry_ens::{EncounteredNodeSet, NodeId};
use ferry_qtable::{AgingScheduler, ValueTable};

use crate::messages::MessagePriorityTable;

/// Everything a single node keeps between encounters.
#[derive(Debug, Clone)]
pub struct NodeState {
    id: NodeId,
    /// Remaining energy, in the same unit as `CrispConfig::max_energy`.
    pub energy: f64,
    /// Free buffer space (bytes).
    pub free_buffer: u64,
    pub ens: EncounteredNodeSet,
    pub table: ValueTable,
    pub aging: AgingScheduler,
    pub messages: MessagePriorityTable,
}

impl NodeState {
    pub fn new(id: NodeId, ens_ttl: f64, energy: f64, free_buffer: u64) -> Self {
        Self {
            id,
            energy,
            free_buffer,
            ens: EncounteredNodeSet::with_ttl(id, ens_ttl),
            table: ValueTable::new(id),
            aging: AgingScheduler::new(),
            messages: MessagePriorityTable::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }
}
