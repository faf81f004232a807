//! Strategy 1: learning from a live encounter.
//!
//! ```text
//! reward = 1 if the neighbor has met the destination, else 0
//! new    = α · (reward + γ · opportunity · max_y Q(dest, y)) + (1 − α) · old
//! ```
//!
//! `y` ranges over the peers in the neighbor's encountered-node set, looked
//! up in the host's own table.

use ferry_ens::{EncounteredNodeSet, NodeId};
use tracing::trace;

use crate::{LearningParams, ValueTable};

/// 1.0 if `neighbor_ens` contains `destination`, else 0.0.
pub fn reward(neighbor_ens: &EncounteredNodeSet, destination: NodeId) -> f64 {
    if neighbor_ens.contains(&destination) {
        1.0
    } else {
        0.0
    }
}

/// Update the value of reaching `destination` through `next_hop`.
///
/// `opportunity` scales the discounted future term and is expected in
/// `[0, 1]`. Returns the stored value.
pub fn update_live(
    table: &mut ValueTable,
    destination: NodeId,
    next_hop: NodeId,
    neighbor_ens: &EncounteredNodeSet,
    opportunity: f64,
    params: &LearningParams,
) -> f64 {
    let old = table.get(destination, next_hop);
    let reward = reward(neighbor_ens, destination);
    let max_next = table.max_over(destination, neighbor_ens.node_ids());

    let new = params.alpha * (reward + params.gamma * opportunity * max_next)
        + (1.0 - params.alpha) * old;
    table.set(destination, next_hop, new);

    let stored = table.get(destination, next_hop);
    trace!(
        "node {}: Q({}, {}) {:.4} -> {:.4} (reward {}, max {:.4}, opp {:.2})",
        table.owner(),
        destination,
        next_hop,
        old,
        stored,
        reward,
        max_next,
        opportunity
    );
    stored
}
