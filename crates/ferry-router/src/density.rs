//! Density-based replica policy.
//!
//! Nodes that have jointly seen a large share of the network sit in a dense
//! area and spread few copies; sparse areas get many.

use std::collections::HashSet;
use std::ops::Range;

use ferry_ens::{EncounteredNodeSet, NodeId};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Density thresholds and the copy ranges they select.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityConfig {
    /// Density above this is dense.
    pub dense_threshold: f64,
    /// Density above this (and not dense) is medium.
    pub sparse_threshold: f64,
    pub dense_copies: Range<u32>,
    pub medium_copies: Range<u32>,
    pub sparse_copies: Range<u32>,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            dense_threshold: 0.6,
            sparse_threshold: 0.3,
            dense_copies: 5..30,
            medium_copies: 80..160,
            sparse_copies: 250..330,
        }
    }
}

impl DensityConfig {
    /// Draw a replica count for `density`.
    pub fn copies_for<R: Rng + ?Sized>(&self, density: f64, rng: &mut R) -> u32 {
        let range = if density > self.dense_threshold {
            &self.dense_copies
        } else if density > self.sparse_threshold {
            &self.medium_copies
        } else {
            &self.sparse_copies
        };

        if range.is_empty() {
            return range.start;
        }
        rng.gen_range(range.clone())
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.sparse_threshold <= self.dense_threshold) {
            return Err(format!(
                "sparse_threshold {} must not exceed dense_threshold {}",
                self.sparse_threshold, self.dense_threshold
            ));
        }
        let ranges = [
            ("dense_copies", &self.dense_copies),
            ("medium_copies", &self.medium_copies),
            ("sparse_copies", &self.sparse_copies),
        ];
        for (name, range) in ranges {
            if range.is_empty() {
                return Err(format!("{name} must not be empty, got {range:?}"));
            }
        }
        Ok(())
    }
}

/// Share of the network known to the pair `(host, neighbor)`.
///
/// Both sets are expired at `now` first. The union of their peers plus the
/// two explicit ids is divided by `total_nodes`; 0.0 when `total_nodes` is 0.
pub fn compute_density(
    total_nodes: usize,
    host_ens: &mut EncounteredNodeSet,
    neighbor_ens: &mut EncounteredNodeSet,
    host: NodeId,
    neighbor: NodeId,
    now: f64,
) -> f64 {
    host_ens.remove_old_encounters(now);
    neighbor_ens.remove_old_encounters(now);

    if total_nodes == 0 {
        return 0.0;
    }

    let mut known: HashSet<NodeId> = host_ens.node_ids().copied().collect();
    known.extend(neighbor_ens.node_ids().copied());
    known.insert(host);
    known.insert(neighbor);

    known.len() as f64 / total_nodes as f64
}

/// Draw a replica count for `density` using the default ranges.
pub fn copies_for_density<R: Rng + ?Sized>(density: f64, rng: &mut R) -> u32 {
    DensityConfig::default().copies_for(density, rng)
}
