//! Popularity: exponentially smoothed recent-encounter count.

use std::collections::HashMap;

use ferry_ens::{EncounteredNodeSet, NodeId};
use tracing::trace;

use crate::{normalize, SocialConfig};

/// Smooth `previous` toward the normalized recent-encounter count.
///
/// `updated = (1 − α)·previous + α·min(recent / threshold, 1)`
pub fn popularity_score(previous: f64, recent_encounters: usize, config: &SocialConfig) -> f64 {
    let normalized = normalize(recent_encounters as f64, config.popularity_threshold);
    let alpha = config.popularity_alpha;
    (1.0 - alpha) * previous + alpha * normalized
}

/// Cached popularity per node.
#[derive(Debug, Clone, Default)]
pub struct Popularity {
    config: SocialConfig,
    scores: HashMap<NodeId, f64>,
}

impl Popularity {
    pub fn new(config: SocialConfig) -> Self {
        Self {
            config,
            scores: HashMap::new(),
        }
    }

    /// Recompute the popularity of the set's owner at `now` and cache it.
    pub fn update(&mut self, ens: &EncounteredNodeSet, now: f64) -> f64 {
        let node = ens.owner();
        let recent = ens.count_recent_encounters(now, self.config.popularity_window);
        let previous = self.get(&node);
        let updated = popularity_score(previous, recent, &self.config);

        trace!(
            "popularity of {}: {} recent encounters, {:.3} -> {:.3}",
            node,
            recent,
            previous,
            updated
        );

        self.scores.insert(node, updated);
        updated
    }

    /// Last computed popularity; 0.0 for unknown nodes.
    pub fn get(&self, node: &NodeId) -> f64 {
        self.scores.get(node).copied().unwrap_or(0.0)
    }

    pub fn config(&self) -> &SocialConfig {
        &self.config
    }
}
