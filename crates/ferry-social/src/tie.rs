//! Tie strength between two nodes.
//!
//! ```text
//! base  = w_f · min(freq / max_freq, 1) + w_c · min(duration / max_closeness, 1)
//! decay = exp(−recency / scale)            (0 if the pair never parted)
//! score = clamp(base · (1 + r · decay), 0, 1)
//! ```

use std::collections::HashMap;

use ferry_ens::{ConnectionLedger, EncounteredNodeSet, NodeId};
use tracing::trace;

use crate::{normalize, SocialConfig};

/// Score a tie from its observable inputs.
///
/// `recency` is the time since the pair's last completed session, or `None`
/// if they never completed one.
pub fn tie_strength_score(
    frequency: usize,
    closeness: f64,
    recency: Option<f64>,
    config: &SocialConfig,
) -> f64 {
    let norm_freq = normalize(frequency as f64, config.max_frequency);
    let norm_closeness = normalize(closeness, config.max_closeness);

    let decay = match recency {
        Some(elapsed) => (-elapsed / config.recency_decay_scale).exp(),
        None => 0.0,
    };

    let base = config.frequency_weight * norm_freq + config.closeness_weight * norm_closeness;
    (base * (1.0 + config.recency_factor * decay)).clamp(0.0, 1.0)
}

/// Cached tie strength per ordered `(host, neighbor)` pair.
#[derive(Debug, Clone, Default)]
pub struct TieStrength {
    config: SocialConfig,
    scores: HashMap<(NodeId, NodeId), f64>,
}

impl TieStrength {
    pub fn new(config: SocialConfig) -> Self {
        Self {
            config,
            scores: HashMap::new(),
        }
    }

    /// Recompute the tie `host → neighbor` at `now` and cache it.
    ///
    /// Frequency comes from the host's pairwise encounter history; closeness
    /// and recency from the ledger's `host → neighbor` record.
    pub fn update(
        &mut self,
        host: NodeId,
        neighbor: NodeId,
        ens: &EncounteredNodeSet,
        ledger: &ConnectionLedger,
        now: f64,
    ) -> f64 {
        let frequency = ens.frequency_between(host, neighbor, now, self.config.frequency_window);
        let closeness = ledger.total_duration(host, neighbor, now);
        let recency = ledger.recency(host, neighbor, now);
        let score = tie_strength_score(frequency, closeness, recency, &self.config);

        trace!(
            "tie {} -> {}: freq {}, closeness {:.1}, recency {:?}, score {:.3}",
            host,
            neighbor,
            frequency,
            closeness,
            recency,
            score
        );

        self.scores.insert((host, neighbor), score);
        score
    }

    /// Last computed tie strength; 0.0 if never computed.
    pub fn get(&self, host: NodeId, neighbor: NodeId) -> f64 {
        self.scores.get(&(host, neighbor)).copied().unwrap_or(0.0)
    }

    pub fn config(&self) -> &SocialConfig {
        &self.config
    }
}
