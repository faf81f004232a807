//! Entry points that normalize raw context and run it through the tables.

use crate::{
    evaluate_ability, evaluate_social, evaluate_transfer, message_priority, BufferLevel,
    EnergyLevel, Level, MessagePriority, PopularityLevel, TieLevel, TransferOpportunity,
};

/// Normalization caps for raw context values.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrispConfig {
    /// Free buffer that counts as full capacity (bytes).
    pub max_buffer_bytes: u64,
    /// Energy that counts as a full battery.
    pub max_energy: f64,
    /// Message lifetime the TTL is measured against (seconds).
    pub max_ttl: f64,
    /// Hop count that counts as "many hops".
    pub max_hops: u32,
}

impl Default for CrispConfig {
    fn default() -> Self {
        Self {
            max_buffer_bytes: 10 * 1024 * 1024,
            max_energy: 500.0,
            max_ttl: 240.0,
            max_hops: 10,
        }
    }
}

impl CrispConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_buffer_bytes == 0 {
            return Err("max_buffer_bytes must be positive".to_string());
        }
        if !(self.max_energy > 0.0) {
            return Err(format!("max_energy must be positive, got {}", self.max_energy));
        }
        if !(self.max_ttl > 0.0) {
            return Err(format!("max_ttl must be positive, got {}", self.max_ttl));
        }
        if self.max_hops == 0 {
            return Err("max_hops must be positive".to_string());
        }
        Ok(())
    }
}

/// Crisp decision maker for relays, self-assessment and messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrispEvaluator {
    config: CrispConfig,
}

impl CrispEvaluator {
    pub fn new(config: CrispConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CrispConfig {
        &self.config
    }

    /// Graded transfer opportunity for handing traffic to a neighbor.
    pub fn transfer_opportunity(
        &self,
        free_buffer_bytes: u64,
        energy: f64,
        popularity: f64,
        tie_strength: f64,
    ) -> TransferOpportunity {
        let buffer = (free_buffer_bytes as f64 / self.config.max_buffer_bytes as f64).min(1.0);
        let energy = (energy / self.config.max_energy).min(1.0);

        let ability = evaluate_ability(BufferLevel::classify(buffer), EnergyLevel::classify(energy));
        let social = evaluate_social(
            PopularityLevel::classify(popularity),
            TieLevel::classify(tie_strength),
        );
        evaluate_transfer(ability, social)
    }

    /// 1 if the neighbor is a good enough relay right now, else 0.
    pub fn evaluate_neighbor(
        &self,
        free_buffer_bytes: u64,
        energy: f64,
        popularity: f64,
        tie_strength: f64,
    ) -> u8 {
        self.transfer_opportunity(free_buffer_bytes, energy, popularity, tie_strength)
            .binary()
    }

    /// 1 if the host itself is socially worth relaying through, else 0.
    pub fn evaluate_self(&self, popularity: f64, tie_strength: f64) -> u8 {
        evaluate_social(
            PopularityLevel::classify(popularity),
            TieLevel::classify(tie_strength),
        )
        .binary()
    }

    /// Priority level of a message with `ttl` seconds left after `hops` hops.
    pub fn message_priority(&self, ttl: f64, hops: u32) -> MessagePriority {
        // Less time left means a larger normalized value.
        let ttl = 1.0 - (ttl / self.config.max_ttl).min(1.0);
        let hops = (f64::from(hops) / f64::from(self.config.max_hops)).min(1.0);
        message_priority(Level::classify(ttl), Level::classify(hops))
    }

    /// 1.0 for High or Urgent messages, else 0.0.
    pub fn evaluate_message(&self, ttl: f64, hops: u32) -> f64 {
        self.message_priority(ttl, hops).binary()
    }
}
