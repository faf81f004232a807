//! Router configuration.

use std::str::FromStr;

use ferry_crisp::CrispConfig;
use ferry_ens::DEFAULT_ENS_TTL;
use ferry_qtable::LearningParams;
use ferry_social::SocialConfig;
use serde::{Deserialize, Serialize};

use crate::density::DensityConfig;
use crate::error::{Error, Result};

/// Configuration for a [`Router`](crate::Router).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Number of nodes in the network, used as the density denominator
    pub total_nodes: usize,

    /// Time-to-live of encounter records (seconds)
    pub ens_ttl: f64,

    /// Seed for the simulation driver's RNG
    pub seed: u64,

    pub learning: LearningParams,
    pub social: SocialConfig,
    pub crisp: CrispConfig,
    pub density: DensityConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            total_nodes: 50,
            ens_ttl: DEFAULT_ENS_TTL,
            seed: 42,
            learning: LearningParams::default(),
            social: SocialConfig::default(),
            crisp: CrispConfig::default(),
            density: DensityConfig::default(),
        }
    }
}

impl RouterConfig {
    /// Defaults overridden by `FERRY_*` environment variables.
    ///
    /// Recognized: `FERRY_TOTAL_NODES`, `FERRY_ALPHA`, `FERRY_GAMMA`,
    /// `FERRY_ENS_TTL`, `FERRY_POPULARITY_ALPHA`, `FERRY_SEED`. Unset
    /// variables keep their defaults; unparsable ones are an error.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(total_nodes) = env_var("FERRY_TOTAL_NODES")? {
            config.total_nodes = total_nodes;
        }
        if let Some(alpha) = env_var("FERRY_ALPHA")? {
            config.learning.alpha = alpha;
        }
        if let Some(gamma) = env_var("FERRY_GAMMA")? {
            config.learning.gamma = gamma;
        }
        if let Some(ttl) = env_var("FERRY_ENS_TTL")? {
            config.ens_ttl = ttl;
        }
        if let Some(alpha) = env_var("FERRY_POPULARITY_ALPHA")? {
            config.social.popularity_alpha = alpha;
        }
        if let Some(seed) = env_var("FERRY_SEED")? {
            config.seed = seed;
        }

        Ok(config)
    }

    #[must_use]
    pub fn with_total_nodes(mut self, total_nodes: usize) -> Self {
        self.total_nodes = total_nodes;
        self
    }

    #[must_use]
    pub fn with_ens_ttl(mut self, ttl: f64) -> Self {
        self.ens_ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_learning(mut self, learning: LearningParams) -> Self {
        self.learning = learning;
        self
    }

    #[must_use]
    pub fn with_social(mut self, social: SocialConfig) -> Self {
        self.social = social;
        self
    }

    #[must_use]
    pub fn with_crisp(mut self, crisp: CrispConfig) -> Self {
        self.crisp = crisp;
        self
    }

    #[must_use]
    pub fn with_density(mut self, density: DensityConfig) -> Self {
        self.density = density;
        self
    }

    /// Reject degenerate parameters before any node is created.
    pub fn validate(&self) -> Result<()> {
        if self.total_nodes == 0 {
            return Err(Error::Config("total_nodes must be positive".to_string()));
        }
        if !(self.ens_ttl > 0.0) {
            return Err(Error::Config(format!(
                "ens_ttl must be positive, got {}",
                self.ens_ttl
            )));
        }

        self.learning.validate().map_err(Error::Config)?;
        self.social.validate().map_err(Error::Config)?;
        self.crisp.validate().map_err(Error::Config)?;
        self.density.validate().map_err(Error::Config)?;
        Ok(())
    }
}

/// Parse an optional environment variable.
fn env_var<T: FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("invalid {name}: {raw:?}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RouterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.learning.alpha, 0.6);
        assert_eq!(config.ens_ttl, 3600.0);
    }

    #[test]
    fn zero_nodes_rejected() {
        let err = RouterConfig::default()
            .with_total_nodes(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn nested_errors_surface_as_config() {
        let config = RouterConfig::default()
            .with_learning(LearningParams::default().with_alpha(2.0));
        assert!(matches!(config.validate(), Err(Error::Config(msg)) if msg.contains("alpha")));

        let config = RouterConfig::default()
            .with_social(SocialConfig::default().with_popularity_alpha(-1.0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn env_parsing() {
        // Variable names unique to this test so parallel tests do not race.
        std::env::set_var("FERRY_TEST_GOOD", " 17 ");
        std::env::set_var("FERRY_TEST_BAD", "seventeen");

        assert_eq!(env_var::<usize>("FERRY_TEST_GOOD").unwrap(), Some(17));
        assert!(env_var::<usize>("FERRY_TEST_BAD").is_err());
        assert_eq!(env_var::<usize>("FERRY_TEST_UNSET").unwrap(), None);

        std::env::remove_var("FERRY_TEST_GOOD");
        std::env::remove_var("FERRY_TEST_BAD");
    }
}
