//! Estimator parameters.

/// Parameters of the popularity and tie-strength estimators.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SocialConfig {
    /// Smoothing factor for popularity (higher reacts faster).
    pub popularity_alpha: f64,
    /// Window for counting recent encounters (seconds).
    pub popularity_window: f64,
    /// Encounter count that maps to popularity 1.0.
    pub popularity_threshold: f64,

    /// Window for pairwise encounter frequency (seconds).
    pub frequency_window: f64,
    /// Frequency that maps to 1.0.
    pub max_frequency: f64,
    /// Cumulative connection time that maps to 1.0 (seconds).
    pub max_closeness: f64,
    /// Weight of normalized frequency.
    pub frequency_weight: f64,
    /// Weight of normalized closeness.
    pub closeness_weight: f64,
    /// Bonus factor applied through the recency decay.
    pub recency_factor: f64,
    /// Recency decay scale; larger decays slower.
    pub recency_decay_scale: f64,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            popularity_alpha: 0.5,
            popularity_window: 240.0,
            popularity_threshold: 12.0,

            frequency_window: 600.0,
            max_frequency: 15.0,
            max_closeness: 900.0,
            frequency_weight: 0.5,
            closeness_weight: 0.2,
            recency_factor: 0.3,
            recency_decay_scale: 1000.0,
        }
    }
}

impl SocialConfig {
    /// Set the popularity smoothing factor.
    #[must_use]
    pub fn with_popularity_alpha(mut self, alpha: f64) -> Self {
        self.popularity_alpha = alpha;
        self
    }

    /// Reject parameters that would divide by zero or leave `[0, 1]`.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.popularity_alpha) {
            return Err(format!(
                "popularity_alpha must be in [0, 1], got {}",
                self.popularity_alpha
            ));
        }

        let divisors = [
            ("popularity_threshold", self.popularity_threshold),
            ("max_frequency", self.max_frequency),
            ("max_closeness", self.max_closeness),
            ("recency_decay_scale", self.recency_decay_scale),
        ];
        for (name, value) in divisors {
            if !(value > 0.0) {
                return Err(format!("{name} must be positive, got {value}"));
            }
        }

        Ok(())
    }
}
