//! Learning parameters shared by the update strategies.

/// Constants of the live update and aging strategies.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LearningParams {
    /// Learning rate α.
    pub alpha: f64,
    /// Discount factor γ.
    pub gamma: f64,
    /// Per-second decay base applied by aging.
    pub aging_decay: f64,
    /// Seconds a neighbor must be gone before its entries age.
    pub aging_min_elapsed: f64,
    /// Aged values never drop below this.
    pub aging_floor: f64,
}

impl Default for LearningParams {
    fn default() -> Self {
        Self {
            alpha: 0.6,
            gamma: 0.4,
            aging_decay: 0.998,
            aging_min_elapsed: 240.0,
            aging_floor: 0.05,
        }
    }
}

impl LearningParams {
    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    #[must_use]
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Reject rates outside `[0, 1]` and a negative aging threshold.
    pub fn validate(&self) -> Result<(), String> {
        let unit = [
            ("alpha", self.alpha),
            ("gamma", self.gamma),
            ("aging_decay", self.aging_decay),
            ("aging_floor", self.aging_floor),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{name} must be in [0, 1], got {value}"));
            }
        }
        if !(self.aging_min_elapsed >= 0.0) {
            return Err(format!(
                "aging_min_elapsed must be non-negative, got {}",
                self.aging_min_elapsed
            ));
        }
        Ok(())
    }
}
