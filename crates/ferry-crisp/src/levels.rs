//! Three-tier classification of normalized inputs.

/// Upper bound (inclusive) of the lowest tier.
pub const LOW_CUTOFF: f64 = 0.4;

/// Upper bound (inclusive) of the middle tier.
pub const MEDIUM_CUTOFF: f64 = 0.7;

/// Tier index 0, 1 or 2. NaN lands in tier 0.
fn tier(value: f64) -> u8 {
    if value.is_nan() || value <= LOW_CUTOFF {
        0
    } else if value <= MEDIUM_CUTOFF {
        1
    } else {
        2
    }
}

/// Free buffer, normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BufferLevel {
    Low,
    Medium,
    High,
}

impl BufferLevel {
    pub fn classify(value: f64) -> Self {
        match tier(value) {
            0 => Self::Low,
            1 => Self::Medium,
            _ => Self::High,
        }
    }
}

/// Remaining energy, normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnergyLevel {
    Low,
    Medium,
    High,
}

impl EnergyLevel {
    pub fn classify(value: f64) -> Self {
        match tier(value) {
            0 => Self::Low,
            1 => Self::Medium,
            _ => Self::High,
        }
    }
}

/// Popularity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PopularityLevel {
    Slow,
    Medium,
    Fast,
}

impl PopularityLevel {
    pub fn classify(value: f64) -> Self {
        match tier(value) {
            0 => Self::Slow,
            1 => Self::Medium,
            _ => Self::Fast,
        }
    }
}

/// Tie-strength score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TieLevel {
    Poor,
    Fair,
    Good,
}

impl TieLevel {
    pub fn classify(value: f64) -> Self {
        match tier(value) {
            0 => Self::Poor,
            1 => Self::Fair,
            _ => Self::Good,
        }
    }
}

/// Message TTL or hop count, normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Level {
    Small,
    Medium,
    Large,
}

impl Level {
    pub fn classify(value: f64) -> Self {
        match tier(value) {
            0 => Self::Small,
            1 => Self::Medium,
            _ => Self::Large,
        }
    }
}
