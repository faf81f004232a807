//! Ferry Social Characteristics
//!
//! Smoothed scalar scores describing a node's social standing, derived from
//! its encounter history and connection ledger.
//!
//! - **Popularity**: how many distinct peers a node met recently, normalized
//!   and exponentially smoothed.
//! - **Tie strength**: how close two nodes are, from meeting frequency,
//!   cumulative connection time and how recently they parted.
//!
//! Scores live in `[0, 1]`. Each estimator keeps a cache that is fully
//! replaced on recomputation; the scoring functions themselves are pure.

mod config;
mod popularity;
mod tie;

pub use config::SocialConfig;
pub use popularity::{popularity_score, Popularity};
pub use tie::{tie_strength_score, TieStrength};

/// Normalize `value` to `[0, 1]` against `max`.
///
/// `max` must be positive; [`SocialConfig::validate`] rejects configurations
/// where it is not.
pub(crate) fn normalize(value: f64, max: f64) -> f64 {
    (value / max).min(1.0)
}
