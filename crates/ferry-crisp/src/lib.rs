//! Ferry Crisp Context Classifiers
//!
//! Discrete rule tables that turn continuous context into routing verdicts.
//!
//! # Pipeline
//!
//! ```text
//! buffer, energy      ─► BufferLevel, EnergyLevel ─► Ability ─┐
//!                                                             ├─► TransferOpportunity ─► {0, 1}
//! popularity, tie     ─► PopularityLevel, TieLevel ─► SocialImportance ─► {0, 1}
//!
//! ttl, hop count      ─► Level, Level ─► MessagePriority ─► {0.0, 1.0}
//! ```
//!
//! Every input is first normalized to `[0, 1]` and split into three tiers at
//! `0.4` and `0.7` (inclusive upper bounds). Every table is total: there is no
//! input for which classification fails.

mod evaluator;
mod levels;
mod rules;

pub use evaluator::{CrispConfig, CrispEvaluator};
pub use levels::{
    BufferLevel, EnergyLevel, Level, PopularityLevel, TieLevel, LOW_CUTOFF, MEDIUM_CUTOFF,
};
pub use rules::{
    evaluate_ability, evaluate_social, evaluate_transfer, message_priority, Ability,
    MessagePriority, SocialImportance, TransferOpportunity,
};
