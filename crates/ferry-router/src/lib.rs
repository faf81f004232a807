//! Ferry Router
//!
//! The decision core of a context-aware, reinforcement-learning router for
//! opportunistic networks. A [`Router`] owns the state of every node plus
//! the registries shared between them, and turns encounter events into
//! updates of the per-node value tables.
//!
//! # Encounter flow
//!
//! ```text
//! connection_up(host, neighbor, now)
//!   ├─ ledger: open both directions
//!   ├─ ENS: record each other, exchange snapshots
//!   ├─ social: popularity + tie strength
//!   ├─ crisp gate: evaluate_self ∧ evaluate_neighbor
//!   │    └─ live update for every destination the neighbor knows
//!   └─ two-way table synchronization
//!
//! connection_down(host, neighbor, now)
//!   ├─ ledger: close both directions
//!   ├─ ENS: add session duration
//!   └─ schedule aging of the departed neighbor
//!
//! tick(now)            → run pending aging
//! message(..)          → store message priority verdict
//! replicas(..)         → density → replica count
//! ```
//!
//! # Concurrency
//!
//! Node states sit behind `Arc<parking_lot::Mutex<_>>`. Two-node operations
//! lock both nodes in ascending id order, so encounters may be driven from
//! several threads at once.

mod config;
mod density;
mod error;
mod messages;
mod node;
mod router;

pub use config::RouterConfig;
pub use density::{compute_density, copies_for_density, DensityConfig};
pub use error::{Error, Result};
pub use messages::MessagePriorityTable;
pub use node::NodeState;
pub use router::{
    EncounterOutcome, Learning, NodeSnapshot, ReplicaDecision, Router, RouterSnapshot,
};

// Re-export the building blocks so callers need a single dependency.
pub use ferry_crisp::{CrispConfig, CrispEvaluator, MessagePriority, TransferOpportunity};
pub use ferry_ens::{ConnectionLedger, ConnectionRecord, EncounteredNodeSet, NodeId, Observation};
pub use ferry_qtable::{AgingScheduler, LearningParams, ValueTable};
pub use ferry_social::SocialConfig;
