//! Ferry Encounter History
//!
//! Per-node memory of the peers a node has met, plus the ledger of pairwise
//! connection sessions. Everything else in Ferry reads "who has this node met,
//! how recently, and for how long" from here.
//!
//! # Encountered-Node Set (ENS)
//!
//! Each node owns one [`EncounteredNodeSet`]. A record is created on the first
//! encounter with a peer, refreshed on later encounters, and dropped once its
//! age exceeds the set's time-to-live. Two nodes that meet exchange their sets:
//! the receiver merges a deep copy of the sender's records, keeping whichever
//! record of a peer is more *relevant*.
//!
//! # Relevance
//!
//! Relevance is a lexicographic order over
//! `(encounter_time, connection_duration, remaining_energy, buffer_size)`.
//! A newer encounter always wins; ties fall through to the next component.
//! There is no numeric relevance score.
//!
//! # Connection Ledger
//!
//! [`ConnectionLedger`] tracks one [`ConnectionRecord`] per ordered
//! `(from, to)` pair: when the current session started, when it ended, and
//! the cumulative duration across sessions.

mod id;
mod ledger;
mod node;
mod set;

pub use id::NodeId;
pub use ledger::{ConnectionLedger, ConnectionRecord};
pub use node::{EncounteredNode, Observation};
pub use set::{EncounteredNodeSet, DEFAULT_ENS_TTL};
