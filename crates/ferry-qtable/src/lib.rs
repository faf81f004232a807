//! Ferry Value Tables
//!
//! Each node learns, per destination, how good every neighbor is as a next
//! hop. Values live in `[0, 1]` and change through three strategies:
//!
//! 1. **Live update** ([`update_live`]): a Q-learning step when two nodes
//!    meet, rewarded if the neighbor has met the destination, scaled by the
//!    transfer opportunity.
//! 2. **Aging** ([`age_next_hop`], [`AgingScheduler`]): entries routed
//!    through a neighbor that left decay exponentially, down to a floor.
//! 3. **Synchronization** ([`synchronize`]): two tables that meet raise
//!    each other's lower entries.
//!
//! Tables can be written out as a fixed-width pivot for offline inspection
//! ([`ValueTable::export_pivot`]).
//!
//! # Example
//!
//! ```
//! use ferry_ens::{EncounteredNodeSet, NodeId, Observation};
//! use ferry_qtable::{update_live, LearningParams, ValueTable};
//!
//! let mut table = ValueTable::new(NodeId(1));
//! let mut neighbor = EncounteredNodeSet::new(NodeId(2));
//! neighbor.record_encounter(Observation::new(NodeId(3), 0.0));
//!
//! let value = update_live(
//!     &mut table,
//!     NodeId(3),
//!     NodeId(2),
//!     &neighbor,
//!     1.0,
//!     &LearningParams::default(),
//! );
//! assert!((value - 0.6).abs() < 1e-12);
//! ```

mod aging;
mod error;
mod live;
mod params;
mod sync;
mod table;

pub use aging::{age_next_hop, AgingScheduler};
pub use error::{Error, Result};
pub use live::{reward, update_live};
pub use params::LearningParams;
pub use sync::{sync_entries, synchronize};
pub use table::{ValueTable, MAX_VALUE};
