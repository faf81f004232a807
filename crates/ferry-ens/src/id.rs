//! Node identifiers.

/// Stable identifier of a node, assigned by the runtime that hosts Ferry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u64);

impl NodeId {
    /// Create from a raw address.
    pub const fn new(address: u64) -> Self {
        Self(address)
    }

    /// Get the raw address.
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Order a pair so that `(a, b)` and `(b, a)` map to the same key.
    pub fn unordered_pair(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

impl From<u64> for NodeId {
    fn from(address: u64) -> Self {
        Self(address)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
