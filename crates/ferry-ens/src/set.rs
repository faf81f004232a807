//! The encountered-node set owned by one node.

use std::collections::HashMap;

use crate::{EncounteredNode, NodeId, Observation};

/// Default time-to-live of an encounter record (seconds).
pub const DEFAULT_ENS_TTL: f64 = 3600.0;

/// Per-node history of peers ever met.
///
/// Never holds a record for its own owner, whatever sequence of
/// [`record_encounter`](Self::record_encounter), [`merge`](Self::merge) and
/// [`exchange_with`](Self::exchange_with) calls it sees.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounteredNodeSet {
    /// The node this history belongs to.
    owner: NodeId,

    /// Peer records, keyed by peer id.
    records: HashMap<NodeId, EncounteredNode>,

    /// Encounter timestamps per unordered pair, oldest first.
    #[cfg_attr(feature = "serde", serde(skip))]
    pairwise: HashMap<(NodeId, NodeId), Vec<f64>>,

    /// Records older than this are dropped by `remove_old_encounters`.
    ttl: f64,
}

impl EncounteredNodeSet {
    /// Create an empty set for `owner` with the default TTL.
    pub fn new(owner: NodeId) -> Self {
        Self::with_ttl(owner, DEFAULT_ENS_TTL)
    }

    /// Create an empty set with a custom TTL.
    pub fn with_ttl(owner: NodeId, ttl: f64) -> Self {
        Self {
            owner,
            records: HashMap::new(),
            pairwise: HashMap::new(),
            ttl,
        }
    }

    /// The node this set belongs to.
    pub fn owner(&self) -> NodeId {
        self.owner
    }

    /// Record time-to-live.
    pub fn ttl(&self) -> f64 {
        self.ttl
    }

    // --- Update / insert ---

    /// Record an encounter with a peer.
    ///
    /// Observations of the owner itself are ignored. Returns true if the
    /// observation was applied.
    pub fn record_encounter(&mut self, obs: Observation) -> bool {
        if obs.id == self.owner {
            return false;
        }

        match self.records.get_mut(&obs.id) {
            Some(existing) => existing.absorb(obs),
            None => {
                self.records
                    .insert(obs.id, EncounteredNode::from_observation(obs));
            }
        }
        true
    }

    /// Add a finished session's duration to a peer's cumulative duration.
    /// Unknown peers are ignored.
    pub fn add_connection_duration(&mut self, id: &NodeId, secs: f64) {
        if let Some(node) = self.records.get_mut(id) {
            node.add_connection_duration(secs);
        }
    }

    /// Overwrite the cached popularity of a known peer.
    pub fn set_popularity(&mut self, id: &NodeId, popularity: f64) {
        if let Some(node) = self.records.get_mut(id) {
            node.set_popularity(popularity);
        }
    }

    // --- Merge / exchange ---

    /// Merge another node's history into this one.
    ///
    /// For each peer, the more relevant record wins outright. Records are
    /// deep-copied; the owner's own id is skipped. Returns the number of
    /// records inserted or replaced.
    pub fn merge(&mut self, other: &EncounteredNodeSet) -> usize {
        if other.records.is_empty() {
            return 0;
        }

        let mut updated = 0;
        for (id, record) in &other.records {
            if *id == self.owner {
                continue;
            }

            match self.records.get_mut(id) {
                Some(existing) => {
                    if existing.merge(record) {
                        updated += 1;
                    }
                }
                None => {
                    self.records.insert(*id, record.clone());
                    updated += 1;
                }
            }
        }
        updated
    }

    /// Merge a snapshot of `peer`'s history, minus any record about `peer`
    /// itself.
    pub fn exchange_with(&mut self, peer: &EncounteredNodeSet) -> usize {
        let mut snapshot = peer.clone();
        snapshot.remove(&peer.owner);
        self.merge(&snapshot)
    }

    // --- Filter / removal ---

    /// Evict a peer. Returns the removed record, if any.
    pub fn remove(&mut self, id: &NodeId) -> Option<EncounteredNode> {
        self.records.remove(id)
    }

    /// Drop every record whose age at `now` exceeds the TTL.
    /// Returns the ids that were removed.
    pub fn remove_old_encounters(&mut self, now: f64) -> Vec<NodeId> {
        let ttl = self.ttl;
        let expired: Vec<_> = self
            .records
            .values()
            .filter(|node| node.is_expired(now, ttl))
            .map(|node| node.id())
            .collect();

        for id in &expired {
            self.records.remove(id);
        }
        expired
    }

    // --- Queries ---

    /// Get a peer's record.
    pub fn get(&self, id: &NodeId) -> Option<&EncounteredNode> {
        self.records.get(id)
    }

    /// Whether the peer has been met (and not expired or evicted).
    pub fn contains(&self, id: &NodeId) -> bool {
        self.records.contains_key(id)
    }

    /// Ids of all peers in the set.
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.records.keys()
    }

    /// All records.
    pub fn records(&self) -> impl Iterator<Item = &EncounteredNode> {
        self.records.values()
    }

    /// Number of peers in the set.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of peers whose last encounter lies within `window` of `now`.
    pub fn count_recent_encounters(&self, now: f64, window: f64) -> usize {
        self.records
            .values()
            .filter(|node| now - node.encounter_time() <= window)
            .count()
    }

    // --- Encounter frequency ---

    /// Log an encounter between two nodes at `now`.
    pub fn record_encounter_between(&mut self, a: NodeId, b: NodeId, now: f64) {
        self.pairwise
            .entry(NodeId::unordered_pair(a, b))
            .or_default()
            .push(now);
    }

    /// How many times `a` and `b` met within `window` of `now`.
    pub fn frequency_between(&self, a: NodeId, b: NodeId, now: f64, window: f64) -> usize {
        self.pairwise
            .get(&NodeId::unordered_pair(a, b))
            .map(|times| times.iter().filter(|t| now - **t <= window).count())
            .unwrap_or(0)
    }
}

impl std::fmt::Display for EncounteredNodeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "ENS of node {} ({} peers)", self.owner, self.records.len())?;
        if self.records.is_empty() {
            return writeln!(f, "  (empty)");
        }

        let mut ids: Vec<_> = self.records.keys().collect();
        ids.sort();
        for id in ids {
            if let Some(node) = self.records.get(id) {
                writeln!(f, "  {}", node)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ME: NodeId = NodeId(0);

    fn obs(id: u64, time: f64) -> Observation {
        Observation::new(NodeId(id), time)
    }

    #[test]
    fn first_encounter_inserts_with_count_one() {
        let mut ens = EncounteredNodeSet::new(ME);
        assert!(ens.record_encounter(obs(1, 10.0)));

        let node = ens.get(&NodeId(1)).unwrap();
        assert_eq!(node.encounter_count(), 1);
        assert_eq!(node.encounter_time(), 10.0);
    }

    #[test]
    fn repeated_encounter_increments_count() {
        let mut ens = EncounteredNodeSet::new(ME);
        ens.record_encounter(obs(1, 10.0));
        ens.record_encounter(obs(1, 20.0));
        ens.record_encounter(obs(1, 30.0));

        let node = ens.get(&NodeId(1)).unwrap();
        assert_eq!(node.encounter_count(), 3);
        assert_eq!(node.encounter_time(), 30.0);
        assert_eq!(ens.len(), 1);
    }

    #[test]
    fn self_encounter_is_ignored() {
        let mut ens = EncounteredNodeSet::new(ME);
        assert!(!ens.record_encounter(obs(0, 10.0)));
        assert!(ens.is_empty());
    }

    #[test]
    fn merge_skips_owner_and_copies_records() {
        let mut mine = EncounteredNodeSet::new(ME);
        let mut theirs = EncounteredNodeSet::new(NodeId(5));
        theirs.record_encounter(obs(0, 10.0));
        theirs.record_encounter(obs(2, 10.0));

        let updated = mine.merge(&theirs);
        assert_eq!(updated, 1);
        assert!(!mine.contains(&ME));
        assert!(mine.contains(&NodeId(2)));

        // Mutating the source afterwards does not leak into the merged copy.
        theirs.add_connection_duration(&NodeId(2), 100.0);
        assert_eq!(mine.get(&NodeId(2)).unwrap().connection_duration(), 0.0);
    }

    #[test]
    fn merge_keeps_more_relevant_record() {
        let mut mine = EncounteredNodeSet::new(ME);
        let mut theirs = EncounteredNodeSet::new(NodeId(5));

        mine.record_encounter(obs(2, 100.0).with_energy(10.0));
        theirs.record_encounter(obs(2, 50.0).with_energy(99.0));
        theirs.record_encounter(obs(3, 60.0));

        assert_eq!(mine.merge(&theirs), 1);
        assert_eq!(mine.get(&NodeId(2)).unwrap().remaining_energy(), 10.0);

        let mut fresher = EncounteredNodeSet::new(NodeId(6));
        fresher.record_encounter(obs(2, 150.0).with_energy(42.0));
        assert_eq!(mine.merge(&fresher), 1);
        assert_eq!(mine.get(&NodeId(2)).unwrap().remaining_energy(), 42.0);
    }

    #[test]
    fn merge_empty_is_noop() {
        let mut mine = EncounteredNodeSet::new(ME);
        mine.record_encounter(obs(1, 1.0));
        assert_eq!(mine.merge(&EncounteredNodeSet::new(NodeId(9))), 0);
        assert_eq!(mine.len(), 1);
    }

    #[test]
    fn exchange_strips_peer_self_record() {
        let mut mine = EncounteredNodeSet::new(ME);
        let mut theirs = EncounteredNodeSet::new(NodeId(5));
        theirs.record_encounter(obs(3, 10.0));

        mine.exchange_with(&theirs);
        assert!(mine.contains(&NodeId(3)));
        assert!(!mine.contains(&NodeId(5)));
        // The peer's live set is untouched.
        assert_eq!(theirs.len(), 1);
    }

    #[test]
    fn expiry_boundary() {
        let mut ens = EncounteredNodeSet::new(ME);
        ens.record_encounter(obs(1, 100.0));

        assert!(ens.remove_old_encounters(100.0 + 3599.0).is_empty());
        assert!(ens.contains(&NodeId(1)));

        let removed = ens.remove_old_encounters(100.0 + 3601.0);
        assert_eq!(removed, vec![NodeId(1)]);
        assert!(!ens.contains(&NodeId(1)));
    }

    #[test]
    fn custom_ttl() {
        let mut ens = EncounteredNodeSet::with_ttl(ME, 10.0);
        ens.record_encounter(obs(1, 0.0));
        ens.record_encounter(obs(2, 5.0));

        let removed = ens.remove_old_encounters(12.0);
        assert_eq!(removed, vec![NodeId(1)]);
        assert_eq!(ens.len(), 1);
    }

    #[test]
    fn recent_encounter_count_uses_window() {
        let mut ens = EncounteredNodeSet::new(ME);
        ens.record_encounter(obs(1, 0.0));
        ens.record_encounter(obs(2, 100.0));
        ens.record_encounter(obs(3, 200.0));

        assert_eq!(ens.count_recent_encounters(240.0, 240.0), 3);
        assert_eq!(ens.count_recent_encounters(300.0, 240.0), 2);
        assert_eq!(ens.count_recent_encounters(1000.0, 240.0), 0);
    }

    #[test]
    fn pairwise_frequency_is_unordered() {
        let mut ens = EncounteredNodeSet::new(ME);
        ens.record_encounter_between(NodeId(0), NodeId(1), 10.0);
        ens.record_encounter_between(NodeId(1), NodeId(0), 20.0);
        ens.record_encounter_between(NodeId(0), NodeId(1), 700.0);

        assert_eq!(ens.frequency_between(NodeId(1), NodeId(0), 700.0, 600.0), 1);
        assert_eq!(ens.frequency_between(NodeId(1), NodeId(0), 700.0, 685.0), 2);
        assert_eq!(ens.frequency_between(NodeId(0), NodeId(1), 700.0, 1000.0), 3);
        assert_eq!(ens.frequency_between(NodeId(0), NodeId(2), 700.0, 1000.0), 0);
    }

    #[test]
    fn connection_duration_accumulates() {
        let mut ens = EncounteredNodeSet::new(ME);
        ens.record_encounter(obs(1, 0.0));
        ens.add_connection_duration(&NodeId(1), 30.0);
        ens.add_connection_duration(&NodeId(1), 12.5);
        ens.add_connection_duration(&NodeId(7), 99.0);

        assert_eq!(ens.get(&NodeId(1)).unwrap().connection_duration(), 42.5);
        assert!(!ens.contains(&NodeId(7)));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Record(u64, u32),
        Merge(u64, Vec<(u64, u32)>),
        Exchange(u64, Vec<(u64, u32)>),
    }

    fn op() -> impl Strategy<Value = Op> {
        let peers = prop::collection::vec((0u64..6, 0u32..100), 0..6);
        prop_oneof![
            (0u64..6, 0u32..100).prop_map(|(id, t)| Op::Record(id, t)),
            (0u64..6, peers.clone()).prop_map(|(owner, p)| Op::Merge(owner, p)),
            (0u64..6, peers).prop_map(|(owner, p)| Op::Exchange(owner, p)),
        ]
    }

    fn foreign_set(owner: u64, peers: &[(u64, u32)]) -> EncounteredNodeSet {
        let mut set = EncounteredNodeSet::new(NodeId(owner));
        for (id, t) in peers {
            set.record_encounter(obs(*id, f64::from(*t)));
        }
        set
    }

    proptest! {
        #[test]
        fn never_stores_owner(ops in prop::collection::vec(op(), 0..30)) {
            let mut ens = EncounteredNodeSet::new(ME);
            for op in ops {
                match op {
                    Op::Record(id, t) => {
                        ens.record_encounter(obs(id, f64::from(t)));
                    }
                    Op::Merge(owner, peers) => {
                        ens.merge(&foreign_set(owner, &peers));
                    }
                    Op::Exchange(owner, peers) => {
                        ens.exchange_with(&foreign_set(owner, &peers));
                    }
                }
                prop_assert!(!ens.contains(&ME));
            }
        }
    }
}
