//! The router context: node states plus shared registries, and the encounter
//! control flow that ties the strategies together.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use ferry_crisp::{CrispEvaluator, TransferOpportunity};
use ferry_ens::{ConnectionLedger, ConnectionRecord, EncounteredNodeSet, NodeId, Observation};
use ferry_qtable::{synchronize, update_live, ValueTable};
use ferry_social::{Popularity, TieStrength};
use parking_lot::{Mutex, MutexGuard};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::config::RouterConfig;
use crate::density::compute_density;
use crate::error::{Error, Result};
use crate::messages::MessagePriorityTable;
use crate::node::NodeState;

/// What one side of an encounter learned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Learning {
    /// Opportunity of handing traffic to the other side.
    pub opportunity: TransferOpportunity,
    /// Whether both crisp gates opened.
    pub learned: bool,
    /// Destinations whose value was updated.
    pub updated: usize,
}

/// Result of [`Router::connection_up`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncounterOutcome {
    pub host: Learning,
    pub neighbor: Learning,
    /// Entries raised by two-way synchronization.
    pub synchronized: usize,
}

/// Result of [`Router::replicas`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplicaDecision {
    pub density: f64,
    pub copies: u32,
}

/// Serializable view of one node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub energy: f64,
    pub free_buffer: u64,
    pub popularity: f64,
    pub ens: EncounteredNodeSet,
    pub table: ValueTable,
    pub messages: MessagePriorityTable,
}

/// Serializable view of every node, ascending by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterSnapshot {
    pub nodes: Vec<NodeSnapshot>,
}

impl RouterSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Owns every node's state and the registries shared between nodes.
///
/// Lock order: node guards (ascending id), then ledger, popularity, ties.
pub struct Router {
    config: RouterConfig,
    evaluator: CrispEvaluator,
    nodes: BTreeMap<NodeId, Arc<Mutex<NodeState>>>,
    ledger: Mutex<ConnectionLedger>,
    popularity: Mutex<Popularity>,
    ties: Mutex<TieStrength>,
}

impl Router {
    /// Create an empty router after validating `config`.
    pub fn new(config: RouterConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            evaluator: CrispEvaluator::new(config.crisp),
            nodes: BTreeMap::new(),
            ledger: Mutex::new(ConnectionLedger::new()),
            popularity: Mutex::new(Popularity::new(config.social)),
            ties: Mutex::new(TieStrength::new(config.social)),
            config,
        })
    }

    /// Create a router with `ids` registered at full energy and buffer.
    pub fn with_nodes<I>(config: RouterConfig, ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let mut router = Self::new(config)?;
        let energy = router.config.crisp.max_energy;
        let buffer = router.config.crisp.max_buffer_bytes;
        for id in ids {
            router.add_node(id, energy, buffer);
        }
        Ok(router)
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Register a node. Re-registering an id keeps its existing state.
    pub fn add_node(&mut self, id: NodeId, energy: f64, free_buffer: u64) {
        let ttl = self.config.ens_ttl;
        self.nodes
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(NodeState::new(id, ttl, energy, free_buffer))));
    }

    /// Registered ids, ascending.
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    /// Shared handle to a node's state.
    pub fn node(&self, id: NodeId) -> Result<Arc<Mutex<NodeState>>> {
        self.handle(id).map(Arc::clone)
    }

    /// Update a node's resource levels.
    pub fn set_resources(&self, id: NodeId, energy: f64, free_buffer: u64) -> Result<()> {
        let mut node = self.handle(id)?.lock();
        node.energy = energy;
        node.free_buffer = free_buffer;
        Ok(())
    }

    /// Seed every node's table with every pair of registered ids.
    pub fn initialize_tables(&self) {
        let ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        for node in self.nodes.values() {
            node.lock().table.initialize_all(&ids);
        }
    }

    pub fn popularity(&self, id: NodeId) -> f64 {
        self.popularity.lock().get(&id)
    }

    pub fn tie_strength(&self, host: NodeId, neighbor: NodeId) -> f64 {
        self.ties.lock().get(host, neighbor)
    }

    /// Copy of the ledger record `from → to`.
    pub fn connection(&self, from: NodeId, to: NodeId) -> Option<ConnectionRecord> {
        self.ledger.lock().get(from, to).cloned()
    }

    fn handle(&self, id: NodeId) -> Result<&Arc<Mutex<NodeState>>> {
        self.nodes.get(&id).ok_or(Error::UnknownNode(id))
    }

    /// Lock two distinct nodes in ascending id order; guards come back in
    /// argument order.
    fn lock_pair(
        &self,
        a: NodeId,
        b: NodeId,
    ) -> Result<(MutexGuard<'_, NodeState>, MutexGuard<'_, NodeState>)> {
        if a == b {
            return Err(Error::SelfEncounter(a));
        }
        let first = self.handle(a)?;
        let second = self.handle(b)?;

        if a < b {
            let guard_a = first.lock();
            let guard_b = second.lock();
            Ok((guard_a, guard_b))
        } else {
            let guard_b = second.lock();
            let guard_a = first.lock();
            Ok((guard_a, guard_b))
        }
    }

    // --- Encounter control flow ---

    /// Handle `host` and `neighbor` coming into contact at `now`.
    ///
    /// Opens the session in the ledger, records and exchanges encounter
    /// history, refreshes social scores, runs the gated live update on both
    /// sides and finally synchronizes the two tables.
    pub fn connection_up(&self, host: NodeId, neighbor: NodeId, now: f64) -> Result<EncounterOutcome> {
        let (mut host_guard, mut neighbor_guard) = self.lock_pair(host, neighbor)?;
        let h = &mut *host_guard;
        let n = &mut *neighbor_guard;

        let mut ledger = self.ledger.lock();
        let mut popularity = self.popularity.lock();
        let mut ties = self.ties.lock();

        debug!("Connection up: {} <-> {} at {:.1}", host, neighbor, now);

        // Expire first so stale records reach neither learning nor the exchange.
        let expired_host = h.ens.remove_old_encounters(now);
        let expired_neighbor = n.ens.remove_old_encounters(now);
        if !expired_host.is_empty() || !expired_neighbor.is_empty() {
            trace!(
                "Expired encounters: {} dropped {}, {} dropped {}",
                host,
                expired_host.len(),
                neighbor,
                expired_neighbor.len()
            );
        }

        ledger.start(host, neighbor, now);
        ledger.start(neighbor, host, now);
        h.ens.record_encounter_between(host, neighbor, now);
        n.ens.record_encounter_between(neighbor, host, now);

        h.ens.record_encounter(
            Observation::new(neighbor, now)
                .with_energy(n.energy)
                .with_buffer(n.free_buffer)
                .with_duration(ledger.total_duration(host, neighbor, now))
                .with_popularity(popularity.get(&neighbor)),
        );
        n.ens.record_encounter(
            Observation::new(host, now)
                .with_energy(h.energy)
                .with_buffer(h.free_buffer)
                .with_duration(ledger.total_duration(neighbor, host, now))
                .with_popularity(popularity.get(&host)),
        );

        let host_before = h.ens.clone();
        let learned_by_host = h.ens.exchange_with(&n.ens);
        let learned_by_neighbor = n.ens.exchange_with(&host_before);
        trace!(
            "ENS exchange {} <-> {}: {} / {} records merged",
            host,
            neighbor,
            learned_by_host,
            learned_by_neighbor
        );

        let host_popularity = popularity.update(&h.ens, now);
        let neighbor_popularity = popularity.update(&n.ens, now);
        h.ens.set_popularity(&neighbor, neighbor_popularity);
        n.ens.set_popularity(&host, host_popularity);

        let host_tie = ties.update(host, neighbor, &h.ens, &ledger, now);
        let neighbor_tie = ties.update(neighbor, host, &n.ens, &ledger, now);

        let host_learning = self.learn(h, n, host_popularity, neighbor_popularity, host_tie);
        let neighbor_learning = self.learn(n, h, neighbor_popularity, host_popularity, neighbor_tie);

        let synchronized = synchronize(&mut h.table, &mut n.table);

        Ok(EncounterOutcome {
            host: host_learning,
            neighbor: neighbor_learning,
            synchronized,
        })
    }

    /// Gate and run the live update of `node` toward everything `peer` knows.
    fn learn(
        &self,
        node: &mut NodeState,
        peer: &NodeState,
        own_popularity: f64,
        peer_popularity: f64,
        tie: f64,
    ) -> Learning {
        let opportunity = self.evaluator.transfer_opportunity(
            peer.free_buffer,
            peer.energy,
            peer_popularity,
            tie,
        );
        let self_ok = self.evaluator.evaluate_self(own_popularity, tie) == 1;
        let peer_ok = opportunity.binary() == 1;

        if !(self_ok && peer_ok) {
            trace!(
                "node {}: not learning via {} (self {}, opportunity {:?})",
                node.id(),
                peer.id(),
                self_ok,
                opportunity
            );
            return Learning {
                opportunity,
                learned: false,
                updated: 0,
            };
        }

        let destinations: Vec<NodeId> = peer
            .ens
            .node_ids()
            .copied()
            .filter(|destination| *destination != node.id())
            .collect();

        for destination in &destinations {
            update_live(
                &mut node.table,
                *destination,
                peer.id(),
                &peer.ens,
                opportunity.weight(),
                &self.config.learning,
            );
        }

        debug!(
            "node {}: learned {} destinations via {} ({:?})",
            node.id(),
            destinations.len(),
            peer.id(),
            opportunity
        );
        Learning {
            opportunity,
            learned: true,
            updated: destinations.len(),
        }
    }

    /// Handle `host` and `neighbor` losing contact at `now`.
    ///
    /// Returns the length of the session that ended, or `None` if none was
    /// running.
    pub fn connection_down(&self, host: NodeId, neighbor: NodeId, now: f64) -> Result<Option<f64>> {
        let (mut host_guard, mut neighbor_guard) = self.lock_pair(host, neighbor)?;
        let h = &mut *host_guard;
        let n = &mut *neighbor_guard;
        let mut ledger = self.ledger.lock();

        let session = ledger.end(host, neighbor, now);
        let reverse = ledger.end(neighbor, host, now);

        if let Some(secs) = session {
            h.ens.add_connection_duration(&neighbor, secs);
            h.aging.schedule(neighbor, now);
        }
        if let Some(secs) = reverse {
            n.ens.add_connection_duration(&host, secs);
            n.aging.schedule(host, now);
        }

        debug!(
            "Connection down: {} <-> {} at {:.1} (session {:?})",
            host, neighbor, now, session
        );
        Ok(session)
    }

    /// Run every node's aging scheduler at `now`.
    ///
    /// Returns the number of `(node, neighbor)` pairs that were aged.
    pub fn tick(&self, now: f64) -> usize {
        let mut aged = 0;
        for (id, node) in &self.nodes {
            let mut guard = node.lock();
            let state = &mut *guard;
            let ledger = self.ledger.lock();
            aged += state
                .aging
                .run(&mut state.table, *id, &ledger, now, &self.config.learning)
                .len();
        }
        if aged > 0 {
            debug!("Tick at {:.1}: aged {} neighbor entries", now, aged);
        }
        aged
    }

    /// Evaluate a message held by `node` and store its priority.
    pub fn message(&self, node: NodeId, message_id: &str, ttl: f64, hops: u32) -> Result<f64> {
        let priority = self.evaluator.evaluate_message(ttl, hops);
        self.handle(node)?.lock().messages.update(message_id, priority);
        trace!("node {}: message {} priority {}", node, message_id, priority);
        Ok(priority)
    }

    /// Decide how many replicas to spread when `host` meets `neighbor`.
    pub fn replicas<R: Rng + ?Sized>(
        &self,
        host: NodeId,
        neighbor: NodeId,
        now: f64,
        rng: &mut R,
    ) -> Result<ReplicaDecision> {
        let (mut host_guard, mut neighbor_guard) = self.lock_pair(host, neighbor)?;
        let density = compute_density(
            self.config.total_nodes,
            &mut host_guard.ens,
            &mut neighbor_guard.ens,
            host,
            neighbor,
            now,
        );
        let copies = self.config.density.copies_for(density, rng);
        Ok(ReplicaDecision { density, copies })
    }

    /// Run one live update of `host`'s value for `destination` via `neighbor`.
    pub fn update_live_strategy(
        &self,
        host: NodeId,
        neighbor: NodeId,
        destination: NodeId,
        opportunity: f64,
    ) -> Result<f64> {
        let (mut host_guard, neighbor_guard) = self.lock_pair(host, neighbor)?;
        Ok(update_live(
            &mut host_guard.table,
            destination,
            neighbor,
            &neighbor_guard.ens,
            opportunity,
            &self.config.learning,
        ))
    }

    // --- Inspection ---

    /// Copy of every node's state.
    pub fn snapshot(&self) -> RouterSnapshot {
        let nodes = self
            .nodes
            .iter()
            .map(|(id, node)| {
                let state = node.lock();
                NodeSnapshot {
                    id: *id,
                    energy: state.energy,
                    free_buffer: state.free_buffer,
                    popularity: self.popularity.lock().get(id),
                    ens: state.ens.clone(),
                    table: state.table.clone(),
                    messages: state.messages.clone(),
                }
            })
            .collect();
        RouterSnapshot { nodes }
    }

    /// Write every node's table to `path`, one pivot block per node.
    pub fn export_tables(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        for (index, node) in self.nodes.values().enumerate() {
            node.lock().table.export_pivot(path, index > 0)?;
        }
        info!("Exported {} value tables to {}", self.nodes.len(), path.display());
        Ok(())
    }
}
