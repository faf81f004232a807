//! Encountered-node records.

use std::cmp::Ordering;

use crate::NodeId;

/// What a node observed about a peer at the moment they met.
///
/// Built by the host from the peer's advertised resources and handed to
/// [`EncounteredNodeSet::record_encounter`](crate::EncounteredNodeSet::record_encounter).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Observation {
    /// The peer that was met.
    pub id: NodeId,
    /// When the encounter happened.
    pub encounter_time: f64,
    /// Peer's remaining energy.
    pub remaining_energy: f64,
    /// Peer's buffer size (bytes).
    pub buffer_size: u64,
    /// Connection duration known for this peer at observation time (seconds).
    pub connection_duration: f64,
    /// Peer's popularity as last computed by the host.
    pub popularity: f64,
}

impl Observation {
    /// Observation with only identity and time; resources default to zero.
    pub fn new(id: NodeId, encounter_time: f64) -> Self {
        Self {
            id,
            encounter_time,
            remaining_energy: 0.0,
            buffer_size: 0,
            connection_duration: 0.0,
            popularity: 0.0,
        }
    }

    /// Set the observed remaining energy.
    #[must_use]
    pub fn with_energy(mut self, remaining_energy: f64) -> Self {
        self.remaining_energy = remaining_energy;
        self
    }

    /// Set the observed buffer size.
    #[must_use]
    pub fn with_buffer(mut self, buffer_size: u64) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Set the known connection duration.
    #[must_use]
    pub fn with_duration(mut self, connection_duration: f64) -> Self {
        self.connection_duration = connection_duration;
        self
    }

    /// Set the peer's popularity.
    #[must_use]
    pub fn with_popularity(mut self, popularity: f64) -> Self {
        self.popularity = popularity;
        self
    }
}

/// One peer in an encountered-node set.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounteredNode {
    id: NodeId,
    encounter_time: f64,
    remaining_energy: f64,
    buffer_size: u64,
    connection_duration: f64,
    popularity: f64,
    encounter_count: u32,
}

impl EncounteredNode {
    /// Create a record from a first observation. The encounter count starts at 1.
    pub fn from_observation(obs: Observation) -> Self {
        Self {
            id: obs.id,
            encounter_time: obs.encounter_time,
            remaining_energy: obs.remaining_energy,
            buffer_size: obs.buffer_size,
            connection_duration: obs.connection_duration,
            popularity: obs.popularity,
            encounter_count: 1,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn encounter_time(&self) -> f64 {
        self.encounter_time
    }

    pub fn remaining_energy(&self) -> f64 {
        self.remaining_energy
    }

    pub fn buffer_size(&self) -> u64 {
        self.buffer_size
    }

    pub fn connection_duration(&self) -> f64 {
        self.connection_duration
    }

    pub fn popularity(&self) -> f64 {
        self.popularity
    }

    pub fn encounter_count(&self) -> u32 {
        self.encounter_count
    }

    /// Relevance order: encounter time, then connection duration, then
    /// energy, then buffer size. `Greater` means `self` is more relevant.
    pub fn relevance_cmp(&self, other: &Self) -> Ordering {
        self.encounter_time
            .total_cmp(&other.encounter_time)
            .then_with(|| self.connection_duration.total_cmp(&other.connection_duration))
            .then_with(|| self.remaining_energy.total_cmp(&other.remaining_energy))
            .then_with(|| self.buffer_size.cmp(&other.buffer_size))
    }

    /// Strictly more relevant than `other`.
    pub fn is_more_relevant_than(&self, other: &Self) -> bool {
        self.relevance_cmp(other) == Ordering::Greater
    }

    /// Whether the record is older than `ttl` at time `now`.
    pub fn is_expired(&self, now: f64, ttl: f64) -> bool {
        now - self.encounter_time > ttl
    }

    /// Fold a fresh observation of the same peer into this record.
    ///
    /// Count, encounter time and popularity always refresh. Resource fields
    /// are replaced only when the incoming record outranks the refreshed one.
    pub(crate) fn absorb(&mut self, obs: Observation) {
        self.encounter_count = self.encounter_count.saturating_add(1);
        self.encounter_time = obs.encounter_time;
        self.popularity = obs.popularity;

        let incoming = EncounteredNode::from_observation(obs);
        if incoming.is_more_relevant_than(self) {
            self.remaining_energy = incoming.remaining_energy;
            self.buffer_size = incoming.buffer_size;
            self.connection_duration = incoming.connection_duration;
        }
    }

    /// Replace this record with `other` if `other` is more relevant.
    /// Returns true if self was replaced.
    pub fn merge(&mut self, other: &Self) -> bool {
        if other.id == self.id && other.is_more_relevant_than(self) {
            *self = other.clone();
            true
        } else {
            false
        }
    }

    pub(crate) fn add_connection_duration(&mut self, secs: f64) {
        self.connection_duration += secs;
    }

    pub(crate) fn set_popularity(&mut self, popularity: f64) {
        self.popularity = popularity;
    }
}

impl std::fmt::Display for EncounteredNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "node {:<5} | encounter {:>8.1} | energy {:>6.1} | buffer {:>10} | duration {:>7.1}s | seen {}x",
            self.id,
            self.encounter_time,
            self.remaining_energy,
            self.buffer_size,
            self.connection_duration,
            self.encounter_count
        )
    }
}
