//! Connection-duration ledger.
//!
//! One record per ordered `(from, to)` pair, kept across sessions so the
//! cumulative duration survives reconnects. Feeds tie-strength closeness and
//! recency, and tells the aging strategy when a neighbor went away.

use std::collections::HashMap;

use crate::NodeId;

/// Lifetime of the connection from one node to another.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectionRecord {
    from: NodeId,
    to: NodeId,
    /// Start of the current (or most recent) session.
    start_time: f64,
    /// End of the current session; `None` while connected.
    end_time: Option<f64>,
    /// End of the last completed session, kept across reconnects.
    last_end: Option<f64>,
    /// Sum of all completed sessions.
    total_duration: f64,
}

impl ConnectionRecord {
    fn open(from: NodeId, to: NodeId, now: f64) -> Self {
        Self {
            from,
            to,
            start_time: now,
            end_time: None,
            last_end: None,
            total_duration: 0.0,
        }
    }

    pub fn from(&self) -> NodeId {
        self.from
    }

    pub fn to(&self) -> NodeId {
        self.to
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// End of the current session, `None` while still connected.
    pub fn end_time(&self) -> Option<f64> {
        self.end_time
    }

    /// End of the last completed session, even if a new one is running.
    pub fn last_end(&self) -> Option<f64> {
        self.last_end
    }

    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }

    /// Cumulative duration at `now`, including the running session.
    pub fn duration(&self, now: f64) -> f64 {
        match self.end_time {
            None => self.total_duration + (now - self.start_time),
            Some(_) => self.total_duration,
        }
    }

    /// Time since the current session ended; `None` while connected.
    pub fn elapsed_since_end(&self, now: f64) -> Option<f64> {
        self.end_time.map(|end| now - end)
    }
}

/// Registry of connection records, keyed by initiating node.
#[derive(Debug, Default, Clone)]
pub struct ConnectionLedger {
    records: HashMap<NodeId, HashMap<NodeId, ConnectionRecord>>,
}

impl ConnectionLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Start (or resume) the session `from → to` at `now`.
    ///
    /// A known pair keeps its cumulative duration; only the session bounds
    /// reset.
    pub fn start(&mut self, from: NodeId, to: NodeId, now: f64) -> &ConnectionRecord {
        let record = self
            .records
            .entry(from)
            .or_default()
            .entry(to)
            .and_modify(|record| {
                record.start_time = now;
                record.end_time = None;
            })
            .or_insert_with(|| ConnectionRecord::open(from, to, now));
        record
    }

    /// End the session `from → to` at `now`.
    ///
    /// Returns the session's duration, or `None` if no session was running.
    pub fn end(&mut self, from: NodeId, to: NodeId, now: f64) -> Option<f64> {
        let record = self.records.get_mut(&from)?.get_mut(&to)?;
        if !record.is_active() {
            return None;
        }

        let session = now - record.start_time;
        record.end_time = Some(now);
        record.last_end = Some(now);
        record.total_duration += session;
        Some(session)
    }

    /// Get the record for `from → to`.
    pub fn get(&self, from: NodeId, to: NodeId) -> Option<&ConnectionRecord> {
        self.records.get(&from)?.get(&to)
    }

    /// Whether `from → to` is currently connected.
    pub fn is_active(&self, from: NodeId, to: NodeId) -> bool {
        self.get(from, to).is_some_and(ConnectionRecord::is_active)
    }

    /// All records initiated by `host`.
    pub fn connections_from(&self, host: NodeId) -> impl Iterator<Item = &ConnectionRecord> {
        self.records.get(&host).into_iter().flat_map(|m| m.values())
    }

    /// Cumulative duration of `a → b` at `now`; 0.0 if they never connected.
    pub fn total_duration(&self, a: NodeId, b: NodeId, now: f64) -> f64 {
        self.get(a, b).map(|r| r.duration(now)).unwrap_or(0.0)
    }

    /// Time since `a → b` last completed a session; `None` if it never did.
    pub fn recency(&self, a: NodeId, b: NodeId, now: f64) -> Option<f64> {
        self.get(a, b)?.last_end.map(|end| now - end)
    }

    /// Forget `from → to` entirely.
    pub fn remove(&mut self, from: NodeId, to: NodeId) -> Option<ConnectionRecord> {
        let inner = self.records.get_mut(&from)?;
        let removed = inner.remove(&to);
        if inner.is_empty() {
            self.records.remove(&from);
        }
        removed
    }

    /// Number of tracked pairs.
    pub fn len(&self) -> usize {
        self.records.values().map(HashMap::len).sum()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
