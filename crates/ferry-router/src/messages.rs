//! Per-node message priorities.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Latest priority verdict per message id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessagePriorityTable {
    priorities: HashMap<String, f64>,
}

impl MessagePriorityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or replace the priority of `message_id`.
    pub fn update(&mut self, message_id: impl Into<String>, priority: f64) {
        self.priorities.insert(message_id.into(), priority);
    }

    /// Stored priority; 0.0 for unknown messages.
    pub fn priority(&self, message_id: &str) -> f64 {
        self.priorities.get(message_id).copied().unwrap_or(0.0)
    }

    pub fn remove(&mut self, message_id: &str) -> Option<f64> {
        self.priorities.remove(message_id)
    }

    pub fn contains(&self, message_id: &str) -> bool {
        self.priorities.contains_key(message_id)
    }

    /// Messages by descending priority, ties by id.
    pub fn prioritized(&self) -> Vec<(&str, f64)> {
        let mut list: Vec<(&str, f64)> = self
            .priorities
            .iter()
            .map(|(id, priority)| (id.as_str(), *priority))
            .collect();
        list.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        list
    }

    pub fn len(&self) -> usize {
        self.priorities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.priorities.is_empty()
    }
}
