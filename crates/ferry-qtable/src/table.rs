//! The per-node value table.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use ferry_ens::NodeId;
use tracing::info;

use crate::Result;

/// Upper bound of every stored value.
pub const MAX_VALUE: f64 = 1.0;

/// Column width of the pivot export.
const PIVOT_WIDTH: usize = 12;

/// Column width of the console rendering.
const DISPLAY_WIDTH: usize = 10;

/// Learned value of forwarding via `next_hop` toward `destination`.
///
/// Absent pairs read as 0.0. Entries are never deleted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueTable {
    owner: NodeId,
    /// destination → (next hop → value)
    entries: HashMap<NodeId, HashMap<NodeId, f64>>,
}

impl ValueTable {
    /// Create an empty table for `owner`.
    pub fn new(owner: NodeId) -> Self {
        Self {
            owner,
            entries: HashMap::new(),
        }
    }

    pub fn owner(&self) -> NodeId {
        self.owner
    }

    /// Seed every `(destination, next hop)` pair not involving the owner
    /// with 0.0. Existing values are kept.
    pub fn initialize_all<'a, I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = &'a NodeId>,
        I::IntoIter: Clone,
    {
        let ids = ids.into_iter();
        for destination in ids.clone().filter(|id| **id != self.owner) {
            let actions = self.entries.entry(*destination).or_default();
            for next_hop in ids.clone().filter(|id| **id != self.owner) {
                actions.entry(*next_hop).or_insert(0.0);
            }
        }
    }

    /// Stored value, or 0.0 if the pair was never written.
    pub fn get(&self, destination: NodeId, next_hop: NodeId) -> f64 {
        self.entries
            .get(&destination)
            .and_then(|actions| actions.get(&next_hop))
            .copied()
            .unwrap_or(0.0)
    }

    /// Store `min(value, 1.0)`.
    pub fn set(&mut self, destination: NodeId, next_hop: NodeId, value: f64) {
        self.entries
            .entry(destination)
            .or_default()
            .insert(next_hop, value.min(MAX_VALUE));
    }

    /// Whether the pair has ever been written.
    pub fn has_action(&self, destination: NodeId, next_hop: NodeId) -> bool {
        self.entries
            .get(&destination)
            .is_some_and(|actions| actions.contains_key(&next_hop))
    }

    /// Largest value toward `destination` over `candidates` as next hops.
    ///
    /// 0.0 when there are no candidates. Negative values are reported as is.
    pub fn max_over<'a, I>(&self, destination: NodeId, candidates: I) -> f64
    where
        I: IntoIterator<Item = &'a NodeId>,
    {
        let max = candidates
            .into_iter()
            .map(|candidate| self.get(destination, *candidate))
            .fold(f64::NEG_INFINITY, f64::max);

        if max == f64::NEG_INFINITY {
            0.0
        } else {
            max
        }
    }

    /// Destinations with at least one action.
    pub fn destinations(&self) -> impl Iterator<Item = &NodeId> {
        self.entries.keys()
    }

    /// `(next hop, value)` pairs known for `destination`.
    pub fn actions(&self, destination: NodeId) -> impl Iterator<Item = (&NodeId, &f64)> {
        self.entries
            .get(&destination)
            .into_iter()
            .flat_map(|actions| actions.iter())
    }

    /// Every next hop seen under any destination, ascending.
    pub fn next_hops(&self) -> BTreeSet<NodeId> {
        self.entries
            .values()
            .flat_map(|actions| actions.keys().copied())
            .collect()
    }

    /// Number of stored pairs.
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn entries_mut(&mut self) -> impl Iterator<Item = (&NodeId, &mut HashMap<NodeId, f64>)> {
        self.entries.iter_mut()
    }

    /// Write the table as a fixed-width pivot block.
    ///
    /// One `Action <id>` column per next hop and one `State <id>` row per
    /// destination, both ascending, cells with four decimals. A blank line
    /// ends the block.
    pub fn write_pivot<W: Write>(&self, writer: &mut W) -> Result<()> {
        let next_hops = self.next_hops();
        let destinations: BTreeSet<NodeId> = self.entries.keys().copied().collect();

        write!(writer, "{:<PIVOT_WIDTH$}", format!("Qtab nd {}", self.owner))?;
        for next_hop in &next_hops {
            write!(writer, "{:<PIVOT_WIDTH$}", format!("Action {next_hop}"))?;
        }
        writeln!(writer)?;

        for destination in &destinations {
            write!(writer, "{:<PIVOT_WIDTH$}", format!("State {destination}"))?;
            for next_hop in &next_hops {
                let value = format!("{:.4}", self.get(*destination, *next_hop));
                write!(writer, "{value:<PIVOT_WIDTH$}")?;
            }
            writeln!(writer)?;
        }

        writeln!(writer)?;
        Ok(())
    }

    /// Write the pivot block to `path`, appending or truncating.
    pub fn export_pivot(&self, path: impl AsRef<Path>, append: bool) -> Result<()> {
        let path = path.as_ref();
        info!("Exporting value table of node {} to {}", self.owner, path.display());

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;

        let mut writer = BufWriter::new(file);
        self.write_pivot(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

impl fmt::Display for ValueTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let next_hops = self.next_hops();
        let destinations: BTreeSet<NodeId> = self.entries.keys().copied().collect();

        write!(f, "{:<DISPLAY_WIDTH$}", format!("Qtab Nd{}", self.owner))?;
        for next_hop in &next_hops {
            write!(f, "{:>DISPLAY_WIDTH$}", format!("Act {next_hop}"))?;
        }
        writeln!(f)?;

        for destination in &destinations {
            write!(f, "{:<DISPLAY_WIDTH$}", format!("State{destination}"))?;
            for next_hop in &next_hops {
                write!(f, "{:>DISPLAY_WIDTH$.4}", self.get(*destination, *next_hop))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ids(raw: &[u64]) -> Vec<NodeId> {
        raw.iter().copied().map(NodeId).collect()
    }

    #[test]
    fn absent_reads_zero() {
        let table = ValueTable::new(NodeId(0));
        assert_eq!(table.get(NodeId(1), NodeId(2)), 0.0);
        assert!(!table.has_action(NodeId(1), NodeId(2)));
        assert!(table.is_empty());
    }

    #[test]
    fn set_clamps_above_one() {
        let mut table = ValueTable::new(NodeId(0));
        table.set(NodeId(1), NodeId(2), 1.7);
        assert_eq!(table.get(NodeId(1), NodeId(2)), 1.0);
        table.set(NodeId(1), NodeId(2), 0.3);
        assert_eq!(table.get(NodeId(1), NodeId(2)), 0.3);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn max_over_candidates_only() {
        let mut table = ValueTable::new(NodeId(0));
        table.set(NodeId(9), NodeId(1), 0.2);
        table.set(NodeId(9), NodeId(2), 0.8);
        table.set(NodeId(9), NodeId(3), 0.5);

        let candidates = ids(&[1, 3]);
        assert_eq!(table.max_over(NodeId(9), &candidates), 0.5);
    }

    #[test]
    fn max_over_empty_is_zero() {
        let mut table = ValueTable::new(NodeId(0));
        table.set(NodeId(9), NodeId(1), 0.4);

        let none: Vec<NodeId> = Vec::new();
        assert_eq!(table.max_over(NodeId(9), &none), 0.0);

        let unknown = ids(&[7, 8]);
        assert_eq!(table.max_over(NodeId(9), &unknown), 0.0);
    }

    #[test]
    fn max_over_keeps_negative_values() {
        let mut table = ValueTable::new(NodeId(0));
        table.set(NodeId(9), NodeId(1), -0.5);
        table.set(NodeId(9), NodeId(2), -0.2);

        assert_eq!(table.max_over(NodeId(9), &ids(&[1])), -0.5);
        assert_eq!(table.max_over(NodeId(9), &ids(&[1, 2])), -0.2);
        // An unknown candidate reads 0.0 and wins.
        assert_eq!(table.max_over(NodeId(9), &ids(&[1, 5])), 0.0);
    }

    #[test]
    fn initialize_all_skips_owner() {
        let mut table = ValueTable::new(NodeId(1));
        table.set(NodeId(2), NodeId(3), 0.7);
        table.initialize_all(&ids(&[1, 2, 3]));

        assert_eq!(table.len(), 4);
        assert!(table.has_action(NodeId(2), NodeId(2)));
        assert!(!table.has_action(NodeId(1), NodeId(2)));
        assert!(!table.has_action(NodeId(2), NodeId(1)));
        assert_eq!(table.get(NodeId(2), NodeId(3)), 0.7);
    }

    #[test]
    fn pivot_layout() {
        let mut table = ValueTable::new(NodeId(1));
        table.set(NodeId(3), NodeId(2), 0.5);
        table.set(NodeId(2), NodeId(3), 0.25);

        let mut out = Vec::new();
        table.write_pivot(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let expected = concat!(
            "Qtab nd 1   Action 2    Action 3    \n",
            "State 2     0.0000      0.2500      \n",
            "State 3     0.5000      0.0000      \n",
            "\n",
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn pivot_of_empty_table_is_header_only() {
        let table = ValueTable::new(NodeId(4));
        let mut out = Vec::new();
        table.write_pivot(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Qtab nd 4   \n\n");
    }

    #[test]
    fn export_truncates_or_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qtable.txt");

        let mut table = ValueTable::new(NodeId(1));
        table.set(NodeId(2), NodeId(2), 0.5);
        let before = table.clone();

        table.export_pivot(&path, false).unwrap();
        let once = std::fs::read_to_string(&path).unwrap();

        table.export_pivot(&path, true).unwrap();
        let twice = std::fs::read_to_string(&path).unwrap();
        assert_eq!(twice, once.repeat(2));

        table.export_pivot(&path, false).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), once);

        assert_eq!(table, before);
    }

    #[test]
    fn export_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("qtable.txt");
        let table = ValueTable::new(NodeId(1));
        assert!(matches!(
            table.export_pivot(&path, false),
            Err(crate::Error::Io(_))
        ));
    }

    #[test]
    fn display_renders_console_table() {
        let mut table = ValueTable::new(NodeId(1));
        table.set(NodeId(2), NodeId(3), 0.5);

        let rendered = table.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Qtab Nd1       Act 3");
        assert_eq!(lines[1], "State2        0.5000");
    }

    proptest! {
        #[test]
        fn stored_values_never_exceed_one(
            writes in prop::collection::vec((0u64..5, 0u64..5, -2.0f64..5.0), 0..50)
        ) {
            let mut table = ValueTable::new(NodeId(0));
            for (d, n, v) in writes {
                table.set(NodeId(d), NodeId(n), v);
            }
            for d in 0..5 {
                for n in 0..5 {
                    prop_assert!(table.get(NodeId(d), NodeId(n)) <= 1.0);
                }
            }
        }
    }
}
