//! Strategy 3: two-way synchronization between tables that meet.
//!
//! Only the source's destinations are walked, so one pass can raise either
//! side. Pairs where either value is zero, or the values are equal, are
//! left alone. Entries naming the target's owner are skipped.

use ferry_ens::NodeId;
use tracing::debug;

use crate::ValueTable;

/// Reconcile `a` against `b`, then `b` against `a`.
///
/// Returns the total number of raised entries.
pub fn synchronize(a: &mut ValueTable, b: &mut ValueTable) -> usize {
    let first = sync_entries(a, b);
    let second = sync_entries(b, a);

    if first + second > 0 {
        debug!(
            "synchronized {} <-> {}: {} entries raised",
            a.owner(),
            b.owner(),
            first + second
        );
    }
    first + second
}

/// One directional pass driven by `source`'s destinations.
///
/// For every pair both tables hold with non-zero values, the lower side is
/// raised to the higher one. Returns how many entries were raised.
pub fn sync_entries(target: &mut ValueTable, source: &mut ValueTable) -> usize {
    let skip = target.owner();
    let mut raise_target: Vec<(NodeId, NodeId, f64)> = Vec::new();
    let mut raise_source: Vec<(NodeId, NodeId, f64)> = Vec::new();

    for destination in source.destinations().copied().filter(|d| *d != skip) {
        for (next_hop, source_value) in source.actions(destination) {
            if *next_hop == skip || !target.has_action(destination, *next_hop) {
                continue;
            }

            let target_value = target.get(destination, *next_hop);
            if target_value == 0.0 || *source_value == 0.0 {
                continue;
            }

            if target_value < *source_value {
                raise_target.push((destination, *next_hop, *source_value));
            } else if target_value > *source_value {
                raise_source.push((destination, *next_hop, target_value));
            }
        }
    }

    let raised = raise_target.len() + raise_source.len();
    for (destination, next_hop, value) in raise_target {
        target.set(destination, next_hop, value);
    }
    for (destination, next_hop, value) in raise_source {
        source.set(destination, next_hop, value);
    }
    raised
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: NodeId = NodeId(1);
    const B: NodeId = NodeId(2);
    const D: NodeId = NodeId(3);
    const N: NodeId = NodeId(4);

    #[test]
    fn lower_side_is_raised() {
        let mut a = ValueTable::new(A);
        let mut b = ValueTable::new(B);
        a.set(D, N, 0.3);
        b.set(D, N, 0.7);

        assert_eq!(synchronize(&mut a, &mut b), 1);
        assert_eq!(a.get(D, N), 0.7);
        assert_eq!(b.get(D, N), 0.7);
    }

    #[test]
    fn single_pass_can_raise_the_source() {
        let mut target = ValueTable::new(A);
        let mut source = ValueTable::new(B);
        target.set(D, N, 0.9);
        source.set(D, N, 0.2);

        assert_eq!(sync_entries(&mut target, &mut source), 1);
        assert_eq!(source.get(D, N), 0.9);
        assert_eq!(target.get(D, N), 0.9);
    }

    #[test]
    fn zero_and_missing_entries_untouched() {
        let mut a = ValueTable::new(A);
        let mut b = ValueTable::new(B);
        a.set(D, N, 0.0);
        b.set(D, N, 0.7);
        b.set(D, NodeId(5), 0.4);

        assert_eq!(synchronize(&mut a, &mut b), 0);
        assert_eq!(a.get(D, N), 0.0);
        assert!(!a.has_action(D, NodeId(5)));
    }

    #[test]
    fn equal_values_untouched() {
        let mut a = ValueTable::new(A);
        let mut b = ValueTable::new(B);
        a.set(D, N, 0.5);
        b.set(D, N, 0.5);
        assert_eq!(synchronize(&mut a, &mut b), 0);
    }

    #[test]
    fn target_owner_is_skipped() {
        let mut target = ValueTable::new(A);
        let mut source = ValueTable::new(B);

        // Destination equal to the target's owner.
        target.set(A, N, 0.1);
        source.set(A, N, 0.9);
        // Next hop equal to the target's owner.
        target.set(D, A, 0.1);
        source.set(D, A, 0.9);

        assert_eq!(sync_entries(&mut target, &mut source), 0);
        assert_eq!(target.get(A, N), 0.1);
        assert_eq!(target.get(D, A), 0.1);
    }

    #[test]
    fn synchronize_is_idempotent() {
        let mut a = ValueTable::new(A);
        let mut b = ValueTable::new(B);
        a.set(D, N, 0.3);
        a.set(N, D, 0.8);
        b.set(D, N, 0.6);
        b.set(N, D, 0.2);

        assert_eq!(synchronize(&mut a, &mut b), 2);
        assert_eq!(synchronize(&mut a, &mut b), 0);
        assert_eq!(a, {
            let mut expected = ValueTable::new(A);
            expected.set(D, N, 0.6);
            expected.set(N, D, 0.8);
            expected
        });
    }
}
