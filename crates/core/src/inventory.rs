//! Inventory module - spawnable stock per piece kind
//!
//! Starts at zero for every kind, grows through task-completion grants and
//! shrinks by one per spawn. Counters are unsigned and only decremented when
//! positive, so a count can never go negative.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::PieceKind;

/// Count of available pieces per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "BTreeMap<PieceKind, u32>", into = "BTreeMap<PieceKind, u32>")]
pub struct Inventory {
    counts: [u32; PieceKind::COUNT],
}

impl Inventory {
    /// Empty inventory
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from (kind, count) pairs; repeated kinds accumulate.
    pub fn from_counts(pairs: impl IntoIterator<Item = (PieceKind, u32)>) -> Self {
        let mut inv = Self::new();
        for (kind, n) in pairs {
            inv.add(kind, n);
        }
        inv
    }

    pub fn count(&self, kind: PieceKind) -> u32 {
        self.counts[kind.index()]
    }

    /// Total pieces across all kinds
    pub fn total(&self) -> u32 {
        self.counts.iter().fold(0u32, |acc, &n| acc.saturating_add(n))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&n| n == 0)
    }

    /// Kinds with a positive count, in table order.
    pub fn available(&self) -> impl Iterator<Item = PieceKind> + '_ {
        PieceKind::ALL
            .into_iter()
            .filter(move |kind| self.count(*kind) > 0)
    }

    /// Add `n` pieces of `kind` (saturating)
    pub fn add(&mut self, kind: PieceKind, n: u32) {
        let slot = &mut self.counts[kind.index()];
        *slot = slot.saturating_add(n);
    }

    /// Remove one piece of `kind`. Returns false (and changes nothing) when
    /// the kind is already at zero.
    pub fn remove_one(&mut self, kind: PieceKind) -> bool {
        let slot = &mut self.counts[kind.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    /// Copy with `n` more pieces of `kind`
    pub fn with_added(&self, kind: PieceKind, n: u32) -> Self {
        let mut next = *self;
        next.add(kind, n);
        next
    }

    /// Copy with one piece of `kind` taken, or `None` if there is none.
    pub fn taken(&self, kind: PieceKind) -> Option<Self> {
        let mut next = *self;
        next.remove_one(kind).then_some(next)
    }
}

impl From<BTreeMap<PieceKind, u32>> for Inventory {
    fn from(map: BTreeMap<PieceKind, u32>) -> Self {
        Self::from_counts(map)
    }
}

impl From<Inventory> for BTreeMap<PieceKind, u32> {
    fn from(inv: Inventory) -> Self {
        PieceKind::ALL
            .into_iter()
            .map(|kind| (kind, inv.count(kind)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let inv = Inventory::new();
        assert!(inv.is_empty());
        assert_eq!(inv.total(), 0);
        for kind in PieceKind::ALL {
            assert_eq!(inv.count(kind), 0);
        }
        assert_eq!(inv.available().count(), 0);
    }

    #[test]
    fn add_and_remove() {
        let mut inv = Inventory::new();
        inv.add(PieceKind::T, 2);
        assert_eq!(inv.count(PieceKind::T), 2);
        assert!(inv.remove_one(PieceKind::T));
        assert!(inv.remove_one(PieceKind::T));
        assert!(!inv.remove_one(PieceKind::T));
        assert_eq!(inv.count(PieceKind::T), 0);
    }

    #[test]
    fn taken_never_goes_negative() {
        let inv = Inventory::from_counts([(PieceKind::I, 1)]);
        let after = inv.taken(PieceKind::I).unwrap();
        assert_eq!(after.count(PieceKind::I), 0);
        assert!(after.taken(PieceKind::I).is_none());
        // Original untouched.
        assert_eq!(inv.count(PieceKind::I), 1);
    }

    #[test]
    fn available_in_table_order() {
        let inv = Inventory::from_counts([(PieceKind::L, 1), (PieceKind::I, 3), (PieceKind::L, 1)]);
        let kinds: Vec<_> = inv.available().collect();
        assert_eq!(kinds, vec![PieceKind::I, PieceKind::L]);
        assert_eq!(inv.count(PieceKind::L), 2);
        assert_eq!(inv.total(), 5);
    }

    #[test]
    fn add_saturates() {
        let inv = Inventory::from_counts([(PieceKind::O, u32::MAX)]).with_added(PieceKind::O, 5);
        assert_eq!(inv.count(PieceKind::O), u32::MAX);
    }

    #[test]
    fn map_conversion_roundtrip() {
        let inv = Inventory::from_counts([(PieceKind::S, 4), (PieceKind::J, 1)]);
        let map: BTreeMap<PieceKind, u32> = inv.into();
        assert_eq!(map.len(), PieceKind::COUNT);
        assert_eq!(map[&PieceKind::S], 4);
        assert_eq!(Inventory::from(map), inv);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn counts_match_a_plain_model(ops in prop::collection::vec((0usize..7, any::<bool>(), 0u32..4), 0..64)) {
                let mut inv = Inventory::new();
                let mut model = [0u32; PieceKind::COUNT];
                for (idx, add, n) in ops {
                    let kind = PieceKind::ALL[idx];
                    if add {
                        inv.add(kind, n);
                        model[idx] += n;
                    } else {
                        let removed = inv.remove_one(kind);
                        prop_assert_eq!(removed, model[idx] > 0);
                        model[idx] = model[idx].saturating_sub(1);
                    }
                }
                for kind in PieceKind::ALL {
                    prop_assert_eq!(inv.count(kind), model[kind.index()]);
                }
                prop_assert_eq!(inv.total(), model.iter().sum::<u32>());
                prop_assert_eq!(inv.is_empty(), model.iter().all(|&n| n == 0));
            }
        }
    }
}
