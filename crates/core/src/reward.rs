//! Reward module - random piece grants for completed tasks

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::inventory::Inventory;
use crate::rng::RandomSource;
use crate::types::{PieceKind, DEFAULT_GRANT_MAX, DEFAULT_GRANT_MIN};

/// Grant `min..=max` random pieces, each kind drawn independently and uniformly.
///
/// `max` below `min` is raised to `min`. Returns the new inventory together
/// with the granted kinds in draw order (duplicates allowed).
pub fn grant_random_pieces<R: RandomSource>(
    inventory: &Inventory,
    min: u32,
    max: u32,
    rng: &mut R,
) -> (Inventory, Vec<PieceKind>) {
    let count = rng.range_inclusive(min, max);
    let mut next = *inventory;
    let mut granted = Vec::with_capacity(count as usize);

    for _ in 0..count {
        let kind = PieceKind::ALL[rng.next_range(PieceKind::COUNT as u32) as usize];
        next.add(kind, 1);
        granted.push(kind);
    }

    debug!(count, total = next.total(), "granted pieces");
    (next, granted)
}

/// How many pieces a completed task earns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrantPolicy {
    pub min: u32,
    pub max: u32,
}

impl GrantPolicy {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max: max.max(min) }
    }

    /// Apply the policy to `inventory`
    pub fn grant<R: RandomSource>(&self, inventory: &Inventory, rng: &mut R) -> (Inventory, Vec<PieceKind>) {
        grant_random_pieces(inventory, self.min, self.max, rng)
    }
}

impl Default for GrantPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_GRANT_MIN, DEFAULT_GRANT_MAX)
    }
}

/// Running reward counters kept alongside the inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardTally {
    pub tasks_completed: u32,
    pub pieces_granted: u32,
}

impl RewardTally {
    /// Record one completion and the pieces it earned
    pub fn record(&mut self, granted: usize) {
        self.tasks_completed = self.tasks_completed.saturating_add(1);
        self.pieces_granted = self
            .pieces_granted
            .saturating_add(u32::try_from(granted).unwrap_or(u32::MAX));
    }
}
