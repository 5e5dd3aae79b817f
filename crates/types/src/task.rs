//! Task and weight data as stored by the host.

use serde::{Deserialize, Serialize};

/// Maximum of the impact scale (0..=10).
pub const IMPACT_MAX: u8 = 10;
/// Maximum of the urgency scale (0..=10).
pub const URGENCY_MAX: u8 = 10;
/// Maximum of the energy-fit scale (0..=5).
pub const ENERGY_FIT_MAX: u8 = 5;
/// Maximum of the complexity scale (0..=5).
pub const COMPLEXITY_MAX: u8 = 5;
/// Maximum of the effort scale, in focus sessions (0..=8).
pub const EFFORT_MAX: u8 = 8;

pub type TaskId = u64;

/// A user task with its five ranking attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub impact: u8,
    pub urgency: u8,
    pub energy_fit: u8,
    pub complexity: u8,
    pub effort: u8,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub completed: bool,
    /// Creation time, milliseconds since the Unix epoch.
    #[serde(default)]
    pub created_at: u64,
}

impl Task {
    /// Create an open task with mid-scale attributes.
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            impact: IMPACT_MAX / 2,
            urgency: URGENCY_MAX / 2,
            energy_fit: ENERGY_FIT_MAX / 2,
            complexity: COMPLEXITY_MAX / 2,
            effort: 1,
            tags: Vec::new(),
            completed: false,
            created_at: 0,
        }
    }

    /// Set the completion flag.
    ///
    /// Returns true only for an open -> completed transition, which is the
    /// one that earns a reward.
    pub fn set_completed(&mut self, completed: bool) -> bool {
        let rewarded = completed && !self.completed;
        self.completed = completed;
        rewarded
    }

    /// Flip the completion flag. Same return contract as [`Task::set_completed`].
    pub fn toggle_completed(&mut self) -> bool {
        self.set_completed(!self.completed)
    }

    /// Check every attribute against its scale.
    pub fn attributes_in_range(&self) -> bool {
        self.impact <= IMPACT_MAX
            && self.urgency <= URGENCY_MAX
            && self.energy_fit <= ENERGY_FIT_MAX
            && self.complexity <= COMPLEXITY_MAX
            && self.effort <= EFFORT_MAX
    }
}

/// Ranking weights shared by every task.
///
/// No invariant forces the weights to sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub impact: f64,
    pub urgency: f64,
    pub energy_fit: f64,
    pub complexity: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            impact: 1.0,
            urgency: 1.0,
            energy_fit: 0.5,
            complexity: 0.5,
        }
    }
}
