//! Commands accepted by a [`Session`](crate::Session) and their results.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use focusblocks_core::types::{
    GameAction, PieceKind, Task, TaskId, Weights, COMPLEXITY_MAX, EFFORT_MAX, ENERGY_FIT_MAX,
    IMPACT_MAX, URGENCY_MAX,
};
use focusblocks_core::Stall;

/// Fields a user supplies for a new task. The session assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub impact: u8,
    pub urgency: u8,
    pub energy_fit: u8,
    pub complexity: u8,
    pub effort: u8,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Creation time, milliseconds since the Unix epoch (host clock).
    #[serde(default)]
    pub created_at: u64,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        let defaults = Task::new(0, "");
        Self {
            title: title.into(),
            impact: defaults.impact,
            urgency: defaults.urgency,
            energy_fit: defaults.energy_fit,
            complexity: defaults.complexity,
            effort: defaults.effort,
            tags: Vec::new(),
            created_at: 0,
        }
    }

    pub(crate) fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title,
            impact: self.impact,
            urgency: self.urgency,
            energy_fit: self.energy_fit,
            complexity: self.complexity,
            effort: self.effort,
            tags: self.tags,
            completed: false,
            created_at: self.created_at,
        }
    }
}

/// Ranking attribute of a task, for in-place edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskField {
    Impact,
    Urgency,
    EnergyFit,
    Complexity,
    Effort,
}

impl TaskField {
    pub const ALL: [TaskField; 5] = [
        TaskField::Impact,
        TaskField::Urgency,
        TaskField::EnergyFit,
        TaskField::Complexity,
        TaskField::Effort,
    ];

    /// Upper bound of the attribute's scale
    pub fn max(self) -> u8 {
        match self {
            TaskField::Impact => IMPACT_MAX,
            TaskField::Urgency => URGENCY_MAX,
            TaskField::EnergyFit => ENERGY_FIT_MAX,
            TaskField::Complexity => COMPLEXITY_MAX,
            TaskField::Effort => EFFORT_MAX,
        }
    }

    pub fn get(self, task: &Task) -> u8 {
        match self {
            TaskField::Impact => task.impact,
            TaskField::Urgency => task.urgency,
            TaskField::EnergyFit => task.energy_fit,
            TaskField::Complexity => task.complexity,
            TaskField::Effort => task.effort,
        }
    }

    /// Copy of `task` with this attribute moved by `delta`, clamped to its scale.
    pub fn adjusted(self, task: &Task, delta: i8) -> Task {
        let value = (i16::from(self.get(task)) + i16::from(delta)).clamp(0, i16::from(self.max())) as u8;
        let mut next = task.clone();
        match self {
            TaskField::Impact => next.impact = value,
            TaskField::Urgency => next.urgency = value,
            TaskField::EnergyFit => next.energy_fit = value,
            TaskField::Complexity => next.complexity = value,
            TaskField::Effort => next.effort = value,
        }
        next
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskField::Impact => "impact",
            TaskField::Urgency => "urgency",
            TaskField::EnergyFit => "energy_fit",
            TaskField::Complexity => "complexity",
            TaskField::Effort => "effort",
        }
    }
}

/// One mutation of session state. Every change goes through one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Gravity step (or spawn attempt while idle)
    Tick,
    /// Player input on the falling piece
    Action(GameAction),
    TogglePause,
    /// New round on a fresh garbage board
    Restart,
    AddTask(TaskDraft),
    /// Replace title, attributes and tags of an existing task
    EditTask(Task),
    ToggleTask(TaskId),
    DeleteTask(TaskId),
    SetWeights(Weights),
}

impl Command {
    /// Whether a successful application changes persisted data.
    pub fn touches_profile(&self) -> bool {
        matches!(
            self,
            Command::AddTask(_)
                | Command::EditTask(_)
                | Command::ToggleTask(_)
                | Command::DeleteTask(_)
                | Command::SetWeights(_)
        )
    }
}

/// What a successfully applied command did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// State advanced
    Applied,
    /// Nothing changed (paused, no active piece, blocked move)
    Ignored,
    /// The game is idle and could not spawn
    Stalled(Stall),
    TaskAdded(TaskId),
    TaskUpdated(TaskId),
    /// Task completed for the first time since it was last open
    Rewarded { task: TaskId, granted: Vec<PieceKind> },
    /// Task moved back to open; earlier grants are kept
    Reopened(TaskId),
    TaskRemoved(TaskId),
}

/// Command rejection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("no task with id {0}")]
    UnknownTask(TaskId),
    #[error("task title must not be empty")]
    EmptyTitle,
    #[error("task attribute `{field}` is {value}, above its maximum {max}")]
    AttributeOutOfRange {
        field: &'static str,
        value: u8,
        max: u8,
    },
    #[error("weights must be finite and non-negative")]
    InvalidWeights,
}

impl CommandError {
    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            CommandError::UnknownTask(_) => "unknown_task",
            CommandError::EmptyTitle | CommandError::AttributeOutOfRange { .. } => "invalid_task",
            CommandError::InvalidWeights => "invalid_weights",
        }
    }
}
