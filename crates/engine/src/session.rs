//! Session - the single writer over game, inventory and tasks
//!
//! UI events and tick events are both turned into [`Command`]s and applied
//! here in arrival order, so no two logical operations ever interleave.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use focusblocks_core::types::{
    Task, TaskId, Weights, COMPLEXITY_MAX, DEFAULT_GARBAGE_ROWS,
    EFFORT_MAX, ENERGY_FIT_MAX, IMPACT_MAX, URGENCY_MAX,
};
use focusblocks_core::{
    fill_garbage, rank_tasks, recommend, Board, GameState, GrantPolicy, Inventory, RandomSource,
    RewardTally,
};

use crate::command::{Command, CommandError, Outcome, TaskDraft};

/// Persisted user data: everything except the running game
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub tasks: Vec<Task>,
    pub weights: Weights,
    pub inventory: Inventory,
    pub rewards: RewardTally,
}

/// Gameplay knobs fixed for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Garbage rows on every fresh board
    pub garbage_rows: u8,
    pub grant: GrantPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            garbage_rows: DEFAULT_GARBAGE_ROWS,
            grant: GrantPolicy::default(),
        }
    }
}

pub struct Session<R: RandomSource> {
    config: SessionConfig,
    game: GameState,
    paused: bool,
    profile: Profile,
    next_id: TaskId,
    rng: R,
}

impl<R: RandomSource> Session<R> {
    /// Start a session on a fresh garbage board.
    pub fn new(config: SessionConfig, profile: Profile, mut rng: R) -> Self {
        let game = GameState::with_garbage(config.garbage_rows, &mut rng);
        let next_id = profile
            .tasks
            .iter()
            .map(|t| t.id)
            .max()
            .map_or(1, |id| id.saturating_add(1));
        info!(
            tasks = profile.tasks.len(),
            pieces = profile.inventory.total(),
            "session started"
        );
        Self {
            config,
            game,
            paused: false,
            profile,
            next_id,
            rng,
        }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn inventory(&self) -> &Inventory {
        &self.profile.inventory
    }

    pub fn tasks(&self) -> &[Task] {
        &self.profile.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.profile.tasks.iter().find(|t| t.id == id)
    }

    pub fn weights(&self) -> &Weights {
        &self.profile.weights
    }

    pub fn rewards(&self) -> &RewardTally {
        &self.profile.rewards
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Tasks with their scores, highest first
    pub fn ranked(&self) -> Vec<(&Task, f64)> {
        rank_tasks(&self.profile.tasks, &self.profile.weights)
    }

    /// Best open task to focus on next
    pub fn recommended(&self) -> Option<&Task> {
        recommend(&self.profile.tasks, &self.profile.weights)
    }

    /// Apply one command
    pub fn apply(&mut self, command: Command) -> Result<Outcome, CommandError> {
        match command {
            Command::Tick => Ok(self.tick()),
            Command::Action(action) => {
                if self.paused {
                    return Ok(Outcome::Ignored);
                }
                Ok(self.replace_game(self.game.apply_action(action)))
            }
            Command::TogglePause => {
                self.paused = !self.paused;
                debug!(paused = self.paused, "pause toggled");
                Ok(Outcome::Applied)
            }
            Command::Restart => {
                // The falling piece was paid for; hand it back.
                if let Some(active) = self.game.active() {
                    self.profile.inventory.add(active.kind, 1);
                }
                let board = fill_garbage(Board::new(), self.config.garbage_rows, &mut self.rng);
                self.game = self.game.restart(board);
                self.paused = false;
                Ok(Outcome::Applied)
            }
            Command::AddTask(draft) => self.add_task(draft),
            Command::EditTask(task) => self.edit_task(task),
            Command::ToggleTask(id) => self.toggle_task(id),
            Command::DeleteTask(id) => self.delete_task(id),
            Command::SetWeights(weights) => {
                let valid = [weights.impact, weights.urgency, weights.energy_fit, weights.complexity]
                    .iter()
                    .all(|w| w.is_finite() && *w >= 0.0);
                if !valid {
                    return Err(CommandError::InvalidWeights);
                }
                self.profile.weights = weights;
                Ok(Outcome::Applied)
            }
        }
    }

    fn tick(&mut self) -> Outcome {
        if self.paused {
            return Outcome::Ignored;
        }
        let lines_before = self.game.lines();
        let (game, inventory) = self.game.tick(&self.profile.inventory, &mut self.rng);
        self.game = game;
        self.profile.inventory = inventory;

        let cleared = self.game.lines() - lines_before;
        if cleared > 0 {
            info!(cleared, score = self.game.score(), "lines cleared");
        }
        match self.game.stall() {
            Some(stall) if self.game.is_stalled() => Outcome::Stalled(stall),
            _ => Outcome::Applied,
        }
    }

    fn replace_game(&mut self, next: GameState) -> Outcome {
        if next == self.game {
            return Outcome::Ignored;
        }
        self.game = next;
        Outcome::Applied
    }

    fn add_task(&mut self, draft: TaskDraft) -> Result<Outcome, CommandError> {
        let id = self.next_id;
        let task = draft.into_task(id);
        validate(&task)?;
        self.next_id = self.next_id.saturating_add(1);
        debug!(id, title = %task.title, "task added");
        self.profile.tasks.push(task);
        Ok(Outcome::TaskAdded(id))
    }

    fn edit_task(&mut self, edited: Task) -> Result<Outcome, CommandError> {
        validate(&edited)?;
        let task = self.task_mut(edited.id)?;
        task.title = edited.title;
        task.impact = edited.impact;
        task.urgency = edited.urgency;
        task.energy_fit = edited.energy_fit;
        task.complexity = edited.complexity;
        task.effort = edited.effort;
        task.tags = edited.tags;
        Ok(Outcome::TaskUpdated(edited.id))
    }

    fn toggle_task(&mut self, id: TaskId) -> Result<Outcome, CommandError> {
        let rewarded = self.task_mut(id)?.toggle_completed();
        if !rewarded {
            debug!(id, "task reopened");
            return Ok(Outcome::Reopened(id));
        }

        let (inventory, granted) = self.config.grant.grant(&self.profile.inventory, &mut self.rng);
        self.profile.inventory = inventory;
        self.profile.rewards.record(granted.len());
        info!(
            id,
            granted = granted.len(),
            total = self.profile.inventory.total(),
            "task completed, pieces granted"
        );
        Ok(Outcome::Rewarded { task: id, granted })
    }

    fn delete_task(&mut self, id: TaskId) -> Result<Outcome, CommandError> {
        let pos = self
            .profile
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(CommandError::UnknownTask(id))?;
        self.profile.tasks.remove(pos);
        debug!(id, "task removed");
        Ok(Outcome::TaskRemoved(id))
    }

    fn task_mut(&mut self, id: TaskId) -> Result<&mut Task, CommandError> {
        self.profile
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(CommandError::UnknownTask(id))
    }
}

fn validate(task: &Task) -> Result<(), CommandError> {
    if task.title.trim().is_empty() {
        return Err(CommandError::EmptyTitle);
    }
    let fields = [
        ("impact", task.impact, IMPACT_MAX),
        ("urgency", task.urgency, URGENCY_MAX),
        ("energy_fit", task.energy_fit, ENERGY_FIT_MAX),
        ("complexity", task.complexity, COMPLEXITY_MAX),
        ("effort", task.effort, EFFORT_MAX),
    ];
    for (field, value, max) in fields {
        if value > max {
            return Err(CommandError::AttributeOutOfRange { field, value, max });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use focusblocks_core::types::{GameAction, PieceKind};
    use focusblocks_core::{SequenceRng, SimpleRng, Stall};

    fn session() -> Session<SimpleRng> {
        let config = SessionConfig {
            garbage_rows: 0,
            grant: GrantPolicy::new(2, 2),
        };
        Session::new(config, Profile::default(), SimpleRng::new(42))
    }

    fn add(session: &mut Session<SimpleRng>, title: &str) -> TaskId {
        match session.apply(Command::AddTask(TaskDraft::new(title))).unwrap() {
            Outcome::TaskAdded(id) => id,
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn ids_are_assigned_in_order() {
        let mut s = session();
        assert_eq!(add(&mut s, "a"), 1);
        assert_eq!(add(&mut s, "b"), 2);
        s.apply(Command::DeleteTask(2)).unwrap();
        assert_eq!(add(&mut s, "c"), 3);
        assert_eq!(s.tasks().len(), 2);
    }

    #[test]
    fn ids_continue_after_loaded_tasks() {
        let profile = Profile {
            tasks: vec![Task::new(7, "old")],
            ..Profile::default()
        };
        let mut s = Session::new(SessionConfig::default(), profile, SimpleRng::new(1));
        assert_eq!(
            s.apply(Command::AddTask(TaskDraft::new("new"))).unwrap(),
            Outcome::TaskAdded(8)
        );
    }

    #[test]
    fn invalid_drafts_are_rejected() {
        let mut s = session();
        let err = s.apply(Command::AddTask(TaskDraft::new("  "))).unwrap_err();
        assert_eq!(err, CommandError::EmptyTitle);

        let mut draft = TaskDraft::new("too much");
        draft.effort = 9;
        let err = s.apply(Command::AddTask(draft)).unwrap_err();
        assert_eq!(err.code(), "invalid_task");
        assert!(s.tasks().is_empty());
    }

    #[test]
    fn completing_grants_once() {
        let mut s = session();
        let id = add(&mut s, "ship it");

        let (task, granted) = match s.apply(Command::ToggleTask(id)).unwrap() {
            Outcome::Rewarded { task, granted } => (task, granted),
            other => panic!("expected reward, got {other:?}"),
        };
        assert_eq!(task, id);
        assert_eq!(granted.len(), 2);
        assert_eq!(s.inventory().total(), 2);
        assert_eq!(s.rewards().tasks_completed, 1);
        assert_eq!(s.rewards().pieces_granted, 2);

        // Reopening keeps the pieces.
        assert_eq!(s.apply(Command::ToggleTask(id)).unwrap(), Outcome::Reopened(id));
        assert_eq!(s.inventory().total(), 2);

        // Completing again earns again.
        s.apply(Command::ToggleTask(id)).unwrap();
        assert_eq!(s.inventory().total(), 4);
    }

    #[test]
    fn unknown_ids_error() {
        let mut s = session();
        for cmd in [
            Command::ToggleTask(99),
            Command::DeleteTask(99),
            Command::EditTask(Task::new(99, "x")),
        ] {
            let err = s.apply(cmd).unwrap_err();
            assert_eq!(err, CommandError::UnknownTask(99));
            assert_eq!(err.code(), "unknown_task");
        }
    }

    #[test]
    fn edit_keeps_completion_and_creation_time() {
        let mut s = session();
        let id = add(&mut s, "draft");
        s.apply(Command::ToggleTask(id)).unwrap();

        let mut edited = Task::new(id, "final");
        edited.impact = 9;
        edited.created_at = 12345;
        s.apply(Command::EditTask(edited)).unwrap();

        let task = s.task(id).unwrap();
        assert_eq!(task.title, "final");
        assert_eq!(task.impact, 9);
        assert!(task.completed);
        assert_eq!(task.created_at, 0);
    }

    #[test]
    fn ticks_spawn_from_inventory_then_stall() {
        let mut s = session();
        assert_eq!(
            s.apply(Command::Tick).unwrap(),
            Outcome::Stalled(Stall::OutOfPieces)
        );

        let id = add(&mut s, "earn");
        s.apply(Command::ToggleTask(id)).unwrap();
        assert_eq!(s.apply(Command::Tick).unwrap(), Outcome::Applied);
        assert!(s.game().is_falling());
        assert_eq!(s.inventory().total(), 1);

        s.apply(Command::Action(GameAction::HardDrop)).unwrap();
        s.apply(Command::Tick).unwrap();
        s.apply(Command::Action(GameAction::HardDrop)).unwrap();
        assert!(s.inventory().is_empty());
        assert_eq!(
            s.apply(Command::Tick).unwrap(),
            Outcome::Stalled(Stall::OutOfPieces)
        );
        assert_eq!(s.game().pieces_placed(), 2);
    }

    #[test]
    fn pause_freezes_game() {
        let mut s = session();
        let id = add(&mut s, "earn");
        s.apply(Command::ToggleTask(id)).unwrap();
        s.apply(Command::Tick).unwrap();
        let before = s.game().clone();

        s.apply(Command::TogglePause).unwrap();
        assert!(s.is_paused());
        assert_eq!(s.apply(Command::Tick).unwrap(), Outcome::Ignored);
        assert_eq!(
            s.apply(Command::Action(GameAction::MoveLeft)).unwrap(),
            Outcome::Ignored
        );
        assert_eq!(s.game(), &before);

        s.apply(Command::TogglePause).unwrap();
        assert_eq!(s.apply(Command::Tick).unwrap(), Outcome::Applied);
    }

    #[test]
    fn restart_clears_score_and_unpauses() {
        let profile = Profile {
            inventory: Inventory::from_counts([(PieceKind::O, 3)]),
            ..Profile::default()
        };
        let config = SessionConfig {
            garbage_rows: 2,
            grant: GrantPolicy::default(),
        };
        let mut s = Session::new(config, profile, SequenceRng::new(vec![0, 1, 2, 3]));
        s.apply(Command::Tick).unwrap();
        s.apply(Command::TogglePause).unwrap();
        s.apply(Command::Restart).unwrap();
        assert!(!s.is_paused());
        assert!(!s.game().is_falling());
        assert_eq!(s.game().score(), 0);
        let board = s.game().board();
        assert!(board.is_row_empty(0));
        assert!(!board.is_row_full(18));
        assert!(!board.is_row_full(19));
        // The piece that was falling goes back to the inventory.
        assert_eq!(s.inventory().count(PieceKind::O), 3);
    }

    #[test]
    fn restart_while_idle_refunds_nothing() {
        let profile = Profile {
            inventory: Inventory::from_counts([(PieceKind::T, 1)]),
            ..Profile::default()
        };
        let mut s = Session::new(SessionConfig::default(), profile, SimpleRng::new(5));
        s.apply(Command::Tick).unwrap();
        s.apply(Command::Action(GameAction::HardDrop)).unwrap();
        assert!(!s.game().is_falling());

        s.apply(Command::Restart).unwrap();
        assert!(s.inventory().is_empty());
        assert_eq!(s.game().pieces_placed(), 0);
    }

    #[test]
    fn weights_must_be_sane() {
        let mut s = session();
        let bad = Weights {
            impact: -1.0,
            ..Weights::default()
        };
        assert_eq!(
            s.apply(Command::SetWeights(bad)).unwrap_err(),
            CommandError::InvalidWeights
        );
        let good = Weights {
            impact: 3.0,
            ..Weights::default()
        };
        s.apply(Command::SetWeights(good)).unwrap();
        assert_eq!(s.weights().impact, 3.0);
    }

    #[test]
    fn ranking_and_recommendation_follow_weights() {
        let mut s = session();
        let mut quick = TaskDraft::new("quick win");
        quick.impact = 3;
        quick.urgency = 9;
        let mut deep = TaskDraft::new("deep work");
        deep.impact = 9;
        deep.urgency = 3;
        s.apply(Command::AddTask(quick)).unwrap();
        s.apply(Command::AddTask(deep)).unwrap();

        s.apply(Command::SetWeights(Weights {
            impact: 2.0,
            ..Weights::default()
        }))
        .unwrap();
        assert_eq!(s.recommended().unwrap().title, "deep work");

        s.apply(Command::SetWeights(Weights {
            urgency: 2.0,
            ..Weights::default()
        }))
        .unwrap();
        let ranked = s.ranked();
        assert_eq!(ranked[0].0.title, "quick win");
        assert!(ranked[0].1 >= ranked[1].1);
    }
}
