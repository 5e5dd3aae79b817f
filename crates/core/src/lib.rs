//! Core game logic module - pure, deterministic, and testable
//!
//! This crate holds the falling-block rules and the task priority scorer.
//! It has **no dependencies** on terminal, input or file I/O, making it:
//!
//! - **Deterministic**: every random draw goes through an injected [`RandomSource`]
//! - **Testable**: transitions are pure functions over immutable snapshots
//! - **Portable**: runs the same under the terminal host, tests and benches
//!
//! # Module Structure
//!
//! - [`board`]: occupancy grid with collision checks, merging, line clearing and garbage fill
//! - [`pieces`]: per-kind rotation state tables
//! - [`inventory`]: spawnable stock per piece kind
//! - [`spawner`]: turns inventory stock into a centered falling piece
//! - [`game_state`]: falling/idle state machine driven by ticks and player actions
//! - [`scoring`]: weighted task priority, ranking and recommendation
//! - [`reward`]: random piece grants for completed tasks
//! - [`rng`]: randomness sources
//!
//! # Game Rules
//!
//! A deliberately small ruleset:
//!
//! - **Inventory-fed spawns**: pieces come only from what completed tasks earned
//! - **In-place rotation**: no wall kicks; a blocked rotation is ignored
//! - **Flat scoring**: 100 points per cleared row, no multipliers
//! - **No game-over**: an empty inventory or a blocked spawn stalls the game instead
//!
//! # Example
//!
//! ```
//! use focusblocks_core::{grant_random_pieces, GameState, Inventory, SimpleRng};
//! use focusblocks_types::GameAction;
//!
//! let mut rng = SimpleRng::new(12345);
//! let (inventory, granted) = grant_random_pieces(&Inventory::new(), 1, 3, &mut rng);
//! assert!(!granted.is_empty());
//!
//! // The first tick spawns from the inventory.
//! let (game, _inventory) = GameState::default().tick(&inventory, &mut rng);
//! assert!(game.is_falling());
//!
//! let game = game.apply_action(GameAction::HardDrop);
//! assert!(!game.is_falling());
//! assert_eq!(game.pieces_placed(), 1);
//! ```
//!
//! # Timing
//!
//! The core has no clock. The host calls [`GameState::tick`] at its play
//! interval ([`types::PLAY_TICK_MS`] by default); drift is harmless.

pub mod board;
pub mod error;
pub mod game_state;
pub mod inventory;
pub mod pieces;
pub mod reward;
pub mod rng;
pub mod scoring;
pub mod spawner;

pub use focusblocks_types as types;

pub use board::{fill_garbage, generate_garbage, Board};
pub use error::CoreError;
pub use game_state::{ActivePiece, GameState, Stall};
pub use inventory::Inventory;
pub use pieces::{get_shape, rotation_count, Shape};
pub use reward::{grant_random_pieces, GrantPolicy, RewardTally};
pub use rng::{RandomSource, SequenceRng, SimpleRng};
pub use scoring::{rank_tasks, recommend, score};
pub use spawner::{spawn, Spawn};
