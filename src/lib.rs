//! focusblocks (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof and adds the pieces only
//! the binary needs: TOML configuration, the JSON state store and the
//! interactive host loop.

pub use focusblocks_core as core;
pub use focusblocks_engine as engine;
pub use focusblocks_input as input;
pub use focusblocks_term as term;
pub use focusblocks_types as types;

pub mod app;
pub mod config;
pub mod store;
