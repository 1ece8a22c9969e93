//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Whole-cell moves only, one trigger at a time
//! - Seeded RNG only, owned by the session
//! - No rendering, audio or platform dependencies

pub mod generator;
pub mod grid;
pub mod session;
pub mod state;

pub use generator::{generate, generate_obstacles, obstacles_per_line};
pub use grid::{Cell, FieldLayout, GridRect, GridSize, Orientation, START_CELL};
pub use session::{
    Direction, GameEvent, GameSession, MoveOutcome, SessionConfig, SessionSnapshot, Transition,
};
pub use state::{GamePhase, Obstacle, ObstacleState, RngState};
