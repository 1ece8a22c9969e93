//! Game state and core simulation types

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::Cell;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// No game running; waiting for a tap to start one
    #[default]
    Idle,
    /// Fresh field on display so the player can memorize it
    Show,
    /// Obstacles hidden, moves accepted
    Play,
    /// All obstacles temporarily revealed
    Hint,
}

/// Visibility of a single obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleState {
    #[default]
    Hidden,
    /// Shown by a hint without having been struck
    Revealed,
    /// Struck by the player; stays visible for the rest of the game
    Hit,
}

/// An obstacle occupying one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    pub cell: Cell,
    pub state: ObstacleState,
}

impl Obstacle {
    pub fn new(cell: Cell) -> Self {
        Self {
            cell,
            state: ObstacleState::Hidden,
        }
    }

    pub fn is_hit(&self) -> bool {
        self.state == ObstacleState::Hit
    }

    pub fn is_visible(&self) -> bool {
        self.state != ObstacleState::Hidden
    }

    /// Mark as struck
    pub fn strike(&mut self) {
        self.state = ObstacleState::Hit;
    }

    /// Show for a hint (struck obstacles keep their state)
    pub fn reveal(&mut self) {
        if self.state == ObstacleState::Hidden {
            self.state = ObstacleState::Revealed;
        }
    }

    /// Hide again unless struck
    pub fn hide_unless_hit(&mut self) {
        if self.state == ObstacleState::Revealed {
            self.state = ObstacleState::Hidden;
        }
    }
}

/// Seed a session's RNG stream was started from
///
/// Rebuilding the RNG restarts the stream; replaying a session means
/// replaying its calls on a fresh RNG.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// RNG positioned at the start of the stream
    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}
