//! Game session: the state machine and move resolution
//!
//! A session owns the field, the player and its own RNG. Hosts feed it
//! triggers (tap, move, reveal) and read back outcomes plus a queue of
//! [`GameEvent`]s for rendering, sound and haptics.

use std::collections::HashMap;

use glam::{IVec2, Vec2};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::generator::generate_obstacles;
use super::grid::{Cell, FieldLayout, GridRect, GridSize, START_CELL};
use super::state::{GamePhase, Obstacle, ObstacleState, RngState};
use crate::error::Result;
use crate::{sanitize_level, sanitize_lives};

/// Discrete move direction (keyboard / d-pad input)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit step in cell coordinates (y grows downward)
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::NEG_Y,
            Direction::Down => IVec2::Y,
            Direction::Left => IVec2::NEG_X,
            Direction::Right => IVec2::X,
        }
    }
}

/// Result of a move request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Not in play; nothing happened
    NotApplicable,
    /// Wall or an already struck obstacle in the way
    Blocked,
    /// Player advanced one cell
    Moved,
    /// Struck a hidden obstacle and lives remain
    Hit { hits: u32 },
    /// Struck a hidden obstacle with the last life
    GameOver { hits: u32 },
    /// Player advanced into the goal
    GoalReached,
}

impl MoveOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NotApplicable | Self::Blocked)
    }
}

/// Result of a phase trigger (tap, reveal, resume)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    NotApplicable,
    Entered(GamePhase),
}

/// Notifications for the host, drained with [`GameSession::drain_events`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    NewGame { level: u32 },
    Resized { size: GridSize },
    StateChanged { from: GamePhase, to: GamePhase },
    Moved { from: Cell, to: Cell },
    /// Player picked up for dragging
    Grabbed { cell: Cell },
    Hit { cell: Cell, hits: u32, game_over: bool },
    GameOver { hits: u32 },
    GoalReached { cell: Cell },
}

/// Startup configuration for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub level: u32,
    /// Life limit, 0 for unlimited
    pub lives: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            level: crate::consts::DEFAULT_LEVEL,
            lives: crate::consts::DEFAULT_LIVES,
        }
    }
}

/// Host-facing view of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: GamePhase,
    pub game_over: bool,
    pub level: u32,
    pub lives: u32,
    pub hits: u32,
    pub size: GridSize,
    pub goal: GridRect,
    pub player: Cell,
    /// Obstacles the host should draw
    pub visible: Vec<Obstacle>,
}

/// One player's game
#[derive(Debug, Clone)]
pub struct GameSession {
    size: GridSize,
    layout: Option<FieldLayout>,
    goal: GridRect,
    level: u32,
    lives: u32,
    hits: u32,
    player: Cell,
    obstacles: HashMap<Cell, Obstacle>,
    phase: GamePhase,
    game_over: bool,
    rng_state: RngState,
    rng: Pcg32,
    fields_generated: u64,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Create an idle session on a field of the given size
    pub fn new(size: GridSize, config: SessionConfig, seed: u64) -> Self {
        let rng_state = RngState::new(seed);
        let rng = rng_state.to_rng();
        Self {
            size,
            layout: None,
            goal: size.goal(),
            level: sanitize_level(config.level),
            lives: sanitize_lives(config.lives),
            hits: 0,
            player: START_CELL,
            obstacles: HashMap::new(),
            phase: GamePhase::Idle,
            game_over: false,
            rng_state,
            rng,
            fields_generated: 0,
            events: Vec::new(),
        }
    }

    /// Create an idle session fitted to a viewport
    pub fn with_layout(layout: FieldLayout, config: SessionConfig, seed: u64) -> Self {
        let mut session = Self::new(layout.size, config, seed);
        session.layout = Some(layout);
        session
    }

    // === Accessors ===

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Whether the last game ended by running out of lives
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn player(&self) -> Cell {
        self.player
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Lives left, `None` when unlimited
    pub fn lives_remaining(&self) -> Option<u32> {
        (self.lives != 0).then(|| self.lives.saturating_sub(self.hits))
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn layout(&self) -> Option<&FieldLayout> {
        self.layout.as_ref()
    }

    pub fn goal(&self) -> GridRect {
        self.goal
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    /// Number of fields generated so far in this session
    pub fn fields_generated(&self) -> u64 {
        self.fields_generated
    }

    pub fn obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.values()
    }

    pub fn obstacle_at(&self, cell: Cell) -> Option<&Obstacle> {
        self.obstacles.get(&cell)
    }

    /// Obstacles the host should draw right now
    ///
    /// While the fresh field is on show everything is drawn; afterwards only
    /// revealed and struck obstacles are.
    pub fn visible_obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        let show_all = self.phase == GamePhase::Show;
        self.obstacles.values().filter(move |o| show_all || o.is_visible())
    }

    /// Sweep of the player's life pie in degrees (full circle when unlimited)
    pub fn life_arc_degrees(&self) -> f32 {
        if self.lives == 0 {
            360.0
        } else {
            360.0 - 360.0 / self.lives as f32 * self.hits as f32
        }
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut visible: Vec<Obstacle> = self.visible_obstacles().copied().collect();
        visible.sort_by_key(|o| (o.cell.y, o.cell.x));
        SessionSnapshot {
            phase: self.phase,
            game_over: self.game_over,
            level: self.level,
            lives: self.lives,
            hits: self.hits,
            size: self.size,
            goal: self.goal,
            player: self.player,
            visible,
        }
    }

    // === Configuration ===

    /// Change the life limit
    ///
    /// Invalid values fall back to the default. Lowering the limit to or
    /// below the hits already taken restarts the running game; a finished
    /// game keeps its result with the hits capped at the new limit.
    pub fn set_lives(&mut self, lives: u32) {
        self.lives = sanitize_lives(lives);
        if self.lives == 0 || self.lives > self.hits {
            return;
        }
        match self.phase {
            GamePhase::Play | GamePhase::Hint => {
                log::info!("Life limit {} already used up, restarting", self.lives);
                self.new_game(0);
            }
            GamePhase::Idle | GamePhase::Show => self.hits = self.lives,
        }
    }

    /// Change the level for the next game
    pub fn set_level(&mut self, level: u32) {
        self.level = sanitize_level(level);
    }

    /// Switch to another field size; clears the field and returns to idle
    pub fn resize(&mut self, size: GridSize) {
        log::info!("Field resized to {}x{}", size.width, size.height);
        self.size = size;
        self.goal = size.goal();
        self.reset_field();
        self.game_over = false;
        self.events.push(GameEvent::Resized { size });
        self.set_phase(GamePhase::Idle);
    }

    /// Switch to another size tier within a viewport
    pub fn resize_tier(&mut self, tier: u32, view_width: u32, view_height: u32) -> Result<()> {
        let layout = FieldLayout::from_viewport(view_width, view_height, tier)?;
        self.layout = Some(layout);
        self.resize(layout.size);
        Ok(())
    }

    // === Triggers ===

    /// Start a new game, optionally at a new level (0 keeps the current one)
    ///
    /// Valid in every phase.
    pub fn new_game(&mut self, level: u32) {
        if level > 0 {
            self.level = sanitize_level(level);
        }
        self.reset_field();
        self.game_over = false;
        self.obstacles = generate_obstacles(self.size, self.level, &mut self.rng);
        self.fields_generated += 1;

        log::info!(
            "New game: level {}, {} obstacles on {}x{}",
            self.level,
            self.obstacles.len(),
            self.size.width,
            self.size.height
        );
        self.events.push(GameEvent::NewGame { level: self.level });
        self.set_phase(GamePhase::Show);
    }

    /// Leave the show phase and start playing
    pub fn begin(&mut self) -> Transition {
        if self.phase != GamePhase::Show {
            return Transition::NotApplicable;
        }
        for obstacle in self.obstacles.values_mut() {
            obstacle.state = ObstacleState::Hidden;
        }
        self.set_phase(GamePhase::Play)
    }

    /// Show every obstacle as a hint
    pub fn reveal(&mut self) -> Transition {
        if self.phase != GamePhase::Play {
            return Transition::NotApplicable;
        }
        for obstacle in self.obstacles.values_mut() {
            obstacle.reveal();
        }
        self.set_phase(GamePhase::Hint)
    }

    /// Hide the hint again; struck obstacles stay visible
    pub fn resume(&mut self) -> Transition {
        if self.phase != GamePhase::Hint {
            return Transition::NotApplicable;
        }
        for obstacle in self.obstacles.values_mut() {
            obstacle.hide_unless_hit();
        }
        self.set_phase(GamePhase::Play)
    }

    /// The single "tap" trigger: starts, begins or resumes depending on phase
    pub fn activate(&mut self) -> Transition {
        match self.phase {
            GamePhase::Idle => {
                self.new_game(0);
                Transition::Entered(self.phase)
            }
            GamePhase::Show => self.begin(),
            GamePhase::Hint => self.resume(),
            GamePhase::Play => Transition::NotApplicable,
        }
    }

    /// Move one cell along the dominant axis of `(dx, dy)`
    pub fn move_by(&mut self, dx: f32, dy: f32) -> MoveOutcome {
        if self.phase != GamePhase::Play {
            return MoveOutcome::NotApplicable;
        }
        match dominant_step(dx, dy) {
            Some(step) => self.try_step(step),
            None => MoveOutcome::Blocked,
        }
    }

    /// Move for an accumulated drag once it covers enough of a cell
    ///
    /// Shorter drags are `NotApplicable` so the host keeps accumulating;
    /// after any outcome with an update the host restarts the drag from the
    /// current pointer. Without a layout the delta is taken as is.
    pub fn drag_by(&mut self, delta: Vec2) -> MoveOutcome {
        if self.phase != GamePhase::Play {
            return MoveOutcome::NotApplicable;
        }
        if self.layout.as_ref().is_some_and(|l| !l.drag_triggers_move(delta)) {
            return MoveOutcome::NotApplicable;
        }
        self.move_by(delta.x, delta.y)
    }

    /// Pick up the player for dragging (Play only)
    pub fn grab(&mut self) -> bool {
        if self.phase != GamePhase::Play {
            return false;
        }
        self.events.push(GameEvent::Grabbed { cell: self.player });
        true
    }

    /// Move one cell in a fixed direction
    pub fn step(&mut self, direction: Direction) -> MoveOutcome {
        let delta = direction.delta().as_vec2();
        self.move_by(delta.x, delta.y)
    }

    fn try_step(&mut self, step: IVec2) -> MoveOutcome {
        let from = self.player;
        let to = from + step;

        if !self.size.is_playable(to) {
            log::debug!("Move to {} blocked by border", to);
            return MoveOutcome::Blocked;
        }

        // Cells hold at most one obstacle, so one lookup settles the move
        let struck = match self.obstacles.get_mut(&to) {
            Some(obstacle) if obstacle.is_hit() => {
                log::debug!("Move to {} blocked by known obstacle", to);
                return MoveOutcome::Blocked;
            }
            Some(obstacle) => {
                obstacle.strike();
                true
            }
            None => false,
        };

        if struck {
            self.hits += 1;
            let hits = self.hits;
            let game_over = self.lives != 0 && hits >= self.lives;
            self.events.push(GameEvent::Hit {
                cell: to,
                hits,
                game_over,
            });

            if game_over {
                log::info!("Game over after {} hits", hits);
                self.game_over = true;
                self.events.push(GameEvent::GameOver { hits });
                self.set_phase(GamePhase::Idle);
                return MoveOutcome::GameOver { hits };
            }
            log::debug!("Hit obstacle at {} ({} hits)", to, hits);
            return MoveOutcome::Hit { hits };
        }

        self.player = to;
        self.events.push(GameEvent::Moved { from, to });

        if self.goal.intersects(&GridRect::cell(to)) {
            log::info!("Goal reached with {} hits", self.hits);
            self.events.push(GameEvent::GoalReached { cell: to });
            self.set_phase(GamePhase::Idle);
            return MoveOutcome::GoalReached;
        }
        MoveOutcome::Moved
    }

    fn reset_field(&mut self) {
        self.player = START_CELL;
        self.hits = 0;
        self.obstacles.clear();
    }

    fn set_phase(&mut self, to: GamePhase) -> Transition {
        let from = self.phase;
        if from != to {
            self.phase = to;
            self.events.push(GameEvent::StateChanged { from, to });
        }
        Transition::Entered(to)
    }
}

/// One-cell step along the dominant axis; ties go to the vertical axis
fn dominant_step(dx: f32, dy: f32) -> Option<IVec2> {
    if (dx == 0.0 && dy == 0.0) || dx.is_nan() || dy.is_nan() {
        return None;
    }
    let step = if dx.abs() > dy.abs() {
        IVec2::new(if dx > 0.0 { 1 } else { -1 }, 0)
    } else {
        IVec2::new(0, if dy > 0.0 { 1 } else { -1 })
    };
    Some(step)
}
