//! Game state and core simulation types
//!
//! Everything the tick mutates lives in [`GameState`]; nothing is global, so
//! independent sessions can run side by side and tests can build exact setups.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::shape::{Circle, Mover, Rect};
use crate::consts::*;

/// Pause handling, debounced on the key edge
///
/// A press moves into a `*Pressed` state; the release completes the toggle.
/// Only `Running` lets the simulation advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PauseState {
    #[default]
    Running,
    Paused,
    /// Key held after pausing from `Running`
    PausePressed,
    /// Key held after resuming from `Paused`
    ResumePressed,
}

impl PauseState {
    /// Feed the current pause key state
    pub fn update(self, held: bool) -> Self {
        match (self, held) {
            (PauseState::Running, true) => PauseState::PausePressed,
            (PauseState::Paused, true) => PauseState::ResumePressed,
            (PauseState::PausePressed, false) => PauseState::Paused,
            (PauseState::ResumePressed, false) => PauseState::Running,
            (state, _) => state,
        }
    }

    pub fn is_running(&self) -> bool {
        *self == PauseState::Running
    }
}

/// Things that happened during a tick, for logging and the session driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    WallBounce,
    PaddleBounce,
    /// Worm fell into the pit, more holes were added
    PitFall,
    /// An ordinary hole was destroyed
    HoleDestroyed { index: usize },
    /// Worm entered a wormhole and came out at the target
    Teleported { from: usize, to: usize },
    /// Cheat key removed a hole
    HoleDeleted,
    /// All holes cleared, new level populated
    LevelUp { level: u32 },
}

/// The bouncing worm: one simulated head and a trail of past positions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worm {
    pub head: Mover,
    /// Trail history for rendering (newest first)
    pub tail: Vec<Vec2>,
}

impl Worm {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            head: Mover::new(pos, WORM_RADIUS, vel),
            tail: Vec::with_capacity(WORM_TAIL_SIZE + 1),
        }
    }

    /// Record current head position to the trail (call before integrating)
    pub fn record_tail(&mut self) {
        self.tail.insert(0, self.head.pos());
        self.tail.truncate(WORM_TAIL_SIZE);
    }

    pub fn tail_count(&self) -> usize {
        self.tail.len()
    }
}

/// A static hole, optionally the entry of a wormhole
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub shape: Circle,
    /// Index of the destination hole when this hole is a wormhole entry
    pub wormhole: Option<usize>,
}

impl Hole {
    pub fn new(center: Vec2) -> Self {
        Self {
            shape: Circle::new(center, HOLE_RADIUS),
            wormhole: None,
        }
    }

    pub fn is_wormhole(&self) -> bool {
        self.wormhole.is_some()
    }
}

/// Capacity-bounded hole arena with swap-remove
///
/// Keeps the wormhole graph valid: every link points at a live hole that is
/// not itself an entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HoleSet {
    holes: Vec<Hole>,
}

impl HoleSet {
    pub fn new() -> Self {
        Self {
            holes: Vec::with_capacity(HOLE_CAPACITY),
        }
    }

    pub fn len(&self) -> usize {
        self.holes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holes.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.holes.len() >= HOLE_CAPACITY
    }

    pub fn get(&self, index: usize) -> Option<&Hole> {
        self.holes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hole> {
        self.holes.iter()
    }

    pub fn as_slice(&self) -> &[Hole] {
        &self.holes
    }

    /// Destination of the wormhole entered at `index`
    pub fn target(&self, index: usize) -> Option<usize> {
        self.holes.get(index).and_then(|h| h.wormhole)
    }

    /// True if `index` is live and may be a wormhole destination
    pub fn can_target(&self, index: usize) -> bool {
        self.holes.get(index).is_some_and(|h| !h.is_wormhole())
    }

    /// Add a hole, returning its index; refuses silently when full
    ///
    /// A link that would point at a dead hole or another entry is dropped.
    pub fn push(&mut self, mut hole: Hole) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        if let Some(target) = hole.wormhole {
            if !self.can_target(target) {
                log::warn!("Dropping wormhole link to {}: not a valid destination", target);
                hole.wormhole = None;
            }
        }
        self.holes.push(hole);
        Some(self.holes.len() - 1)
    }

    /// Remove the hole at `index` by swapping in the last one
    ///
    /// Links to the removed hole are cleared; links to the moved hole follow it.
    pub fn remove(&mut self, index: usize) -> Option<Hole> {
        if index >= self.holes.len() {
            return None;
        }
        let last = self.holes.len() - 1;
        let removed = self.holes.swap_remove(index);

        for hole in &mut self.holes {
            match hole.wormhole {
                Some(t) if t == index => hole.wormhole = None,
                Some(t) if t == last => hole.wormhole = Some(index),
                _ => {}
            }
        }
        Some(removed)
    }

    /// Remove the most recently added hole
    pub fn pop(&mut self) -> Option<Hole> {
        let last = self.holes.len().checked_sub(1)?;
        self.remove(last)
    }

    pub fn clear(&mut self) {
        self.holes.clear();
    }
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// Playfield bounds; the bottom edge is the pit
    pub field: Rect,
    /// Current level (starts at 1, holes per level = level)
    pub level: u32,
    /// Simulation tick counter (only advances while running)
    pub time_ticks: u64,
    /// Ordinary holes destroyed
    pub hits: u32,
    /// Falls into the pit
    pub fails: u32,
    /// Cheat key presses
    pub cheats: u32,
    pub pause: PauseState,
    pub worm: Worm,
    /// The paddle, a large circle under the bottom edge
    pub player: Mover,
    pub holes: HoleSet,
    /// Events produced by the most recent tick
    pub events: Vec<GameEvent>,
    /// Delete key state on the previous tick (edge detection)
    pub(crate) delete_held: bool,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64) -> Self {
        let field = Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT);

        let worm_vel = Vec2::new(0.5, SCREEN_HEIGHT / SCREEN_WIDTH) * WORM_LAUNCH_SCALE;
        let player_pos = Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT + PLAYER_RADIUS / 2.0);

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            field,
            level: 1,
            time_ticks: 0,
            hits: 0,
            fails: 0,
            cheats: 0,
            pause: PauseState::Running,
            worm: Worm::new(Vec2::ZERO, worm_vel),
            player: Mover::new(player_pos, PLAYER_RADIUS, Vec2::ZERO),
            holes: HoleSet::new(),
            events: Vec::new(),
            delete_held: false,
        };

        state.populate_level();
        state
    }

    /// Spawn one hole per level number
    pub fn populate_level(&mut self) {
        for _ in 0..self.level {
            self.spawn_hole();
        }
    }

    /// Spawn a hole at a random spot inside the margin
    ///
    /// With enough holes on the field it may become a wormhole entry pointing
    /// at a random existing hole, unless that hole is an entry itself.
    pub fn spawn_hole(&mut self) -> Option<usize> {
        if self.holes.is_full() {
            return None;
        }

        let area = self.field.inset(HOLE_SPAWN_MARGIN);
        let u: f32 = self.rng.random();
        let v: f32 = self.rng.random();
        let mut hole = Hole::new(area.lerp(u, v));

        if self.holes.len() >= 2 && self.rng.random_bool(WORMHOLE_PROBABILITY) {
            let candidate = self.rng.random_range(0..self.holes.len());
            if self.holes.can_target(candidate) {
                hole.wormhole = Some(candidate);
            }
        }

        self.holes.push(hole)
    }
}
