//! Breakout Worm - a bouncing worm, a paddle and a field of holes
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, holes, levels)
//! - `audio`: MIDI messages, channel pool, note parsing and the score scheduler
//! - `frame_gate`: Wall-clock throttle for the fixed simulation cadence
//! - `game`: Session driver tying the gate, scheduler and simulation together
//! - `settings`: Runtime configuration

pub mod audio;
pub mod frame_gate;
pub mod game;
pub mod settings;
pub mod sim;

pub use frame_gate::FrameGate;
pub use game::Game;
pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (pixels)
    pub const SCREEN_WIDTH: f32 = 683.0;
    pub const SCREEN_HEIGHT: f32 = 384.0;
    /// Inset from the playfield edges where holes may spawn
    pub const HOLE_SPAWN_MARGIN: f32 = 50.0;

    /// Simulation cadence
    pub const TARGET_HZ: f32 = 60.0;

    /// Downward acceleration per tick
    pub const GRAVITY: f32 = 0.05;

    /// Worm defaults
    pub const WORM_RADIUS: f32 = 10.0;
    pub const WORM_MAX_SPEED: f32 = 10.0;
    /// Velocity lost per tick (multiplied by 1 - friction)
    pub const WORM_FRICTION: f32 = 0.0009;
    /// Trail ring capacity
    pub const WORM_TAIL_SIZE: usize = 32;
    /// Leading trail segments drawn as solid body
    pub const WORM_BODY_SIZE: usize = 8;
    /// Initial heading, scaled by `WORM_LAUNCH_SCALE`
    pub const WORM_LAUNCH_SCALE: f32 = 7.0;

    /// Paddle defaults - a large circle sunk below the bottom edge
    pub const PLAYER_RADIUS: f32 = 100.0;
    pub const PLAYER_MAX_SPEED: f32 = 40.0;
    pub const PLAYER_ACCEL: f32 = 1.0;
    /// Velocity kept per tick
    pub const PLAYER_FRICTION: f32 = 0.9;
    /// Speed boost when the worm hits the paddle (multiplicative)
    pub const PADDLE_BOOST: f32 = 1.1;

    /// Hole defaults
    pub const HOLE_RADIUS: f32 = 10.0;
    pub const HOLE_CAPACITY: usize = 32;
    /// Chance that a freshly spawned hole becomes a wormhole entry
    pub const WORMHOLE_PROBABILITY: f64 = 0.3;
    /// Holes added each time the worm falls into the pit
    pub const PIT_PENALTY_HOLES: usize = 2;
}

/// Returns whichever of `a`, `b`, `c` lies numerically between the other two.
///
/// `median(lo, x, hi)` clamps `x` without caring which bound is which.
#[inline]
pub fn median(a: f32, b: f32, c: f32) -> f32 {
    if (a <= b && b <= c) || (c <= b && b <= a) {
        b
    } else if (b <= a && a <= c) || (c <= a && a <= b) {
        a
    } else {
        c
    }
}

/// Snap values within 1e-6 of zero to exactly zero
#[inline]
pub fn snap_to_zero(x: f32) -> f32 {
    if x.abs() < 1e-6 { 0.0 } else { x }
}

/// `e^(-x / length)`, used to shrink trailing tail segments
#[inline]
pub fn exponential_decay(length: f32, x: f32) -> f32 {
    (-x / length).exp()
}
