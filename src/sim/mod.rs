//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by hole index)
//! - No rendering, audio device or platform dependencies

pub mod collision;
pub mod shape;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, circle_collision, collide_mover, reflect_velocity};
pub use shape::{Circle, Mover, Rect};
pub use snapshot::{HoleView, Hud, Snapshot, TailSegment};
pub use state::{GameEvent, GameState, Hole, HoleSet, PauseState, Worm};
pub use tick::{TickInput, autopilot_input, tick};
