//! Read-only view of a frame for a renderer and HUD
//!
//! Built fresh from [`GameState`] after each tick. Owns its data so it can be
//! handed across a boundary or serialized without borrowing the simulation.

use glam::Vec2;
use serde::Serialize;

use super::shape::Circle;
use super::state::{GameState, PauseState};
use crate::consts::{WORM_BODY_SIZE, WORM_TAIL_SIZE};
use crate::exponential_decay;

/// One historical worm position
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TailSegment {
    pub pos: Vec2,
    /// Radius of the fading halo at this position
    pub radius: f32,
    /// Drawn as solid body in addition to the halo
    pub body: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HoleView {
    pub shape: Circle,
    pub wormhole: bool,
    /// Destination centre, for drawing the link
    pub target: Option<Vec2>,
}

/// Numeric counters for the HUD line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hud {
    pub level: u32,
    pub ticks: u64,
    pub holes_left: usize,
    pub hits: u32,
    pub fails: u32,
    pub cheats: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub player: Circle,
    pub head: Circle,
    /// Newest first
    pub tail: Vec<TailSegment>,
    pub holes: Vec<HoleView>,
    pub hud: Hud,
    pub paused: bool,
    pub muted: bool,
}

impl Snapshot {
    pub fn capture(state: &GameState, muted: bool) -> Self {
        let head = state.worm.head.shape;
        let fade_len = (WORM_TAIL_SIZE - WORM_BODY_SIZE) as f32;

        let tail = state
            .worm
            .tail
            .iter()
            .enumerate()
            .map(|(i, &pos)| TailSegment {
                pos,
                radius: head.radius * exponential_decay(fade_len, i as f32 - WORM_BODY_SIZE as f32),
                body: i < WORM_BODY_SIZE,
            })
            .collect();

        let holes = state
            .holes
            .iter()
            .map(|hole| HoleView {
                shape: hole.shape,
                wormhole: hole.is_wormhole(),
                target: hole
                    .wormhole
                    .and_then(|t| state.holes.get(t))
                    .map(|dest| dest.shape.center),
            })
            .collect();

        Self {
            player: state.player.shape,
            head,
            tail,
            holes,
            hud: Hud {
                level: state.level,
                ticks: state.time_ticks,
                holes_left: state.holes.len(),
                hits: state.hits,
                fails: state.fails,
                cheats: state.cheats,
            },
            paused: state.pause != PauseState::Running,
            muted,
        }
    }

    /// One-line HUD text
    pub fn hud_line(&self) -> String {
        let h = &self.hud;
        let mut line = format!(
            "Level: {:2} Time: {:8} Left: {:2} Hits: {:4} Fails: {:4}",
            h.level, h.ticks, h.holes_left, h.hits, h.fails
        );
        if h.cheats > 0 {
            line.push_str(&format!(" Cheat: {:08}", h.cheats));
        }
        line
    }
}
