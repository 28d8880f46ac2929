//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. One call is one
//! frame at the target rate; nothing is scaled by wall time.

use glam::Vec2;

use super::collision::collide_mover;
use super::state::{GameEvent, GameState};
use crate::audio::{SoundEffect, SoundSink};
use crate::consts::*;
use crate::{median, snap_to_zero};

/// Held-key state for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Cheat: remove a hole (acts on the press, not while held)
    pub delete_hole: bool,
    /// Music mute toggle (handled by the session driver)
    pub toggle_mute: bool,
    /// Pause toggle
    pub pause: bool,
    /// Quit request; `Game` stops stepping once it sees this
    pub quit: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, sfx: &mut impl SoundSink) {
    state.events.clear();

    state.pause = state.pause.update(input.pause);
    let delete_pressed = input.delete_hole && !state.delete_held;
    state.delete_held = input.delete_hole;

    // Don't tick if paused
    if !state.pause.is_running() {
        return;
    }

    state.time_ticks += 1;

    state.worm.head.clamp_speed(WORM_MAX_SPEED);

    update_player(state, input);

    if delete_pressed {
        delete_hole(state);
    }

    integrate_worm(state);
    resolve_walls(state, sfx);
    resolve_paddle(state, sfx);
    resolve_holes(state, sfx);
    check_level_complete(state, sfx);
}

/// Paddle: friction, steering, speed limit, then keep it on screen
fn update_player(state: &mut GameState, input: &TickInput) {
    let player = &mut state.player;

    player.vel.x = snap_to_zero(player.vel.x * PLAYER_FRICTION);

    if input.move_left {
        player.vel.x -= PLAYER_ACCEL;
    }
    if input.move_right {
        player.vel.x += PLAYER_ACCEL;
    }
    player.vel.x = median(-PLAYER_MAX_SPEED, player.vel.x, PLAYER_MAX_SPEED);

    player.shape.center.x += player.vel.x;
    player.shape.center.x = median(state.field.x, player.shape.center.x, state.field.right());
}

/// Cheat key: drop the newest hole, but never the last one standing
fn delete_hole(state: &mut GameState) {
    if state.holes.len() > 1 {
        state.holes.pop();
        state.events.push(GameEvent::HoleDeleted);
    }
    state.cheats += 1;
    log::debug!("Cheat used ({} total), {} holes left", state.cheats, state.holes.len());
}

/// Trail, friction, gravity, then move
fn integrate_worm(state: &mut GameState) {
    let worm = &mut state.worm;
    worm.record_tail();

    worm.head.vel *= 1.0 - WORM_FRICTION;
    worm.head.vel.y += GRAVITY;
    worm.head.integrate();
}

/// Bounce off the side and top edges; the bottom edge is the pit
///
/// Every bounce reverses the velocity component and then pushes the head back
/// by twice the new velocity. The pit doubles the vertical speed on the way
/// back up, adds holes and counts a fail.
pub fn resolve_walls(state: &mut GameState, sfx: &mut impl SoundSink) {
    let field = state.field;
    let head = &mut state.worm.head;

    let x = head.pos().x;
    if x < field.x || x > field.right() {
        head.vel.x = -head.vel.x;
        head.shape.center.x += 2.0 * head.vel.x;
        sfx.emit(SoundEffect::WallHit);
        state.events.push(GameEvent::WallBounce);
    }

    if head.pos().y < field.y {
        head.vel.y = -head.vel.y;
        head.shape.center.y += 2.0 * head.vel.y;
        sfx.emit(SoundEffect::WallHit);
        state.events.push(GameEvent::WallBounce);
    }

    if head.pos().y > field.bottom() {
        head.vel.y = -2.0 * head.vel.y;
        head.shape.center.y += 2.0 * head.vel.y;

        for _ in 0..PIT_PENALTY_HOLES {
            state.spawn_hole();
        }
        state.fails += 1;
        sfx.emit(SoundEffect::PitFall);
        state.events.push(GameEvent::PitFall);
        log::debug!("Worm fell into the pit ({} fails), {} holes", state.fails, state.holes.len());
    }
}

/// Bounce off the paddle, with a speed boost
pub fn resolve_paddle(state: &mut GameState, sfx: &mut impl SoundSink) {
    let paddle = state.player.shape;
    if collide_mover(&mut state.worm.head, &paddle, SoundEffect::PaddleHit, sfx) {
        state.worm.head.vel *= PADDLE_BOOST;
        state.events.push(GameEvent::PaddleBounce);
    }
}

/// Collide the head with every hole
///
/// A wormhole entry undoes the bounce and drops the head on the destination
/// centre with its incoming velocity. An ordinary hole is destroyed.
pub fn resolve_holes(state: &mut GameState, sfx: &mut impl SoundSink) {
    let mut i = 0;
    while i < state.holes.len() {
        let Some(hole) = state.holes.get(i).copied() else {
            break;
        };
        let before = state.worm.head;

        if collide_mover(&mut state.worm.head, &hole.shape, SoundEffect::HoleHit, sfx) {
            match hole.wormhole.and_then(|t| state.holes.get(t).map(|h| (t, h.shape.center))) {
                Some((target, exit)) => {
                    state.worm.head = before;
                    state.worm.head.shape.center = exit;
                    state.events.push(GameEvent::Teleported { from: i, to: target });
                    log::debug!("Wormhole {} -> {}", i, target);
                }
                None => {
                    state.holes.remove(i);
                    state.hits += 1;
                    state.events.push(GameEvent::HoleDestroyed { index: i });
                    log::debug!("Hole {} destroyed, {} left", i, state.holes.len());
                }
            }
        }

        // The hole swapped into slot i waits for the next tick
        i += 1;
    }
}

/// Start the next level once every hole is gone
pub fn check_level_complete(state: &mut GameState, sfx: &mut impl SoundSink) {
    if !state.holes.is_empty() {
        return;
    }

    sfx.emit(SoundEffect::LevelUp);
    state.level += 1;
    state.populate_level();
    state.events.push(GameEvent::LevelUp { level: state.level });
    log::info!("Level {}: {} holes", state.level, state.holes.len());
}

/// Demo input: steer the paddle under the worm
///
/// Aims with a slowly drifting offset so the worm doesn't settle into a loop.
pub fn autopilot_input(state: &GameState) -> TickInput {
    const DEADZONE: f32 = 8.0;

    let time_factor = state.time_ticks as f32 * 0.01;
    let offset = time_factor.sin() * 30.0 + (time_factor * 0.7).sin() * 15.0;

    // Lead the target slightly
    let head = &state.worm.head;
    let aim = head.pos() + head.vel * 4.0 + Vec2::new(offset, 0.0);
    let dx = aim.x - state.player.pos().x;

    TickInput {
        move_left: dx < -DEADZONE,
        move_right: dx > DEADZONE,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Hole, PauseState};

    fn quiet_state() -> GameState {
        let mut state = GameState::new(12345);
        state.holes.clear();
        state.holes.push(Hole::new(Vec2::new(600.0, 60.0)));
        state
    }

    #[test]
    fn test_tick_advances_time_and_moves_worm() {
        let mut state = quiet_state();
        let start = state.worm.head.pos();
        tick(&mut state, &TickInput::default(), &mut ());
        assert_eq!(state.time_ticks, 1);
        assert_ne!(state.worm.head.pos(), start);
        assert_eq!(state.worm.tail_count(), 1);
        assert_eq!(state.worm.tail[0], start);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = quiet_state();
        let press = TickInput {
            pause: true,
            ..Default::default()
        };
        let release = TickInput::default();

        tick(&mut state, &press, &mut ());
        assert_eq!(state.pause, PauseState::PausePressed);
        assert_eq!(state.time_ticks, 0);

        let frozen = state.worm.head;
        tick(&mut state, &release, &mut ());
        tick(&mut state, &release, &mut ());
        assert_eq!(state.pause, PauseState::Paused);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.worm.head, frozen);

        // Unpause takes effect on release
        tick(&mut state, &press, &mut ());
        assert_eq!(state.time_ticks, 0);
        tick(&mut state, &release, &mut ());
        assert_eq!(state.pause, PauseState::Running);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_player_steering_and_friction() {
        let mut state = quiet_state();
        let right = TickInput {
            move_right: true,
            ..Default::default()
        };
        let x0 = state.player.pos().x;
        tick(&mut state, &right, &mut ());
        assert_eq!(state.player.vel.x, 1.0);
        assert_eq!(state.player.pos().x, x0 + 1.0);

        tick(&mut state, &right, &mut ());
        assert!((state.player.vel.x - 1.9).abs() < 1e-6);

        // Coasting decays to exactly zero
        for _ in 0..400 {
            tick(&mut state, &TickInput::default(), &mut ());
        }
        assert_eq!(state.player.vel.x, 0.0);
    }

    #[test]
    fn test_player_speed_and_position_clamped() {
        let mut state = quiet_state();
        let left = TickInput {
            move_left: true,
            ..Default::default()
        };
        state.player.vel.x = -45.0;
        tick(&mut state, &left, &mut ());
        assert_eq!(state.player.vel.x, -PLAYER_MAX_SPEED);

        for _ in 0..60 {
            tick(&mut state, &left, &mut ());
        }
        assert_eq!(state.player.pos().x, 0.0);
    }

    #[test]
    fn test_side_wall_bounce() {
        let mut state = quiet_state();
        state.worm.head.shape.center = Vec2::new(SCREEN_WIDTH + 1.0, 100.0);
        state.worm.head.vel = Vec2::new(3.0, 0.0);
        let mut sfx = Vec::new();

        resolve_walls(&mut state, &mut sfx);
        assert_eq!(state.worm.head.vel.x, -3.0);
        assert_eq!(state.worm.head.pos().x, SCREEN_WIDTH + 1.0 - 6.0);
        assert_eq!(sfx, vec![SoundEffect::WallHit]);
        assert_eq!(state.fails, 0);
    }

    #[test]
    fn test_top_wall_bounce() {
        let mut state = quiet_state();
        state.worm.head.shape.center = Vec2::new(100.0, -2.0);
        state.worm.head.vel = Vec2::new(1.0, -4.0);
        let mut sfx = Vec::new();

        resolve_walls(&mut state, &mut sfx);
        assert_eq!(state.worm.head.vel, Vec2::new(1.0, 4.0));
        assert_eq!(state.worm.head.pos().y, 6.0);
        assert_eq!(sfx, vec![SoundEffect::WallHit]);
    }

    #[test]
    fn test_pit_doubles_speed_and_adds_holes() {
        let mut state = quiet_state();
        state.worm.head.shape.center = Vec2::new(100.0, SCREEN_HEIGHT + 1.0);
        state.worm.head.vel = Vec2::new(0.0, 3.0);
        let holes_before = state.holes.len();
        let mut sfx = Vec::new();

        resolve_walls(&mut state, &mut sfx);
        assert_eq!(state.worm.head.vel.y, -6.0);
        assert_eq!(state.worm.head.pos().y, SCREEN_HEIGHT + 1.0 - 12.0);
        assert_eq!(state.holes.len(), holes_before + PIT_PENALTY_HOLES);
        assert_eq!(state.fails, 1);
        assert_eq!(sfx, vec![SoundEffect::PitFall]);
        assert!(state.events.contains(&GameEvent::PitFall));
    }

    #[test]
    fn test_paddle_bounce_boosts_speed() {
        let mut state = quiet_state();
        let paddle = state.player.pos();
        // Worm resting on top of the paddle, falling into it
        state.worm.head.shape.center = paddle - Vec2::new(0.0, PLAYER_RADIUS + WORM_RADIUS - 1.0);
        state.worm.head.vel = Vec2::new(0.0, 5.0);
        let mut sfx = Vec::new();

        resolve_paddle(&mut state, &mut sfx);
        assert!((state.worm.head.vel.y - (-5.5)).abs() < 1e-4);
        assert_eq!(sfx, vec![SoundEffect::PaddleHit]);
    }

    #[test]
    fn test_hole_hit_destroys_and_counts() {
        let mut state = quiet_state();
        state.worm.head.shape.center = Vec2::new(600.0, 45.0);
        state.worm.head.vel = Vec2::new(0.0, 2.0);
        let mut sfx = Vec::new();

        resolve_holes(&mut state, &mut sfx);
        assert!(state.holes.is_empty());
        assert_eq!(state.hits, 1);
        assert_eq!(sfx, vec![SoundEffect::HoleHit]);
        // Bounced like any other obstacle
        assert!(state.worm.head.vel.y < 0.0);
    }

    #[test]
    fn test_wormhole_teleports_without_bounce() {
        let mut state = quiet_state();
        state.holes.clear();
        state.holes.push(Hole::new(Vec2::new(300.0, 200.0)));
        state.holes.push(Hole {
            wormhole: Some(0),
            ..Hole::new(Vec2::new(100.0, 100.0))
        });

        state.worm.head.shape.center = Vec2::new(100.0, 88.0);
        state.worm.head.vel = Vec2::new(1.5, 2.5);
        let mut sfx = Vec::new();

        resolve_holes(&mut state, &mut sfx);
        assert_eq!(state.worm.head.pos(), Vec2::new(300.0, 200.0));
        assert_eq!(state.worm.head.vel, Vec2::new(1.5, 2.5));
        assert_eq!(state.holes.len(), 2);
        assert_eq!(state.hits, 0);
        assert_eq!(sfx, vec![SoundEffect::HoleHit]);
        assert!(state.events.contains(&GameEvent::Teleported { from: 1, to: 0 }));
    }

    #[test]
    fn test_level_complete_repopulates() {
        let mut state = quiet_state();
        state.holes.clear();
        let mut sfx = Vec::new();

        check_level_complete(&mut state, &mut sfx);
        assert_eq!(state.level, 2);
        assert_eq!(state.holes.len(), 2);
        assert_eq!(sfx, vec![SoundEffect::LevelUp]);
        assert!(state.events.contains(&GameEvent::LevelUp { level: 2 }));
    }

    #[test]
    fn test_delete_cheat_is_edge_triggered() {
        let mut state = quiet_state();
        for _ in 0..3 {
            state.spawn_hole();
        }
        assert_eq!(state.holes.len(), 4);

        let held = TickInput {
            delete_hole: true,
            ..Default::default()
        };
        // Park the worm far from everything
        state.worm.head.shape.center = Vec2::new(20.0, 370.0);
        state.worm.head.vel = Vec2::ZERO;

        tick(&mut state, &held, &mut ());
        tick(&mut state, &held, &mut ());
        assert_eq!(state.cheats, 1);
        assert_eq!(state.holes.len(), 3);

        tick(&mut state, &TickInput::default(), &mut ());
        tick(&mut state, &held, &mut ());
        assert_eq!(state.cheats, 2);
        assert_eq!(state.holes.len(), 2);
    }

    #[test]
    fn test_delete_cheat_keeps_last_hole() {
        let mut state = quiet_state();
        state.worm.head.shape.center = Vec2::new(20.0, 370.0);
        state.worm.head.vel = Vec2::ZERO;
        let held = TickInput {
            delete_hole: true,
            ..Default::default()
        };
        tick(&mut state, &held, &mut ());
        assert_eq!(state.holes.len(), 1);
        assert_eq!(state.cheats, 1);
    }

    #[test]
    fn test_autopilot_steers_toward_worm() {
        let mut state = quiet_state();
        state.worm.head.vel = Vec2::ZERO;
        state.worm.head.shape.center = Vec2::new(50.0, 200.0);
        let input = autopilot_input(&state);
        assert!(input.move_left && !input.move_right);

        state.worm.head.shape.center = Vec2::new(650.0, 200.0);
        let input = autopilot_input(&state);
        assert!(input.move_right && !input.move_left);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        for _ in 0..2000 {
            let input = autopilot_input(&state1);
            tick(&mut state1, &input, &mut ());
            tick(&mut state2, &input, &mut ());
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.level, state2.level);
        assert_eq!(state1.hits, state2.hits);
        assert_eq!(state1.fails, state2.fails);
        assert_eq!(state1.worm.head, state2.worm.head);
        assert_eq!(state1.holes.as_slice(), state2.holes.as_slice());
    }
}
