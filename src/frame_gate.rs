//! Wall-clock throttle for the fixed simulation cadence
//!
//! The simulation has no `dt`: every tick is one frame. The gate decides when
//! enough real time has passed for the next one. Missed frames are not made
//! up, the game simply runs slower on a machine that can't keep up.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct FrameGate {
    last: Option<Instant>,
}

impl FrameGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if a tick is due now
    pub fn due_for_tick(&mut self, target_hz: f32) -> bool {
        self.due_at(Instant::now(), target_hz)
    }

    /// True if a tick is due at `now`; the first query always is
    ///
    /// Accepting a tick moves the gate's reference point to `now`.
    pub fn due_at(&mut self, now: Instant, target_hz: f32) -> bool {
        let Some(last) = self.last else {
            self.last = Some(now);
            return true;
        };

        if now.saturating_duration_since(last) >= Self::period(target_hz) {
            self.last = Some(now);
            true
        } else {
            false
        }
    }

    /// Time between ticks at `target_hz`
    ///
    /// Rates too slow for a `Duration` saturate to `Duration::MAX`.
    pub fn period(target_hz: f32) -> Duration {
        if target_hz.is_finite() && target_hz > 0.0 {
            Duration::try_from_secs_f32(1.0 / target_hz).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        }
    }

    /// Forget the reference point; the next query is due
    pub fn reset(&mut self) {
        self.last = None;
    }
}
