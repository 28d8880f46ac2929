//! Session driver
//!
//! Owns one simulation, the music scheduler and the frame gate, and runs them
//! in order each accepted frame: input, music, physics, snapshot.

use std::time::{Duration, Instant};

use crate::audio::{EventScheduler, MidiSink, Score, SfxPlayer, SoundEffect, SoundSink};
use crate::frame_gate::FrameGate;
use crate::settings::Settings;
use crate::sim::{GameState, Snapshot, TickInput, tick};

/// Sound sink that stalls before passing on the level-up effect
///
/// The level-up pause comes before the fanfare and before the next level is
/// populated.
struct LevelUpStall<S> {
    inner: S,
    pause: Duration,
}

impl<S: SoundSink> SoundSink for LevelUpStall<S> {
    fn emit(&mut self, effect: SoundEffect) {
        if effect == SoundEffect::LevelUp && !self.pause.is_zero() {
            std::thread::sleep(self.pause);
        }
        self.inner.emit(effect);
    }
}

/// Game instance holding all state
#[derive(Debug, Clone)]
pub struct Game {
    state: GameState,
    music: EventScheduler,
    gate: FrameGate,
    settings: Settings,
    /// Mute key state on the previous frame (edge detection)
    mute_held: bool,
    quit: bool,
}

impl Game {
    pub fn new(settings: Settings) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!("New session, seed {}", seed);
        Self::with_score(settings, seed, Score::reference())
    }

    pub fn with_score(settings: Settings, seed: u64, score: Score) -> Self {
        let mut music = EventScheduler::new(score);
        if settings.start_muted {
            music.set_muted(true);
        }

        Self {
            state: GameState::new(seed),
            music,
            gate: FrameGate::new(),
            settings,
            mute_held: false,
            quit: false,
        }
    }

    /// Run one frame if the gate allows it
    ///
    /// Nothing runs once quit has been requested.
    pub fn step(&mut self, now: Instant, input: &TickInput, midi: &mut impl MidiSink) -> Option<Snapshot> {
        if self.quit || !self.gate.due_at(now, self.settings.target_hz) {
            return None;
        }
        Some(self.step_now(now, input, midi))
    }

    /// Run one frame unconditionally
    pub fn step_now(&mut self, now: Instant, input: &TickInput, midi: &mut impl MidiSink) -> Snapshot {
        if input.quit {
            if !self.quit {
                log::info!("Quit requested at tick {}", self.state.time_ticks);
            }
            self.quit = true;
            return self.snapshot();
        }

        if input.toggle_mute && !self.mute_held {
            self.music.toggle_mute();
        }
        self.mute_held = input.toggle_mute;

        if self.settings.music {
            self.music.advance(now, midi);
        }

        let mut sfx = LevelUpStall {
            inner: SfxPlayer::new(midi, self.settings.sfx_velocity, self.settings.sfx),
            pause: Duration::from_millis(self.settings.level_up_pause_ms),
        };
        tick(&mut self.state, input, &mut sfx);

        self.snapshot()
    }

    /// True once a frame carried the quit intent
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state, self.music.is_muted())
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn music(&self) -> &EventScheduler {
        &self.music
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
