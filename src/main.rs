//! Breakout Worm entry point
//!
//! Runs a headless session on autopilot. MIDI output goes to the log; set
//! `RUST_LOG=debug` to see it.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use breakout_worm::audio::{MidiMessage, MidiSink};
use breakout_worm::sim::autopilot_input;
use breakout_worm::{Game, Settings};

/// MIDI sink that writes every message to the log
#[derive(Debug, Default)]
struct LogMidiSink {
    sent: u64,
}

impl MidiSink for LogMidiSink {
    fn send(&mut self, msg: MidiMessage) {
        self.sent += 1;
        log::debug!("midi {:08x} {:?}", msg.to_short_message(), msg);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Breakout Worm (headless) starting...");

    let settings = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => Settings::load(&path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };

    let mut game = Game::new(settings);
    let mut midi = LogMidiSink::default();
    let demo_ticks = game.settings().demo_ticks;

    while !game.quit_requested() && game.state().time_ticks < demo_ticks {
        let input = autopilot_input(game.state());
        if let Some(snapshot) = game.step(Instant::now(), &input, &mut midi) {
            if snapshot.hud.ticks % 600 == 0 {
                log::info!("{}", snapshot.hud_line());
            }
        } else {
            std::thread::yield_now();
        }
    }

    let snapshot = game.snapshot();
    log::info!("{}", snapshot.hud_line());
    log::info!("{} MIDI messages sent", midi.sent);
    println!(
        "{}",
        serde_json::to_string_pretty(&snapshot).context("serializing final snapshot")?
    );
    Ok(())
}
