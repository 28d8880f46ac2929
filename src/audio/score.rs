//! The background score
//!
//! A score is a fixed table of timed notes spanning one loop. Times are in
//! milliseconds from the start of the loop.

use serde::Serialize;

/// One sixteenth at 80 BPM
pub const BEAT_MS: u32 = 1000 * 60 / 80 / 4;
/// Beats per measure
pub const BEATS_PER_MEASURE: u32 = 24;
pub const MEASURE_MS: u32 = BEAT_MS * BEATS_PER_MEASURE;
/// Measures before the score loops
pub const LOOP_MEASURES: u32 = 4;

/// General MIDI programs (zero-based)
pub const INSTRUMENT_LEAD: u8 = 41;
pub const INSTRUMENT_BASS: u8 = 1;

pub const VELOCITY_LEAD: u8 = 100;
pub const VELOCITY_BASS: u8 = VELOCITY_LEAD - 16;

/// A single note in the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreEvent {
    pub start_ms: u32,
    pub duration_ms: u32,
    pub instrument: u8,
    /// Note name, see [`crate::audio::parse_note`]
    pub note: &'static str,
    pub velocity: u8,
    /// Played on the drum channel without a program change
    pub percussion: bool,
}

impl ScoreEvent {
    pub fn end_ms(&self) -> u32 {
        self.start_ms.saturating_add(self.duration_ms)
    }
}

/// An ordered set of events and the loop length they repeat over
#[derive(Debug, Clone, Serialize)]
pub struct Score {
    pub events: Vec<ScoreEvent>,
    pub loop_ms: u32,
}

/// Lead rhythm within a measure: (beat offset, length in beats)
const LEAD_RHYTHM: [(u32, u32); 8] = [
    (0, 3),
    (3, 2),
    (5, 3),
    (8, 2),
    (10, 3),
    (13, 3),
    (16, 3),
    (18, 3),
];

const LEAD_MEASURES: [[&str; 8]; 4] = [
    ["A2", "G2", "E2", "A2", "G2", "E2", "D2", "C2"],
    ["A3", "G3", "E3", "A3", "G3", "E3", "D3", "C2"],
    ["A3", "G3", "E3", "A3", "G3", "E3", "D3", "C3"],
    ["A2", "G2", "E2", "A2", "G2", "E2", "D2", "C2"],
];

/// Bass walks C-G-E-G in eighths, a different octave each measure
const BASS_MEASURES: [[&str; 4]; 4] = [
    ["C2", "G2", "E2", "G2"],
    ["C1", "G1", "E1", "G1"],
    ["C4", "G4", "E4", "G4"],
    ["C3", "G3", "E3", "G3"],
];
const BASS_STEP_BEATS: u32 = 2;

impl Score {
    pub fn new(events: Vec<ScoreEvent>, loop_ms: u32) -> Self {
        Self { events, loop_ms }
    }

    /// The two-voice loop played behind the game
    pub fn reference() -> Self {
        let mut events = Vec::with_capacity(80);

        for (measure, notes) in LEAD_MEASURES.iter().enumerate() {
            let base = MEASURE_MS * measure as u32;
            for (&(beat, len), &note) in LEAD_RHYTHM.iter().zip(notes.iter()) {
                events.push(ScoreEvent {
                    start_ms: base + BEAT_MS * beat,
                    duration_ms: BEAT_MS * len,
                    instrument: INSTRUMENT_LEAD,
                    note,
                    velocity: VELOCITY_LEAD,
                    percussion: false,
                });
            }
        }

        for (measure, pattern) in BASS_MEASURES.iter().enumerate() {
            let base = MEASURE_MS * measure as u32;
            let steps = BEATS_PER_MEASURE / BASS_STEP_BEATS;
            for step in 0..steps {
                events.push(ScoreEvent {
                    start_ms: base + BEAT_MS * step * BASS_STEP_BEATS,
                    duration_ms: BEAT_MS * BASS_STEP_BEATS,
                    instrument: INSTRUMENT_BASS,
                    note: pattern[step as usize % pattern.len()],
                    velocity: VELOCITY_BASS,
                    percussion: false,
                });
            }
        }

        Self::new(events, MEASURE_MS * LOOP_MEASURES)
    }
}
