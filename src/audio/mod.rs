//! Audio output as MIDI messages
//!
//! Nothing here talks to a device. The core produces three message kinds
//! (program change, note on, note off) into a [`MidiSink`]; whatever owns the
//! real output port implements the sink.

pub mod channels;
pub mod note;
pub mod scheduler;
pub mod score;

pub use channels::{ChannelAllocator, MIDI_CHANNELS, PERCUSSION_CHANNEL};
pub use note::{NoteError, parse_note};
pub use scheduler::{EventScheduler, EventState, MuteState};
pub use score::{Score, ScoreEvent};

use serde::{Deserialize, Serialize};

/// A single outgoing MIDI message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MidiMessage {
    ProgramChange { channel: u8, program: u8 },
    NoteOn { channel: u8, pitch: u8, velocity: u8 },
    NoteOff { channel: u8, pitch: u8 },
}

impl MidiMessage {
    pub fn channel(&self) -> u8 {
        match *self {
            MidiMessage::ProgramChange { channel, .. }
            | MidiMessage::NoteOn { channel, .. }
            | MidiMessage::NoteOff { channel, .. } => channel,
        }
    }

    /// Pack into a short-message word: status in the low byte, then data bytes
    pub fn to_short_message(&self) -> u32 {
        match *self {
            MidiMessage::ProgramChange { channel, program } => {
                ((program as u32 & 0x7F) << 8) | (0xC0 | (channel as u32 & 0x0F))
            }
            MidiMessage::NoteOn {
                channel,
                pitch,
                velocity,
            } => {
                ((velocity as u32 & 0x7F) << 16)
                    | ((pitch as u32 & 0x7F) << 8)
                    | (0x90 | (channel as u32 & 0x0F))
            }
            MidiMessage::NoteOff { channel, pitch } => {
                ((pitch as u32 & 0x7F) << 8) | (0x80 | (channel as u32 & 0x0F))
            }
        }
    }
}

/// Destination for MIDI messages
pub trait MidiSink {
    fn send(&mut self, msg: MidiMessage);
}

/// Collects messages in order (handy for tests and capture)
impl MidiSink for Vec<MidiMessage> {
    fn send(&mut self, msg: MidiMessage) {
        self.push(msg);
    }
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Worm bounces off the left, right or top edge
    WallHit,
    /// Worm falls into the pit at the bottom
    PitFall,
    /// Worm bounces off the paddle
    PaddleHit,
    /// Worm hits a hole (destroyed or wormhole)
    HoleHit,
    /// All holes cleared
    LevelUp,
}

impl SoundEffect {
    /// General MIDI percussion key played for this effect
    pub fn percussion_note(&self) -> u8 {
        match self {
            SoundEffect::WallHit => 76,
            SoundEffect::PitFall => 66,
            SoundEffect::PaddleHit => 76,
            SoundEffect::HoleHit => 81,
            SoundEffect::LevelUp => 45,
        }
    }
}

/// Receiver for gameplay sound effects
///
/// The collision engine calls this once per resolved contact.
pub trait SoundSink {
    fn emit(&mut self, effect: SoundEffect);
}

impl SoundSink for Vec<SoundEffect> {
    fn emit(&mut self, effect: SoundEffect) {
        self.push(effect);
    }
}

/// Discards every effect
impl SoundSink for () {
    fn emit(&mut self, _effect: SoundEffect) {}
}

/// Plays sound effects as one-shot hits on the percussion channel
pub struct SfxPlayer<'a, M: MidiSink> {
    midi: &'a mut M,
    velocity: u8,
    enabled: bool,
}

impl<'a, M: MidiSink> SfxPlayer<'a, M> {
    pub fn new(midi: &'a mut M, velocity: u8, enabled: bool) -> Self {
        Self {
            midi,
            velocity: velocity.min(127),
            enabled,
        }
    }
}

impl<M: MidiSink> SoundSink for SfxPlayer<'_, M> {
    fn emit(&mut self, effect: SoundEffect) {
        if !self.enabled {
            return;
        }
        let pitch = effect.percussion_note();
        // Drum kits ignore the release, but the pair keeps the channel balanced
        self.midi.send(MidiMessage::NoteOn {
            channel: PERCUSSION_CHANNEL,
            pitch,
            velocity: self.velocity,
        });
        self.midi.send(MidiMessage::NoteOff {
            channel: PERCUSSION_CHANNEL,
            pitch,
        });
    }
}
