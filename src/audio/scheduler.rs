//! Wall-clock driven score playback
//!
//! Every score event walks `Pending -> Sounding -> Finished` as the loop
//! clock passes its start and end. When the clock runs past the loop length
//! the base time moves forward by exactly one loop and every event starts
//! over, so phase is kept even when ticks jitter.

use std::time::{Duration, Instant};

use super::channels::{ChannelAllocator, MIDI_CHANNELS, PERCUSSION_CHANNEL};
use super::note::parse_note;
use super::score::{Score, ScoreEvent};
use super::{MidiMessage, MidiSink};

/// Lifecycle of a single score event within the current loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventState {
    Pending,
    Sounding,
    Finished,
}

/// Music mute flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MuteState {
    #[default]
    Off,
    /// Silence everything on the next advance, then become `Muted`
    MutingInProgress,
    /// Clock suspended, nothing triggers
    Muted,
}

#[derive(Debug, Clone)]
struct ScheduledEvent {
    event: ScoreEvent,
    pitch: u8,
    channel: Option<u8>,
    state: EventState,
}

/// Plays a [`Score`] in a loop through a [`MidiSink`]
#[derive(Debug, Clone)]
pub struct EventScheduler {
    events: Vec<ScheduledEvent>,
    loop_ms: u64,
    channels: ChannelAllocator,
    /// Wall-clock time of the current loop's start; `None` until the first advance
    clock_base: Option<Instant>,
    mute: MuteState,
    loops_completed: u64,
}

impl EventScheduler {
    /// Build a scheduler for `score`
    ///
    /// Events whose note name does not parse, or parses outside 0..=127, are
    /// authoring mistakes: they are logged and left out.
    pub fn new(score: Score) -> Self {
        let events = score
            .events
            .into_iter()
            .filter_map(|event| match parse_note(event.note) {
                Ok(pitch) => match u8::try_from(pitch) {
                    Ok(pitch) if pitch <= 127 => Some(ScheduledEvent {
                        event,
                        pitch,
                        channel: None,
                        state: EventState::Pending,
                    }),
                    _ => {
                        log::error!("Dropping score event {:?}: pitch {} out of range", event, pitch);
                        None
                    }
                },
                Err(e) => {
                    log::error!("Dropping score event {:?}: {}", event, e);
                    None
                }
            })
            .collect();

        Self {
            events,
            loop_ms: score.loop_ms as u64,
            channels: ChannelAllocator::new(),
            clock_base: None,
            mute: MuteState::Off,
            loops_completed: 0,
        }
    }

    /// Advance playback to wall-clock time `now`
    pub fn advance(&mut self, now: Instant, sink: &mut impl MidiSink) {
        match self.mute {
            MuteState::MutingInProgress => {
                self.silence(sink);
                self.mute = MuteState::Muted;
                self.clock_base = None;
                return;
            }
            MuteState::Muted => {
                self.clock_base = None;
                return;
            }
            MuteState::Off => {}
        }

        let mut base = *self.clock_base.get_or_insert(now);
        let mut elapsed = now.saturating_duration_since(base).as_millis() as u64;

        if self.loop_ms > 0 {
            while elapsed > self.loop_ms {
                self.wrap(sink);
                base += Duration::from_millis(self.loop_ms);
                elapsed -= self.loop_ms;
            }
        }
        self.clock_base = Some(base);

        for ev in self.events.iter_mut() {
            if ev.state == EventState::Pending && elapsed >= ev.event.start_ms as u64 {
                if ev.event.percussion {
                    sink.send(MidiMessage::NoteOn {
                        channel: PERCUSSION_CHANNEL,
                        pitch: ev.pitch,
                        velocity: ev.event.velocity,
                    });
                    ev.channel = Some(PERCUSSION_CHANNEL);
                } else {
                    let Some(ch) = self.channels.allocate() else {
                        log::trace!("No free channel for {}, retrying next tick", ev.event.note);
                        continue;
                    };
                    sink.send(MidiMessage::ProgramChange {
                        channel: ch,
                        program: ev.event.instrument,
                    });
                    sink.send(MidiMessage::NoteOn {
                        channel: ch,
                        pitch: ev.pitch,
                        velocity: ev.event.velocity,
                    });
                    ev.channel = Some(ch);
                }
                ev.state = EventState::Sounding;
            }

            if ev.state == EventState::Sounding && elapsed >= ev.event.end_ms() as u64 {
                stop_event(ev, &mut self.channels, sink);
                ev.state = EventState::Finished;
            }
        }
    }

    /// Start a new loop: release anything still sounding, re-arm every event
    fn wrap(&mut self, sink: &mut impl MidiSink) {
        for ev in self.events.iter_mut() {
            if ev.state == EventState::Sounding {
                stop_event(ev, &mut self.channels, sink);
            }
            ev.state = EventState::Pending;
        }
        self.loops_completed += 1;
    }

    /// Stop every note, then broadcast a note-off on every channel once
    fn silence(&mut self, sink: &mut impl MidiSink) {
        for ev in self.events.iter_mut() {
            if ev.state == EventState::Sounding {
                stop_event(ev, &mut self.channels, sink);
            }
            ev.state = EventState::Pending;
        }
        for channel in 0..MIDI_CHANNELS as u8 {
            sink.send(MidiMessage::NoteOff { channel, pitch: 0 });
        }
        self.channels.reset();
    }

    /// Flip between playing and muted
    pub fn toggle_mute(&mut self) {
        self.set_muted(self.mute == MuteState::Off);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.mute = match (muted, self.mute) {
            (true, MuteState::Off) => MuteState::MutingInProgress,
            (true, state) => state,
            (false, _) => MuteState::Off,
        };
        log::info!("Music {}", if muted { "muted" } else { "unmuted" });
    }

    pub fn mute_state(&self) -> MuteState {
        self.mute
    }

    pub fn is_muted(&self) -> bool {
        self.mute != MuteState::Off
    }

    /// Number of playable events in the score
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn state_of(&self, index: usize) -> Option<EventState> {
        self.events.get(index).map(|e| e.state)
    }

    /// Channel the event is sounding on, if any
    pub fn channel_of(&self, index: usize) -> Option<u8> {
        self.events
            .get(index)
            .filter(|e| e.state == EventState::Sounding)
            .and_then(|e| e.channel)
    }

    pub fn sounding_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| e.state == EventState::Sounding)
            .count()
    }

    pub fn loops_completed(&self) -> u64 {
        self.loops_completed
    }

    pub fn channels(&self) -> &ChannelAllocator {
        &self.channels
    }
}

fn stop_event(ev: &mut ScheduledEvent, channels: &mut ChannelAllocator, sink: &mut impl MidiSink) {
    let channel = ev.channel.take().unwrap_or(PERCUSSION_CHANNEL);
    sink.send(MidiMessage::NoteOff {
        channel,
        pitch: ev.pitch,
    });
    if !ev.event.percussion {
        channels.release(channel);
    }
}
