//! Timed show events and their channel-voice encoding.

use fountain_core::{micros_per_quarter, Tick};

use crate::protocol::{CCNumber, MidiChannel};

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;
const CONTROL_CHANGE: u8 = 0xB0;

pub(crate) const META: u8 = 0xFF;
pub(crate) const META_TEMPO: u8 = 0x51;

/// Largest tempo a meta event can carry (24 bits).
pub const MAX_MICROS_PER_QUARTER: u32 = 0x00FF_FFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Tempo {
        micros_per_quarter: u32,
    },
    ControlChange {
        channel: MidiChannel,
        controller: CCNumber,
        value: u8,
    },
    NoteOn {
        channel: MidiChannel,
        pitch: u8,
        velocity: u8,
    },
    NoteOff {
        channel: MidiChannel,
        pitch: u8,
    },
}

impl EventKind {
    /// Order among events sharing a tick: tempo, then CCs, then note-ons,
    /// then note-offs.
    pub const fn priority(&self) -> u8 {
        match self {
            EventKind::Tempo { .. } => 0,
            EventKind::ControlChange { .. } => 1,
            EventKind::NoteOn { .. } => 2,
            EventKind::NoteOff { .. } => 3,
        }
    }

    pub const fn channel(&self) -> Option<MidiChannel> {
        match *self {
            EventKind::Tempo { .. } => None,
            EventKind::ControlChange { channel, .. }
            | EventKind::NoteOn { channel, .. }
            | EventKind::NoteOff { channel, .. } => Some(channel),
        }
    }
}

/// An event at an absolute tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowEvent {
    pub tick: Tick,
    pub kind: EventKind,
}

impl ShowEvent {
    /// Control change with the value clamped to 0-127.
    pub fn control_change(
        tick: Tick,
        channel: MidiChannel,
        controller: CCNumber,
        value: u8,
    ) -> Self {
        Self {
            tick,
            kind: EventKind::ControlChange {
                channel: channel & 0x0F,
                controller: controller & 0x7F,
                value: value.min(127),
            },
        }
    }

    /// Note-on with the velocity clamped to 1-127.
    pub fn note_on(tick: Tick, channel: MidiChannel, pitch: u8, velocity: u8) -> Self {
        Self {
            tick,
            kind: EventKind::NoteOn {
                channel: channel & 0x0F,
                pitch: pitch & 0x7F,
                velocity: velocity.clamp(1, 127),
            },
        }
    }

    pub fn note_off(tick: Tick, channel: MidiChannel, pitch: u8) -> Self {
        Self {
            tick,
            kind: EventKind::NoteOff {
                channel: channel & 0x0F,
                pitch: pitch & 0x7F,
            },
        }
    }

    /// Tempo change from a bpm value.
    pub fn tempo(tick: Tick, bpm: f64) -> Self {
        Self::tempo_micros(tick, micros_per_quarter(bpm))
    }

    pub fn tempo_micros(tick: Tick, micros_per_quarter: u32) -> Self {
        Self {
            tick,
            kind: EventKind::Tempo {
                micros_per_quarter: micros_per_quarter.min(MAX_MICROS_PER_QUARTER),
            },
        }
    }

    #[inline]
    pub fn sort_key(&self) -> (Tick, u8) {
        (self.tick, self.kind.priority())
    }

    /// Append the event body (everything after the delta time).
    ///
    /// Channel messages always carry their status byte.
    pub fn write_message(&self, out: &mut Vec<u8>) {
        match self.kind {
            EventKind::Tempo { micros_per_quarter } => {
                out.extend_from_slice(&[META, META_TEMPO, 0x03]);
                out.extend_from_slice(&micros_per_quarter.to_be_bytes()[1..]);
            }
            EventKind::ControlChange {
                channel,
                controller,
                value,
            } => out.extend_from_slice(&[CONTROL_CHANGE | channel, controller, value]),
            EventKind::NoteOn {
                channel,
                pitch,
                velocity,
            } => out.extend_from_slice(&[NOTE_ON | channel, pitch, velocity]),
            EventKind::NoteOff { channel, pitch } => {
                out.extend_from_slice(&[NOTE_OFF | channel, pitch, 0])
            }
        }
    }
}

/// Stable sort by tick, then by kind priority. Insertion order breaks any
/// remaining tie.
pub fn sort_events(events: &mut [ShowEvent]) {
    events.sort_by_key(ShowEvent::sort_key);
}
