//! Reading show MIDI files back.
//!
//! Parsing goes through the `midly` crate so exported files are checked by
//! an independent decoder. Only the first track is read; the exporter never
//! writes more than one.

use std::path::Path;

use fountain_core::{Tick, TimeSignature};
use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};
use tracing::debug;

use crate::error::{Error, Result};
use crate::event::{EventKind, ShowEvent};
use crate::protocol::MidiChannel;

const DEFAULT_MICROS_PER_QUARTER: u32 = 500_000;

/// A parsed show file.
#[derive(Debug, Clone)]
pub struct ParsedShowFile {
    /// Ticks per quarter note.
    pub ppqn: u16,

    /// Tempo of the first tempo meta event (500000 if none).
    pub micros_per_quarter: u32,

    /// First time signature meta event (4/4 if none).
    pub time_signature: TimeSignature,

    /// Channel events and any tempo changes after the initial tempo, in file
    /// order.
    pub events: Vec<ShowEvent>,

    /// Tick of the end-of-track meta event.
    pub end_tick: Tick,
}

/// A note-on paired with its note-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteSpan {
    pub channel: MidiChannel,
    pub pitch: u8,
    pub velocity: u8,
    pub start: Tick,
    pub end: Tick,
}

impl ParsedShowFile {
    /// Load and parse a file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::parse(&data)
    }

    pub fn parse(data: &[u8]) -> Result<Self> {
        let smf = Smf::parse(data)?;

        let ppqn = match smf.header.timing {
            Timing::Metrical(tpb) => tpb.as_int(),
            Timing::Timecode(_, _) => return Err(Error::MidiUnsupportedTiming),
        };
        let track = smf.tracks.first().ok_or(Error::MissingTrack)?;

        let mut micros_per_quarter = None;
        let mut time_signature = None;
        let mut events = Vec::new();
        let mut tick: Tick = 0;
        let mut end_tick: Tick = 0;

        for event in track.iter() {
            tick = tick.saturating_add(event.delta.as_int());
            match event.kind {
                TrackEventKind::Midi { channel, message } => {
                    if let Some(e) = convert_message(tick, channel.as_int(), message) {
                        events.push(e);
                    }
                }
                TrackEventKind::Meta(MetaMessage::Tempo(t)) => {
                    if micros_per_quarter.is_none() {
                        micros_per_quarter = Some(t.as_int());
                    } else {
                        events.push(ShowEvent::tempo_micros(tick, t.as_int()));
                    }
                }
                TrackEventKind::Meta(MetaMessage::TimeSignature(num, den_log2, _, _)) => {
                    if time_signature.is_none() {
                        time_signature = Some(TimeSignature::new(
                            u32::from(num),
                            1u32.checked_shl(u32::from(den_log2)).unwrap_or(4),
                        ));
                    }
                }
                TrackEventKind::Meta(MetaMessage::EndOfTrack) => end_tick = tick,
                _ => {}
            }
        }

        debug!(
            "Parsed show file: {} events, {} ticks per beat, end at tick {}",
            events.len(),
            ppqn,
            end_tick
        );

        Ok(Self {
            ppqn,
            micros_per_quarter: micros_per_quarter.unwrap_or(DEFAULT_MICROS_PER_QUARTER),
            time_signature: time_signature.unwrap_or_default(),
            events,
            end_tick,
        })
    }

    /// Initial tempo in bpm.
    pub fn tempo_bpm(&self) -> f64 {
        60_000_000.0 / f64::from(self.micros_per_quarter.max(1))
    }

    pub fn events_on_channel(&self, channel: MidiChannel) -> impl Iterator<Item = &ShowEvent> {
        self.events
            .iter()
            .filter(move |e| e.kind.channel() == Some(channel))
    }

    /// Pair note-ons with the next note-off of the same channel and pitch.
    /// Unterminated notes are dropped.
    pub fn note_spans(&self) -> Vec<NoteSpan> {
        let mut open: Vec<NoteSpan> = Vec::new();
        let mut spans = Vec::new();

        for event in &self.events {
            match event.kind {
                EventKind::NoteOn {
                    channel,
                    pitch,
                    velocity,
                } => open.push(NoteSpan {
                    channel,
                    pitch,
                    velocity,
                    start: event.tick,
                    end: event.tick,
                }),
                EventKind::NoteOff { channel, pitch } => {
                    if let Some(i) = open
                        .iter()
                        .position(|n| n.channel == channel && n.pitch == pitch)
                    {
                        let mut span = open.remove(i);
                        span.end = event.tick;
                        spans.push(span);
                    }
                }
                _ => {}
            }
        }

        spans.sort_by_key(|s| (s.start, s.channel, s.pitch));
        spans
    }
}

fn convert_message(tick: Tick, channel: MidiChannel, message: MidiMessage) -> Option<ShowEvent> {
    match message {
        MidiMessage::NoteOn { key, vel } if vel.as_int() == 0 => {
            Some(ShowEvent::note_off(tick, channel, key.as_int()))
        }
        MidiMessage::NoteOn { key, vel } => {
            Some(ShowEvent::note_on(tick, channel, key.as_int(), vel.as_int()))
        }
        MidiMessage::NoteOff { key, .. } => Some(ShowEvent::note_off(tick, channel, key.as_int())),
        MidiMessage::Controller { controller, value } => Some(ShowEvent::control_change(
            tick,
            channel,
            controller.as_int(),
            value.as_int(),
        )),
        // The show protocol has no other channel messages
        _ => None,
    }
}
