//! Single-track format 1 file writer.

use fountain_core::{micros_per_quarter, Tick, TimeSignature, PPQN};

use super::vlq::{write_vlq, VLQ_MAX};
use crate::event::{sort_events, ShowEvent, MAX_MICROS_PER_QUARTER, META, META_TEMPO};

pub const HEADER_CHUNK_ID: &[u8; 4] = b"MThd";
pub const TRACK_CHUNK_ID: &[u8; 4] = b"MTrk";

const HEADER_LENGTH: u32 = 6;
const FORMAT: u16 = 1;
const TRACK_COUNT: u16 = 1;

const META_TIME_SIGNATURE: u8 = 0x58;
const META_END_OF_TRACK: u8 = 0x2F;
const CLOCKS_PER_CLICK: u8 = 24;
const THIRTY_SECONDS_PER_QUARTER: u8 = 8;

/// Writes a show's events as a single-track file.
///
/// The track opens with the initial tempo and time signature at tick 0 and
/// ends with an end-of-track meta at the last event or the end tick,
/// whichever is later.
#[derive(Debug, Clone)]
pub struct SmfWriter {
    ppqn: u16,
    tempo_bpm: f64,
    time_signature: TimeSignature,
    end_tick: Option<Tick>,
}

impl SmfWriter {
    pub fn new(tempo_bpm: f64, time_signature: TimeSignature) -> Self {
        Self {
            ppqn: PPQN,
            tempo_bpm,
            time_signature,
            end_tick: None,
        }
    }

    /// Place end-of-track no earlier than `end_tick`.
    pub fn with_end_tick(mut self, end_tick: Option<Tick>) -> Self {
        self.end_tick = end_tick;
        self
    }

    pub fn ppqn(&self) -> u16 {
        self.ppqn
    }

    /// Sort `events` and encode the whole file.
    pub fn write(&self, mut events: Vec<ShowEvent>) -> Vec<u8> {
        sort_events(&mut events);
        let track = self.track_body(&events);

        let mut out = Vec::with_capacity(22 + track.len());
        out.extend_from_slice(HEADER_CHUNK_ID);
        out.extend_from_slice(&HEADER_LENGTH.to_be_bytes());
        out.extend_from_slice(&FORMAT.to_be_bytes());
        out.extend_from_slice(&TRACK_COUNT.to_be_bytes());
        out.extend_from_slice(&self.ppqn.to_be_bytes());
        out.extend_from_slice(TRACK_CHUNK_ID);
        out.extend_from_slice(&(track.len() as u32).to_be_bytes());
        out.extend_from_slice(&track);

        tracing::debug!(
            events = events.len(),
            bytes = out.len(),
            "Encoded show MIDI file"
        );
        out
    }

    fn track_body(&self, events: &[ShowEvent]) -> Vec<u8> {
        let mut body = Vec::with_capacity(16 + events.len() * 4);

        let mpq = micros_per_quarter(self.tempo_bpm);
        if mpq > MAX_MICROS_PER_QUARTER {
            tracing::warn!(
                bpm = self.tempo_bpm,
                "Tempo too slow for a tempo meta event, clamping"
            );
        }
        body.extend_from_slice(&[0x00, META, META_TEMPO, 0x03]);
        body.extend_from_slice(&mpq.min(MAX_MICROS_PER_QUARTER).to_be_bytes()[1..]);

        body.extend_from_slice(&[
            0x00,
            META,
            META_TIME_SIGNATURE,
            0x04,
            (self.time_signature.numerator & 0xFF) as u8,
            self.time_signature.denominator_log2(),
            CLOCKS_PER_CLICK,
            THIRTY_SECONDS_PER_QUARTER,
        ]);

        let mut last_tick: Tick = 0;
        for event in events {
            write_delta(event.tick.saturating_sub(last_tick), &mut body);
            event.write_message(&mut body);
            last_tick = event.tick;
        }

        let end_tick = self.end_tick.map_or(last_tick, |t| t.max(last_tick));
        write_delta(end_tick - last_tick, &mut body);
        body.extend_from_slice(&[META, META_END_OF_TRACK, 0x00]);
        body
    }
}

fn write_delta(delta: Tick, out: &mut Vec<u8>) {
    if delta > VLQ_MAX {
        tracing::warn!(delta, max = VLQ_MAX, "Delta time exceeds VLQ range, saturating");
    }
    write_vlq(delta, out);
}
