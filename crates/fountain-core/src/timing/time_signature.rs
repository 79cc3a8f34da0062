//! Time signatures and bar.beat.tick display positions.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::tempo_map::seconds_per_beat;
use crate::project::TimeSigChange;

/// Time signature, serialized as `[numerator, denominator]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct TimeSignature {
    pub numerator: u32,
    pub denominator: u32,
}

impl TimeSignature {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Denominator with 0 read as 4.
    #[inline]
    fn effective_denominator(&self) -> u32 {
        if self.denominator == 0 {
            4
        } else {
            self.denominator
        }
    }

    /// Quarter-note beats per bar.
    #[inline]
    pub fn beats_per_bar(&self) -> f64 {
        self.numerator as f64 * 4.0 / self.effective_denominator() as f64
    }

    /// Denominator as a power of two, as stored in a time-signature meta event.
    #[inline]
    pub fn denominator_log2(&self) -> u8 {
        (self.effective_denominator() as f64).log2().round() as u8
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::new(4, 4)
    }
}

impl From<[u32; 2]> for TimeSignature {
    fn from([numerator, denominator]: [u32; 2]) -> Self {
        Self::new(numerator, denominator)
    }
}

impl From<TimeSignature> for [u32; 2] {
    fn from(ts: TimeSignature) -> Self {
        [ts.numerator, ts.denominator]
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Time signature in force at `sec`.
pub fn time_signature_at(
    sec: f64,
    base: TimeSignature,
    changes: &[TimeSigChange],
) -> TimeSignature {
    let mut applicable: Vec<&TimeSigChange> = changes.iter().filter(|c| c.t <= sec).collect();
    applicable.sort_by(|a, b| a.t.total_cmp(&b.t));
    applicable
        .last()
        .map_or(base, |c| TimeSignature::new(c.num, c.den))
}

/// Length of `bars` bars in seconds at a constant tempo.
pub fn bars_to_seconds(bars: f64, bpm: f64, ts: TimeSignature) -> f64 {
    bars * ts.beats_per_bar() * seconds_per_beat(bpm)
}

/// Bar.beat.tick position, 1-indexed bar and beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BBT {
    pub bar: u32,
    pub beat: u32,
    pub ticks: u32,
}

impl BBT {
    /// Display resolution, independent of the export PPQN.
    pub const TICKS_PER_BEAT: u32 = 960;

    pub fn new(bar: u32, beat: u32, ticks: u32) -> Self {
        Self { bar, beat, ticks }
    }

    /// Position of `sec` at a constant tempo.
    pub fn from_seconds(sec: f64, bpm: f64, ts: TimeSignature) -> Self {
        let beats = sec / seconds_per_beat(bpm);
        let beats_per_bar = ts.beats_per_bar();

        let bar = (beats / beats_per_bar).floor() as u32 + 1;
        let beat = (beats % beats_per_bar).floor() as u32 + 1;
        let ticks = ((beats % 1.0) * Self::TICKS_PER_BEAT as f64).floor() as u32;

        Self { bar, beat, ticks }
    }
}

impl fmt::Display for BBT {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.bar, self.beat, self.ticks)
    }
}
