//! Piecewise tempo map from elapsed seconds to sequencer ticks.
//!
//! Tempo is stepwise constant: each segment starts at a tempo change and
//! keeps its bpm until the next one. A segment's start tick is integrated at
//! the tempo of the segment before it.

use crate::project::TempoChange;

/// Ticks per quarter note used for every exported show.
pub const PPQN: u16 = 480;

/// Integer sequencer time.
pub type Tick = u32;

/// Seconds per beat, with bpm floored at 1.
#[inline]
pub fn seconds_per_beat(bpm: f64) -> f64 {
    60.0 / bpm.max(1.0)
}

/// Microseconds per quarter note for a tempo meta event.
#[inline]
pub fn micros_per_quarter(bpm: f64) -> u32 {
    (1e6 * seconds_per_beat(bpm)).round() as u32
}

/// Fractional ticks covered by `dt` seconds at `bpm`.
///
/// Both the builder and the converter go through this function so that the
/// float operations at a segment boundary are identical on either side.
#[inline]
fn ticks_for(dt: f64, bpm: f64) -> f64 {
    (dt / seconds_per_beat(bpm)) * f64::from(PPQN)
}

#[inline]
fn round_tick(ticks: f64) -> Tick {
    ticks.round() as Tick
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoSegment {
    pub start_sec: f64,
    pub bpm: f64,
    /// Unrounded tick at `start_sec`.
    pub start_tick: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TempoMap {
    base_bpm: f64,
    segments: Vec<TempoSegment>,
}

impl TempoMap {
    /// Build the map from a base tempo and an unordered list of changes.
    pub fn new(base_bpm: f64, changes: &[TempoChange]) -> Self {
        let mut sorted = changes.to_vec();
        sorted.sort_by(|a, b| a.t.total_cmp(&b.t));

        let mut segments = Vec::with_capacity(sorted.len());
        let mut tick = 0.0;
        let mut last_sec = 0.0;
        let mut last_bpm = base_bpm;

        for change in &sorted {
            if change.t > last_sec {
                tick += ticks_for(change.t - last_sec, last_bpm);
                last_sec = change.t;
            }
            last_bpm = change.bpm;
            segments.push(TempoSegment {
                start_sec: change.t,
                bpm: change.bpm,
                start_tick: tick,
            });
        }

        Self { base_bpm, segments }
    }

    /// Map with no tempo changes.
    pub fn constant(bpm: f64) -> Self {
        Self::new(bpm, &[])
    }

    #[inline]
    pub fn base_bpm(&self) -> f64 {
        self.base_bpm
    }

    #[inline]
    pub fn segments(&self) -> &[TempoSegment] {
        &self.segments
    }

    /// Latest segment starting at or before `sec`.
    pub fn segment_at(&self, sec: f64) -> Option<&TempoSegment> {
        let idx = self.segments.partition_point(|s| s.start_sec <= sec);
        idx.checked_sub(1).map(|i| &self.segments[i])
    }

    /// Convert seconds to the nearest tick.
    ///
    /// Each call rounds independently; times before the first change use the
    /// base tempo directly.
    pub fn sec_to_tick(&self, sec: f64) -> Tick {
        match self.segment_at(sec) {
            Some(seg) => round_tick(seg.start_tick + ticks_for(sec - seg.start_sec, seg.bpm)),
            None => round_tick(ticks_for(sec, self.base_bpm)),
        }
    }

    /// Tempo in force at `sec`.
    pub fn tempo_at(&self, sec: f64) -> f64 {
        self.segment_at(sec).map_or(self.base_bpm, |s| s.bpm)
    }

    /// Rounded start tick and bpm of every segment, in order.
    pub fn tempo_points(&self) -> impl Iterator<Item = (Tick, f64)> + '_ {
        self.segments
            .iter()
            .map(|s| (round_tick(s.start_tick), s.bpm))
    }
}

impl Default for TempoMap {
    fn default() -> Self {
        Self::constant(120.0)
    }
}
