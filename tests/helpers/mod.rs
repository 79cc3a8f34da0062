//! Test helpers and fixtures for fountain integration tests.

#![allow(dead_code)]

use fountain::prelude::*;
use tracing_subscriber::EnvFilter;

/// Offset of the track body in a single-track file (header chunk + track
/// chunk id and length).
pub const TRACK_BODY_OFFSET: usize = 22;

/// Tempo and time-signature metas every export starts with, at 120 bpm 4/4.
pub const DEFAULT_PREAMBLE: [u8; 15] = [
    0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, //
    0x00, 0xFF, 0x58, 0x04, 0x04, 0x02, 0x18, 0x08,
];

pub const END_OF_TRACK: [u8; 4] = [0x00, 0xFF, 0x2F, 0x00];

/// Route `tracing` output to the test harness. Filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn track_body(midi: &[u8]) -> &[u8] {
    &midi[TRACK_BODY_OFFSET..]
}

/// Track body without the two leading meta events.
pub fn track_events(midi: &[u8]) -> &[u8] {
    &track_body(midi)[DEFAULT_PREAMBLE.len()..]
}

/// One LED note on lane 0 for one second at 120 bpm.
pub fn single_led_project() -> Project {
    Project::empty().with_led_note(Note::new(0, 0.0, 1.0, 100).with_hue(0))
}

/// One pump note on lane 3 from 0.5s to 1.5s at 120 bpm.
pub fn single_pump_project() -> Project {
    Project::empty().with_pump_note(Note::new(3, 0.5, 1.5, 80))
}

/// A saved project as written by the editor, including view state.
pub const EDITOR_PROJECT_JSON: &str = r##"{
  "pumpNotes": [
    {"lane": 0, "t0": 0.0, "t1": 2.0, "velocity": 127},
    {"lane": 9, "t0": 4.0, "t1": 4.5, "velocity": 40}
  ],
  "ledNotes": [
    {"lane": 0, "t0": 0.0, "t1": 1.0, "velocity": 100, "hueIndex": 5, "effectType": 0},
    {"lane": 4, "t0": 2.0, "t1": 3.0, "velocity": 90, "hueIndex": 8, "effectType": 3,
     "chaseHues": [1, 4, 7], "fxSpeed": 40},
    {"lane": 9, "t0": 3.0, "t1": 5.0, "velocity": 60, "effectType": 2,
     "fadeMode": "inout", "fadeLen": 12}
  ],
  "markers": [{"t": 2.0, "label": "drop", "color": "#ff3366"}],
  "bpm": 120,
  "timeSig": [4, 4],
  "tempos": [{"t": 3.0, "bpm": 60}],
  "timeSigs": [],
  "paletteMode": 0,
  "midiOffsetMs": 0,
  "zoomX": 140,
  "showPumps": true
}"##;
