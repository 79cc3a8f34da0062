//! Musical time: tempo map, time signatures, display positions.

mod tempo_map;
mod time_signature;

pub use tempo_map::{micros_per_quarter, seconds_per_beat, TempoMap, TempoSegment, Tick, PPQN};
pub use time_signature::{bars_to_seconds, time_signature_at, TimeSignature, BBT};
