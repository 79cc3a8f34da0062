//! # fountain-core
//!
//! Show model and musical time for fountain pump/LED shows.
//!
//! - **Project model**: pump and LED notes, markers, tempo and
//!   time-signature changes, global export offset
//! - **Tempo map**: stepwise-constant tempo segments mapping seconds to ticks
//! - **Palette**: display colours for LED hue indices
//!
//! The exporter in `fountain-export` reads a [`Project`] and never mutates
//! it; editors build new projects with the `with_*` methods.

pub mod error;
pub mod note;
pub mod palette;
pub mod project;
pub mod timing;

pub use error::{Error, Result};
pub use note::{EffectParams, EffectType, FadeMode, Note, LANE_COUNT};
pub use palette::{color_from_hue_index, PaletteMode};
pub use project::{Marker, Project, TempoChange, TimeSigChange};
pub use timing::{
    bars_to_seconds, micros_per_quarter, seconds_per_beat, time_signature_at, TempoMap,
    TempoSegment, Tick, TimeSignature, BBT, PPQN,
};
