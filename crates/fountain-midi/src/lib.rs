//! # fountain-midi
//!
//! Show-control MIDI for fountain controllers.
//!
//! - **Protocol**: pump/LED channel and pitch assignment, hue table, CC meanings
//! - **Events**: timed channel and tempo events with a deterministic order
//! - **SMF**: byte-exact single-track file writer and a `midly`-backed reader
//!
//! ```
//! use fountain_core::TimeSignature;
//! use fountain_midi::{ShowEvent, SmfWriter};
//!
//! let events = vec![ShowEvent::note_on(0, 0, 60, 100), ShowEvent::note_off(480, 0, 60)];
//! let bytes = SmfWriter::new(120.0, TimeSignature::new(4, 4)).write(events);
//! assert_eq!(&bytes[..4], b"MThd");
//! ```

pub mod error;
pub mod event;
pub mod file;
pub mod protocol;
pub mod smf;

pub use error::{Error, Result};
pub use event::{sort_events, EventKind, ShowEvent};
pub use file::{NoteSpan, ParsedShowFile};
pub use protocol::{
    clamp_velocity, hue_to_cc, led_channel, pump_pitch, CCNumber, MidiChannel, ShowController,
    HUE_TABLE,
};
pub use smf::SmfWriter;
