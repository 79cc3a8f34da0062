//! Standard MIDI File encoding.

mod vlq;
mod writer;

pub use vlq::{read_vlq, vlq_len, write_vlq, VLQ_MAX};
pub use writer::{SmfWriter, HEADER_CHUNK_ID, TRACK_CHUNK_ID};
