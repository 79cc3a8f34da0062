//! Centralized error type for the fountain umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] fountain_core::Error),

    #[error("MIDI: {0}")]
    Midi(#[from] fountain_midi::Error),

    #[cfg(feature = "export")]
    #[error("Export: {0}")]
    Export(#[from] fountain_export::ExportError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
