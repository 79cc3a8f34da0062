//! # Fountain - Show Exporter
//!
//! Turns a fountain show (pump and LED cues on a timeline) into the files a
//! fountain controller plays back.
//!
//! ## Architecture
//!
//! Fountain is an umbrella crate that coordinates:
//! - **fountain-core** - Show model (notes, effects, markers), tempo map, palette
//! - **fountain-midi** - Controller protocol, show events, SMF writer and reader
//! - **fountain-export** - Event building, manifest, export builder
//!
//! ## Quick Start
//!
//! ```no_run
//! use fountain::prelude::*;
//!
//! # fn main() -> fountain::Result<()> {
//! let project = Project::load("show.json")?;
//!
//! project
//!     .export()
//!     .end_hint_secs(184.0)
//!     .to_dir("bundle")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Export enabled
//! - `export` - MIDI + manifest export pipeline

/// Re-export of fountain-core for direct access
pub use fountain_core as core;

/// Re-export of fountain-midi for direct access
pub use fountain_midi as midi;

// Show model
pub use fountain_core::{
    EffectParams, EffectType, FadeMode, Marker, Note, PaletteMode, Project, TempoChange,
    TimeSigChange,
};

// Timing
pub use fountain_core::{TempoMap, Tick, TimeSignature, BBT, PPQN};

// Wire protocol
pub use fountain_midi::{ParsedShowFile, ShowController, ShowEvent};

// Export
#[cfg(feature = "export")]
pub use fountain_export as export;

#[cfg(feature = "export")]
pub use fountain_export::{export_show, ExportOptions, Manifest, ShowExport, ShowExportBuilder};

mod error;

pub use error::{Error, Result};

/// Export entry point on a project.
#[cfg(feature = "export")]
pub trait ExportExt {
    /// Start an export of this project.
    fn export(&self) -> ShowExportBuilder<'_>;
}

#[cfg(feature = "export")]
impl ExportExt for Project {
    fn export(&self) -> ShowExportBuilder<'_> {
        ShowExportBuilder::new(self)
    }
}

/// Convenience prelude for common imports
pub mod prelude {
    // Show model
    pub use crate::core::{EffectParams, EffectType, FadeMode, Note, Project};

    // Timing
    pub use crate::core::{TempoMap, TimeSignature};

    // Reading exported files
    pub use crate::midi::ParsedShowFile;

    // Export
    #[cfg(feature = "export")]
    pub use crate::export::{ExportOptions, ShowExport, ShowExportBuilder};

    #[cfg(feature = "export")]
    pub use crate::ExportExt;
}
