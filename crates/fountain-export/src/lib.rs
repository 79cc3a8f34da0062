//! # Fountain Export
//!
//! Export a fountain show to the two artifacts the controller consumes:
//! - **MIDI file**: single-track SMF, PPQN 480, pumps on channel 0 and LED
//!   rings on channels 1-10
//! - **Manifest**: JSON description of the channel and controller mapping
//!
//! ```
//! use fountain_core::{Note, Project};
//! use fountain_export::{export_show, ExportOptions};
//!
//! let project = Project::empty().with_led_note(Note::new(0, 0.0, 1.0, 100).with_hue(3));
//! let export = export_show(&project, &ExportOptions::default());
//! assert_eq!(&export.midi[..4], b"MThd");
//! assert_eq!(export.manifest.bpm, 120.0);
//! ```
//!
//! For writing files, use [`ShowExportBuilder`]:
//!
//! ```no_run
//! # use fountain_core::Project;
//! # use fountain_export::ShowExportBuilder;
//! # fn main() -> fountain_export::Result<()> {
//! let project = Project::empty();
//! ShowExportBuilder::new(&project)
//!     .end_hint_secs(95.0)
//!     .to_dir("out")?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod event_builder;
pub mod export_builder;
pub mod manifest;
mod options;

pub use error::{ExportError, Result};
pub use event_builder::EventBuilder;
pub use export_builder::ShowExportBuilder;
pub use manifest::{Manifest, PumpManifest, MANIFEST_VERSION};
pub use options::{ExportOptions, DEFAULT_MANIFEST_FILE_NAME, DEFAULT_MIDI_FILE_NAME};

use std::path::Path;

use fountain_core::Project;
use fountain_midi::SmfWriter;

/// Both artifacts of one export.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowExport {
    /// Standard MIDI File bytes.
    pub midi: Vec<u8>,
    pub manifest: Manifest,
    pretty_manifest: bool,
}

impl ShowExport {
    /// Manifest as JSON text, indented unless compact output was requested.
    pub fn manifest_json(&self) -> Result<String> {
        self.manifest.to_json(self.pretty_manifest)
    }

    /// Write both artifacts.
    pub fn write_files(
        &self,
        midi_path: impl AsRef<Path>,
        manifest_path: impl AsRef<Path>,
    ) -> Result<()> {
        let manifest = self.manifest_json()?;
        std::fs::write(midi_path.as_ref(), &self.midi)?;
        std::fs::write(manifest_path.as_ref(), manifest)?;
        tracing::debug!(
            midi = %midi_path.as_ref().display(),
            manifest = %manifest_path.as_ref().display(),
            "Wrote show export"
        );
        Ok(())
    }
}

/// Export a project.
///
/// Pure and deterministic: the same project and options always give the
/// same bytes. The project is only read.
pub fn export_show(project: &Project, options: &ExportOptions) -> ShowExport {
    let tempo_map = project.tempo_map();
    let events = EventBuilder::new(&tempo_map, project.midi_offset_secs())
        .with_tempo_meta_events(options.tempo_meta_events)
        .build(project);
    let event_count = events.len();

    let end_tick = options
        .end_hint_secs
        .map(|hint| tempo_map.sec_to_tick(hint.max(0.0)));
    let midi = SmfWriter::new(project.bpm, project.time_sig)
        .with_end_tick(end_tick)
        .write(events);

    tracing::debug!(
        pump_notes = project.pump_notes.len(),
        led_notes = project.led_notes.len(),
        tempo_changes = project.tempos.len(),
        events = event_count,
        bytes = midi.len(),
        "Exported show"
    );

    ShowExport {
        midi,
        manifest: Manifest::for_project(project),
        pretty_manifest: options.pretty_manifest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fountain_core::Note;
    use approx::assert_relative_eq;
    use fountain_midi::ParsedShowFile;
    use midly::{MetaMessage, MidiMessage, Smf, TrackEventKind};

    fn track_body(midi: &[u8]) -> &[u8] {
        &midi[22..]
    }

    #[test]
    fn test_led_note_bytes() {
        let project = Project::empty().with_led_note(Note::new(0, 0.0, 1.0, 100).with_hue(0));
        let export = export_show(&project, &ExportOptions::default());

        assert_eq!(&export.midi[18..22], &[0, 0, 0, 0x34]);
        assert_eq!(
            track_body(&export.midi),
            &[
                0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, //
                0x00, 0xFF, 0x58, 0x04, 0x04, 0x02, 0x18, 0x08, //
                0x00, 0xB1, 0x01, 0x00, //
                0x00, 0xB1, 0x02, 0x7F, //
                0x00, 0xB1, 0x0A, 0x00, //
                0x00, 0xB1, 0x01, 0x00, //
                0x00, 0xB1, 0x02, 0x7F, //
                0x00, 0xB1, 0x0A, 0x00, //
                0x00, 0x91, 0x3C, 0x64, //
                0x87, 0x40, 0x81, 0x3C, 0x00, //
                0x00, 0xFF, 0x2F, 0x00,
            ]
        );
    }

    #[test]
    fn test_pump_note_bytes() {
        let project = Project::empty().with_pump_note(Note::new(3, 0.5, 1.5, 80));
        let export = export_show(&project, &ExportOptions::default());
        assert_eq!(
            &track_body(&export.midi)[15..],
            &[
                0x83, 0x60, 0x90, 0x3F, 0x50, //
                0x87, 0x40, 0x80, 0x3F, 0x00, //
                0x00, 0xFF, 0x2F, 0x00,
            ]
        );
    }

    #[test]
    fn test_midly_reads_led_note() {
        let project = Project::empty()
            .with_bpm(96.0)
            .with_led_note(Note::new(2, 0.0, 1.0, 100).with_hue(3));
        let export = export_show(&project, &ExportOptions::default());

        let smf = Smf::parse(&export.midi).unwrap();
        assert_eq!(smf.tracks.len(), 1);
        let track = &smf.tracks[0];

        let tempo = track.iter().find_map(|e| match e.kind {
            TrackEventKind::Meta(MetaMessage::Tempo(t)) => Some(t.as_int()),
            _ => None,
        });
        assert_eq!(tempo, Some(625_000));
        assert_relative_eq!(export.manifest.bpm, 60_000_000.0 / 625_000.0);

        let ccs: Vec<(u8, u8, u8)> = track
            .iter()
            .filter_map(|e| match e.kind {
                TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::Controller { controller, value },
                } => Some((channel.as_int(), controller.as_int(), value.as_int())),
                _ => None,
            })
            .collect();
        assert_eq!(
            ccs,
            vec![(3, 1, 0), (3, 2, 127), (3, 10, 0), (3, 1, 33), (3, 2, 127), (3, 10, 0)]
        );

        let last = track.last().map(|e| e.kind);
        assert_eq!(last, Some(TrackEventKind::Meta(MetaMessage::EndOfTrack)));
    }

    #[test]
    fn test_empty_project() {
        let export = export_show(&Project::empty(), &ExportOptions::default());
        assert_eq!(export.midi.len(), 41);
        assert_eq!(export.manifest.bpm, 120.0);
    }

    #[test]
    fn test_deterministic() {
        let project = Project::empty()
            .with_tempo_change(4.0, 90.0)
            .with_led_note(Note::new(2, 0.25, 5.0, 70).with_hue(7))
            .with_pump_note(Note::new(1, 1.0, 6.0, 110));
        let a = export_show(&project, &ExportOptions::default());
        let b = export_show(&project, &ExportOptions::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_end_hint_pads_track() {
        let project = Project::empty().with_pump_note(Note::new(0, 0.0, 1.0, 64));
        let options = ExportOptions {
            end_hint_secs: Some(3.0),
            ..Default::default()
        };
        let export = export_show(&project, &options);
        let parsed = ParsedShowFile::parse(&export.midi).unwrap();
        assert_eq!(parsed.end_tick, 2880);

        let short = ExportOptions {
            end_hint_secs: Some(0.5),
            ..Default::default()
        };
        let parsed = ParsedShowFile::parse(&export_show(&project, &short).midi).unwrap();
        assert_eq!(parsed.end_tick, 960);

        let negative = ExportOptions {
            end_hint_secs: Some(-4.0),
            ..Default::default()
        };
        let parsed = ParsedShowFile::parse(&export_show(&project, &negative).midi).unwrap();
        assert_eq!(parsed.end_tick, 960);
    }

    #[test]
    fn test_manifest_json_respects_pretty_flag() {
        let compact = ExportOptions {
            pretty_manifest: false,
            ..Default::default()
        };
        let export = export_show(&Project::empty(), &compact);
        assert!(!export.manifest_json().unwrap().contains('\n'));

        let export = export_show(&Project::empty(), &ExportOptions::default());
        assert!(export.manifest_json().unwrap().contains('\n'));
    }
}
