use std::path::{Path, PathBuf};

use fountain_core::Project;

use crate::{export_show, ExportOptions, Result, ShowExport};

/// Builder for exporting a show.
///
/// # Example
/// ```no_run
/// # use fountain_core::Project;
/// # use fountain_export::ShowExportBuilder;
/// # fn main() -> fountain_export::Result<()> {
/// # let project = Project::empty();
/// let export = ShowExportBuilder::new(&project)
///     .end_hint_secs(120.0)
///     .tempo_meta_events(true)
///     .render();
/// ShowExportBuilder::new(&project).to_files("show.mid", "show.json")?;
/// # Ok(())
/// # }
/// ```
pub struct ShowExportBuilder<'a> {
    project: &'a Project,
    options: ExportOptions,
}

impl<'a> ShowExportBuilder<'a> {
    pub fn new(project: &'a Project) -> Self {
        Self {
            project,
            options: ExportOptions::default(),
        }
    }

    /// Pad the track to at least this many seconds, e.g. the length of the
    /// show's audio.
    pub fn end_hint_secs(mut self, secs: f64) -> Self {
        self.options.end_hint_secs = Some(secs);
        self
    }

    pub fn tempo_meta_events(mut self, enabled: bool) -> Self {
        self.options.tempo_meta_events = enabled;
        self
    }

    pub fn pretty_manifest(mut self, enabled: bool) -> Self {
        self.options.pretty_manifest = enabled;
        self
    }

    /// File names used by [`to_dir`](Self::to_dir).
    pub fn file_names(mut self, midi: impl Into<String>, manifest: impl Into<String>) -> Self {
        self.options.midi_file_name = midi.into();
        self.options.manifest_file_name = manifest.into();
        self
    }

    /// Replace all options.
    pub fn options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn render(&self) -> ShowExport {
        export_show(self.project, &self.options)
    }

    pub fn to_files(
        self,
        midi_path: impl AsRef<Path>,
        manifest_path: impl AsRef<Path>,
    ) -> Result<()> {
        self.options.validate()?;
        self.render().write_files(midi_path, manifest_path)
    }

    /// Write both files into `dir`, creating it if needed. Returns the MIDI
    /// and manifest paths.
    pub fn to_dir(self, dir: impl AsRef<Path>) -> Result<(PathBuf, PathBuf)> {
        self.options.validate()?;
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let midi_path = dir.join(&self.options.midi_file_name);
        let manifest_path = dir.join(&self.options.manifest_file_name);
        self.render().write_files(&midi_path, &manifest_path)?;
        Ok((midi_path, manifest_path))
    }
}
