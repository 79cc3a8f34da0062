//! Export options.

use crate::{ExportError, Result};

pub const DEFAULT_MIDI_FILE_NAME: &str = "fountainpi.mid";
pub const DEFAULT_MANIFEST_FILE_NAME: &str = "show_manifest.json";

/// Export options.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Place end-of-track no earlier than this many seconds (None = right
    /// after the last event).
    pub end_hint_secs: Option<f64>,
    /// Emit a tempo meta event for every tempo change.
    pub tempo_meta_events: bool,
    /// Indent the manifest JSON.
    pub pretty_manifest: bool,
    /// File name used by `to_dir` for the MIDI file.
    pub midi_file_name: String,
    /// File name used by `to_dir` for the manifest.
    pub manifest_file_name: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            end_hint_secs: None,
            tempo_meta_events: false,
            pretty_manifest: true,
            midi_file_name: DEFAULT_MIDI_FILE_NAME.to_string(),
            manifest_file_name: DEFAULT_MANIFEST_FILE_NAME.to_string(),
        }
    }
}

impl ExportOptions {
    pub fn validate(&self) -> Result<()> {
        if let Some(hint) = self.end_hint_secs {
            if !hint.is_finite() {
                return Err(ExportError::InvalidOptions(format!(
                    "end hint must be finite, got {hint}"
                )));
            }
        }
        for name in [&self.midi_file_name, &self.manifest_file_name] {
            if name.is_empty() || name.contains(['/', '\\']) {
                return Err(ExportError::InvalidOptions(format!(
                    "invalid file name: {name:?}"
                )));
            }
        }
        if self.midi_file_name == self.manifest_file_name {
            return Err(ExportError::InvalidOptions(
                "MIDI and manifest file names must differ".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ExportOptions::default();
        assert_eq!(options.end_hint_secs, None);
        assert!(!options.tempo_meta_events);
        assert!(options.pretty_manifest);
        assert_eq!(options.midi_file_name, "fountainpi.mid");
        assert_eq!(options.manifest_file_name, "show_manifest.json");
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_finite_end_hint() {
        let options = ExportOptions {
            end_hint_secs: Some(f64::NAN),
            ..Default::default()
        };
        assert!(matches!(options.validate(), Err(ExportError::InvalidOptions(_))));
    }

    #[test]
    fn test_rejects_bad_file_names() {
        let nested = ExportOptions {
            midi_file_name: "out/show.mid".into(),
            ..Default::default()
        };
        assert!(nested.validate().is_err());

        let empty = ExportOptions {
            manifest_file_name: String::new(),
            ..Default::default()
        };
        assert!(empty.validate().is_err());

        let same = ExportOptions {
            midi_file_name: "show".into(),
            manifest_file_name: "show".into(),
            ..Default::default()
        };
        assert!(same.validate().is_err());
    }
}
