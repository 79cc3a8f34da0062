//! Show timeline: notes, markers, tempo and time-signature changes.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::note::Note;
use crate::palette::PaletteMode;
use crate::timing::{TempoMap, TimeSignature};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoChange {
    /// Seconds.
    pub t: f64,
    pub bpm: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSigChange {
    /// Seconds.
    pub t: f64,
    pub num: u32,
    pub den: u32,
}

/// Timeline marker. Shown in the editor, never exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub t: f64,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

const PROJECT_KEYS: [&str; 9] = [
    "pumpNotes",
    "ledNotes",
    "markers",
    "bpm",
    "timeSig",
    "tempos",
    "timeSigs",
    "paletteMode",
    "midiOffsetMs",
];

/// A show project.
///
/// Editor-only state (zoom, scroll, visibility toggles, ...) is kept opaque
/// in `editor` so loading and saving a project does not lose it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub pump_notes: Vec<Note>,
    pub led_notes: Vec<Note>,
    pub markers: Vec<Marker>,
    /// Base tempo.
    pub bpm: f64,
    /// Base time signature.
    pub time_sig: TimeSignature,
    pub tempos: Vec<TempoChange>,
    pub time_sigs: Vec<TimeSigChange>,
    pub palette_mode: PaletteMode,
    /// Global offset applied to every note at export time.
    pub midi_offset_ms: f64,
    #[serde(flatten)]
    pub editor: Map<String, Value>,
}

impl Default for Project {
    fn default() -> Self {
        Self::empty()
    }
}

impl Project {
    /// Empty template: 120 bpm, 4/4, no notes.
    pub fn empty() -> Self {
        Self {
            pump_notes: Vec::new(),
            led_notes: Vec::new(),
            markers: Vec::new(),
            bpm: 120.0,
            time_sig: TimeSignature::default(),
            tempos: Vec::new(),
            time_sigs: Vec::new(),
            palette_mode: PaletteMode::Vivid,
            midi_offset_ms: 0.0,
            editor: Map::new(),
        }
    }

    /// Load a saved project, tolerating older or partial documents.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s)?;
        Self::migrate(&value)
    }

    /// Bring a saved project document up to the current structure.
    ///
    /// Collections that are missing or not arrays become empty, a
    /// non-numeric `bpm` becomes 120, a non-array `timeSig` becomes 4/4.
    /// Malformed entries inside a collection are still an error.
    pub fn migrate(src: &Value) -> Result<Self> {
        let obj = src
            .as_object()
            .ok_or_else(|| Error::ProjectParse("project must be a JSON object".into()))?;
        let base = Self::empty();

        let time_sig = match obj.get("timeSig") {
            Some(v @ Value::Array(_)) => {
                serde_json::from_value(v.clone()).unwrap_or(base.time_sig)
            }
            _ => base.time_sig,
        };

        let palette_mode = obj
            .get("paletteMode")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or(base.palette_mode);

        let editor = obj
            .iter()
            .filter(|(k, _)| !PROJECT_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let project = Self {
            pump_notes: collection(obj, "pumpNotes")?,
            led_notes: collection(obj, "ledNotes")?,
            markers: collection(obj, "markers")?,
            bpm: obj.get("bpm").and_then(Value::as_f64).unwrap_or(base.bpm),
            time_sig,
            tempos: collection(obj, "tempos")?,
            time_sigs: collection(obj, "timeSigs")?,
            palette_mode,
            midi_offset_ms: obj
                .get("midiOffsetMs")
                .and_then(Value::as_f64)
                .unwrap_or(base.midi_offset_ms),
            editor,
        };

        tracing::debug!(
            "Loaded project: {} pump notes, {} LED notes, {} tempo changes",
            project.pump_notes.len(),
            project.led_notes.len(),
            project.tempos.len()
        );

        Ok(project)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a saved project from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let project = Self::from_json_str(&text)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            notes = project.note_count(),
            "Loaded project"
        );
        Ok(project)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_json_string()?)?;
        Ok(())
    }

    /// Tempo map for this project's base tempo and changes.
    pub fn tempo_map(&self) -> TempoMap {
        TempoMap::new(self.bpm, &self.tempos)
    }

    pub fn midi_offset_secs(&self) -> f64 {
        self.midi_offset_ms / 1000.0
    }

    pub fn note_count(&self) -> usize {
        self.pump_notes.len() + self.led_notes.len()
    }

    pub fn with_pump_note(mut self, note: Note) -> Self {
        self.pump_notes.push(note);
        self
    }

    pub fn with_led_note(mut self, note: Note) -> Self {
        self.led_notes.push(note);
        self
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    pub fn with_tempo_change(mut self, t: f64, bpm: f64) -> Self {
        self.tempos.push(TempoChange { t, bpm });
        self
    }

    pub fn with_time_sig_change(mut self, t: f64, num: u32, den: u32) -> Self {
        self.time_sigs.push(TimeSigChange { t, num, den });
        self
    }

    pub fn with_bpm(mut self, bpm: f64) -> Self {
        self.bpm = bpm;
        self
    }

    pub fn with_time_sig(mut self, numerator: u32, denominator: u32) -> Self {
        self.time_sig = TimeSignature::new(numerator, denominator);
        self
    }

    pub fn with_midi_offset_ms(mut self, offset_ms: f64) -> Self {
        self.midi_offset_ms = offset_ms;
        self
    }
}

fn collection<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Result<Vec<T>> {
    match obj.get(key) {
        Some(v @ Value::Array(_)) => serde_json::from_value(v.clone())
            .map_err(|e| Error::ProjectParse(format!("{}: {}", key, e))),
        _ => Ok(Vec::new()),
    }
}
