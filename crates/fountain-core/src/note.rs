//! Pump and LED cues.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use smallvec::SmallVec;

/// Lanes per category (pump lanes and LED lanes).
pub const LANE_COUNT: usize = 10;

/// Upper bound for strobe/chase/rainbow speed.
pub const MAX_SPEED: u8 = 127;

/// Upper bound for fade length.
pub const MAX_FADE_LENGTH: u8 = 63;

/// Maximum number of chase hues.
pub const MAX_CHASE_HUES: usize = 4;

/// LED effect selector as carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EffectType {
    Static = 0,
    Strobe = 1,
    Fade = 2,
    Chase = 3,
    Rainbow = 4,
}

impl EffectType {
    pub const ALL: [EffectType; 5] = [
        EffectType::Static,
        EffectType::Strobe,
        EffectType::Fade,
        EffectType::Chase,
        EffectType::Rainbow,
    ];

    #[inline]
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn from_value(value: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.value() as i32 == value)
    }

    pub fn name(self) -> &'static str {
        match self {
            EffectType::Static => "Static",
            EffectType::Strobe => "Strobe",
            EffectType::Fade => "Fade",
            EffectType::Chase => "Chase",
            EffectType::Rainbow => "Rainbow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FadeMode {
    #[default]
    In,
    Out,
    InOut,
}

impl FadeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            FadeMode::In => "in",
            FadeMode::Out => "out",
            FadeMode::InOut => "inout",
        }
    }

    /// Parse the editor's mode string; anything unrecognised is `In`.
    pub fn parse(s: &str) -> Self {
        match s {
            "out" => FadeMode::Out,
            "inout" => FadeMode::InOut,
            _ => FadeMode::In,
        }
    }
}

/// Effect and its parameters. Only the variant matching the active effect
/// carries parameters, so a Strobe can never hold a fade length.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EffectParams {
    #[default]
    Static,
    Strobe {
        speed: u8,
    },
    Fade {
        mode: FadeMode,
        length: u8,
    },
    Chase {
        hues: SmallVec<[i32; MAX_CHASE_HUES]>,
        speed: u8,
    },
    Rainbow {
        speed: u8,
    },
}

#[inline]
fn clamp_u8(value: i32, max: u8) -> u8 {
    value.clamp(0, max as i32) as u8
}

impl EffectParams {
    pub fn strobe(speed: i32) -> Self {
        Self::Strobe {
            speed: clamp_u8(speed, MAX_SPEED),
        }
    }

    pub fn fade(mode: FadeMode, length: i32) -> Self {
        Self::Fade {
            mode,
            length: clamp_u8(length, MAX_FADE_LENGTH),
        }
    }

    /// Chase over up to four hues; extra hues are dropped and an empty list
    /// becomes hue 0.
    pub fn chase(hues: impl IntoIterator<Item = i32>, speed: i32) -> Self {
        let mut hues: SmallVec<[i32; MAX_CHASE_HUES]> =
            hues.into_iter().take(MAX_CHASE_HUES).collect();
        if hues.is_empty() {
            hues.push(0);
        }
        Self::Chase {
            hues,
            speed: clamp_u8(speed, MAX_SPEED),
        }
    }

    pub fn rainbow(speed: i32) -> Self {
        Self::Rainbow {
            speed: clamp_u8(speed, MAX_SPEED),
        }
    }

    pub fn effect_type(&self) -> EffectType {
        match self {
            EffectParams::Static => EffectType::Static,
            EffectParams::Strobe { .. } => EffectType::Strobe,
            EffectParams::Fade { .. } => EffectType::Fade,
            EffectParams::Chase { .. } => EffectType::Chase,
            EffectParams::Rainbow { .. } => EffectType::Rainbow,
        }
    }

    /// Speed for effects that have one.
    pub fn speed(&self) -> Option<u8> {
        match self {
            EffectParams::Strobe { speed }
            | EffectParams::Chase { speed, .. }
            | EffectParams::Rainbow { speed } => Some(*speed),
            EffectParams::Static | EffectParams::Fade { .. } => None,
        }
    }
}

/// A cue on one lane. LED-only fields are ignored for pump notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNote", into = "RawNote")]
pub struct Note {
    /// 0-based lane index.
    pub lane: i32,
    /// Start in seconds.
    pub t0: f64,
    /// End in seconds.
    pub t1: f64,
    /// 1..127, brightness for LED notes, intensity for pumps.
    pub velocity: i32,
    pub hue_index: Option<i32>,
    pub effect: EffectParams,
    /// Editor fields the exporter does not use, such as parameters of an
    /// effect the note no longer has. Kept so a load and save loses nothing.
    pub extra: Map<String, Value>,
}

impl Note {
    pub fn new(lane: i32, t0: f64, t1: f64, velocity: i32) -> Self {
        Self {
            lane,
            t0,
            t1,
            velocity,
            hue_index: None,
            effect: EffectParams::Static,
            extra: Map::new(),
        }
    }

    pub fn with_hue(mut self, hue_index: i32) -> Self {
        self.hue_index = Some(hue_index);
        self
    }

    pub fn with_effect(mut self, effect: EffectParams) -> Self {
        self.effect = effect;
        self
    }

    pub fn duration(&self) -> f64 {
        self.t1 - self.t0
    }
}

/// Number as the editor writes it: read from any JSON number, written
/// without a fraction when integral.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Num(f64);

/// Largest magnitude at which an `f64` still holds every integer.
const EXACT_INT_LIMIT: f64 = 9_007_199_254_740_992.0;

impl Num {
    fn int(value: i32) -> Self {
        Num(f64::from(value))
    }

    #[inline]
    fn as_i32(self) -> i32 {
        self.0 as i32
    }

    fn is_integral(self) -> bool {
        self.0.fract() == 0.0 && self.0.abs() < EXACT_INT_LIMIT
    }

    fn to_value(self) -> Value {
        if self.is_integral() {
            Value::from(self.0 as i64)
        } else {
            Value::from(self.0)
        }
    }
}

impl Serialize for Num {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_integral() {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Num {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Num)
    }
}

/// Editor wire form of a note: flat, optional, loosely typed numbers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNote {
    #[serde(default)]
    lane: Num,
    #[serde(default)]
    t0: f64,
    #[serde(default)]
    t1: f64,
    #[serde(default)]
    velocity: Num,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hue_index: Option<Num>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    effect_type: Option<Num>,
    #[serde(
        default,
        alias = "strobeSpeed",
        alias = "chaseSpeed",
        alias = "rainbowSpeed",
        skip_serializing_if = "Option::is_none"
    )]
    fx_speed: Option<Num>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fade_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fade_len: Option<Num>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    chase_hues: Option<Vec<Num>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

const FX_SPEED_KEY: &str = "fxSpeed";
const FADE_MODE_KEY: &str = "fadeMode";
const FADE_LEN_KEY: &str = "fadeLen";
const CHASE_HUES_KEY: &str = "chaseHues";
const EFFECT_TYPE_KEY: &str = "effectType";

fn hues_value(hues: Vec<Num>) -> Value {
    Value::Array(hues.into_iter().map(Num::to_value).collect())
}

impl From<RawNote> for Note {
    fn from(raw: RawNote) -> Self {
        let RawNote {
            lane,
            t0,
            t1,
            velocity,
            hue_index,
            effect_type,
            mut fx_speed,
            mut fade_mode,
            mut fade_len,
            mut chase_hues,
            mut extra,
        } = raw;

        let hue_index = hue_index.map(Num::as_i32);
        let speed = fx_speed.unwrap_or_default().as_i32();
        let effect_value = effect_type.unwrap_or_default().as_i32();

        // Parameters the effect uses are taken; whatever is left is kept in
        // `extra` so the editor gets it back on save.
        let effect = match EffectType::from_value(effect_value) {
            Some(EffectType::Static) => EffectParams::Static,
            Some(EffectType::Strobe) => {
                fx_speed = None;
                EffectParams::strobe(speed)
            }
            Some(EffectType::Fade) => EffectParams::fade(
                fade_mode
                    .take()
                    .as_deref()
                    .map_or(FadeMode::In, FadeMode::parse),
                fade_len.take().unwrap_or_default().as_i32(),
            ),
            Some(EffectType::Chase) => {
                fx_speed = None;
                let hues: Vec<i32> = chase_hues
                    .take()
                    .unwrap_or_default()
                    .into_iter()
                    .map(Num::as_i32)
                    .collect();
                if hues.is_empty() {
                    EffectParams::chase([hue_index.unwrap_or(0)], speed)
                } else {
                    EffectParams::chase(hues, speed)
                }
            }
            Some(EffectType::Rainbow) => {
                fx_speed = None;
                EffectParams::rainbow(speed)
            }
            None => {
                tracing::warn!(
                    effect_type = effect_value,
                    "Unknown effect type, exporting as Static (CC10 = 0)"
                );
                if let Some(value) = effect_type {
                    extra.insert(EFFECT_TYPE_KEY.to_string(), value.to_value());
                }
                EffectParams::Static
            }
        };

        if let Some(value) = fx_speed {
            extra.insert(FX_SPEED_KEY.to_string(), value.to_value());
        }
        if let Some(mode) = fade_mode {
            extra.insert(FADE_MODE_KEY.to_string(), Value::String(mode));
        }
        if let Some(value) = fade_len {
            extra.insert(FADE_LEN_KEY.to_string(), value.to_value());
        }
        if let Some(hues) = chase_hues {
            extra.insert(CHASE_HUES_KEY.to_string(), hues_value(hues));
        }

        Self {
            lane: lane.as_i32(),
            t0,
            t1,
            velocity: velocity.as_i32(),
            hue_index,
            effect,
            extra,
        }
    }
}

impl From<Note> for RawNote {
    fn from(note: Note) -> Self {
        let mut raw = RawNote {
            lane: Num::int(note.lane),
            t0: note.t0,
            t1: note.t1,
            velocity: Num::int(note.velocity),
            hue_index: note.hue_index.map(Num::int),
            extra: note.extra,
            ..Default::default()
        };

        if note.effect != EffectParams::Static {
            raw.effect_type = Some(Num::int(note.effect.effect_type().value().into()));
            raw.extra.remove(EFFECT_TYPE_KEY);
        }
        if let Some(speed) = note.effect.speed() {
            raw.fx_speed = Some(Num::int(speed.into()));
            raw.extra.remove(FX_SPEED_KEY);
        }

        match note.effect {
            EffectParams::Fade { mode, length } => {
                raw.fade_mode = Some(mode.as_str().to_string());
                raw.fade_len = Some(Num::int(length.into()));
                raw.extra.remove(FADE_MODE_KEY);
                raw.extra.remove(FADE_LEN_KEY);
            }
            EffectParams::Chase { hues, .. } => {
                raw.chase_hues = Some(hues.into_iter().map(Num::int).collect());
                raw.extra.remove(CHASE_HUES_KEY);
            }
            EffectParams::Static | EffectParams::Strobe { .. } | EffectParams::Rainbow { .. } => {}
        }

        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_type_values() {
        assert_eq!(EffectType::Static.value(), 0);
        assert_eq!(EffectType::Rainbow.value(), 4);
        assert_eq!(EffectType::from_value(3), Some(EffectType::Chase));
        assert_eq!(EffectType::from_value(5), None);
        assert_eq!(EffectType::from_value(-1), None);
    }

    #[test]
    fn test_param_clamping() {
        assert_eq!(EffectParams::strobe(500), EffectParams::Strobe { speed: 127 });
        assert_eq!(EffectParams::rainbow(-4), EffectParams::Rainbow { speed: 0 });
        assert_eq!(
            EffectParams::fade(FadeMode::Out, 100),
            EffectParams::Fade {
                mode: FadeMode::Out,
                length: 63
            }
        );
    }

    #[test]
    fn test_chase_hue_bounds() {
        let chase = EffectParams::chase([1, 2, 3, 4, 5, 6], 10);
        match chase {
            EffectParams::Chase { hues, speed } => {
                assert_eq!(hues.as_slice(), &[1, 2, 3, 4]);
                assert_eq!(speed, 10);
            }
            other => panic!("expected chase, got {:?}", other),
        }

        match EffectParams::chase(std::iter::empty(), 0) {
            EffectParams::Chase { hues, .. } => assert_eq!(hues.as_slice(), &[0]),
            other => panic!("expected chase, got {:?}", other),
        }
    }

    #[test]
    fn test_speed_only_for_speed_effects() {
        assert_eq!(EffectParams::Static.speed(), None);
        assert_eq!(EffectParams::fade(FadeMode::In, 3).speed(), None);
        assert_eq!(EffectParams::strobe(40).speed(), Some(40));
    }

    #[test]
    fn test_deserialize_editor_note() {
        let json = r#"{"lane":2,"t0":1.5,"t1":2.0,"velocity":90,"hueIndex":7,
                       "effectType":2,"fxSpeed":50,"fadeMode":"inout","fadeLen":20}"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.lane, 2);
        assert_eq!(note.velocity, 90);
        assert_eq!(note.hue_index, Some(7));
        // Speed is not a fade parameter and is dropped
        assert_eq!(
            note.effect,
            EffectParams::Fade {
                mode: FadeMode::InOut,
                length: 20
            }
        );
    }

    #[test]
    fn test_mismatched_params_are_ignored() {
        let json = r#"{"lane":0,"t0":0,"t1":1,"velocity":100,"effectType":1,
                       "strobeSpeed":64,"fadeLen":30,"chaseHues":[1,2]}"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.effect, EffectParams::Strobe { speed: 64 });
    }

    #[test]
    fn test_chase_falls_back_to_note_hue() {
        let json = r#"{"lane":0,"t0":0,"t1":1,"velocity":100,"hueIndex":5,"effectType":3}"#;
        let note: Note = serde_json::from_str(json).unwrap();
        match note.effect {
            EffectParams::Chase { hues, speed } => {
                assert_eq!(hues.as_slice(), &[5]);
                assert_eq!(speed, 0);
            }
            other => panic!("expected chase, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_effect_is_static() {
        let json = r#"{"lane":0,"t0":0,"t1":1,"velocity":100,"effectType":7}"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.effect, EffectParams::Static);
        assert_eq!(note.effect.effect_type().value(), 0);

        // The editor's value is handed back on save
        let saved = serde_json::to_value(&note).unwrap();
        assert_eq!(saved["effectType"], 7);
    }

    #[test]
    fn test_integral_fields_written_as_integers() {
        let note = Note::new(0, 0.0, 1.5, 100)
            .with_hue(3)
            .with_effect(EffectParams::fade(FadeMode::Out, 12));
        let json = serde_json::to_string(&note).unwrap();
        assert!(json.contains("\"lane\":0,"), "{}", json);
        assert!(json.contains("\"velocity\":100"), "{}", json);
        assert!(json.contains("\"hueIndex\":3"), "{}", json);
        assert!(json.contains("\"effectType\":2"), "{}", json);
        assert!(json.contains("\"fadeLen\":12"), "{}", json);
        assert!(json.contains("\"t1\":1.5"), "{}", json);
    }

    #[test]
    fn test_fractional_numbers_still_read() {
        let json = r#"{"lane":1.0,"t0":0,"t1":1,"velocity":99.7,"hueIndex":4.0}"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.lane, 1);
        assert_eq!(note.velocity, 99);
        assert_eq!(note.hue_index, Some(4));
    }

    #[test]
    fn test_stale_effect_fields_survive_roundtrip() {
        let json = r#"{"lane":0,"t0":0,"t1":1,"velocity":100,"effectType":1,
                       "fxSpeed":64,"fadeMode":"out","fadeLen":30,"chaseHues":[1,2],
                       "id":"n-17"}"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.effect, EffectParams::Strobe { speed: 64 });

        let saved = serde_json::to_value(&note).unwrap();
        assert_eq!(saved["fxSpeed"], 64);
        assert_eq!(saved["fadeMode"], "out");
        assert_eq!(saved["fadeLen"], 30);
        assert_eq!(saved["chaseHues"], serde_json::json!([1, 2]));
        assert_eq!(saved["id"], "n-17");

        let reloaded: Note = serde_json::from_value(saved).unwrap();
        assert_eq!(reloaded, note);
    }

    #[test]
    fn test_active_effect_overrides_stale_fields() {
        let json = r#"{"lane":0,"t0":0,"t1":1,"velocity":100,"fadeLen":30}"#;
        let mut note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.extra.get("fadeLen"), Some(&Value::from(30)));

        note.effect = EffectParams::fade(FadeMode::InOut, 8);
        let saved = serde_json::to_string(&note).unwrap();
        assert_eq!(saved.matches("fadeLen").count(), 1);
        let reloaded: Note = serde_json::from_str(&saved).unwrap();
        assert_eq!(reloaded.effect, EffectParams::fade(FadeMode::InOut, 8));
        assert!(reloaded.extra.is_empty());
    }

    #[test]
    fn test_note_serde_roundtrip() {
        let note = Note::new(4, 0.25, 3.0, 70)
            .with_hue(9)
            .with_effect(EffectParams::chase([9, 2, 4], 33));
        let json = serde_json::to_string(&note).unwrap();
        assert!(json.contains("\"chaseHues\":[9,2,4]"));
        let decoded: Note = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, note);
    }
}
