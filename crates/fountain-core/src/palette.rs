//! LED colour palettes for display.
//!
//! Each palette has 12 entries matching the 12 hue indices of the wire
//! protocol. Only the editor shows these colours; the exported file carries
//! the hue index, not the RGB value.

use serde::{Deserialize, Serialize};

pub const PALETTE_SIZE: usize = 12;

const VIVID: [&str; PALETTE_SIZE] = [
    "#ff0000", "#ff7a00", "#ffbf00", "#ffee00", "#8cff00", "#00ff00", "#00ffd5", "#009dff",
    "#0040ff", "#7a00ff", "#ff00ff", "#ffffff",
];

const PASTEL: [&str; PALETTE_SIZE] = [
    "#ff8a8a", "#ffb37a", "#ffd27a", "#fff48a", "#d9ff8a", "#aaff9c", "#aaffea", "#a8d4ff",
    "#9ca4ff", "#c6a8ff", "#ffa8ff", "#ffffff",
];

// whites, tinted whites, two greys
const NEUTRAL: [&str; PALETTE_SIZE] = [
    "#ffffff", "#f8f4e8", "#eef7ff", "#ffdede", "#ffeccc", "#e8ffe0", "#e6fffa", "#e6f0ff",
    "#ece6ff", "#fbe6ff", "#cccccc", "#888888",
];

/// Palette preset, stored as 0/1/2. Unknown values read as Vivid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum PaletteMode {
    #[default]
    Vivid = 0,
    Pastel = 1,
    Neutral = 2,
}

impl PaletteMode {
    fn colors(self) -> &'static [&'static str; PALETTE_SIZE] {
        match self {
            PaletteMode::Vivid => &VIVID,
            PaletteMode::Pastel => &PASTEL,
            PaletteMode::Neutral => &NEUTRAL,
        }
    }
}

impl From<u8> for PaletteMode {
    fn from(value: u8) -> Self {
        match value {
            1 => PaletteMode::Pastel,
            2 => PaletteMode::Neutral,
            _ => PaletteMode::Vivid,
        }
    }
}

impl From<PaletteMode> for u8 {
    fn from(mode: PaletteMode) -> Self {
        mode as u8
    }
}

/// `#rrggbb` colour for a hue index. Out-of-range indices are clamped.
pub fn color_from_hue_index(hue_index: i32, mode: PaletteMode) -> &'static str {
    let idx = hue_index.clamp(0, PALETTE_SIZE as i32 - 1) as usize;
    mode.colors()[idx]
}
