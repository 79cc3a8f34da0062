//! JSON manifest describing how to interpret the exported MIDI file.
//!
//! Every entry is derived from the protocol constants in `fountain_midi`, so
//! the manifest cannot drift from what the event builder writes.

use std::collections::BTreeMap;

use fountain_core::{Project, TimeSignature, LANE_COUNT, PPQN};
use fountain_midi::protocol::{
    led_channel, pump_pitch, MidiChannel, ShowController, FIRST_LED_CHANNEL, LAST_LED_CHANNEL,
    LED_PITCH, PUMP_CHANNEL,
};
use serde::{Deserialize, Serialize, Serializer};

use crate::Result;

pub const MANIFEST_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub version: String,
    #[serde(serialize_with = "serialize_bpm")]
    pub bpm: f64,
    pub ppqn: u16,
    /// Number of LED rings.
    pub rings: usize,
    pub led_channels: String,
    /// LED channel to ring name.
    pub mapping: BTreeMap<MidiChannel, String>,
    /// Controller number to meaning.
    pub cc_semantics: BTreeMap<u8, String>,
    pub pumps: PumpManifest,
    pub time_sig: TimeSignature,
}

/// Whole tempos are written without a fraction (`120`, not `120.0`).
fn serialize_bpm<S>(bpm: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if bpm.fract() == 0.0 && bpm.abs() <= i64::MAX as f64 {
        serializer.serialize_i64(*bpm as i64)
    } else {
        serializer.serialize_f64(*bpm)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PumpManifest {
    pub channel_zero_based: MidiChannel,
    /// Pitch to pump name.
    pub notes: BTreeMap<u8, String>,
}

impl Manifest {
    pub fn for_project(project: &Project) -> Self {
        let lanes = 0..LANE_COUNT as i32;

        let mapping = lanes
            .clone()
            .map(|lane| (led_channel(lane), format!("Ring {}", lane + 1)))
            .collect();
        let notes = lanes
            .map(|lane| (pump_pitch(lane), format!("Pump {}", lane + 1)))
            .collect();
        let cc_semantics = ShowController::ALL
            .into_iter()
            .map(|c| (c.number(), c.description()))
            .collect();

        Self {
            version: MANIFEST_VERSION.to_string(),
            bpm: project.bpm,
            ppqn: PPQN,
            rings: LANE_COUNT,
            led_channels: format!(
                "MIDI channel {FIRST_LED_CHANNEL}..{LAST_LED_CHANNEL} = LED ring 1..{LANE_COUNT}, \
                 pitch={LED_PITCH}, velocity=brightness"
            ),
            mapping,
            cc_semantics,
            pumps: PumpManifest {
                channel_zero_based: PUMP_CHANNEL,
                notes,
            },
            time_sig: project.time_sig,
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// LED lane (0-based) for a ring channel listed in the manifest.
    pub fn ring_lane(&self, channel: MidiChannel) -> Option<usize> {
        let name = self.mapping.get(&channel)?;
        let ring: usize = name.strip_prefix("Ring ")?.parse().ok()?;
        ring.checked_sub(1)
    }

    /// Pump lane (0-based) for a pitch listed in the manifest.
    pub fn pump_lane(&self, pitch: u8) -> Option<usize> {
        let name = self.pumps.notes.get(&pitch)?;
        let pump: usize = name.strip_prefix("Pump ")?.parse().ok()?;
        pump.checked_sub(1)
    }
}
