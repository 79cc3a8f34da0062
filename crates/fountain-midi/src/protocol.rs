//! Channel, pitch and controller assignments understood by the fountain
//! controller.
//!
//! Pumps share channel 0 and are told apart by pitch. Each LED ring has its
//! own channel and always plays the same pitch; colour and effect ride on
//! control changes sent at the note's start.

use fountain_core::{EffectType, LANE_COUNT};

/// Channel type alias (0-15).
pub type MidiChannel = u8;

/// CC number type alias (0-127).
pub type CCNumber = u8;

pub const PUMP_CHANNEL: MidiChannel = 0;
pub const PUMP_BASE_PITCH: u8 = 60;
pub const LED_PITCH: u8 = 60;
pub const FIRST_LED_CHANNEL: MidiChannel = 1;
pub const LAST_LED_CHANNEL: MidiChannel = FIRST_LED_CHANNEL + LANE_COUNT as u8 - 1;
pub const FULL_SATURATION: u8 = 127;

const MAX_LANE: i32 = LANE_COUNT as i32 - 1;

/// Hue index (0-11) to CC1 value.
pub const HUE_TABLE: [u8; 12] = [0, 11, 22, 33, 44, 55, 66, 77, 88, 99, 110, 121];

/// Controllers the fountain controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShowController {
    Hue,
    Saturation,
    /// Legacy brightness, never emitted.
    Level,
    EffectType,
    /// Speed or fade parameter, meaning depends on the effect.
    EffectParam,
    Hue2,
    Hue3,
    Hue4,
}

impl ShowController {
    pub const ALL: [ShowController; 8] = [
        ShowController::Hue,
        ShowController::Saturation,
        ShowController::Level,
        ShowController::EffectType,
        ShowController::EffectParam,
        ShowController::Hue2,
        ShowController::Hue3,
        ShowController::Hue4,
    ];

    pub const fn number(self) -> CCNumber {
        match self {
            ShowController::Hue => 1,
            ShowController::Saturation => 2,
            ShowController::Level => 3,
            ShowController::EffectType => 10,
            ShowController::EffectParam => 11,
            ShowController::Hue2 => 12,
            ShowController::Hue3 => 13,
            ShowController::Hue4 => 14,
        }
    }

    pub fn from_number(cc: CCNumber) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.number() == cc)
    }

    /// Human-readable meaning, as published in the show manifest.
    pub fn description(self) -> String {
        match self {
            ShowController::Hue => "Hue1".into(),
            ShowController::Saturation => "Saturation (127=max)".into(),
            ShowController::Level => "Level (legacy, unused)".into(),
            ShowController::EffectType => {
                let names: Vec<String> = EffectType::ALL
                    .iter()
                    .map(|e| format!("{} {}", e.value(), e.name()))
                    .collect();
                format!("EffectType ({})", names.join(","))
            }
            ShowController::EffectParam => "Speed/FadeParam (per effect)".into(),
            ShowController::Hue2 => "Hue2 (Chase)".into(),
            ShowController::Hue3 => "Hue3 (Chase)".into(),
            ShowController::Hue4 => "Hue4 (Chase)".into(),
        }
    }

    /// Whether the exporter writes this controller.
    pub const fn is_emitted(self) -> bool {
        matches!(
            self,
            ShowController::Hue | ShowController::Saturation | ShowController::EffectType
        )
    }
}

/// CC1 value for an optional hue index. Indices wrap modulo 12; no hue is 0.
pub fn hue_to_cc(hue_index: Option<i32>) -> u8 {
    match hue_index {
        Some(i) => HUE_TABLE[i.rem_euclid(HUE_TABLE.len() as i32) as usize],
        None => 0,
    }
}

/// Pitch on [`PUMP_CHANNEL`] for a pump lane.
pub fn pump_pitch(lane: i32) -> u8 {
    PUMP_BASE_PITCH + lane.clamp(0, MAX_LANE) as u8
}

/// Channel for an LED lane.
pub fn led_channel(lane: i32) -> MidiChannel {
    lane.saturating_add(1)
        .clamp(FIRST_LED_CHANNEL as i32, LAST_LED_CHANNEL as i32) as MidiChannel
}

/// Note-on velocity; note-ons never carry 0.
pub fn clamp_velocity(velocity: i32) -> u8 {
    velocity.clamp(1, 127) as u8
}

/// Pump lane for a pitch on the pump channel.
pub fn pump_lane(pitch: u8) -> Option<usize> {
    let lane = pitch.checked_sub(PUMP_BASE_PITCH)? as usize;
    (lane < LANE_COUNT).then_some(lane)
}

/// LED lane for a channel.
pub fn led_lane(channel: MidiChannel) -> Option<usize> {
    (FIRST_LED_CHANNEL..=LAST_LED_CHANNEL)
        .contains(&channel)
        .then(|| (channel - FIRST_LED_CHANNEL) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hue_wraps_negative() {
        assert_eq!(hue_to_cc(Some(-1)), hue_to_cc(Some(11)));
        assert_eq!(hue_to_cc(Some(-1)), 121);
        assert_eq!(hue_to_cc(Some(12)), 0);
        assert_eq!(hue_to_cc(Some(25)), 11);
    }

    #[test]
    fn test_missing_hue_is_zero() {
        assert_eq!(hue_to_cc(None), 0);
    }

    #[test]
    fn test_lane_clamping() {
        assert_eq!(pump_pitch(-3), 60);
        assert_eq!(pump_pitch(3), 63);
        assert_eq!(pump_pitch(42), 69);

        assert_eq!(led_channel(-5), 1);
        assert_eq!(led_channel(0), 1);
        assert_eq!(led_channel(9), 10);
        assert_eq!(led_channel(i32::MAX), 10);
    }

    #[test]
    fn test_velocity_clamping() {
        assert_eq!(clamp_velocity(0), 1);
        assert_eq!(clamp_velocity(-20), 1);
        assert_eq!(clamp_velocity(100), 100);
        assert_eq!(clamp_velocity(300), 127);
    }

    #[test]
    fn test_lane_inverses() {
        for lane in 0..LANE_COUNT as i32 {
            assert_eq!(pump_lane(pump_pitch(lane)), Some(lane as usize));
            assert_eq!(led_lane(led_channel(lane)), Some(lane as usize));
        }
        assert_eq!(pump_lane(59), None);
        assert_eq!(pump_lane(70), None);
        assert_eq!(led_lane(0), None);
        assert_eq!(led_lane(11), None);
    }

    #[test]
    fn test_controller_numbers() {
        let numbers: Vec<u8> = ShowController::ALL.iter().map(|c| c.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 10, 11, 12, 13, 14]);
        assert_eq!(ShowController::from_number(10), Some(ShowController::EffectType));
        assert_eq!(ShowController::from_number(4), None);
    }

    #[test]
    fn test_effect_type_description() {
        assert_eq!(
            ShowController::EffectType.description(),
            "EffectType (0 Static,1 Strobe,2 Fade,3 Chase,4 Rainbow)"
        );
    }

    #[test]
    fn test_emitted_controllers() {
        let emitted: Vec<u8> = ShowController::ALL
            .iter()
            .filter(|c| c.is_emitted())
            .map(|c| c.number())
            .collect();
        assert_eq!(emitted, vec![1, 2, 10]);
    }
}
