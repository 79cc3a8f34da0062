//! Turns a project's notes into timed show events.

use std::collections::BTreeSet;

use fountain_core::{Note, Project, TempoMap, Tick};
use fountain_midi::protocol::{
    clamp_velocity, hue_to_cc, led_channel, pump_pitch, MidiChannel, ShowController,
    FULL_SATURATION, LED_PITCH, PUMP_CHANNEL,
};
use fountain_midi::ShowEvent;

/// Hue/saturation/effect state sent before an LED note, and at tick 0 for
/// every LED channel in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LedState {
    hue: u8,
    saturation: u8,
    effect: u8,
}

impl LedState {
    const DEFAULT: LedState = LedState {
        hue: 0,
        saturation: FULL_SATURATION,
        effect: 0,
    };

    fn for_note(note: &Note) -> Self {
        Self {
            hue: hue_to_cc(note.hue_index),
            saturation: FULL_SATURATION,
            effect: note.effect.effect_type().value(),
        }
    }

    /// Value sent for a controller, or `None` for controllers never emitted.
    fn value_for(self, controller: ShowController) -> Option<u8> {
        match controller {
            ShowController::Hue => Some(self.hue),
            ShowController::Saturation => Some(self.saturation),
            ShowController::EffectType => Some(self.effect),
            _ => None,
        }
    }

    /// Push one CC per emitted controller, in controller order.
    fn push(self, events: &mut Vec<ShowEvent>, tick: Tick, channel: MidiChannel) {
        for controller in ShowController::ALL.into_iter().filter(|c| c.is_emitted()) {
            if let Some(value) = self.value_for(controller) {
                events.push(ShowEvent::control_change(
                    tick,
                    channel,
                    controller.number(),
                    value,
                ));
            }
        }
    }
}

/// Builds the unsorted event list for one export.
///
/// Events are pushed in a fixed order: tempo changes, the tick-0 LED
/// snapshot, LED notes, then pump notes. The writer's stable sort keeps
/// that order among events with the same tick and kind.
pub struct EventBuilder<'a> {
    tempo_map: &'a TempoMap,
    offset_secs: f64,
    tempo_meta_events: bool,
}

impl<'a> EventBuilder<'a> {
    pub fn new(tempo_map: &'a TempoMap, offset_secs: f64) -> Self {
        Self {
            tempo_map,
            offset_secs,
            tempo_meta_events: false,
        }
    }

    pub fn with_tempo_meta_events(mut self, enabled: bool) -> Self {
        self.tempo_meta_events = enabled;
        self
    }

    /// Start and end tick of a note after the global offset.
    ///
    /// The shifted start is floored at 0 and the end at the start, so the
    /// note-off never precedes its note-on.
    pub fn note_ticks(&self, note: &Note) -> (Tick, Tick) {
        let t0 = (note.t0 + self.offset_secs).max(0.0);
        let t1 = (note.t1 + self.offset_secs).max(t0);
        let on = self.tempo_map.sec_to_tick(t0);
        let off = self.tempo_map.sec_to_tick(t1).max(on);
        (on, off)
    }

    pub fn build(&self, project: &Project) -> Vec<ShowEvent> {
        let mut events = Vec::with_capacity(
            project.led_notes.len() * 5 + project.pump_notes.len() * 2 + 3 * 10,
        );

        if self.tempo_meta_events {
            for (tick, bpm) in self.tempo_map.tempo_points() {
                events.push(ShowEvent::tempo(tick, bpm));
            }
        }

        let channels: BTreeSet<MidiChannel> = project
            .led_notes
            .iter()
            .map(|n| led_channel(n.lane))
            .collect();
        for &channel in &channels {
            LedState::DEFAULT.push(&mut events, 0, channel);
        }

        for note in &project.led_notes {
            let channel = led_channel(note.lane);
            let (on, off) = self.note_ticks(note);
            LedState::for_note(note).push(&mut events, on, channel);
            events.push(ShowEvent::note_on(
                on,
                channel,
                LED_PITCH,
                clamp_velocity(note.velocity),
            ));
            events.push(ShowEvent::note_off(off, channel, LED_PITCH));
        }

        for note in &project.pump_notes {
            let pitch = pump_pitch(note.lane);
            let (on, off) = self.note_ticks(note);
            events.push(ShowEvent::note_on(
                on,
                PUMP_CHANNEL,
                pitch,
                clamp_velocity(note.velocity),
            ));
            events.push(ShowEvent::note_off(off, PUMP_CHANNEL, pitch));
        }

        tracing::trace!(
            led_channels = channels.len(),
            events = events.len(),
            "Built show events"
        );
        events
    }
}
