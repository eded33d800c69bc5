use crate::{
    dsp::{EnvelopeParams, Waveform},
    effects::{Effect, EffectParam},
};

use super::voice::VoiceId;

/// Commands from the control context, drained by the engine at the start
/// of every block.
///
/// Every variant is `Copy` so the queue never owns heap data.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    NoteOn {
        id: VoiceId,
        frequency: f32,
        velocity: f32,
    },
    NoteOff {
        id: VoiceId,
    },
    AllNotesOff,
    SetWaveform(Waveform),
    /// Envelope for voices started after this message.
    SetEnvelope(EnvelopeParams),
    SetEffectParam {
        param: EffectParam,
        value: f32,
    },
    ToggleEffect {
        effect: Effect,
        enabled: bool,
    },
    SetMasterVolume(f32),
    /// Silence every voice and restore default parameters.
    Reset,
}
