#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{EnvelopeParams, Waveform},
    effects::EffectsConfig,
};

/// Timbre and mix settings shared by the control side and the renderer.
///
/// The controller keeps one copy as the source of truth for the UI; the
/// engine keeps its own copy, updated only through the command queue.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthParams {
    pub waveform: Waveform,
    /// Envelope copied into each new voice.
    pub envelope: EnvelopeParams,
    pub effects: EffectsConfig,
    pub master_volume: f32,
}

impl SynthParams {
    pub fn set_master_volume(&mut self, volume: f32) {
        if !volume.is_nan() {
            self.master_volume = volume.clamp(0.0, 1.0);
        }
    }
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            envelope: EnvelopeParams::default(),
            effects: EffectsConfig::default(),
            master_volume: 0.5,
        }
    }
}
