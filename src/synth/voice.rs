use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::{Envelope, EnvelopeParams, EnvelopeStage, Oscillator, Waveform};

/// Opaque handle for one sounding note.
///
/// Ids are handed out by the controller in increasing order and never
/// reused, so two notes at the same pitch stay distinct.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VoiceId(pub u64);

impl fmt::Display for VoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "voice#{}", self.0)
    }
}

/// A single note: its own oscillator phase and its own envelope.
pub struct Voice {
    id: VoiceId,
    frequency: f32,
    velocity: f32,
    oscillator: Oscillator,
    envelope: Envelope,
    release_requested: bool,
    age: u64,
}

impl Voice {
    /// Start a note. `age` is the stream frame at which it started.
    pub fn new(
        id: VoiceId,
        frequency: f32,
        velocity: f32,
        params: EnvelopeParams,
        sample_rate: f32,
        age: u64,
    ) -> Self {
        Self {
            id,
            frequency,
            velocity: velocity.clamp(0.0, 1.0),
            oscillator: Oscillator::new(),
            envelope: Envelope::new(params, sample_rate),
            release_requested: false,
            age,
        }
    }

    pub fn release(&mut self) {
        self.release_requested = true;
        self.envelope.release();
    }

    /// Add this voice's contribution to `mix`.
    ///
    /// `osc` and `gain` are scratch slices the same length as `mix`.
    pub fn render(
        &mut self,
        mix: &mut [f32],
        osc: &mut [f32],
        gain: &mut [f32],
        waveform: Waveform,
        sample_rate: f32,
    ) {
        self.oscillator
            .render(osc, self.frequency, sample_rate, waveform);
        self.envelope.render(gain);

        for ((out, &s), &g) in mix.iter_mut().zip(osc.iter()).zip(gain.iter()) {
            *out += s * g * self.velocity;
        }
    }

    /// Released and faded out; the pool may drop it.
    pub fn is_finished(&self) -> bool {
        self.release_requested && self.envelope.is_idle()
    }

    pub fn id(&self) -> VoiceId {
        self.id
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn is_releasing(&self) -> bool {
        self.release_requested
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.envelope.stage()
    }

    pub fn level(&self) -> f32 {
        self.envelope.level()
    }

    pub fn age(&self) -> u64 {
        self.age
    }
}
