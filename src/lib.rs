pub mod dsp; // Allocation-free oscillator, envelope and delay primitives
pub mod effects; // Tremolo, echo and early reflections
pub mod engine; // Renderer, control API and output stream
pub mod io; // Note names, MIDI numbers and keyboard mapping
pub mod synth; // Voices, voice pool and the command set

/// Largest tick the engine renders in one go.
pub const MAX_BLOCK_SIZE: usize = 4096;
/// Shortest attack, decay or release, in seconds.
pub(crate) const MIN_STAGE_SECONDS: f32 = 0.01;

pub use dsp::{EnvelopeParams, Waveform};
pub use effects::{Effect, EffectParam, EffectsConfig};
pub use engine::{EngineConfig, SynthController, SynthEngine, Synthesizer};
pub use synth::{SynthMessage, SynthParams, VoiceId};
