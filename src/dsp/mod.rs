//! Low-level DSP primitives used by the voice pool and the effects chain.
//!
//! These components are allocation-free once constructed and realtime-safe,
//! so they can be embedded directly inside voices and effect processors.

/// Sample history with multi-tap reads.
pub mod delay;
/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// Control-rate oscillator helpers.
pub mod lfo;
/// Phase-accumulating waveform oscillator.
pub mod oscillator;

pub use envelope::{Envelope, EnvelopeParams, EnvelopeStage};
pub use oscillator::{Oscillator, Waveform};
