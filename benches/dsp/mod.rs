//! Benchmarks for low-level DSP primitives.

mod effects;
mod envelope;
mod oscillator;

pub use effects::bench_effects;
pub use envelope::bench_envelope;
pub use oscillator::bench_oscillator;
