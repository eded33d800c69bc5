//! Real-world scenario benchmarks.
//!
//! Whole engine ticks: command drain, voice mix, effects, volume and clip.

mod engine;

pub use engine::bench_engine;
