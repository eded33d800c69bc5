//! Engine: real-time renderer, control API and output stream.
//!
//! `SynthEngine` runs on the audio thread, `SynthController` on the control
//! side; the two only share an `rtrb` command queue and an atomic voice
//! count. `Synthesizer` ties both to a cpal output stream.

pub mod config;
pub mod controller;
pub mod output;
pub mod renderer;

pub use config::EngineConfig;
pub use controller::SynthController;
pub use output::{available_output_devices, Synthesizer};
pub use renderer::SynthEngine;
