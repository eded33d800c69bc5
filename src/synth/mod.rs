// Purpose: Voice management and polyphony
// This layer sits between the DSP primitives and the engine

pub mod message;
pub mod params;
pub mod pool;
pub mod voice;

pub use message::SynthMessage;
pub use params::SynthParams;
pub use pool::VoicePool;
pub use voice::{Voice, VoiceId};
