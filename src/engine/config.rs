#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::MAX_BLOCK_SIZE;

/// Static engine settings, fixed for the lifetime of a stream.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Requested output rate in Hz. The device may force another rate.
    pub sample_rate: f32,
    /// Frames rendered per tick (1 ..= `MAX_BLOCK_SIZE`).
    pub buffer_size: usize,
    /// Voice pool capacity before voice stealing kicks in.
    pub max_voices: usize,
    /// Control commands that may be pending between two ticks.
    pub queue_capacity: usize,
    /// Samples buffered for an output monitor.
    pub monitor_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100.0,
            buffer_size: 1024,
            max_voices: 32,
            queue_capacity: 1024,
            monitor_capacity: 16 * 1024,
        }
    }
}

impl EngineConfig {
    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_max_voices(mut self, max_voices: usize) -> Self {
        self.max_voices = max_voices;
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    pub fn with_monitor_capacity(mut self, monitor_capacity: usize) -> Self {
        self.monitor_capacity = monitor_capacity;
        self
    }

    /// Copy with every field forced into its valid range.
    pub fn sanitized(self) -> Self {
        let sample_rate = if self.sample_rate.is_finite() && self.sample_rate >= 1_000.0 {
            self.sample_rate
        } else {
            Self::default().sample_rate
        };

        Self {
            sample_rate,
            buffer_size: self.buffer_size.clamp(1, MAX_BLOCK_SIZE),
            max_voices: self.max_voices.max(1),
            queue_capacity: self.queue_capacity.max(1),
            monitor_capacity: self.monitor_capacity.max(1),
        }
    }

    /// Real-time deadline of one tick, in seconds.
    pub fn tick_duration(&self) -> f32 {
        self.buffer_size as f32 / self.sample_rate
    }
}
