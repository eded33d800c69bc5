/// Fixed-capacity history of past samples.
///
/// The buffer is allocated once at construction; `push`, `tap` and `reset`
/// never allocate, so a line can live inside the audio callback.
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
    // pushes since the last reset, saturating at the buffer length
    filled: usize,
}

impl DelayLine {
    /// A line able to look back up to `max_delay_samples` samples.
    pub fn new(max_delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; max_delay_samples.max(1) + 1],
            write_pos: 0,
            filled: 0,
        }
    }

    /// Longest delay `tap` can serve.
    pub fn max_delay(&self) -> usize {
        self.buffer.len() - 1
    }

    /// Append one sample to the history.
    #[inline]
    pub fn push(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
        self.filled = (self.filled + 1).min(self.buffer.len());
    }

    /// Read the sample pushed `delay_samples` pushes ago (1 = most recent).
    ///
    /// Delays beyond the capacity are clamped to the oldest sample held.
    /// Anything older than the last `reset` reads as silence.
    #[inline]
    pub fn tap(&self, delay_samples: usize) -> f32 {
        let len = self.buffer.len();
        let delay_samples = delay_samples.clamp(1, len - 1);
        if delay_samples > self.filled {
            return 0.0;
        }
        let read_pos = (self.write_pos + len - delay_samples) % len;
        self.buffer[read_pos]
    }

    /// Forget the history without touching the buffer.
    ///
    /// Stale samples stay in memory but are masked by `tap` until new pushes
    /// overwrite them, so this is constant time even for long lines.
    pub fn reset(&mut self) {
        self.write_pos = 0;
        self.filled = 0;
    }
}
