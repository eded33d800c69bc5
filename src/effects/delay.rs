use crate::dsp::delay::DelayLine;

use super::DelaySettings;

/// Number of echoes following the dry signal.
pub const ECHO_COUNT: usize = 3;

/// Multi-tap echo: the dry signal plus `ECHO_COUNT` copies spaced
/// `time` apart, the k-th scaled by `feedback^k`, halved to bound the level.
///
/// ```text
/// y[n] = (x[n] + fb·x[n−D] + fb²·x[n−2D] + fb³·x[n−3D]) / 2
/// ```
///
/// The history outlives the block, so echoes of the previous buffer land in
/// this one.
pub struct Echo {
    history: DelayLine,
}

impl Echo {
    pub fn new(sample_rate: f32, max_delay_seconds: f32) -> Self {
        let max_spacing = (max_delay_seconds * sample_rate).ceil() as usize;
        Self {
            history: DelayLine::new(max_spacing * ECHO_COUNT),
        }
    }

    pub fn process(&mut self, buffer: &mut [f32], settings: &DelaySettings, sample_rate: f32) {
        let spacing = ((settings.time * sample_rate).round() as usize)
            .clamp(1, self.history.max_delay() / ECHO_COUNT);
        let feedback = settings.feedback;

        for sample in buffer.iter_mut() {
            let dry = *sample;
            let mut out = dry;
            let mut gain = 1.0;
            for k in 1..=ECHO_COUNT {
                gain *= feedback;
                out += gain * self.history.tap(k * spacing);
            }
            self.history.push(dry);
            *sample = out * 0.5;
        }
    }

    pub fn reset(&mut self) {
        self.history.reset();
    }
}
