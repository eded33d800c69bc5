use crate::dsp::delay::DelayLine;

use super::ReverbSettings;

/*
Early Reflections
=================

A small fixed-tap reverb: three reflections of the dry signal at 30, 50
and 70 ms, with relative weights 0.3 / 0.2 / 0.1 scaled by the room size,
summed onto the dry signal and halved.

    y[n] = (x[n] + room·(0.3·x[n−30ms] + 0.2·x[n−50ms] + 0.1·x[n−70ms])) / 2

Like the echo, the reflection history persists between blocks.
*/

const REFLECTIONS_MS: [f32; 3] = [30.0, 50.0, 70.0];
const REFLECTION_WEIGHTS: [f32; 3] = [0.3, 0.2, 0.1];

pub struct EarlyReflections {
    history: DelayLine,
    taps: [usize; 3],
}

impl EarlyReflections {
    pub fn new(sample_rate: f32) -> Self {
        let taps = REFLECTIONS_MS.map(|ms| ((ms / 1000.0 * sample_rate).round() as usize).max(1));
        let longest = taps.iter().copied().max().unwrap_or(1);

        Self {
            history: DelayLine::new(longest),
            taps,
        }
    }

    pub fn process(&mut self, buffer: &mut [f32], settings: &ReverbSettings) {
        let room = settings.room_size;

        for sample in buffer.iter_mut() {
            let dry = *sample;
            let mut wet = 0.0;
            for (&tap, &weight) in self.taps.iter().zip(REFLECTION_WEIGHTS.iter()) {
                wet += weight * self.history.tap(tap);
            }
            self.history.push(dry);
            *sample = (dry + room * wet) * 0.5;
        }
    }

    pub fn reset(&mut self) {
        self.history.reset();
    }
}
