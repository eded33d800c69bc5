use crate::dsp::lfo::{bipolar_to_unipolar, sine_at};

use super::TremoloSettings;

/*
Tremolo
=======

Amplitude modulation by a sine LFO:

    gain(t) = 1 - depth/2 * (1 + sin(2π·rate·t))
            = 1 - depth * unipolar(sin(2π·rate·t))

At depth 0 the signal passes untouched; at depth 1 the gain swings between
1.0 and 0.0. `t` is absolute stream time, so the LFO keeps its place from
one block to the next.
*/

pub struct Tremolo;

impl Tremolo {
    pub fn new() -> Self {
        Self
    }

    pub fn process(
        &mut self,
        buffer: &mut [f32],
        settings: &TremoloSettings,
        start_frame: u64,
        sample_rate: f32,
    ) {
        let rate = settings.rate as f64;
        let depth = settings.depth as f64;
        let sample_rate = sample_rate as f64;

        for (i, sample) in buffer.iter_mut().enumerate() {
            let lfo = sine_at(rate, start_frame + i as u64, sample_rate);
            let gain = 1.0 - depth * bipolar_to_unipolar(lfo);
            *sample *= gain as f32;
        }
    }
}

impl Default for Tremolo {
    fn default() -> Self {
        Self::new()
    }
}
