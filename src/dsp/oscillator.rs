#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

/*
Phase-Accumulating Oscillator
=============================

Every voice owns one oscillator. The oscillator does not know what time it
is; it only knows where it is inside the current cycle. That position is
the phase, stored in cycles (0.0 .. 1.0) rather than radians so that the
triangle and saw shapes can read it directly.

    phase += frequency / sample_rate      (once per sample)
    phase -= 1.0 when phase >= 1.0        (wrap)

Because the phase lives on the voice and is never reset between blocks,
consecutive blocks join without a discontinuity no matter how the block
length relates to the waveform period.

Shapes (all scaled to a 0.5 peak so several voices can be summed before the
master clip):

    Sine      0.5 * sin(2π·phase)
    Square    0.5 * sign(sin(2π·phase)), sign(0) = +1
    Triangle  0.5 * (2·|2·phase − 1| − 1)
    Saw       0.5 * (2·phase − 1)

The phase is kept in f64. At 44.1 kHz an f32 accumulator drifts audibly
after a few minutes of a sustained note.
*/

/// Peak amplitude of every waveform; leaves headroom for mixing.
pub const PEAK: f32 = 0.5;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Triangle,
    Saw,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Triangle,
        Waveform::Saw,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Triangle => "triangle",
            Waveform::Saw => "saw",
        }
    }

    /// Evaluate the shape at a phase given in cycles (`0.0..1.0`).
    #[inline]
    pub fn sample_at(self, phase: f64) -> f32 {
        let value = match self {
            Waveform::Sine => (TAU * phase).sin(),
            Waveform::Square => {
                if (TAU * phase).sin() >= 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => 2.0 * (2.0 * phase - 1.0).abs() - 1.0,
            Waveform::Saw => 2.0 * phase - 1.0,
        };
        PEAK * value as f32
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Waveform {
    type Err = UnknownWaveform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sine" | "sin" => Ok(Waveform::Sine),
            "square" | "sqr" => Ok(Waveform::Square),
            "triangle" | "tri" => Ok(Waveform::Triangle),
            "saw" | "sawtooth" => Ok(Waveform::Saw),
            _ => Err(UnknownWaveform),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownWaveform;

impl fmt::Display for UnknownWaveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown waveform (expected sine, square, triangle or saw)")
    }
}

impl std::error::Error for UnknownWaveform {}

/// Running phase for one voice.
#[derive(Debug, Clone, Default)]
pub struct Oscillator {
    phase: f64,
}

impl Oscillator {
    pub fn new() -> Self {
        Self { phase: 0.0 }
    }

    /// Fill `out` with consecutive samples and advance the phase.
    ///
    /// `frequency` must be positive; the caller guarantees it.
    pub fn render(
        &mut self,
        out: &mut [f32],
        frequency: f32,
        sample_rate: f32,
        waveform: Waveform,
    ) {
        let increment = frequency as f64 / sample_rate as f64;
        for sample in out.iter_mut() {
            *sample = waveform.sample_at(self.phase);
            self.phase += increment;
            if self.phase >= 1.0 {
                self.phase -= self.phase.floor();
            }
        }
    }

    /// Current phase in cycles.
    pub fn phase(&self) -> f64 {
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 44_100.0;

    fn render(waveform: Waveform, frequency: f32, len: usize) -> Vec<f32> {
        let mut osc = Oscillator::new();
        let mut buffer = vec![0.0f32; len];
        osc.render(&mut buffer, frequency, SAMPLE_RATE, waveform);
        buffer
    }

    #[test]
    fn sine_matches_closed_form() {
        let buffer = render(Waveform::Sine, 440.0, 256);
        let n = 37;
        let expected = 0.5 * (TAU * 440.0 * n as f64 / SAMPLE_RATE as f64).sin();
        assert!((buffer[n] as f64 - expected).abs() < 1e-5);
    }

    #[test]
    fn sine_peak_is_half() {
        let buffer = render(Waveform::Sine, 441.0, 4096);
        let peak = buffer.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
        assert!(peak <= 0.5 + 1e-6, "peak {peak}");
        assert!(peak > 0.49);
    }

    #[test]
    fn square_only_takes_two_values() {
        let buffer = render(Waveform::Square, 123.4, 8192);
        assert!(buffer.iter().all(|&s| s == 0.5 || s == -0.5));
        assert_eq!(buffer[0], 0.5, "sign(0) counts as positive");
        assert!(buffer.contains(&-0.5));
    }

    #[test]
    fn triangle_and_saw_stay_in_range() {
        for waveform in [Waveform::Triangle, Waveform::Saw] {
            let buffer = render(waveform, 300.0, 4096);
            assert!(buffer.iter().all(|s| (-0.5..=0.5).contains(s)));
        }
        // Both start at the bottom of their ramp
        assert_eq!(render(Waveform::Triangle, 100.0, 1)[0], 0.5);
        assert_eq!(render(Waveform::Saw, 100.0, 1)[0], -0.5);
    }

    #[test]
    fn phase_continues_across_blocks() {
        let whole = render(Waveform::Saw, 97.0, 1000);

        let mut osc = Oscillator::new();
        let mut split = vec![0.0f32; 1000];
        let (a, b) = split.split_at_mut(333);
        osc.render(a, 97.0, SAMPLE_RATE, Waveform::Saw);
        osc.render(b, 97.0, SAMPLE_RATE, Waveform::Saw);

        assert_eq!(whole, split);
    }

    #[test]
    fn phase_stays_wrapped() {
        let mut osc = Oscillator::new();
        let mut buffer = vec![0.0f32; 10_000];
        osc.render(&mut buffer, 15_000.0, SAMPLE_RATE, Waveform::Sine);
        assert!((0.0..1.0).contains(&osc.phase()));
    }

    #[test]
    fn parses_waveform_names() {
        assert_eq!("Sine".parse::<Waveform>(), Ok(Waveform::Sine));
        assert_eq!("sawtooth".parse::<Waveform>(), Ok(Waveform::Saw));
        assert_eq!("tri".parse::<Waveform>(), Ok(Waveform::Triangle));
        assert!("pulse".parse::<Waveform>().is_err());
    }
}
