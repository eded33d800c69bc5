//! Low frequency oscillator helpers.
//!
//! Control-rate oscillators (roughly 0.01 - 20 Hz) use the same math as the
//! audio oscillators but drive parameters instead of producing sound. The
//! tremolo effect is the only consumer here: a sine LFO bent into a unipolar
//! gain curve.

use std::f64::consts::TAU;

/// Convert bipolar signal (-1.0 to +1.0) to unipolar (0.0 to 1.0).
#[inline]
pub fn bipolar_to_unipolar(bipolar: f64) -> f64 {
    (bipolar + 1.0) * 0.5
}

/// Sine LFO evaluated at an absolute time position.
///
/// Tremolo is defined against stream time, so the LFO is a function of the
/// frame counter rather than a free-running accumulator. Only the fractional
/// cycle is fed to `sin` to keep precision over long sessions.
#[inline]
pub fn sine_at(rate_hz: f64, frame: u64, sample_rate: f64) -> f64 {
    let cycles = rate_hz * (frame as f64 / sample_rate);
    (TAU * cycles.fract()).sin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unipolar_range() {
        assert_eq!(bipolar_to_unipolar(-1.0), 0.0);
        assert_eq!(bipolar_to_unipolar(0.0), 0.5);
        assert_eq!(bipolar_to_unipolar(1.0), 1.0);
    }

    #[test]
    fn sine_lfo_hits_quarter_cycle_peak() {
        // 5 Hz at 1 kHz: a quarter cycle is 50 frames
        assert!((sine_at(5.0, 50, 1_000.0) - 1.0).abs() < 1e-9);
        assert!(sine_at(5.0, 0, 1_000.0).abs() < 1e-12);
        assert!((sine_at(5.0, 150, 1_000.0) + 1.0).abs() < 1e-9);
    }
}
