#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::MIN_STAGE_SECONDS;

/*
ADSR Envelope
=============

Each voice carries its own linear ADSR envelope. The envelope is a small
state machine advanced exactly once per output sample.

  Level
    1.0 ┐     ╱╲
        │    ╱  ╲___________
    S   │   ╱               ╲
        │  ╱                 ╲
    0.0 └─╱───────────────────╲──→ Time
        Attack Decay  Sustain  Release

Rates
-----

Times are converted to per-sample steps once, when the voice is created:

    attack_rate  = 1 / (attack_seconds * sample_rate)
    decay_rate   = (1 - sustain) / (decay_seconds * sample_rate)

Release is different. A note can be released mid-attack or mid-decay, when
the level is nowhere near the sustain level. The release ramp is planned at
the moment of release from the level the envelope actually has:

    release_rate = level_at_release / (release_seconds * sample_rate)

so a release always takes `release_seconds` regardless of where it started,
and a release from a zero sustain still terminates. The ramp is tracked as
elapsed/total samples instead of repeated subtraction so it lands on exactly
0.0 after `round(release_seconds * sample_rate)` samples.

State machine
-------------

    Attack ──level≥1──→ Decay ──level≤S──→ Sustain
       │                  │                   │
       └──── release ─────┴───── release ─────┘
                          ↓
                       Release ──level≤floor──→ Idle

Idle is terminal: the voice pool removes voices whose envelope went Idle.
Levels are held in f64; a five second attack accumulates 220k increments.
*/

/// Release levels below this are treated as silent and end the voice.
pub const SILENCE_FLOOR: f64 = 0.001;

/// ADSR settings snapshotted into each new voice.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeParams {
    /// Seconds to ramp 0 → 1.
    pub attack: f32,
    /// Seconds to ramp 1 → sustain.
    pub decay: f32,
    /// Level held while the note is down (0.0 - 1.0).
    pub sustain: f32,
    /// Seconds to ramp the current level → 0.
    pub release: f32,
}

impl EnvelopeParams {
    /// Build clamped parameters: stage times floor at 10 ms, sustain in `[0, 1]`.
    pub fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack: clamp_time(attack),
            decay: clamp_time(decay),
            sustain: if sustain.is_nan() { 0.0 } else { sustain.clamp(0.0, 1.0) },
            release: clamp_time(release),
        }
    }
}

impl Default for EnvelopeParams {
    fn default() -> Self {
        Self::new(0.1, 0.1, 0.7, 0.2)
    }
}

fn clamp_time(seconds: f32) -> f32 {
    if seconds.is_nan() {
        MIN_STAGE_SECONDS
    } else {
        seconds.max(MIN_STAGE_SECONDS)
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Attack,
    Decay,
    Sustain,
    Release,
    Idle,
}

#[derive(Debug, Clone)]
pub struct Envelope {
    sustain: f64,
    release_seconds: f64,
    sample_rate: f64,
    attack_rate: f64,
    decay_rate: f64,

    stage: EnvelopeStage,
    level: f64,

    release_start_level: f64,
    release_total_samples: u64,
    release_elapsed_samples: u64,
}

impl Envelope {
    /// A triggered envelope, starting its attack from zero.
    pub fn new(params: EnvelopeParams, sample_rate: f32) -> Self {
        let params =
            EnvelopeParams::new(params.attack, params.decay, params.sustain, params.release);
        let sample_rate = sample_rate as f64;
        let sustain = params.sustain as f64;

        Self {
            sustain,
            release_seconds: params.release as f64,
            sample_rate,
            attack_rate: 1.0 / (params.attack as f64 * sample_rate),
            decay_rate: (1.0 - sustain) / (params.decay as f64 * sample_rate),

            stage: EnvelopeStage::Attack,
            level: 0.0,

            release_start_level: 0.0,
            release_total_samples: 1,
            release_elapsed_samples: 0,
        }
    }

    /// Enter Release from any active stage. Repeated calls are ignored.
    pub fn release(&mut self) {
        if matches!(self.stage, EnvelopeStage::Release | EnvelopeStage::Idle) {
            return;
        }

        self.release_start_level = self.level;
        self.release_total_samples =
            (self.release_seconds * self.sample_rate).round().max(1.0) as u64;
        self.release_elapsed_samples = 0;
        self.stage = EnvelopeStage::Release;
    }

    /// Advance one sample and return the new output level.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        match self.stage {
            EnvelopeStage::Attack => {
                self.level += self.attack_rate;
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = EnvelopeStage::Decay;
                }
            }

            EnvelopeStage::Decay => {
                self.level -= self.decay_rate;
                if self.level <= self.sustain {
                    self.level = self.sustain;
                    self.stage = EnvelopeStage::Sustain;
                }
            }

            EnvelopeStage::Sustain => {}

            EnvelopeStage::Release => {
                self.release_elapsed_samples += 1;
                let progress =
                    self.release_elapsed_samples as f64 / self.release_total_samples as f64;
                self.level = self.release_start_level * (1.0 - progress);

                if self.release_elapsed_samples >= self.release_total_samples
                    || self.level <= SILENCE_FLOOR
                {
                    self.level = 0.0;
                    self.stage = EnvelopeStage::Idle;
                }
            }

            EnvelopeStage::Idle => {
                self.level = 0.0;
            }
        }

        self.level.clamp(0.0, 1.0) as f32
    }

    /// Fill `out` with one gain value per sample.
    pub fn render(&mut self, out: &mut [f32]) {
        for gain in out.iter_mut() {
            *gain = self.next_sample();
        }
    }

    pub fn is_idle(&self) -> bool {
        self.stage == EnvelopeStage::Idle
    }

    pub fn level(&self) -> f32 {
        self.level as f32
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 1_000.0;

    fn advance(env: &mut Envelope, samples: usize) {
        for _ in 0..samples {
            env.next_sample();
        }
    }

    #[test]
    fn params_are_clamped() {
        let p = EnvelopeParams::new(0.0, -1.0, 1.5, 0.001);
        assert_eq!(p.attack, 0.01);
        assert_eq!(p.decay, 0.01);
        assert_eq!(p.sustain, 1.0);
        assert_eq!(p.release, 0.01);
        assert_eq!(EnvelopeParams::new(0.5, 0.5, -0.2, 0.5).sustain, 0.0);
    }

    #[test]
    fn attack_reaches_full_level() {
        let mut env = Envelope::new(EnvelopeParams::new(0.05, 0.1, 0.7, 0.2), SAMPLE_RATE);
        advance(&mut env, 50);
        assert!((env.level() - 1.0).abs() < 1e-3);

        advance(&mut env, 1);
        assert_eq!(env.stage(), EnvelopeStage::Decay);
    }

    #[test]
    fn attack_reaches_full_level_across_the_range() {
        let sample_rate = 44_100.0;
        for attack in [0.01f32, 0.1, 0.5, 1.0, 2.5, 5.0] {
            for sustain in [0.0f32, 0.5, 1.0] {
                let params = EnvelopeParams::new(attack, 0.01, sustain, 0.01);
                let mut env = Envelope::new(params, sample_rate);
                let n = (attack as f64 * sample_rate as f64).round() as usize;
                let mut last = 0.0;
                for _ in 0..n {
                    last = env.next_sample();
                }
                assert!((last - 1.0).abs() < 1e-3, "attack {attack}: {last}");
            }
        }
    }

    #[test]
    fn decay_settles_on_sustain() {
        let sustain = 0.6;
        let mut env = Envelope::new(EnvelopeParams::new(0.01, 0.05, sustain, 0.2), SAMPLE_RATE);
        advance(&mut env, 10 + 50 + 5);
        assert_eq!(env.stage(), EnvelopeStage::Sustain);
        assert!((env.level() - sustain).abs() < 1e-6);

        advance(&mut env, 500);
        assert!((env.level() - sustain).abs() < 1e-6, "sustain holds");
    }

    #[test]
    fn full_sustain_skips_decay() {
        let mut env = Envelope::new(EnvelopeParams::new(0.01, 0.5, 1.0, 0.2), SAMPLE_RATE);
        advance(&mut env, 13);
        assert_eq!(env.stage(), EnvelopeStage::Sustain);
        assert_eq!(env.level(), 1.0);
    }

    #[test]
    fn release_from_sustain_takes_release_time() {
        let mut env = Envelope::new(EnvelopeParams::new(0.01, 0.01, 0.5, 0.03), SAMPLE_RATE);
        advance(&mut env, 40);
        env.release();

        advance(&mut env, 29);
        assert!(!env.is_idle());
        assert!(env.level() > 0.0);

        advance(&mut env, 1);
        assert!(env.is_idle());
        assert_eq!(env.level(), 0.0);
    }

    #[test]
    fn release_mid_attack_starts_from_current_level() {
        let mut env = Envelope::new(EnvelopeParams::new(0.1, 0.1, 0.2, 0.05), SAMPLE_RATE);
        advance(&mut env, 50); // halfway up the attack
        let at_release = env.level();
        env.release();

        let first = env.next_sample();
        assert!(first < at_release && first > at_release - 0.05, "no jump to sustain");

        advance(&mut env, 49);
        assert!(env.is_idle());
    }

    #[test]
    fn release_with_zero_sustain_still_ends() {
        let mut env = Envelope::new(EnvelopeParams::new(0.5, 0.1, 0.0, 0.1), SAMPLE_RATE);
        advance(&mut env, 100);
        env.release();
        advance(&mut env, 100);
        assert!(env.is_idle());
    }

    #[test]
    fn immediate_release_goes_idle_on_first_sample() {
        let mut env = Envelope::new(EnvelopeParams::default(), SAMPLE_RATE);
        env.release();
        assert_eq!(env.next_sample(), 0.0);
        assert!(env.is_idle());
    }

    #[test]
    fn second_release_is_ignored() {
        let mut env = Envelope::new(EnvelopeParams::new(0.01, 0.01, 0.8, 0.1), SAMPLE_RATE);
        advance(&mut env, 30);
        env.release();
        advance(&mut env, 50);
        let level = env.level();
        env.release();
        assert_eq!(env.level(), level);
        advance(&mut env, 50);
        assert!(env.is_idle());
    }
}
