//! Post-mix effects: tremolo → delay → reverb.
//!
//! Each processor owns whatever history it needs, so echoes and reflections
//! carry across block boundaries instead of being cut off at the end of every
//! buffer. The chain is driven from the audio thread with a read-only
//! `EffectsConfig` snapshot; toggles and parameter values arrive through the
//! engine's command queue.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

pub mod delay;
pub mod reverb;
pub mod tremolo;

use self::{delay::Echo, reverb::EarlyReflections, tremolo::Tremolo};

/// Longest delay time accepted, in seconds.
pub const MAX_DELAY_SECONDS: f32 = 2.0;

const TREMOLO_RATE_RANGE: (f32, f32) = (0.01, 20.0);
const DELAY_TIME_RANGE: (f32, f32) = (0.001, MAX_DELAY_SECONDS);

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Tremolo,
    Delay,
    Reverb,
}

impl Effect {
    /// Processing order.
    pub const CHAIN: [Effect; 3] = [Effect::Tremolo, Effect::Delay, Effect::Reverb];

    pub fn name(self) -> &'static str {
        match self {
            Effect::Tremolo => "tremolo",
            Effect::Delay => "delay",
            Effect::Reverb => "reverb",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Effect {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tremolo" => Ok(Effect::Tremolo),
            "delay" | "echo" => Ok(Effect::Delay),
            "reverb" => Ok(Effect::Reverb),
            _ => Err(UnknownName),
        }
    }
}

/// A named numeric effect parameter.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectParam {
    /// LFO rate in Hz.
    TremoloRate,
    /// Modulation depth, 0.0 - 1.0.
    TremoloDepth,
    /// Echo spacing in seconds.
    DelayTime,
    /// Per-echo gain, 0.0 - 1.0.
    DelayFeedback,
    /// Reflection level, 0.0 - 1.0.
    ReverbRoomSize,
}

impl EffectParam {
    pub const ALL: [EffectParam; 5] = [
        EffectParam::TremoloRate,
        EffectParam::TremoloDepth,
        EffectParam::DelayTime,
        EffectParam::DelayFeedback,
        EffectParam::ReverbRoomSize,
    ];

    /// Resolve a parameter from an effect and a parameter name (`"rate"`,
    /// `"depth"`, `"time"`, `"feedback"`, `"room_size"`).
    pub fn lookup(effect: Effect, param: &str) -> Option<Self> {
        let param = param.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.effect() == effect && p.short_names().contains(&param.as_str()))
    }

    pub fn effect(self) -> Effect {
        match self {
            EffectParam::TremoloRate | EffectParam::TremoloDepth => Effect::Tremolo,
            EffectParam::DelayTime | EffectParam::DelayFeedback => Effect::Delay,
            EffectParam::ReverbRoomSize => Effect::Reverb,
        }
    }

    pub fn name(self) -> &'static str {
        self.short_names()[0]
    }

    fn short_names(self) -> &'static [&'static str] {
        match self {
            EffectParam::TremoloRate => &["rate"],
            EffectParam::TremoloDepth => &["depth"],
            EffectParam::DelayTime => &["time"],
            EffectParam::DelayFeedback => &["feedback"],
            EffectParam::ReverbRoomSize => &["room_size", "size"],
        }
    }

    fn clamp(self, value: f32) -> f32 {
        match self {
            EffectParam::TremoloRate => value.clamp(TREMOLO_RATE_RANGE.0, TREMOLO_RATE_RANGE.1),
            EffectParam::DelayTime => value.clamp(DELAY_TIME_RANGE.0, DELAY_TIME_RANGE.1),
            EffectParam::TremoloDepth
            | EffectParam::DelayFeedback
            | EffectParam::ReverbRoomSize => value.clamp(0.0, 1.0),
        }
    }
}

impl fmt::Display for EffectParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.effect(), self.name())
    }
}

/// Accepts `effect_param` keys such as `tremolo_rate` or `reverb_size`.
impl FromStr for EffectParam {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (effect, param) = s.trim().split_once('_').ok_or(UnknownName)?;
        EffectParam::lookup(effect.parse()?, param).ok_or(UnknownName)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownName;

impl fmt::Display for UnknownName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown effect or parameter name")
    }
}

impl std::error::Error for UnknownName {}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TremoloSettings {
    pub enabled: bool,
    pub rate: f32,
    pub depth: f32,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelaySettings {
    pub enabled: bool,
    pub time: f32,
    pub feedback: f32,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbSettings {
    pub enabled: bool,
    pub room_size: f32,
}

/// Enabled flags and parameter values for the whole chain.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectsConfig {
    pub tremolo: TremoloSettings,
    pub delay: DelaySettings,
    pub reverb: ReverbSettings,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            tremolo: TremoloSettings {
                enabled: false,
                rate: 5.0,
                depth: 0.3,
            },
            delay: DelaySettings {
                enabled: false,
                time: 0.1,
                feedback: 0.3,
            },
            reverb: ReverbSettings {
                enabled: false,
                room_size: 0.3,
            },
        }
    }
}

impl EffectsConfig {
    pub fn is_enabled(&self, effect: Effect) -> bool {
        match effect {
            Effect::Tremolo => self.tremolo.enabled,
            Effect::Delay => self.delay.enabled,
            Effect::Reverb => self.reverb.enabled,
        }
    }

    pub fn set_enabled(&mut self, effect: Effect, enabled: bool) {
        match effect {
            Effect::Tremolo => self.tremolo.enabled = enabled,
            Effect::Delay => self.delay.enabled = enabled,
            Effect::Reverb => self.reverb.enabled = enabled,
        }
    }

    pub fn param(&self, param: EffectParam) -> f32 {
        match param {
            EffectParam::TremoloRate => self.tremolo.rate,
            EffectParam::TremoloDepth => self.tremolo.depth,
            EffectParam::DelayTime => self.delay.time,
            EffectParam::DelayFeedback => self.delay.feedback,
            EffectParam::ReverbRoomSize => self.reverb.room_size,
        }
    }

    /// Store a clamped value. NaN leaves the parameter unchanged.
    pub fn set_param(&mut self, param: EffectParam, value: f32) {
        if value.is_nan() {
            return;
        }
        let value = param.clamp(value);
        match param {
            EffectParam::TremoloRate => self.tremolo.rate = value,
            EffectParam::TremoloDepth => self.tremolo.depth = value,
            EffectParam::DelayTime => self.delay.time = value,
            EffectParam::DelayFeedback => self.delay.feedback = value,
            EffectParam::ReverbRoomSize => self.reverb.room_size = value,
        }
    }

    pub fn any_enabled(&self) -> bool {
        Effect::CHAIN.into_iter().any(|e| self.is_enabled(e))
    }
}

/// Persistent effect processors, applied in `Effect::CHAIN` order.
pub struct EffectsChain {
    sample_rate: f32,
    tremolo: Tremolo,
    delay: Echo,
    reverb: EarlyReflections,
    // enabled flags seen on the previous block
    delay_was_enabled: bool,
    reverb_was_enabled: bool,
}

impl EffectsChain {
    /// Allocates every history buffer up front; call outside the audio thread.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            tremolo: Tremolo::new(),
            delay: Echo::new(sample_rate, MAX_DELAY_SECONDS),
            reverb: EarlyReflections::new(sample_rate),
            delay_was_enabled: false,
            reverb_was_enabled: false,
        }
    }

    /// Process one mixed block in place.
    ///
    /// `start_frame` is the absolute stream position of `buffer[0]`. Disabled
    /// effects leave the buffer untouched. A line that is switched back on
    /// starts from silence rather than replaying stale history.
    pub fn process(&mut self, buffer: &mut [f32], config: &EffectsConfig, start_frame: u64) {
        if config.tremolo.enabled {
            self.tremolo.process(buffer, &config.tremolo, start_frame, self.sample_rate);
        }

        if config.delay.enabled {
            if !self.delay_was_enabled {
                self.delay.reset();
            }
            self.delay.process(buffer, &config.delay, self.sample_rate);
        }
        self.delay_was_enabled = config.delay.enabled;

        if config.reverb.enabled {
            if !self.reverb_was_enabled {
                self.reverb.reset();
            }
            self.reverb.process(buffer, &config.reverb);
        }
        self.reverb_was_enabled = config.reverb.enabled;
    }

    /// Drop all tails.
    pub fn reset(&mut self) {
        self.delay.reset();
        self.reverb.reset();
    }
}
