use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use rtrb::{Producer, RingBuffer};

use crate::{
    dsp::{EnvelopeParams, Waveform},
    effects::{Effect, EffectParam},
    synth::{SynthMessage, SynthParams, VoiceId},
};

use super::{config::EngineConfig, renderer::SynthEngine};

/// Control-context half of the synthesizer.
///
/// Every operation here is non-blocking: it updates the local parameter
/// mirror and pushes a command for the engine to pick up at its next tick.
/// While no engine is connected, parameter changes are remembered and note
/// events are ignored.
pub struct SynthController {
    config: EngineConfig,
    params: SynthParams,
    tx: Option<Producer<SynthMessage>>,
    next_id: u64,
    /// Voices started through `note_event` and not yet released.
    held: Vec<(VoiceId, f32)>,
    voice_count: Arc<AtomicUsize>,
}

impl SynthController {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config: config.sanitized(),
            params: SynthParams::default(),
            tx: None,
            next_id: 1,
            held: Vec::new(),
            voice_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Build a fresh engine wired to this controller.
    ///
    /// The engine starts from the current parameters with no voices. A
    /// previously connected engine stops receiving commands.
    pub fn connect(&mut self) -> SynthEngine {
        let (tx, rx) = RingBuffer::new(self.config.queue_capacity);
        self.tx = Some(tx);
        self.held.clear();

        SynthEngine::new(&self.config, self.params, rx).with_voice_counter(self.voice_count.clone())
    }

    /// Stop talking to the engine and forget sounding voices.
    pub fn disconnect(&mut self) {
        self.tx = None;
        self.held.clear();
        self.voice_count.store(0, Ordering::Relaxed);
    }

    pub fn is_connected(&self) -> bool {
        self.tx.is_some()
    }

    /// Start a note. `None` when no engine is connected or the queue is full.
    pub fn note_on(&mut self, frequency: f32, velocity: f32) -> Option<VoiceId> {
        if !(frequency.is_finite() && frequency > 0.0) {
            log::warn!("ignoring note-on with invalid frequency {frequency}");
            return None;
        }
        if !self.is_connected() {
            return None;
        }

        let id = VoiceId(self.next_id);
        self.next_id += 1;

        let velocity = if velocity.is_nan() { 0.0 } else { velocity.clamp(0.0, 1.0) };
        let sent = self.send(SynthMessage::NoteOn {
            id,
            frequency,
            velocity,
        });
        sent.then_some(id)
    }

    /// Release a voice. Unknown or already released ids are a no-op.
    pub fn note_off(&mut self, id: VoiceId) {
        self.held.retain(|&(held, _)| held != id);
        self.send(SynthMessage::NoteOff { id });
    }

    /// Keyboard-style entry point.
    ///
    /// Note-on returns the new voice id. Note-off releases every voice this
    /// method started at exactly `frequency` and returns `None`.
    pub fn note_event(&mut self, frequency: f32, on: bool, velocity: f32) -> Option<VoiceId> {
        if on {
            let id = self.note_on(frequency, velocity)?;
            self.held.push((id, frequency));
            return Some(id);
        }

        let mut i = 0;
        while i < self.held.len() {
            let (id, held_freq) = self.held[i];
            if held_freq.to_bits() == frequency.to_bits() {
                self.held.remove(i);
                self.send(SynthMessage::NoteOff { id });
            } else {
                i += 1;
            }
        }
        None
    }

    pub fn all_notes_off(&mut self) {
        self.held.clear();
        self.send(SynthMessage::AllNotesOff);
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.params.waveform = waveform;
        self.send(SynthMessage::SetWaveform(waveform));
    }

    /// Envelope for voices started from now on; sounding voices keep theirs.
    pub fn set_adsr(&mut self, attack: f32, decay: f32, sustain: f32, release: f32) {
        let envelope = EnvelopeParams::new(attack, decay, sustain, release);
        self.params.envelope = envelope;
        self.send(SynthMessage::SetEnvelope(envelope));
    }

    pub fn set_effect_param(&mut self, param: EffectParam, value: f32) {
        self.params.effects.set_param(param, value);
        self.send(SynthMessage::SetEffectParam { param, value });
    }

    /// Name-based variant used by text front ends. Returns `false` and
    /// changes nothing when either name is unknown.
    pub fn set_effect_param_by_name(&mut self, effect: &str, param: &str, value: f32) -> bool {
        let resolved = effect
            .parse::<Effect>()
            .ok()
            .and_then(|effect| EffectParam::lookup(effect, param));

        match resolved {
            Some(resolved) => {
                self.set_effect_param(resolved, value);
                true
            }
            None => {
                log::debug!("unknown effect parameter {effect}.{param}");
                false
            }
        }
    }

    pub fn toggle_effect(&mut self, effect: Effect, enabled: bool) {
        self.params.effects.set_enabled(effect, enabled);
        self.send(SynthMessage::ToggleEffect { effect, enabled });
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.params.set_master_volume(volume);
        self.send(SynthMessage::SetMasterVolume(self.params.master_volume));
    }

    /// Drop every voice and restore default parameters.
    pub fn reset(&mut self) {
        self.params = SynthParams::default();
        self.held.clear();
        self.send(SynthMessage::Reset);
    }

    /// Voices alive after the engine's most recent tick.
    pub fn active_voice_count(&self) -> usize {
        self.voice_count.load(Ordering::Relaxed)
    }

    pub fn params(&self) -> &SynthParams {
        &self.params
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn set_sample_rate(&mut self, sample_rate: f32) {
        self.config = self.config.with_sample_rate(sample_rate).sanitized();
    }

    fn send(&mut self, msg: SynthMessage) -> bool {
        let Some(tx) = self.tx.as_mut() else {
            return false;
        };

        match tx.push(msg) {
            Ok(()) => true,
            Err(_) => {
                log::warn!("command queue full, dropping {msg:?}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connected() -> (SynthController, SynthEngine) {
        let mut controller = SynthController::new(EngineConfig::default().with_buffer_size(64));
        let engine = controller.connect();
        (controller, engine)
    }

    fn tick(engine: &mut SynthEngine) {
        let mut out = vec![0.0f32; 64];
        engine.render_tick(&mut out);
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let (mut controller, _engine) = connected();
        let a = controller.note_on(440.0, 1.0).unwrap();
        let b = controller.note_on(440.0, 1.0).unwrap();
        assert!(b > a);
    }

    #[test]
    fn disconnected_controller_ignores_notes_but_keeps_params() {
        let mut controller = SynthController::new(EngineConfig::default());
        assert_eq!(controller.note_on(440.0, 1.0), None);

        controller.set_waveform(Waveform::Saw);
        controller.set_master_volume(0.9);
        let engine = controller.connect();

        assert_eq!(engine.params().waveform, Waveform::Saw);
        assert_eq!(engine.params().master_volume, 0.9);
    }

    #[test]
    fn note_event_off_releases_by_frequency() {
        let (mut controller, mut engine) = connected();
        let a = controller.note_event(261.63, true, 1.0).unwrap();
        let b = controller.note_event(261.63, true, 1.0).unwrap();
        let c = controller.note_event(329.63, true, 1.0).unwrap();
        tick(&mut engine);
        assert_eq!(controller.active_voice_count(), 3);

        assert_eq!(controller.note_event(261.63, false, 0.0), None);
        tick(&mut engine);

        let pool = engine.pool();
        assert!(pool.get(a).is_some_and(|v| v.is_releasing()));
        assert!(pool.get(b).is_some_and(|v| v.is_releasing()));
        assert!(pool.get(c).is_some_and(|v| !v.is_releasing()));

        // a second off at the same pitch has nothing left to release
        controller.note_event(261.63, false, 0.0);
        controller.note_off(c);
        tick(&mut engine);
        assert!(engine.pool().voices().iter().all(|v| v.is_releasing()));
    }

    #[test]
    fn adsr_applies_to_new_voices_only() {
        let (mut controller, mut engine) = connected();
        let first = controller.note_on(440.0, 1.0).unwrap();
        tick(&mut engine);

        controller.set_adsr(0.001, 5.0, 2.0, 0.5);
        assert_eq!(controller.params().envelope, EnvelopeParams::new(0.01, 5.0, 1.0, 0.5));
        let second = controller.note_on(440.0, 1.0).unwrap();
        tick(&mut engine);

        // default attack is 100 ms, the new one 10 ms
        let pool = engine.pool();
        let first_level = pool.get(first).map(|v| v.level()).unwrap_or_default();
        let second_level = pool.get(second).map(|v| v.level()).unwrap_or_default();
        assert!(second_level > 4.0 * first_level);
    }

    #[test]
    fn effect_names_resolve() {
        let (mut controller, _engine) = connected();
        assert!(controller.set_effect_param_by_name("delay", "feedback", 0.6));
        assert_eq!(controller.params().effects.delay.feedback, 0.6);
        assert!(!controller.set_effect_param_by_name("flanger", "rate", 1.0));
        assert!(!controller.set_effect_param_by_name("reverb", "rate", 1.0));
    }

    #[test]
    fn unknown_effect_names_leave_params_untouched() {
        let (mut controller, mut engine) = connected();
        let before = *controller.params();

        assert!(!controller.set_effect_param_by_name("delay", "wobble", 0.9));
        assert!(!controller.set_effect_param_by_name("chorus", "mix", 0.9));
        tick(&mut engine);

        assert_eq!(*controller.params(), before);
        assert_eq!(*engine.params(), before);
    }

    #[test]
    fn full_queue_drops_commands() {
        let mut controller = SynthController::new(EngineConfig::default().with_queue_capacity(2));
        let _engine = controller.connect();
        assert!(controller.note_on(100.0, 1.0).is_some());
        assert!(controller.note_on(200.0, 1.0).is_some());
        assert_eq!(controller.note_on(300.0, 1.0), None);
    }

    #[test]
    fn reset_restores_mirror() {
        let (mut controller, mut engine) = connected();
        controller.toggle_effect(Effect::Tremolo, true);
        controller.note_on(440.0, 1.0);
        tick(&mut engine);

        controller.reset();
        tick(&mut engine);

        assert_eq!(*controller.params(), SynthParams::default());
        assert_eq!(controller.active_voice_count(), 0);
    }
}
