use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use rtrb::{Consumer, Producer};

use crate::{
    dsp::EnvelopeParams,
    effects::EffectsChain,
    synth::{pool::report_removed, SynthMessage, SynthParams, VoiceId, VoicePool},
};

use super::config::EngineConfig;

/*
Render Tick
===========

The engine lives on the audio thread and is the only owner of voice and
effect state. Each tick runs the same fixed sequence:

    1. drain queued commands        (note on/off, parameter changes)
    2. mix every voice              (oscillator × envelope × velocity)
    3. effects                      (tremolo → delay → reverb, if enabled)
    4. master volume, hard clip     ([-1, 1])
    5. publish                      (voice count, monitor copy)

Commands only take effect between ticks, so a tick always renders against
one consistent parameter snapshot. Nothing in a tick locks or allocates:
the pool, scratch and history buffers are all sized at construction.
*/

pub struct SynthEngine {
    sample_rate: f32,
    block_size: usize,
    params: SynthParams,
    pool: VoicePool,
    effects: EffectsChain,
    rx: Consumer<SynthMessage>,
    removed: Vec<VoiceId>,
    mix: Vec<f32>,
    frame_counter: u64,
    voice_count: Arc<AtomicUsize>,
    monitor: Option<Producer<f32>>,
}

impl SynthEngine {
    pub fn new(config: &EngineConfig, params: SynthParams, rx: Consumer<SynthMessage>) -> Self {
        let config = config.sanitized();

        Self {
            sample_rate: config.sample_rate,
            block_size: config.buffer_size,
            params,
            pool: VoicePool::new(config.max_voices, config.buffer_size),
            effects: EffectsChain::new(config.sample_rate),
            rx,
            // one steal per queued note-on plus every voice already sounding
            removed: Vec::with_capacity(config.queue_capacity + config.max_voices),
            mix: vec![0.0; config.buffer_size],
            frame_counter: 0,
            voice_count: Arc::new(AtomicUsize::new(0)),
            monitor: None,
        }
    }

    /// Publish the pool size into `counter` after every tick.
    pub fn with_voice_counter(mut self, counter: Arc<AtomicUsize>) -> Self {
        counter.store(self.pool.len(), Ordering::Relaxed);
        self.voice_count = counter;
        self
    }

    /// Copy every rendered sample into `monitor`, dropping what does not fit.
    pub fn with_monitor(mut self, monitor: Producer<f32>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// Render mono output of any length, in ticks of at most `buffer_size`.
    ///
    /// `removed()` afterwards lists the voices dropped across all of them.
    pub fn process_block(&mut self, out: &mut [f32]) {
        self.removed.clear();
        for chunk in out.chunks_mut(self.block_size) {
            self.tick(chunk);
        }
    }

    /// Fill an interleaved device buffer, duplicating mono onto every channel.
    pub fn write_interleaved(&mut self, data: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        let mut mix = std::mem::take(&mut self.mix);
        self.removed.clear();

        for frame_chunk in data.chunks_mut(self.block_size * channels) {
            let frames = frame_chunk.len() / channels;
            let block = &mut mix[..frames];
            self.tick(block);

            for (frame, &sample) in frame_chunk.chunks_mut(channels).zip(block.iter()) {
                frame.fill(sample);
            }
        }

        self.mix = mix;
    }

    /// One tick: drain commands, mix voices, effects, volume and clip.
    ///
    /// `out` is overwritten. A slice longer than `buffer_size` is rendered as
    /// consecutive ticks, exactly like `process_block`. Ids of voices that
    /// finished or were stolen are available from `removed()`.
    pub fn render_tick(&mut self, out: &mut [f32]) {
        self.process_block(out);
    }

    // `block` is at most `block_size` long
    fn tick(&mut self, block: &mut [f32]) {
        self.drain_messages();

        self.pool.render(
            block,
            self.params.waveform,
            self.sample_rate,
            &mut self.removed,
        );

        self.effects
            .process(block, &self.params.effects, self.frame_counter);

        let volume = self.params.master_volume;
        for sample in block.iter_mut() {
            *sample = (*sample * volume).clamp(-1.0, 1.0);
        }

        if let Some(monitor) = self.monitor.as_mut() {
            for &sample in block.iter() {
                if monitor.push(sample).is_err() {
                    break;
                }
            }
        }

        self.frame_counter += block.len() as u64;
        self.voice_count.store(self.pool.len(), Ordering::Relaxed);
    }

    fn drain_messages(&mut self) {
        while let Ok(msg) = self.rx.pop() {
            self.apply(msg);
        }
    }

    fn apply(&mut self, msg: SynthMessage) {
        match msg {
            SynthMessage::NoteOn {
                id,
                frequency,
                velocity,
            } => {
                if !(frequency.is_finite() && frequency > 0.0) {
                    return;
                }
                let stolen = self.pool.note_on(
                    id,
                    frequency,
                    velocity,
                    self.params.envelope,
                    self.sample_rate,
                    self.frame_counter,
                );
                if let Some(stolen) = stolen {
                    report_removed(&mut self.removed, stolen);
                }
            }
            SynthMessage::NoteOff { id } => self.pool.note_off(id),
            SynthMessage::AllNotesOff => self.pool.release_all(),
            SynthMessage::SetWaveform(waveform) => self.params.waveform = waveform,
            SynthMessage::SetEnvelope(env) => {
                self.params.envelope =
                    EnvelopeParams::new(env.attack, env.decay, env.sustain, env.release);
            }
            SynthMessage::SetEffectParam { param, value } => {
                self.params.effects.set_param(param, value);
            }
            SynthMessage::ToggleEffect { effect, enabled } => {
                self.params.effects.set_enabled(effect, enabled);
            }
            SynthMessage::SetMasterVolume(volume) => self.params.set_master_volume(volume),
            SynthMessage::Reset => {
                self.pool.clear(&mut self.removed);
                self.effects.reset();
                self.params = SynthParams::default();
            }
        }
    }

    pub fn params(&self) -> &SynthParams {
        &self.params
    }

    pub fn pool(&self) -> &VoicePool {
        &self.pool
    }

    /// Voices dropped during the most recent render call.
    ///
    /// Holds at most `queue_capacity + max_voices` ids; the rest of an
    /// oversized burst is not reported.
    pub fn removed(&self) -> &[VoiceId] {
        &self.removed
    }

    pub fn active_voices(&self) -> usize {
        self.pool.len()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn buffer_size(&self) -> usize {
        self.block_size
    }

    /// Frames rendered since the engine was created.
    pub fn frame_position(&self) -> u64 {
        self.frame_counter
    }
}
