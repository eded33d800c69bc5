use color_eyre::{
    eyre::{eyre, Result as EyreResult, WrapErr},
    Section,
};
use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    BufferSize, SampleFormat, SampleRate, StreamConfig,
};
use rtrb::{Consumer, RingBuffer};

use crate::{
    dsp::Waveform,
    effects::{Effect, EffectParam},
    synth::{SynthParams, VoiceId},
};

use super::{config::EngineConfig, controller::SynthController};

/*
Stream Lifecycle
================

    Synthesizer::new ──► stopped ──start()──► running ──stop()──► stopped
                            ▲                                        │
                            └────────────────────────────────────────┘

start() opens the default output device, builds a fresh SynthEngine from the
controller and moves it into the cpal data callback. stop() pauses and drops
the stream; dropping joins the callback, so the engine (and every voice in
it) goes away with it and no tick is left half written.

Parameters live in the controller's mirror, so they carry over to the next
start(). Voices do not.
*/

/// Owns the control API and, while running, the output stream.
pub struct Synthesizer {
    controller: SynthController,
    stream: Option<cpal::Stream>,
    monitor: Option<Consumer<f32>>,
    device_name: Option<String>,
}

impl Synthesizer {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            controller: SynthController::new(config),
            stream: None,
            monitor: None,
            device_name: None,
        }
    }

    /// Open the default output device and start rendering.
    ///
    /// Calling this while already running does nothing.
    pub fn start(&mut self) -> EyreResult<()> {
        if self.stream.is_some() {
            log::debug!("start() ignored, stream already running");
            return Ok(());
        }

        match self.open_stream() {
            Ok(()) => Ok(()),
            Err(err) => {
                self.controller.disconnect();
                self.monitor = None;
                Err(err)
            }
        }
    }

    fn open_stream(&mut self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))
            .with_note(device_list_note)?;
        let device_name = device.name().unwrap_or_else(|_| "<unnamed>".to_string());

        let stream_config = choose_config(&device, self.controller.config().sample_rate)
            .wrap_err_with(|| format!("failed to configure output device {device_name}"))
            .with_note(device_list_note)?;
        let channels = usize::from(stream_config.channels);
        self.controller
            .set_sample_rate(stream_config.sample_rate.0 as f32);

        let (monitor_tx, monitor_rx) = RingBuffer::new(self.controller.config().monitor_capacity);
        let mut engine = self.controller.connect().with_monitor(monitor_tx);

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _| engine.write_interleaved(data, channels),
                |err| log::error!("output stream error: {err}"),
                None,
            )
            .wrap_err_with(|| format!("failed to build output stream on {device_name}"))
            .with_note(device_list_note)?;

        stream
            .play()
            .wrap_err_with(|| format!("failed to start output stream on {device_name}"))
            .with_note(device_list_note)?;

        log::info!(
            "audio started on {device_name}: {} Hz, {channels} ch, {} frames per tick",
            stream_config.sample_rate.0,
            self.controller.config().buffer_size,
        );

        self.stream = Some(stream);
        self.monitor = Some(monitor_rx);
        self.device_name = Some(device_name);
        Ok(())
    }

    /// Silence output and release the device.
    ///
    /// Teardown always completes; a failure to pause is logged and returned.
    pub fn stop(&mut self) -> EyreResult<()> {
        let Some(stream) = self.stream.take() else {
            return Ok(());
        };

        let paused = stream.pause();
        drop(stream);

        self.controller.disconnect();
        self.monitor = None;
        let device_name = self.device_name.take().unwrap_or_default();

        match paused {
            Ok(()) => {
                log::info!("audio stopped on {device_name}");
                Ok(())
            }
            Err(err) => {
                log::error!("failed to pause output stream on {device_name}: {err}");
                Err(err)
                    .wrap_err_with(|| format!("failed to pause output stream on {device_name}"))
                    .with_note(device_list_note)
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.stream.is_some()
    }

    /// Name of the device the running stream plays on.
    pub fn device_name(&self) -> Option<&str> {
        self.device_name.as_deref()
    }

    /// Hand out the output monitor of the running stream (once per start).
    pub fn take_monitor(&mut self) -> Option<Consumer<f32>> {
        self.monitor.take()
    }

    pub fn controller(&self) -> &SynthController {
        &self.controller
    }

    pub fn note_event(&mut self, frequency: f32, on: bool, velocity: f32) -> Option<VoiceId> {
        self.controller.note_event(frequency, on, velocity)
    }

    pub fn note_on(&mut self, frequency: f32, velocity: f32) -> Option<VoiceId> {
        self.controller.note_on(frequency, velocity)
    }

    pub fn note_off(&mut self, id: VoiceId) {
        self.controller.note_off(id);
    }

    pub fn all_notes_off(&mut self) {
        self.controller.all_notes_off();
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.controller.set_waveform(waveform);
    }

    pub fn set_adsr(&mut self, attack: f32, decay: f32, sustain: f32, release: f32) {
        self.controller.set_adsr(attack, decay, sustain, release);
    }

    pub fn set_effect_param(&mut self, param: EffectParam, value: f32) {
        self.controller.set_effect_param(param, value);
    }

    pub fn set_effect_param_by_name(&mut self, effect: &str, param: &str, value: f32) -> bool {
        self.controller.set_effect_param_by_name(effect, param, value)
    }

    pub fn toggle_effect(&mut self, effect: Effect, enabled: bool) {
        self.controller.toggle_effect(effect, enabled);
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.controller.set_master_volume(volume);
    }

    pub fn reset(&mut self) {
        self.controller.reset();
    }

    pub fn active_voice_count(&self) -> usize {
        self.controller.active_voice_count()
    }

    pub fn params(&self) -> &SynthParams {
        self.controller.params()
    }
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Drop for Synthesizer {
    fn drop(&mut self) {
        // stop() has already logged any failure
        let _ = self.stop();
    }
}

/// Names of the output devices on the default host.
pub fn available_output_devices() -> Vec<String> {
    let host = cpal::default_host();
    match host.output_devices() {
        Ok(devices) => devices.filter_map(|device| device.name().ok()).collect(),
        Err(err) => {
            log::warn!("failed to enumerate output devices: {err}");
            Vec::new()
        }
    }
}

fn device_list_note() -> String {
    let devices = available_output_devices();
    if devices.is_empty() {
        "no output devices found".to_string()
    } else {
        format!("available output devices: {}", devices.join(", "))
    }
}

/// Pick an f32 stream config at the requested rate, or the device default.
fn choose_config(device: &cpal::Device, requested: f32) -> EyreResult<StreamConfig> {
    let wanted = SampleRate(requested.round() as u32);

    let matching = device
        .supported_output_configs()
        .wrap_err("failed to query supported output configs")?
        .filter(|range| range.sample_format() == SampleFormat::F32)
        .find(|range| range.min_sample_rate() <= wanted && wanted <= range.max_sample_rate());

    let supported = match matching {
        Some(range) => range.with_sample_rate(wanted),
        None => {
            let fallback = device
                .default_output_config()
                .wrap_err("failed to fetch default output config")?;
            if fallback.sample_format() != SampleFormat::F32 {
                let err = eyre!("unsupported output sample format {}", fallback.sample_format())
                    .note("only 32-bit float output streams are supported");
                return Err(err);
            }
            log::warn!(
                "{} Hz not supported by the device, using {} Hz",
                wanted.0,
                fallback.sample_rate().0
            );
            fallback
        }
    };

    let mut config = supported.config();
    config.buffer_size = BufferSize::Default;
    Ok(config)
}
