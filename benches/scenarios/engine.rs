//! Benchmarks for complete engine ticks under polyphonic load.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use keytone::{io::midi_note_to_freq, Effect, EngineConfig, SynthController, Waveform};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

/// Voice counts to test (chord, busy passage, full pool)
const VOICE_COUNTS: &[usize] = &[1, 8, 32];

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for &voices in VOICE_COUNTS {
            for fx in [false, true] {
                let config = EngineConfig::default()
                    .with_sample_rate(SAMPLE_RATE)
                    .with_buffer_size(size);
                let mut controller = SynthController::new(config);
                let mut engine = controller.connect();

                controller.set_waveform(Waveform::Saw);
                // sustain forever so every iteration renders the same load
                controller.set_adsr(0.01, 0.01, 0.7, 0.5);
                for effect in Effect::CHAIN {
                    controller.toggle_effect(effect, fx);
                }
                for i in 0..voices {
                    controller.note_on(midi_note_to_freq(48 + i as u8), 0.8);
                }

                let name = if fx { "voices_fx" } else { "voices_dry" };
                group.bench_with_input(
                    BenchmarkId::new(format!("{name}_{voices}"), size),
                    &size,
                    |b, _| b.iter(|| engine.render_tick(black_box(&mut buffer))),
                );
            }
        }
    }

    group.finish();
}
