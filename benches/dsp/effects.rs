//! Benchmarks for the effect processors and the full chain.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use keytone::effects::{
    delay::Echo, reverb::EarlyReflections, tremolo::Tremolo, EffectsChain, EffectsConfig,
    MAX_DELAY_SECONDS,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_effects(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/effects");
    let mut config = EffectsConfig::default();
    config.tremolo.enabled = true;
    config.delay.enabled = true;
    config.reverb.enabled = true;

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin() * 0.5).collect();
        let mut buffer = input.clone();

        let mut tremolo = Tremolo::new();
        let mut frame = 0u64;
        group.bench_with_input(BenchmarkId::new("tremolo", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                tremolo.process(black_box(&mut buffer), &config.tremolo, frame, SAMPLE_RATE);
                frame += size as u64;
            })
        });

        let mut echo = Echo::new(SAMPLE_RATE, MAX_DELAY_SECONDS);
        group.bench_with_input(BenchmarkId::new("echo", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                echo.process(black_box(&mut buffer), &config.delay, SAMPLE_RATE);
            })
        });

        let mut reverb = EarlyReflections::new(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("reverb", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                reverb.process(black_box(&mut buffer), &config.reverb);
            })
        });

        let mut chain = EffectsChain::new(SAMPLE_RATE);
        let mut frame = 0u64;
        group.bench_with_input(BenchmarkId::new("chain", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                chain.process(black_box(&mut buffer), &config, frame);
                frame += size as u64;
            })
        });
    }

    group.finish();
}
