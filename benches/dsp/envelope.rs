//! Benchmarks for the ADSR envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use keytone::dsp::{Envelope, EnvelopeParams};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack phase (ramping up), long enough to last the whole bench
        let mut env = Envelope::new(EnvelopeParams::new(1_000.0, 0.1, 0.7, 0.3), SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| env.render(black_box(&mut buffer)))
        });

        // Sustain phase (holding steady)
        let mut env = Envelope::new(EnvelopeParams::new(0.01, 0.01, 0.7, 0.3), SAMPLE_RATE);
        for _ in 0..2_000 {
            env.next_sample();
        }
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| env.render(black_box(&mut buffer)))
        });

        // Release phase (ramping down)
        let mut env = Envelope::new(EnvelopeParams::new(0.01, 0.01, 0.7, 1_000.0), SAMPLE_RATE);
        for _ in 0..2_000 {
            env.next_sample();
        }
        env.release();
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| env.render(black_box(&mut buffer)))
        });
    }

    group.finish();
}
