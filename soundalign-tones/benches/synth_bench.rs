//! Benchmarks for the tone synthesis pipeline
//!
//! A progress tone is rendered on the caller's thread, so rendering has to
//! stay far below the 100 ms tone length.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use soundalign_common::waveform::{TONE_SAWTOOTH, TONE_SINE, TONE_TRIANGLE};
use soundalign_common::Direction;
use soundalign_tones::synth::{render_progress_tone, synthesize, SynthesisParameters};

fn bench_synthesize(c: &mut Criterion) {
    let mut group = c.benchmark_group("synthesize");
    let base = SynthesisParameters::default();

    for (name, weights) in [
        ("sine", TONE_SINE),
        ("triangle", TONE_TRIANGLE),
        ("sawtooth", TONE_SAWTOOTH),
    ] {
        let params = base.with_harmonics(weights);
        group.bench_with_input(BenchmarkId::from_parameter(name), &params, |b, params| {
            b.iter(|| synthesize(black_box(935.0), params))
        });
    }

    group.finish();
}

fn bench_render_progress_tone(c: &mut Criterion) {
    let params = SynthesisParameters::default();
    c.bench_function("render_progress_tone", |b| {
        b.iter(|| render_progress_tone(black_box(Some(42.0)), Direction::LeftToRight, &params))
    });
}

criterion_group!(benches, bench_synthesize, bench_render_progress_tone);
criterion_main!(benches);
