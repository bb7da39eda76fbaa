//! Criterion benchmarks for cmi-core.
//!
//! The per-sample cost is what matters on the device: `input` runs inside the
//! echo interrupt, so it has to finish well before the next measurement.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use cmi_core::{
    ConstDeltaConfig, EchoTicks, Interpreter, MovingAverage, RangeFinder, Smoother,
    WeightedAverage,
};

/// Near/far echo pattern with a little jitter, in 24.8 fixed point
fn samples(len: usize) -> Vec<u32> {
    let mut state = 0x2545_F491_u32;
    (0..len)
        .map(|i| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let center = if i % 4 == 3 { 0x0900 } else { 0x0300 };
            (center + state % 0x20) << 8
        })
        .collect()
}

fn bench_interpreter<const N: usize>(c: &mut Criterion, name: &str) {
    let samples = samples(1_000);
    c.bench_function(name, |bench| {
        let mut cmi: Interpreter<u32, _, N> = Interpreter::new(ConstDeltaConfig::ultrasonic());
        bench.iter(|| {
            for &sample in &samples {
                black_box(cmi.input(black_box(sample)));
            }
            black_box(cmi.output())
        });
    });
}

fn bench_channel_counts(c: &mut Criterion) {
    bench_interpreter::<2>(c, "interpreter_1000_samples_2_channels");
    bench_interpreter::<4>(c, "interpreter_1000_samples_4_channels");
    bench_interpreter::<8>(c, "interpreter_1000_samples_8_channels");
}

fn bench_smoother<S: Smoother<u32>>(c: &mut Criterion, name: &str, mut smoother: S) {
    let samples = samples(1_000);
    c.bench_function(name, |bench| {
        bench.iter(|| {
            for &sample in &samples {
                black_box(smoother.push(black_box(sample)));
            }
            black_box(smoother.output())
        });
    });
}

fn bench_smoothers(c: &mut Criterion) {
    bench_smoother(c, "weighted_average_1000_samples", WeightedAverage::default());
    bench_smoother(c, "moving_average_1000_samples", MovingAverage::firmware());
}

fn bench_range_cycle(c: &mut Criterion) {
    let readings: Vec<EchoTicks> = samples(1_000)
        .into_iter()
        .map(|sample| {
            let ticks = sample >> 8;
            EchoTicks::new((ticks >> 8) as u8, ticks as u8)
        })
        .collect();

    c.bench_function("range_cycle_1000_readings", |bench| {
        let mut finder = RangeFinder::new(Interpreter::<u32, _, 4>::new(ConstDeltaConfig::ultrasonic()));
        bench.iter(|| {
            for &reading in &readings {
                let _ = black_box(finder.process(black_box(reading)));
            }
        });
    });
}

criterion_group!(benches, bench_channel_counts, bench_smoothers, bench_range_cycle);
criterion_main!(benches);
