use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use ferrous_select::simd_abstraction::{
    Descriptor, Lane, Mask, SimdEngineType, Vector, detect_optimal_simd_engine,
};
use ferrous_select::verify::{self, Primitive, VerifyConfig};
use ferrous_select::{clamp_negative_to_zero, negate_if_sign_bit, select, select_by_sign_bit};

fn generate_random_lanes<T: Lane>(len: usize, seed: u64) -> Vec<T> {
    // Simple LCG random number generator for reproducible lanes
    let mut rng = seed;
    (0..len)
        .map(|_| {
            rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            T::from_bits(rng >> 7)
        })
        .collect()
}

/// Benchmark the primitives on full-width vectors of each engine
fn bench_primitives_by_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_f32");

    for engine in SimdEngineType::all() {
        let d = Descriptor::<f32>::full(engine);
        let n = d.lanes();
        let a = Vector::load(d, &generate_random_lanes::<f32>(n, 42));
        let b = Vector::load(d, &generate_random_lanes::<f32>(n, 123));
        let mask = Mask::from_fn(d, |i| i % 3 != 0);

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("select", engine.name()), &n, |bench, _| {
            bench.iter(|| select(black_box(mask), black_box(a), black_box(b)))
        });
        group.bench_with_input(
            BenchmarkId::new("select_by_sign_bit", engine.name()),
            &n,
            |bench, _| bench.iter(|| select_by_sign_bit(black_box(a), black_box(a), black_box(b))),
        );
        group.bench_with_input(
            BenchmarkId::new("clamp_negative_to_zero", engine.name()),
            &n,
            |bench, _| bench.iter(|| clamp_negative_to_zero(black_box(a))),
        );
        group.bench_with_input(
            BenchmarkId::new("negate_if_sign_bit", engine.name()),
            &n,
            |bench, _| bench.iter(|| negate_if_sign_bit(black_box(a), black_box(b))),
        );
    }

    group.finish();
}

/// Benchmark one full verification pass per primitive on the detected engine
fn bench_verification(c: &mut Criterion) {
    let config = VerifyConfig {
        reps: 16,
        rep_scale_percent: 100,
        ..VerifyConfig::default()
    }
    .with_engine(detect_optimal_simd_engine());

    let mut group = c.benchmark_group("verify");
    group.sample_size(10);

    for primitive in Primitive::ALL {
        group.bench_function(primitive.name(), |b| {
            b.iter(|| verify::run_primitive(black_box(primitive), &config).is_ok())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_primitives_by_engine, bench_verification);
criterion_main!(benches);
