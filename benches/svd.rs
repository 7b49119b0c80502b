use criterion::{criterion_group, criterion_main, Criterion};

use singular::{Matrix, Svd};

// ---------------------------------------------------------------------------
// Helpers: well-conditioned dense fixtures of a given shape
// ---------------------------------------------------------------------------

fn dense(m: usize, n: usize) -> Matrix<f64> {
    Matrix::from_fn(m, n, |i, j| {
        (((i * n + j + 1) as f64) * 0.37).sin() + if i == j { 5.0 } else { 0.0 }
    })
}

// ---------------------------------------------------------------------------
// Full decomposition
// ---------------------------------------------------------------------------

fn decompose_square(c: &mut Criterion) {
    let mut g = c.benchmark_group("decompose_square");
    for n in [4usize, 8, 16, 32] {
        let a = dense(n, n);
        g.bench_function(format!("{}x{}", n, n), |b| {
            b.iter(|| Svd::decompose(std::hint::black_box(&a)))
        });
    }
    g.finish();
}

fn decompose_tall(c: &mut Criterion) {
    let mut g = c.benchmark_group("decompose_tall");
    for (m, n) in [(32usize, 8usize), (64, 16), (128, 16)] {
        let a = dense(m, n);
        g.bench_function(format!("{}x{}", m, n), |b| {
            b.iter(|| Svd::decompose(std::hint::black_box(&a)))
        });
    }
    g.finish();
}

// ---------------------------------------------------------------------------
// Values-only fast path vs full decomposition
// ---------------------------------------------------------------------------

fn values_only(c: &mut Criterion) {
    let mut g = c.benchmark_group("singular_values_only");
    for n in [8usize, 32] {
        let a = dense(n, n);
        g.bench_function(format!("{}x{}", n, n), |b| {
            b.iter(|| Svd::singular_values_only(std::hint::black_box(&a)))
        });
    }
    g.finish();
}

// ---------------------------------------------------------------------------
// Reconstruction
// ---------------------------------------------------------------------------

fn compose(c: &mut Criterion) {
    let mut g = c.benchmark_group("compose");
    let svd = Svd::decompose(&dense(32, 32));
    g.bench_function("32x32", |b| {
        b.iter(|| std::hint::black_box(&svd).compose())
    });
    g.finish();
}

criterion_group!(benches, decompose_square, decompose_tall, values_only, compose);
criterion_main!(benches);
