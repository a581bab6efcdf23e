use criterion::{criterion_group, criterion_main, Criterion};
use dualexpr::Dual;
use std::hint::black_box;

// f(a, b, c) = a·b + b·exp(c) - a/c + (a+b)·(b+c), eagerly: every
// operator materializes an [f64; N].
fn poly_eager<const N: usize>(a: Dual<f64, N>, b: Dual<f64, N>, c: Dual<f64, N>) -> Dual<f64, N> {
    a * b + b * c.exp() - a / c + (a + b) * (b + c)
}

// Same function, lazily: one tree, one materialization.
fn poly_lazy<const N: usize>(a: &Dual<f64, N>, b: &Dual<f64, N>, c: &Dual<f64, N>) -> Dual<f64, N> {
    (a.expr() * b.expr() + b.expr() * c.expr().exp() - a.expr() / c.expr()
        + (a.expr() + b.expr()) * (b.expr() + c.expr()))
    .eval()
}

// Lazy with the shared subtrees' values memoized for the pass.
fn poly_lazy_cached<const N: usize>(
    a: &Dual<f64, N>,
    b: &Dual<f64, N>,
    c: &Dual<f64, N>,
) -> Dual<f64, N> {
    (a.expr() * b.expr() + b.expr() * c.expr().exp().cache_value() - a.expr() / c.expr()
        + (a.expr() + b.expr()).cache_value() * (b.expr() + c.expr()).cache_value())
    .eval()
}

fn bench_dim<const N: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("poly_n{}", N));

    let a = Dual::<f64, N>::variable(1.25, 0);
    let b = Dual::<f64, N>::variable(2.5, 1);
    let v = Dual::<f64, N>::variable(3.75, 2);

    group.bench_function("eager", |bench| {
        bench.iter(|| black_box(poly_eager(black_box(a), black_box(b), black_box(v))))
    });

    group.bench_function("lazy", |bench| {
        bench.iter(|| black_box(poly_lazy(black_box(&a), black_box(&b), black_box(&v))))
    });

    group.bench_function("lazy_cached", |bench| {
        bench.iter(|| black_box(poly_lazy_cached(black_box(&a), black_box(&b), black_box(&v))))
    });

    group.finish();
}

fn benches(c: &mut Criterion) {
    bench_dim::<4>(c);
    bench_dim::<16>(c);
    bench_dim::<64>(c);
}

criterion_group!(benches_group, benches);
criterion_main!(benches_group);
