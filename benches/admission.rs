use criterion::{criterion_group, criterion_main, Criterion};
use std::time::Duration;
use turnstile::RateLimiter;

// Admission with capacity to spare: the head-of-queue fast path.
fn acquire_uncontended(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let limiter = RateLimiter::new(u32::MAX);

    c.bench_function("acquire_uncontended", |b| {
        b.iter(|| rt.block_on(async { limiter.acquire().await.unwrap() }))
    });
}

fn acquire_priority_uncontended(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let limiter = RateLimiter::new(u32::MAX);

    c.bench_function("acquire_priority_uncontended", |b| {
        b.iter(|| rt.block_on(async { limiter.acquire_priority(5).await.unwrap() }))
    });
}

// A full window with a zero deadline: register, one denied poll, timeout.
fn acquire_rejected(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let limiter = RateLimiter::new(0).with_timeout(Duration::ZERO);

    c.bench_function("acquire_rejected", |b| {
        b.iter(|| {
            rt.block_on(async {
                let _ = limiter.acquire().await;
            })
        })
    });
}

criterion_group!(
    benches,
    acquire_uncontended,
    acquire_priority_uncontended,
    acquire_rejected
);
criterion_main!(benches);
