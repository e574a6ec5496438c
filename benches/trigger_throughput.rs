use criterion::{Criterion, criterion_group, criterion_main};

// The bench driver needs a concrete runtime to block on; keep it buildable
// only under the tokio flavor and stub it out otherwise.
#[cfg(all(feature = "rt-tokio", not(feature = "rt-smol")))]
mod enabled {
    use std::time::Duration;

    use criterion::Criterion;
    use std::hint::black_box;

    use quiesce::{DebounceOptions, ThrottleOptions, debounce, throttle};

    pub fn bench_throttle_trigger(c: &mut Criterion) {
        let mut group = c.benchmark_group("throttle/trigger");
        group.sample_size(200);

        let rt = tokio::runtime::Runtime::new().unwrap();

        group.bench_function("inside_window", |b| {
            // A long window: every measured trigger lands inside it, so
            // this isolates the rendezvous round-trip.
            let (trigger, canceller) = rt
                .block_on(async {
                    throttle(|| {}, Duration::from_secs(3600), ThrottleOptions::default())
                })
                .unwrap();

            b.iter(|| {
                rt.block_on(black_box(&trigger).trigger());
            });

            canceller.cancel();
        });

        group.finish();
    }

    pub fn bench_debounce_trigger(c: &mut Criterion) {
        let mut group = c.benchmark_group("debounce/trigger");
        group.sample_size(200);

        let rt = tokio::runtime::Runtime::new().unwrap();

        group.bench_function("inside_burst", |b| {
            let (trigger, canceller) = rt
                .block_on(async {
                    debounce(|| {}, Duration::from_secs(3600), DebounceOptions::default())
                })
                .unwrap();

            b.iter(|| {
                rt.block_on(black_box(&trigger).trigger());
            });

            canceller.cancel();
        });

        group.finish();
    }
}

#[cfg(all(feature = "rt-tokio", not(feature = "rt-smol")))]
fn bench_throttle_trigger(c: &mut Criterion) {
    enabled::bench_throttle_trigger(c)
}

#[cfg(not(all(feature = "rt-tokio", not(feature = "rt-smol"))))]
fn bench_throttle_trigger(_: &mut Criterion) {}

#[cfg(all(feature = "rt-tokio", not(feature = "rt-smol")))]
fn bench_debounce_trigger(c: &mut Criterion) {
    enabled::bench_debounce_trigger(c)
}

#[cfg(not(all(feature = "rt-tokio", not(feature = "rt-smol"))))]
fn bench_debounce_trigger(_: &mut Criterion) {}

criterion_group!(benches, bench_throttle_trigger, bench_debounce_trigger);
criterion_main!(benches);
