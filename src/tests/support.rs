use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use super::runtime::async_sleep;

/// A callback that counts its invocations.
pub(super) fn counted_callback() -> (Arc<AtomicU64>, impl Fn() + Send + Sync + 'static) {
    let counter = Arc::new(AtomicU64::new(0));
    let callback = {
        let counter = counter.clone();
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    };

    (counter, callback)
}

pub(super) fn count(counter: &Arc<AtomicU64>) -> u64 {
    counter.load(Ordering::SeqCst)
}

/// Poll until `condition` holds, panicking after `timeout`.
pub(super) async fn eventually(timeout: Duration, mut condition: impl FnMut() -> bool) {
    let start = Instant::now();
    loop {
        if condition() {
            return;
        }
        if start.elapsed() >= timeout {
            panic!("condition not met within {timeout:?}");
        }
        async_sleep(POLL).await;
    }
}

/// Poll for the whole `span`, panicking as soon as `condition` holds.
pub(super) async fn never(span: Duration, mut condition: impl FnMut() -> bool) {
    let start = Instant::now();
    while start.elapsed() < span {
        if condition() {
            panic!("condition unexpectedly met within {span:?}");
        }
        async_sleep(POLL).await;
    }
}

const POLL: Duration = Duration::from_millis(20);
