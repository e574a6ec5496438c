use std::future::Future;
use std::time::Duration;

#[cfg(feature = "rt-tokio")]
pub(crate) fn spawn_task<F>(fut: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(fut);
}

#[cfg(all(feature = "rt-smol", not(feature = "rt-tokio")))]
pub(crate) fn spawn_task<F>(fut: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    smol::spawn(fut).detach();
}

/// A re-armable one-shot timer.
///
/// `fired` resolves at most once per arming and parks while the timer is
/// unarmed, so an exhausted timer never spins a select loop. Dropping a
/// pending `fired` future leaves the deadline untouched.
#[cfg(feature = "rt-tokio")]
pub(crate) struct OneshotTimer {
    sleep: std::pin::Pin<Box<tokio::time::Sleep>>,
    armed: bool,
}

#[cfg(feature = "rt-tokio")]
impl OneshotTimer {
    pub fn armed(after: Duration) -> Self {
        Self {
            sleep: Box::pin(tokio::time::sleep(after)),
            armed: true,
        }
    }

    pub fn unarmed() -> Self {
        Self {
            sleep: Box::pin(tokio::time::sleep(Duration::ZERO)),
            armed: false,
        }
    }

    pub fn rearm(&mut self, after: Duration) {
        let now = tokio::time::Instant::now();
        let deadline = now
            .checked_add(after)
            .unwrap_or_else(|| now + FAR_FUTURE_FALLBACK);

        self.sleep.as_mut().reset(deadline);
        self.armed = true;
    }

    pub async fn fired(&mut self) {
        if !self.armed {
            futures::future::pending::<()>().await;
        }

        self.sleep.as_mut().await;
        self.armed = false;
    }
}

#[cfg(all(feature = "rt-smol", not(feature = "rt-tokio")))]
pub(crate) struct OneshotTimer {
    timer: smol::Timer,
    armed: bool,
}

#[cfg(all(feature = "rt-smol", not(feature = "rt-tokio")))]
impl OneshotTimer {
    pub fn armed(after: Duration) -> Self {
        Self {
            timer: smol::Timer::after(after),
            armed: true,
        }
    }

    pub fn unarmed() -> Self {
        Self {
            timer: smol::Timer::never(),
            armed: false,
        }
    }

    pub fn rearm(&mut self, after: Duration) {
        self.timer.set_after(after);
        self.armed = true;
    }

    pub async fn fired(&mut self) {
        if !self.armed {
            futures::future::pending::<()>().await;
        }

        (&mut self.timer).await;
        self.timer = smol::Timer::never();
        self.armed = false;
    }
}

// Arming deadlines saturate here instead of overflowing the clock.
#[cfg(feature = "rt-tokio")]
const FAR_FUTURE_FALLBACK: Duration = Duration::from_secs(86_400 * 365 * 30);
