use futures::future;
use tokio::sync::{mpsc, oneshot};

/// One trigger signal in flight, carrying its rendezvous acknowledgement.
pub(crate) struct TriggerSignal {
    accepted: oneshot::Sender<()>,
}

impl TriggerSignal {
    /// Release the waiting caller. Called by the control task once the
    /// signal has been applied to its state.
    pub(crate) fn complete(self) {
        let _ = self.accepted.send(());
    }
}

/// Producer-side handle of a throttle or debounce wrapper.
///
/// Cloneable and safe to share across tasks and threads; concurrent
/// triggers are serialized by the control task in arrival order.
#[derive(Clone)]
pub struct Trigger {
    tx: mpsc::Sender<TriggerSignal>,
}

impl Trigger {
    pub(crate) fn new(tx: mpsc::Sender<TriggerSignal>) -> Self {
        Self { tx }
    }

    /// Ask for the wrapped callback to eventually run.
    ///
    /// Suspends until the control task has accepted and applied the
    /// signal, so a slow or stalled control task stalls callers. After
    /// cancellation has torn the control task down this returns
    /// immediately without effect.
    pub async fn trigger(&self) {
        let (accepted, released) = oneshot::channel();

        if self.tx.send(TriggerSignal { accepted }).await.is_err() {
            return;
        }

        let _ = released.await;
    }
}

/// Receive the next trigger signal.
///
/// Once every [`Trigger`] handle has been dropped this parks forever
/// instead of resolving: the control task stays alive until its token is
/// cancelled, never torn down by handle drops alone.
pub(crate) async fn next_signal(rx: &mut mpsc::Receiver<TriggerSignal>) -> TriggerSignal {
    match rx.recv().await {
        Some(signal) => signal,
        None => future::pending().await,
    }
}
