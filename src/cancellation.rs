use std::sync::Arc;

use futures::{FutureExt, future};
use tokio::sync::watch;

/// Hierarchical cooperative cancellation token.
///
/// Cancellation flows downward only: cancelling a token cancels every
/// token derived from it via [`child`](CancellationToken::child), while a
/// child's own cancellation leaves its parent untouched. Observation is
/// cooperative: a control task notices cancellation the next time it is
/// scheduled, not synchronously with the [`cancel`](CancellationToken::cancel)
/// call.
///
/// Clones share the same cancellation state.
#[derive(Clone, Debug)]
pub struct CancellationToken {
    // Receivers for every ancestor's own flag, root first. A token is
    // cancelled once any ancestor flag or its own flag is set.
    ancestors: Arc<[watch::Receiver<bool>]>,
    sender: Arc<watch::Sender<bool>>,
    receiver: watch::Receiver<bool>,
}

impl CancellationToken {
    /// Create a new root token.
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(false);

        Self {
            ancestors: Vec::new().into(),
            sender: Arc::new(sender),
            receiver,
        }
    }

    /// Derive a child token.
    ///
    /// The child is cancelled when any of its ancestors is cancelled, or
    /// when it is cancelled itself.
    pub fn child(&self) -> Self {
        let (sender, receiver) = watch::channel(false);

        let mut ancestors = self.ancestors.to_vec();
        ancestors.push(self.receiver.clone());

        Self {
            ancestors: ancestors.into(),
            sender: Arc::new(sender),
            receiver,
        }
    }

    /// Signal cancellation. Idempotent; returns immediately.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    /// Whether this token or any of its ancestors has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow() || self.ancestors.iter().any(|ancestor| *ancestor.borrow())
    }

    /// Wait until this token is cancelled.
    ///
    /// An ancestor that is dropped without ever being cancelled can no
    /// longer cancel this token, so its branch parks instead of resolving.
    pub async fn cancelled(&self) {
        let mut flags = Vec::with_capacity(self.ancestors.len() + 1);
        flags.push(self.receiver.clone());
        flags.extend(self.ancestors.iter().cloned());

        let waits = flags.into_iter().map(|mut flag| {
            async move {
                if flag.wait_for(|cancelled| *cancelled).await.is_err() {
                    future::pending::<()>().await;
                }
            }
            .boxed()
        });

        future::select_all(waits).await;
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
