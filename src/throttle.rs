use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use futures::{
    future::{self, Either},
    pin_mut,
};
use tokio::sync::mpsc;

use crate::{
    CancellationToken, QuiesceError, Trigger,
    common::dispatch_detached,
    runtime::{OneshotTimer, spawn_task},
    trigger::{TriggerSignal, next_signal},
};

/// Configuration for [`throttle`].
#[derive(Clone, Debug)]
pub struct ThrottleOptions {
    /// Invoke the callback at the start of a window.
    pub leading: bool,
    /// Invoke the callback at the end of a window.
    pub trailing: bool,
    /// Parent cancellation scope the wrapper's own token is derived from.
    ///
    /// Cancelling the parent tears the wrapper down too.
    pub scope: Option<CancellationToken>,
}

impl Default for ThrottleOptions {
    /// Trailing edge only, no parent scope.
    fn default() -> Self {
        Self {
            leading: false,
            trailing: true,
            scope: None,
        }
    }
}

enum Event {
    Cancelled,
    Trigger(TriggerSignal),
    Heartbeat,
}

/// Create a throttled wrapper around `callback`.
///
/// The callback is invoked at most once per `wait` window, no matter how
/// densely [`Trigger::trigger`] is called. Window boundaries come from a
/// periodic heartbeat that is independent of trigger timing, which is what
/// bounds the invocation rate under continuous triggering.
///
/// Returns the trigger handle and the wrapper's cancellation token.
/// Cancelling the token flushes one invocation if any triggers are
/// pending, then stops the control task for good.
///
/// # Errors
///
/// Fails with [`QuiesceError::InvalidWait`] when `wait` is zero.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
///
/// use quiesce::{ThrottleOptions, throttle};
///
/// #[tokio::main]
/// async fn main() -> Result<(), quiesce::QuiesceError> {
///     let (trigger, canceller) = throttle(
///         || println!("refresh"),
///         Duration::from_secs(1),
///         ThrottleOptions::default(),
///     )?;
///
///     trigger.trigger().await;
///     canceller.cancel();
///     Ok(())
/// }
/// ```
pub fn throttle<F>(
    callback: F,
    wait: Duration,
    options: ThrottleOptions,
) -> Result<(Trigger, CancellationToken), QuiesceError>
where
    F: Fn() + Send + Sync + 'static,
{
    if wait.is_zero() {
        return Err(QuiesceError::InvalidWait(
            "Wait must be greater than zero".to_string(),
        ));
    }

    let token = match &options.scope {
        Some(parent) => parent.child(),
        None => CancellationToken::new(),
    };

    let (tx, mut rx) = mpsc::channel::<TriggerSignal>(1);
    let callback = Arc::new(callback);
    let actor_token = token.clone();

    spawn_task(async move {
        let mut last_invoked: Option<Instant> = None;
        let mut pending: u64 = 0;
        let mut heartbeat = OneshotTimer::armed(wait);

        loop {
            let event = {
                let cancelled = actor_token.cancelled();
                let signal = next_signal(&mut rx);
                let beat = heartbeat.fired();

                pin_mut!(cancelled, signal, beat);

                match future::select(cancelled, future::select(signal, beat)).await {
                    Either::Left(((), _)) => Event::Cancelled,
                    Either::Right((Either::Left((signal, _)), _)) => Event::Trigger(signal),
                    Either::Right((Either::Right(((), _)), _)) => Event::Heartbeat,
                }
            };

            match event {
                Event::Trigger(signal) => {
                    pending += 1;

                    if let Some(opened) = last_invoked
                        && opened.elapsed() < wait
                    {
                        // Still inside the open window.
                    } else {
                        last_invoked = Some(Instant::now());

                        if options.leading {
                            tracing::trace!(pending, "leading dispatch");
                            dispatch_detached(&callback);
                        }
                    }

                    signal.complete();
                }
                Event::Heartbeat => {
                    heartbeat.rearm(wait);

                    if pending == 0 {
                        continue;
                    }

                    if !options.trailing {
                        pending = 0;
                        continue;
                    }

                    if options.leading {
                        // The single covered trigger was already serviced
                        // by the leading edge; a trailing call is owed only
                        // past that.
                        if pending > 1 {
                            pending = 0;
                            tracing::trace!("trailing dispatch");
                            dispatch_detached(&callback);
                        }
                        continue;
                    }

                    pending = 0;
                    tracing::trace!("trailing dispatch");
                    dispatch_detached(&callback);
                }
                Event::Cancelled => {
                    if pending > 0 {
                        tracing::debug!(pending, "flushing before shutdown");
                        dispatch_detached(&callback);
                    }

                    tracing::debug!("throttle control task stopped");
                    break;
                }
            }
        }
    });

    Ok((Trigger::new(tx), token))
} // end throttle
