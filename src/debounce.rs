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
    CancellationToken, MaxWait, QuiesceError, Trigger,
    common::dispatch_detached,
    runtime::{OneshotTimer, spawn_task},
    trigger::{TriggerSignal, next_signal},
};

/// Configuration for [`debounce`].
#[derive(Clone, Debug)]
pub struct DebounceOptions {
    /// Invoke the callback at the start of a burst.
    pub leading: bool,
    /// Invoke the callback once the burst has gone quiet.
    pub trailing: bool,
    /// Hard ceiling on delay since a burst began, enforced independently
    /// of quiescence. Unbounded by default.
    pub max_wait: MaxWait,
    /// Parent cancellation scope the wrapper's own token is derived from.
    ///
    /// Cancelling the parent tears the wrapper down too.
    pub scope: Option<CancellationToken>,
}

impl Default for DebounceOptions {
    /// Trailing edge only, unbounded ceiling, no parent scope.
    fn default() -> Self {
        Self {
            leading: false,
            trailing: true,
            max_wait: MaxWait::unbounded(),
            scope: None,
        }
    }
}

enum Event {
    Cancelled,
    Trigger(TriggerSignal),
    Quiet,
    Ceiling,
}

/// Create a debounced wrapper around `callback`.
///
/// Every trigger restarts a quiet-period countdown of `wait`; the callback
/// runs only once a full `wait` has passed with no triggers, so a dense
/// burst keeps postponing it. With a bounded `max_wait` a ceiling timer
/// races the quiet period and forces a flush even while the burst is still
/// going, so the delay since the first unhandled trigger stays bounded.
///
/// Returns the trigger handle and the wrapper's cancellation token.
/// Cancelling the token flushes one invocation if any triggers are
/// pending, then stops the control task for good.
///
/// # Errors
///
/// Fails with [`QuiesceError::InvalidWait`] when `wait` is zero, and with
/// [`QuiesceError::InvalidMaxWait`] when a bounded `max_wait` is shorter
/// than `wait`.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
///
/// use quiesce::{DebounceOptions, MaxWait, debounce};
///
/// #[tokio::main]
/// async fn main() -> Result<(), quiesce::QuiesceError> {
///     let options = DebounceOptions {
///         max_wait: MaxWait::try_from(Duration::from_secs(2))?,
///         ..DebounceOptions::default()
///     };
///
///     let (trigger, canceller) = debounce(
///         || println!("recompute"),
///         Duration::from_millis(400),
///         options,
///     )?;
///
///     trigger.trigger().await;
///     canceller.cancel();
///     Ok(())
/// }
/// ```
pub fn debounce<F>(
    callback: F,
    wait: Duration,
    options: DebounceOptions,
) -> Result<(Trigger, CancellationToken), QuiesceError>
where
    F: Fn() + Send + Sync + 'static,
{
    if wait.is_zero() {
        return Err(QuiesceError::InvalidWait(
            "Wait must be greater than zero".to_string(),
        ));
    }

    if let Some(ceiling_wait) = options.max_wait.as_duration()
        && ceiling_wait < wait
    {
        return Err(QuiesceError::InvalidMaxWait(
            "Max wait must be at least the wait duration".to_string(),
        ));
    }

    let token = match &options.scope {
        Some(parent) => parent.child(),
        None => CancellationToken::new(),
    };

    let (tx, mut rx) = mpsc::channel::<TriggerSignal>(1);
    let callback = Arc::new(callback);
    let actor_token = token.clone();
    let max_wait = options.max_wait;

    spawn_task(async move {
        let mut last_invoked: Option<Instant> = None;
        let mut pending: u64 = 0;
        let mut quiet = OneshotTimer::armed(wait);
        let mut ceiling = match max_wait.as_duration() {
            Some(ceiling_wait) => OneshotTimer::armed(ceiling_wait),
            None => OneshotTimer::unarmed(),
        };

        loop {
            let event = {
                let cancelled = actor_token.cancelled();
                let signal = next_signal(&mut rx);
                let quiet_fired = quiet.fired();
                let ceiling_fired = ceiling.fired();

                pin_mut!(cancelled, signal, quiet_fired, ceiling_fired);

                match future::select(
                    future::select(cancelled, signal),
                    future::select(quiet_fired, ceiling_fired),
                )
                .await
                {
                    Either::Left((Either::Left(((), _)), _)) => Event::Cancelled,
                    Either::Left((Either::Right((signal, _)), _)) => Event::Trigger(signal),
                    Either::Right((Either::Left(((), _)), _)) => Event::Quiet,
                    Either::Right((Either::Right(((), _)), _)) => Event::Ceiling,
                }
            };

            match event {
                Event::Trigger(signal) => {
                    pending += 1;
                    quiet.rearm(wait);

                    if let Some(opened) = last_invoked
                        && opened.elapsed() < wait
                    {
                        // Burst already open.
                    } else {
                        last_invoked = Some(Instant::now());

                        if options.leading {
                            if let Some(ceiling_wait) = max_wait.as_duration() {
                                ceiling.rearm(ceiling_wait);
                            }

                            tracing::trace!(pending, "leading dispatch");
                            dispatch_detached(&callback);
                        }
                    }

                    signal.complete();
                }
                Event::Quiet => {
                    if !options.trailing {
                        pending = 0;
                        continue;
                    }

                    if options.leading {
                        // A trailing call is owed only past the one trigger
                        // the leading edge covered.
                        if pending > 1 {
                            tracing::trace!(pending, "trailing dispatch");
                            dispatch_detached(&callback);
                        }
                        continue;
                    }

                    if pending > 0 {
                        tracing::trace!(pending, "trailing dispatch");
                        dispatch_detached(&callback);
                    }
                }
                Event::Ceiling => {
                    if pending > 0 {
                        tracing::trace!(pending, "ceiling flush");
                        dispatch_detached(&callback);
                    }

                    if let Some(ceiling_wait) = max_wait.as_duration() {
                        ceiling.rearm(ceiling_wait);
                    }
                }
                Event::Cancelled => {
                    if pending > 0 {
                        tracing::debug!(pending, "flushing before shutdown");
                        dispatch_detached(&callback);
                    }

                    tracing::debug!("debounce control task stopped");
                    break;
                }
            }
        }
    });

    Ok((Trigger::new(tx), token))
} // end debounce
