use std::{sync::Arc, time::Duration};

use crate::{QuiesceError, runtime::spawn_task};

/// Upper bound on how long a debounce may delay an invocation.
///
/// Either a non-zero [`Duration`] or the unbounded sentinel. Unbounded is
/// the default: the ceiling timer is simply never armed, so there is no
/// far-future deadline to overflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaxWait(Option<Duration>);

impl MaxWait {
    /// The disabled ceiling: a burst may be postponed indefinitely.
    pub const fn unbounded() -> Self {
        Self(None)
    }

    /// The configured ceiling, or `None` when unbounded.
    pub fn as_duration(&self) -> Option<Duration> {
        self.0
    }
}

impl Default for MaxWait {
    /// Returns the unbounded sentinel.
    fn default() -> Self {
        Self::unbounded()
    }
}

impl TryFrom<Duration> for MaxWait {
    type Error = QuiesceError;

    fn try_from(value: Duration) -> Result<Self, Self::Error> {
        if value.is_zero() {
            Err(QuiesceError::InvalidMaxWait(
                "Max wait must be greater than zero".to_string(),
            ))
        } else {
            Ok(Self(Some(value)))
        }
    }
}

/// Run the wrapped callback on a detached task.
///
/// The control task never awaits the callback, so a slow callback can
/// overlap with a later dispatch; no mutual exclusion is provided.
pub(crate) fn dispatch_detached<F>(callback: &Arc<F>)
where
    F: Fn() + Send + Sync + 'static,
{
    let callback = Arc::clone(callback);
    spawn_task(async move { callback() });
}
