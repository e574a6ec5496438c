/// Error type for this crate.
///
/// All variants are construction-time failures; once a wrapper has been
/// built, its behavior is expressed purely through invocation timing.
#[derive(Debug, thiserror::Error)]
pub enum QuiesceError {
    /// The wait duration is unusable.
    #[error("invalid wait: {0}")]
    InvalidWait(String),
    /// The max-wait ceiling is unusable.
    #[error("invalid max wait: {0}")]
    InvalidMaxWait(String),
}
