#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![forbid(unsafe_code)]

#[cfg(not(any(feature = "rt-tokio", feature = "rt-smol")))]
compile_error!("either the `rt-tokio` or the `rt-smol` feature must be enabled");

mod cancellation;
pub use cancellation::*;

mod common;
pub use common::MaxWait;

mod debounce;
pub use debounce::*;

mod error;
pub use error::*;

mod runtime;

mod throttle;
pub use throttle::*;

mod trigger;
pub use trigger::*;

#[cfg(test)]
mod tests;
