//! Structured diagnostics that disappear when the `tracing` feature is off.
//!
//! With the feature enabled the macros are re-exported from `tracing`;
//! otherwise they expand to nothing, so their arguments are never evaluated.

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, trace};

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use {debug, trace};
