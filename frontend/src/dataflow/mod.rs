//! Channel primitives behind the repaint trigger pipeline.
//!
//! Each trigger source owns a [`Relay`] and emits from exactly one place;
//! the wiring selects over the receiver streams and runs one refresh per
//! event. The primitives are plain `futures` channels, so they compile and
//! test on the host as well as in the browser.

pub mod relay;

pub use relay::{Relay, relay};
