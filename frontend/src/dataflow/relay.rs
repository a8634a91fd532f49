//! Event streaming relay for the repaint trigger pipeline.
//!
//! Every repaint source (viewport listeners, the growth observer, the
//! deferred first-paint tasks) gets its own relay and the wiring's repaint
//! loop selects over the receiver streams. Unbounded channels keep emission
//! non-blocking inside DOM callbacks.

use futures::channel::mpsc::{unbounded, UnboundedSender, UnboundedReceiver};
use std::sync::{Arc, OnceLock};

/// Sender half of one trigger stream.
///
/// # Event-Source Naming Convention
///
/// Relays follow the `{source}_{event}_relay` pattern:
/// - `viewport_resized_relay` - window resize listener fired
/// - `field_edited_relay` - user typed into a textarea
/// - `fonts_settled_relay` - document fonts finished loading
///
/// In debug builds each relay enforces a single emit location, which keeps
/// the trigger-to-source mapping honest.
#[derive(Clone, Debug)]
pub struct Relay<T>
where
    T: Clone + Send + Sync + 'static,
{
    sender: UnboundedSender<T>,
    #[cfg(debug_assertions)]
    emit_location: Arc<OnceLock<&'static std::panic::Location<'static>>>,
}

/// Error type for Relay operations
#[derive(Debug, Clone)]
pub enum RelayError {
    /// The channel has been closed (receiver dropped)
    ChannelClosed,
    /// Relay send called from multiple locations (debug builds only)
    #[cfg(debug_assertions)]
    MultipleEmitters {
        previous: &'static std::panic::Location<'static>,
        current: &'static std::panic::Location<'static>,
    },
}

impl<T> Relay<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a new Relay with an associated receiver stream.
    ///
    /// Returns a `(Relay, UnboundedReceiver)` tuple following Rust's channel
    /// conventions. The `relay()` function is the shorter spelling.
    pub fn new() -> (Self, UnboundedReceiver<T>) {
        let (sender, receiver) = unbounded();
        (
            Relay {
                sender,
                #[cfg(debug_assertions)]
                emit_location: Arc::new(OnceLock::new()),
            },
            receiver,
        )
    }

    /// Check that this relay is only being sent from a single source location.
    #[cfg(debug_assertions)]
    #[track_caller]
    fn check_single_source(&self) -> Result<(), RelayError> {
        let caller = std::panic::Location::caller();
        match self.emit_location.set(caller) {
            Ok(()) => Ok(()), // First call, location set
            Err(previous) if previous == caller => Ok(()), // Same location, allowed
            Err(previous) => Err(RelayError::MultipleEmitters {
                previous,
                current: caller,
            }),
        }
    }

    /// Send an event through the relay.
    ///
    /// If the receiver has been dropped the event is silently discarded;
    /// use `try_send()` to observe that case. In debug builds, panics when
    /// the relay is sent from a second source location.
    #[track_caller]
    pub fn send(&self, value: T) {
        #[cfg(debug_assertions)]
        if let Err(error) = self.check_single_source() {
            panic!("{:?}", error);
        }

        // Dropped-receiver sends are expected during teardown
        let _ = self.sender.unbounded_send(value);
    }

    /// Send with explicit error handling.
    ///
    /// Returns an error if the channel has been closed (receiver dropped).
    /// In debug builds, also returns an error on a second source location
    /// instead of panicking.
    #[track_caller]
    pub fn try_send(&self, value: T) -> Result<(), RelayError> {
        #[cfg(debug_assertions)]
        self.check_single_source()?;

        self.sender
            .unbounded_send(value)
            .map_err(|_| RelayError::ChannelClosed)
    }
}

/// Creates a connected relay and receiver stream pair.
///
/// # Examples
///
/// ```
/// use frontend::dataflow::relay;
/// use futures::StreamExt;
///
/// # async fn demo() {
/// let (startup_relay, mut startup_stream) = relay::<()>();
/// startup_relay.send(());
/// assert_eq!(startup_stream.next().await, Some(()));
/// # }
/// ```
pub fn relay<T>() -> (Relay<T>, UnboundedReceiver<T>)
where
    T: Clone + Send + Sync + 'static,
{
    Relay::new()
}
