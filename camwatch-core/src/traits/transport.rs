//! Outbound message transport

/// Errors reported by the message transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// A previous message is still being delivered
    Busy,
    /// No paired host is connected
    NotConnected,
    /// Message does not fit the outbox
    BufferOverflow,
    /// Transport was shut down
    Closed,
}

/// Trait for the size-limited outbound message channel
///
/// Sending is a scoped, two-step operation: `outbox_begin` reserves the
/// outbox, the caller writes a dictionary into `outbox_buffer`, then either
/// `outbox_send` submits it or `outbox_abort` releases the reservation.
/// Submission is non-blocking; delivery happens later, out of sight of the
/// caller.
pub trait MessageTransport {
    /// Reserve the outbox for one message
    fn outbox_begin(&mut self) -> Result<(), TransportError>;

    /// Scratch buffer of the reserved outbox
    ///
    /// Only meaningful between a successful `outbox_begin` and the matching
    /// `outbox_send`/`outbox_abort`; outside of that it is empty.
    fn outbox_buffer(&mut self) -> &mut [u8];

    /// Submit the first `len` bytes of the outbox buffer
    ///
    /// The reservation ends whether or not the transport accepts the message.
    fn outbox_send(&mut self, len: usize) -> Result<(), TransportError>;

    /// Release the reservation without sending
    fn outbox_abort(&mut self);
}
