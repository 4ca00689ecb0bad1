//! Companion link transport
//!
//! Bridges the dispatcher's outbox to the UART link: a finished outbox
//! dictionary becomes a push packet queued for the link TX task.

use embassy_sync::channel::TrySendError;

use camwatch_core::channel::Outbox;
use camwatch_core::traits::{MessageTransport, TransportError};
use camwatch_protocol::{Packet, MAX_DICT_SIZE};

use crate::channels::LINK_TX_CHANNEL;

/// Outbound message transport over the UART link
pub struct LinkTransport {
    outbox: Outbox<MAX_DICT_SIZE>,
    /// Transaction id of the next push
    next_txn: u8,
}

impl LinkTransport {
    /// Create a transport whose outbox holds `outbox_size` bytes
    pub fn new(outbox_size: usize) -> Self {
        Self {
            outbox: Outbox::new(outbox_size),
            next_txn: 0,
        }
    }
}

impl MessageTransport for LinkTransport {
    fn outbox_begin(&mut self) -> Result<(), TransportError> {
        self.outbox.begin()
    }

    fn outbox_buffer(&mut self) -> &mut [u8] {
        self.outbox.buffer()
    }

    fn outbox_send(&mut self, len: usize) -> Result<(), TransportError> {
        let bytes = self.outbox.take(len)?;
        let packet = Packet::push(self.next_txn, bytes).map_err(|_| TransportError::BufferOverflow)?;

        match LINK_TX_CHANNEL.try_send(packet) {
            Ok(()) => {
                self.next_txn = self.next_txn.wrapping_add(1);
                Ok(())
            }
            Err(TrySendError::Full(_)) => Err(TransportError::Busy),
        }
    }

    fn outbox_abort(&mut self) {
        self.outbox.release();
    }
}
