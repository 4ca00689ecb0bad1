//! Reservable outbox buffer
//!
//! Bookkeeping shared by transport implementations: a fixed buffer, a
//! configurable size limit, and a reservation flag.

use crate::traits::TransportError;

/// Outbox storage with at most one reservation at a time
#[derive(Debug, Clone)]
pub struct Outbox<const N: usize> {
    buf: [u8; N],
    limit: usize,
    reserved: bool,
}

impl<const N: usize> Default for Outbox<N> {
    fn default() -> Self {
        Self::new(N)
    }
}

impl<const N: usize> Outbox<N> {
    /// Create an outbox that accepts messages up to `limit` bytes (capped at `N`)
    pub const fn new(limit: usize) -> Self {
        Self {
            buf: [0; N],
            limit: if limit < N { limit } else { N },
            reserved: false,
        }
    }

    /// Configured size limit
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Check whether a reservation is open
    pub fn is_reserved(&self) -> bool {
        self.reserved
    }

    /// Open a reservation
    pub fn begin(&mut self) -> Result<(), TransportError> {
        if self.reserved {
            return Err(TransportError::Busy);
        }
        self.reserved = true;
        Ok(())
    }

    /// Writable part of the buffer, empty without a reservation
    pub fn buffer(&mut self) -> &mut [u8] {
        if self.reserved {
            &mut self.buf[..self.limit]
        } else {
            &mut []
        }
    }

    /// Close the reservation and return the message bytes
    pub fn take(&mut self, len: usize) -> Result<&[u8], TransportError> {
        if !self.reserved {
            return Err(TransportError::Closed);
        }
        self.reserved = false;
        if len > self.limit {
            return Err(TransportError::BufferOverflow);
        }
        Ok(&self.buf[..len])
    }

    /// Close the reservation without taking anything
    pub fn release(&mut self) {
        self.reserved = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_reservation() {
        let mut outbox = Outbox::<16>::default();
        assert_eq!(outbox.begin(), Ok(()));
        assert_eq!(outbox.begin(), Err(TransportError::Busy));
        outbox.release();
        assert_eq!(outbox.begin(), Ok(()));
    }

    #[test]
    fn test_buffer_respects_limit() {
        let mut outbox = Outbox::<64>::new(12);
        assert!(outbox.buffer().is_empty());
        outbox.begin().unwrap();
        assert_eq!(outbox.buffer().len(), 12);
    }

    #[test]
    fn test_limit_capped_at_capacity() {
        let outbox = Outbox::<8>::new(100);
        assert_eq!(outbox.limit(), 8);
    }

    #[test]
    fn test_take_closes_reservation() {
        let mut outbox = Outbox::<16>::default();
        outbox.begin().unwrap();
        outbox.buffer()[..2].copy_from_slice(&[1, 2]);
        assert_eq!(outbox.take(2), Ok(&[1u8, 2][..]));
        assert!(!outbox.is_reserved());
        assert_eq!(outbox.take(2), Err(TransportError::Closed));
    }

    #[test]
    fn test_take_too_long() {
        let mut outbox = Outbox::<16>::new(4);
        outbox.begin().unwrap();
        assert_eq!(outbox.take(5), Err(TransportError::BufferOverflow));
        assert!(!outbox.is_reserved());
    }
}
