//! Camera commands out, results back in

use camwatch_protocol::{CommandCode, CommandResult, DictError, DictWriter, Dictionary};

use crate::traits::{MessageTransport, TransportError, VibePattern};

/// Errors from sending a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelError {
    /// The outbox could not be reserved
    OutboxUnavailable(TransportError),
    /// The command did not fit the outbox
    Encode(DictError),
    /// The transport refused the finished message
    SendRejected(TransportError),
}

impl From<DictError> for ChannelError {
    fn from(err: DictError) -> Self {
        ChannelError::Encode(err)
    }
}

/// Open outbox reservation, aborted on drop unless sent
struct OutboxGuard<'a, T: MessageTransport> {
    transport: &'a mut T,
    open: bool,
}

impl<'a, T: MessageTransport> OutboxGuard<'a, T> {
    fn begin(transport: &'a mut T) -> Result<Self, TransportError> {
        transport.outbox_begin()?;
        Ok(Self {
            transport,
            open: true,
        })
    }

    fn buffer(&mut self) -> &mut [u8] {
        self.transport.outbox_buffer()
    }

    fn send(mut self, len: usize) -> Result<(), TransportError> {
        self.open = false;
        self.transport.outbox_send(len)
    }
}

impl<T: MessageTransport> Drop for OutboxGuard<'_, T> {
    fn drop(&mut self) {
        if self.open {
            self.transport.outbox_abort();
        }
    }
}

/// Outbound half of the link to the companion
///
/// Commands are fire-and-forget. No retry, no queue, and no timeout on the
/// result; the result arrives later as an inbox message.
#[derive(Debug)]
pub struct CommandChannel<T: MessageTransport> {
    transport: T,
}

impl<T: MessageTransport> CommandChannel<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Send one `CamAction` message
    ///
    /// The outbox reservation is always released, also when encoding fails.
    pub fn send_command(&mut self, code: CommandCode) -> Result<(), ChannelError> {
        let mut guard =
            OutboxGuard::begin(&mut self.transport).map_err(ChannelError::OutboxUnavailable)?;

        let len = {
            let mut writer = DictWriter::new(guard.buffer())?;
            code.write_to(&mut writer)?;
            writer.finish()
        };

        guard.send(len).map_err(ChannelError::SendRejected)
    }
}

/// Vibration pattern acknowledging a command result
pub fn feedback_for(result: CommandResult) -> VibePattern {
    match result {
        CommandResult::Success => VibePattern::ShortPulse,
        CommandResult::Failure => VibePattern::DoublePulse,
    }
}

/// Interpret an inbox message as a command result
///
/// `None` when the message carries no `CamActionResult`.
pub fn result_feedback(dict: &Dictionary) -> Option<(CommandResult, VibePattern)> {
    CommandResult::from_dictionary(dict).map(|result| (result, feedback_for(result)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use camwatch_protocol::{WatchMessage, KEY_CAM_ACTION_RESULT};

    use crate::channel::Outbox;

    #[derive(Default)]
    struct MockTransport {
        outbox: Outbox<64>,
        sent: Vec<Vec<u8>>,
        fail_begin: Option<TransportError>,
        fail_send: Option<TransportError>,
        aborts: usize,
    }

    impl MessageTransport for MockTransport {
        fn outbox_begin(&mut self) -> Result<(), TransportError> {
            if let Some(err) = self.fail_begin {
                return Err(err);
            }
            self.outbox.begin()
        }

        fn outbox_buffer(&mut self) -> &mut [u8] {
            self.outbox.buffer()
        }

        fn outbox_send(&mut self, len: usize) -> Result<(), TransportError> {
            let bytes = self.outbox.take(len)?.to_vec();
            if let Some(err) = self.fail_send {
                return Err(err);
            }
            self.sent.push(bytes);
            Ok(())
        }

        fn outbox_abort(&mut self) {
            self.aborts += 1;
            self.outbox.release();
        }
    }

    fn decode(bytes: &[u8]) -> WatchMessage {
        WatchMessage::from_dictionary(&Dictionary::from_bytes(bytes).unwrap()).unwrap()
    }

    #[test]
    fn test_send_start() {
        let mut channel = CommandChannel::new(MockTransport::default());
        assert_eq!(channel.send_command(CommandCode::Start), Ok(()));

        let transport = channel.into_inner();
        assert_eq!(transport.sent.len(), 1);
        assert_eq!(
            decode(&transport.sent[0]),
            WatchMessage::CamAction(CommandCode::Start)
        );
        assert!(!transport.outbox.is_reserved());
    }

    #[test]
    fn test_send_stop() {
        let mut channel = CommandChannel::new(MockTransport::default());
        channel.send_command(CommandCode::Stop).unwrap();
        assert_eq!(
            decode(&channel.transport().sent[0]),
            WatchMessage::CamAction(CommandCode::Stop)
        );
    }

    #[test]
    fn test_begin_failure_sends_nothing() {
        let mut channel = CommandChannel::new(MockTransport {
            fail_begin: Some(TransportError::NotConnected),
            ..Default::default()
        });

        assert_eq!(
            channel.send_command(CommandCode::Start),
            Err(ChannelError::OutboxUnavailable(TransportError::NotConnected))
        );
        assert!(channel.transport().sent.is_empty());
        assert_eq!(channel.transport().aborts, 0);
    }

    #[test]
    fn test_send_rejected() {
        let mut channel = CommandChannel::new(MockTransport {
            fail_send: Some(TransportError::Busy),
            ..Default::default()
        });

        assert_eq!(
            channel.send_command(CommandCode::Stop),
            Err(ChannelError::SendRejected(TransportError::Busy))
        );
        assert!(!channel.transport().outbox.is_reserved());
        assert_eq!(channel.transport().aborts, 0);
    }

    #[test]
    fn test_encode_failure_aborts_reservation() {
        let mut channel = CommandChannel::new(MockTransport {
            outbox: Outbox::new(8),
            ..Default::default()
        });

        let result = channel.send_command(CommandCode::Start);
        assert!(matches!(result, Err(ChannelError::Encode(_))));
        assert_eq!(channel.transport().aborts, 1);
        assert!(!channel.transport().outbox.is_reserved());

        // Channel is usable again once the outbox is big enough
        channel.transport_mut().outbox = Outbox::new(64);
        assert_eq!(channel.send_command(CommandCode::Start), Ok(()));
    }

    #[test]
    fn test_repeated_sends() {
        let mut channel = CommandChannel::new(MockTransport::default());
        for _ in 0..3 {
            channel.send_command(CommandCode::Start).unwrap();
        }
        assert_eq!(channel.transport().sent.len(), 3);
    }

    #[test]
    fn test_result_feedback() {
        let ok = Dictionary::build(|w| w.write_uint8(KEY_CAM_ACTION_RESULT, 1)).unwrap();
        assert_eq!(
            result_feedback(&ok),
            Some((CommandResult::Success, VibePattern::ShortPulse))
        );

        let failed = Dictionary::build(|w| w.write_uint8(KEY_CAM_ACTION_RESULT, 0)).unwrap();
        assert_eq!(
            result_feedback(&failed),
            Some((CommandResult::Failure, VibePattern::DoublePulse))
        );

        let other = Dictionary::build(|w| w.write_cstring(7, "hello")).unwrap();
        assert_eq!(result_feedback(&other), None);
    }
}
