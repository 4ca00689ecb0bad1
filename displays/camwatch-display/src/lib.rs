//! Frame buffer and watch face renderer for camwatch
//!
//! This crate provides:
//! - `FrameBuffer`, a 1bpp buffer laid out the way the memory LCD takes it
//! - `Theme` colours for the face elements
//! - `render`, which draws a `FaceView` onto any `DrawTarget`
//! - `FaceSurface`, the `Surface` implementation used by the dispatcher
//!
//! # Architecture
//!
//! Rendering is generic over `embedded_graphics::DrawTarget`, so the same
//! code paints the on-device frame buffer and colour panels. The frame
//! buffer never talks to hardware; the firmware hands its bytes to the
//! LCD driver after each paint.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod framebuffer;
pub mod renderer;
pub mod theme;

// Re-export key types
pub use framebuffer::{FrameBuffer, FRAME_BYTES, HEIGHT, ROW_BYTES, WIDTH};
pub use renderer::{render, FaceSurface, TIME_FONT};
pub use theme::Theme;

#[cfg(test)]
mod tests {
    use super::*;
    use camwatch_core::app::{AppContext, Dispatcher};
    use camwatch_core::channel::Outbox;
    use camwatch_core::clock::ClockState;
    use camwatch_core::config::Layout;
    use camwatch_core::state::AppEvent;
    use camwatch_core::traits::{Haptics, MessageTransport, TransportError, VibePattern};
    use camwatch_protocol::{ButtonId, CommandCode, Dictionary, WatchMessage, KEY_CAM_ACTION_RESULT};

    #[derive(Default)]
    struct LoopbackTransport {
        outbox: Outbox<64>,
        sent: Vec<Dictionary>,
    }

    impl MessageTransport for LoopbackTransport {
        fn outbox_begin(&mut self) -> Result<(), TransportError> {
            self.outbox.begin()
        }

        fn outbox_buffer(&mut self) -> &mut [u8] {
            self.outbox.buffer()
        }

        fn outbox_send(&mut self, len: usize) -> Result<(), TransportError> {
            let bytes = self.outbox.take(len)?;
            let dict = Dictionary::from_bytes(bytes).map_err(|_| TransportError::Closed)?;
            self.sent.push(dict);
            Ok(())
        }

        fn outbox_abort(&mut self) {
            self.outbox.release();
        }
    }

    #[derive(Default)]
    struct RecordingHaptics(Vec<VibePattern>);

    impl Haptics for RecordingHaptics {
        fn vibrate(&mut self, pattern: VibePattern) {
            self.0.push(pattern);
        }
    }

    #[test]
    fn test_face_end_to_end() {
        let mut dispatcher = Dispatcher::new(
            AppContext::new(Layout::default()),
            LoopbackTransport::default(),
            RecordingHaptics::default(),
            FaceSurface::new(FrameBuffer::new(), Theme::monochrome()),
        );

        dispatcher.start(ClockState::new(14, 7).unwrap());
        assert!(dispatcher.repaint_if_dirty().painted);
        let at_1407 = dispatcher.surface().target().clone();

        // Repaint without a state change is pixel-identical
        dispatcher.dispatch(&AppEvent::RepaintRequested);
        assert_eq!(dispatcher.surface().target(), &at_1407);

        // Up starts the camera
        dispatcher.dispatch(&AppEvent::Button(ButtonId::Up));
        assert_eq!(
            WatchMessage::from_dictionary(&dispatcher.transport().sent[0]),
            Ok(WatchMessage::CamAction(CommandCode::Start))
        );

        // Companion reports success
        let reply = Dictionary::build(|w| w.write_uint8(KEY_CAM_ACTION_RESULT, 1)).unwrap();
        dispatcher.dispatch(&AppEvent::InboxReceived(reply));
        assert_eq!(dispatcher.haptics().0, vec![VibePattern::ShortPulse]);

        // Next minute changes only the time region
        dispatcher.dispatch(&AppEvent::MinuteTick(ClockState::new(14, 8).unwrap()));
        assert!(dispatcher.repaint_if_dirty().painted);
        let at_1408 = dispatcher.surface().target();
        assert_ne!(at_1408, &at_1407);

        let region = Layout::default().time_region;
        for y in 0..HEIGHT {
            if (region.y as usize..(region.y + region.height as i16) as usize).contains(&y) {
                continue;
            }
            assert_eq!(at_1408.row(y), at_1407.row(y), "row {} changed", y);
        }
    }
}
