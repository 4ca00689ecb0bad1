//! Effect dispatcher
//!
//! Owns the application context and its collaborators. Events go in one at
//! a time; each call returns a [`DispatchReport`] describing what was done,
//! which the caller may log. Nothing in here blocks or panics on a failed
//! send.

use camwatch_protocol::{CommandResult, Dictionary};

use super::context::{AppContext, Effect};
use crate::channel::{ChannelError, CommandChannel};
use crate::clock::ClockState;
use crate::state::AppEvent;
use crate::traits::{Haptics, MessageTransport, Surface, VibePattern};

/// Outcome of dispatching one event
///
/// `E` is the paint error of the surface in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DispatchReport<E> {
    /// Result of sending a command, if one was sent
    pub sent: Option<Result<(), ChannelError>>,
    /// Command result received from the companion
    pub result: Option<CommandResult>,
    /// Pattern started on the motor
    pub vibrated: Option<VibePattern>,
    /// The screen should be repainted
    pub repaint_requested: bool,
    /// A frame was painted
    pub painted: bool,
    /// Painting failed with this error; the frame stays dirty
    pub paint_error: Option<E>,
}

impl<E> Default for DispatchReport<E> {
    fn default() -> Self {
        Self {
            sent: None,
            result: None,
            vibrated: None,
            repaint_requested: false,
            painted: false,
            paint_error: None,
        }
    }
}

impl<E> DispatchReport<E> {
    /// Returns true if nothing happened
    pub fn is_empty(&self) -> bool {
        self.sent.is_none()
            && self.result.is_none()
            && self.vibrated.is_none()
            && !self.repaint_requested
            && !self.painted
            && self.paint_error.is_none()
    }
}

/// Runs the watch face against real or simulated collaborators
pub struct Dispatcher<T: MessageTransport, H: Haptics, S: Surface> {
    context: AppContext,
    channel: CommandChannel<T>,
    haptics: H,
    surface: S,
}

impl<T: MessageTransport, H: Haptics, S: Surface> Dispatcher<T, H, S> {
    pub fn new(context: AppContext, transport: T, haptics: H, surface: S) -> Self {
        Self {
            context,
            channel: CommandChannel::new(transport),
            haptics,
            surface,
        }
    }

    /// Deliver the first clock reading
    pub fn start(&mut self, now: ClockState) -> DispatchReport<S::Error> {
        self.dispatch(&AppEvent::Started(now))
    }

    /// Handle one event and carry out its effects
    pub fn dispatch(&mut self, event: &AppEvent) -> DispatchReport<S::Error> {
        let effects = self.context.handle(event);
        let mut report = DispatchReport::default();

        for effect in effects {
            match effect {
                Effect::SendCommand(code) => {
                    report.sent = Some(self.channel.send_command(code));
                }
                Effect::Vibrate(pattern) => {
                    self.haptics.vibrate(pattern);
                    report.vibrated = Some(pattern);
                    if let AppEvent::InboxReceived(dict) = event {
                        report.result = CommandResult::from_dictionary(dict);
                    }
                }
                Effect::RequestRepaint => report.repaint_requested = true,
                Effect::Paint => self.paint(&mut report),
            }
        }

        report
    }

    /// Handle a message from the companion
    ///
    /// Returns the command result it carried, if any.
    pub fn on_command_result(&mut self, dict: Dictionary) -> Option<CommandResult> {
        self.dispatch(&AppEvent::InboxReceived(dict)).result
    }

    /// Paint if the screen is out of date
    pub fn repaint_if_dirty(&mut self) -> DispatchReport<S::Error> {
        if self.context.is_dirty() {
            self.dispatch(&AppEvent::RepaintRequested)
        } else {
            DispatchReport::default()
        }
    }

    fn paint(&mut self, report: &mut DispatchReport<S::Error>) {
        match self.surface.paint(&self.context.view()) {
            Ok(()) => {
                self.context.mark_clean();
                report.painted = true;
            }
            Err(e) => report.paint_error = Some(e),
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub fn transport(&self) -> &T {
        self.channel.transport()
    }

    pub fn transport_mut(&mut self) -> &mut T {
        self.channel.transport_mut()
    }

    pub fn haptics(&self) -> &H {
        &self.haptics
    }

    pub fn haptics_mut(&mut self) -> &mut H {
        &mut self.haptics
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
