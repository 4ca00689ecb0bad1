//! Events delivered by the event loop

use camwatch_protocol::{ButtonId, Dictionary};

use crate::clock::ClockState;

/// Events handled by the application, one at a time
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppEvent {
    /// First wall-clock reading at startup
    Started(ClockState),
    /// Minute boundary passed
    MinuteTick(ClockState),
    /// Single click on a button
    Button(ButtonId),
    /// Message arrived from the paired host
    InboxReceived(Dictionary),
    /// The screen wants a new frame
    RepaintRequested,
}

impl AppEvent {
    /// Check if this event is user-initiated
    pub fn is_user_event(&self) -> bool {
        matches!(self, AppEvent::Button(_))
    }

    /// Check if this event came from the paired host
    pub fn is_inbox_event(&self) -> bool {
        matches!(self, AppEvent::InboxReceived(_))
    }
}
