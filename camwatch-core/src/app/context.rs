//! Application context
//!
//! Holds everything the face knows between events. Each event is handled
//! by one call to [`AppContext::handle`], which updates the context and
//! returns the side effects to perform. The context itself never touches
//! hardware.

use camwatch_protocol::CommandCode;
use heapless::Vec;

use crate::channel::result_feedback;
use crate::clock::{ClockState, FormattedTime};
use crate::config::Layout;
use crate::state::{AppEvent, FaceState};
use crate::traits::{FaceView, VibePattern};

/// Upper bound on effects produced by one event
pub const MAX_EFFECTS: usize = 2;

/// Side effect requested by the context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Effect {
    /// Send a camera command to the companion
    SendCommand(CommandCode),
    /// Run a vibration pattern
    Vibrate(VibePattern),
    /// Ask the screen for a new frame
    RequestRepaint,
    /// Paint the current view now
    Paint,
}

/// Effects of a single event, in execution order
pub type Effects = Vec<Effect, MAX_EFFECTS>;

fn single(effect: Effect) -> Effects {
    let mut effects = Effects::new();
    // Capacity is at least one
    let _ = effects.push(effect);
    effects
}

/// Watch face application state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppContext {
    state: FaceState,
    clock: ClockState,
    time_text: FormattedTime,
    dirty: bool,
    layout: Layout,
}

impl AppContext {
    /// Create a context waiting for its first clock reading
    pub fn new(layout: Layout) -> Self {
        Self {
            state: FaceState::Uninitialized,
            clock: ClockState::MIDNIGHT,
            time_text: FormattedTime::default(),
            dirty: false,
            layout,
        }
    }

    /// Handle one event
    pub fn handle(&mut self, event: &AppEvent) -> Effects {
        let ready = self.state.is_ready();
        self.state = self.state.transition(event);

        match event {
            AppEvent::Started(now) | AppEvent::MinuteTick(now) => {
                self.set_clock(*now);
                single(Effect::RequestRepaint)
            }
            AppEvent::Button(button) if ready => match button.command() {
                Some(code) => single(Effect::SendCommand(code)),
                None => Effects::new(),
            },
            AppEvent::InboxReceived(dict) if ready => match result_feedback(dict) {
                Some((_, pattern)) => single(Effect::Vibrate(pattern)),
                None => Effects::new(),
            },
            AppEvent::RepaintRequested if ready => single(Effect::Paint),
            _ => Effects::new(),
        }
    }

    fn set_clock(&mut self, now: ClockState) {
        self.clock = now;
        self.time_text = now.format();
        self.dirty = true;
    }

    pub fn state(&self) -> FaceState {
        self.state
    }

    pub fn clock(&self) -> ClockState {
        self.clock
    }

    /// Current "HH:MM" text
    pub fn time_text(&self) -> &str {
        self.time_text.as_str()
    }

    /// Returns true if the screen shows an outdated frame
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// What a repaint should draw
    pub fn view(&self) -> FaceView<'_> {
        FaceView {
            time_text: self.time_text.as_str(),
            layout: &self.layout,
        }
    }

    /// Record that the current view is on screen
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}
