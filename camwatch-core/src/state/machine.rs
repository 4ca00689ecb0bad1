//! State machine definition

use super::events::AppEvent;

/// Face states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaceState {
    /// No clock reading yet; nothing to show, buttons and messages ignored
    #[default]
    Uninitialized,
    /// Clock running, commands accepted
    Ready,
}

impl FaceState {
    /// Check if the face has started
    pub fn is_ready(&self) -> bool {
        matches!(self, FaceState::Ready)
    }

    /// Process an event and return the next state
    ///
    /// The first clock reading moves the face to `Ready`. Nothing moves it
    /// back.
    pub fn transition(self, event: &AppEvent) -> Self {
        match (self, event) {
            (FaceState::Uninitialized, AppEvent::Started(_) | AppEvent::MinuteTick(_)) => {
                FaceState::Ready
            }
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ClockState;
    use camwatch_protocol::ButtonId;

    #[test]
    fn test_startup_to_ready() {
        let state = FaceState::default();
        assert_eq!(state, FaceState::Uninitialized);
        let next = state.transition(&AppEvent::Started(ClockState::MIDNIGHT));
        assert_eq!(next, FaceState::Ready);
    }

    #[test]
    fn test_tick_before_start_also_starts() {
        let next = FaceState::Uninitialized.transition(&AppEvent::MinuteTick(ClockState::MIDNIGHT));
        assert_eq!(next, FaceState::Ready);
    }

    #[test]
    fn test_other_events_do_not_start() {
        let events = [AppEvent::Button(ButtonId::Up), AppEvent::RepaintRequested];
        for event in events {
            assert_eq!(
                FaceState::Uninitialized.transition(&event),
                FaceState::Uninitialized
            );
        }
    }

    #[test]
    fn test_ready_is_terminal() {
        let events = [
            AppEvent::Started(ClockState::MIDNIGHT),
            AppEvent::MinuteTick(ClockState::MIDNIGHT),
            AppEvent::Button(ButtonId::Down),
            AppEvent::RepaintRequested,
        ];
        for event in events {
            assert_eq!(FaceState::Ready.transition(&event), FaceState::Ready);
        }
    }
}
