//! Watch face state machine
//!
//! The face is either waiting for its first clock reading or running.
//! There is no pause, stop or resume; once ready it stays ready.

pub mod events;
pub mod machine;

pub use events::AppEvent;
pub use machine::FaceState;
