//! Command channel to the paired host
//!
//! Outbound: one `CamAction` tuple per button press, fire-and-forget.
//! Inbound: `CamActionResult` tuples, turned into a vibration pattern.

pub mod command;
pub mod outbox;

pub use command::{feedback_for, result_feedback, ChannelError, CommandChannel};
pub use outbox::Outbox;
