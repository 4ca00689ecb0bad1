//! Vibration motor drivers

pub mod vibe;

pub use vibe::{VibeDriver, VibeMotor};
