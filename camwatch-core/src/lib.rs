//! Board-agnostic core logic for the camwatch firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Wall-clock state and its "HH:MM" rendering
//! - Watch face state machine
//! - Application context: one pure handler per event, returning effects
//! - Command channel to the companion (outbox handling, result feedback)
//! - Dispatcher that applies effects to the transport, haptics and screen
//! - Collaborator traits and configuration types

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod app;
pub mod channel;
pub mod clock;
pub mod config;
pub mod state;
pub mod traits;
