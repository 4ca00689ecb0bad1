//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use camwatch_core::state::AppEvent;
use camwatch_core::traits::VibePattern;
use camwatch_protocol::Packet;

/// Channel capacity for application events
const EVENT_CHANNEL_SIZE: usize = 8;

/// Channel capacity for outgoing link packets
const LINK_TX_CHANNEL_SIZE: usize = 4;

/// Events for the app task (clock, buttons, inbox, repaint)
pub static EVENT_CHANNEL: Channel<CriticalSectionRawMutex, AppEvent, EVENT_CHANNEL_SIZE> =
    Channel::new();

/// Packets waiting to be written to the companion link
pub static LINK_TX_CHANNEL: Channel<CriticalSectionRawMutex, Packet, LINK_TX_CHANNEL_SIZE> =
    Channel::new();

/// Vibration pattern to play (latest wins)
pub static VIBE_CMD: Signal<CriticalSectionRawMutex, VibePattern> = Signal::new();
