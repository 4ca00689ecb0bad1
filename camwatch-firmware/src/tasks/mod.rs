//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod app;
pub mod buttons;
pub mod link_rx;
pub mod link_tx;
pub mod tick;
pub mod vibe;

pub use app::{app_task, AppResources};
pub use buttons::button_task;
pub use link_rx::link_rx_task;
pub use link_tx::link_tx_task;
pub use tick::tick_task;
pub use vibe::vibe_task;
