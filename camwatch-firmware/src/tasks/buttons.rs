//! Button task
//!
//! One task instance per button. Buttons are active low with pull-ups; a
//! press counts once it is still held after the debounce interval, and
//! the button must be released before it can fire again.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Timer;

use camwatch_core::state::AppEvent;
use camwatch_protocol::ButtonId;

use crate::channels::EVENT_CHANNEL;

/// Debounce interval in milliseconds
const DEBOUNCE_MS: u64 = 20;

/// Button task - reports single clicks of one button
#[embassy_executor::task(pool_size = 4)]
pub async fn button_task(mut pin: Input<'static>, id: ButtonId) {
    info!("Button task started: {:?}", id);

    loop {
        pin.wait_for_falling_edge().await;
        Timer::after_millis(DEBOUNCE_MS).await;

        if pin.is_low() {
            debug!("Button {:?} clicked", id);
            // Clicks are dropped rather than queued behind a busy app task
            if EVENT_CHANNEL.try_send(AppEvent::Button(id)).is_err() {
                warn!("Event channel full, dropping {:?} click", id);
            }

            pin.wait_for_high().await;
            Timer::after_millis(DEBOUNCE_MS).await;
        }
    }
}
