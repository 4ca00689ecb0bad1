//! Vibration motor task
//!
//! Plays patterns signalled by the app task. A new pattern replaces the
//! one currently playing.

use core::convert::Infallible;

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Output;
use embassy_time::Timer;

use camwatch_drivers::haptic::VibeDriver;

use crate::channels::VIBE_CMD;

/// Vibration task - sequences patterns on the motor pin
#[embassy_executor::task]
pub async fn vibe_task(pin: Output<'static>) {
    info!("Vibe task started");

    let mut vibe = infallible(VibeDriver::new(pin));

    loop {
        let pattern = match vibe.time_to_next_change() {
            None => VIBE_CMD.wait().await,
            Some(wait_ms) => {
                match select(VIBE_CMD.wait(), Timer::after_millis(wait_ms as u64)).await {
                    Either::First(pattern) => pattern,
                    Either::Second(()) => {
                        infallible(vibe.update_with_delta(wait_ms));
                        continue;
                    }
                }
            }
        };

        debug!("Vibrate {:?} ({}ms)", pattern, pattern.duration_ms());
        infallible(vibe.start(pattern));
    }
}

/// GPIO outputs on the RP2040 cannot fail
fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
