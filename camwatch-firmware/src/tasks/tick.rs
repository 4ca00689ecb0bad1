//! Wall-clock task
//!
//! Polls the RTC and turns its readings into clock events: `Started` for
//! the first reading, then `MinuteTick` whenever the minute changes.

use defmt::*;
use embassy_rp::rtc::{DateTime, DayOfWeek, Rtc};
use embassy_rp::peripherals::RTC;
use embassy_time::{Duration, Ticker};

use camwatch_core::clock::ClockState;
use camwatch_core::state::AppEvent;

use crate::channels::EVENT_CHANNEL;

/// RTC polling interval in milliseconds
pub const POLL_INTERVAL_MS: u64 = 1000;

/// Time the RTC starts from when it has never been set
const RTC_EPOCH: DateTime = DateTime {
    year: 2026,
    month: 1,
    day: 1,
    day_of_week: DayOfWeek::Thursday,
    hour: 0,
    minute: 0,
    second: 0,
};

/// Tick task - emits a clock event at startup and on every minute change
#[embassy_executor::task]
pub async fn tick_task(mut rtc: Rtc<'static, RTC>) {
    info!("Tick task started");

    if !rtc.is_running() {
        warn!("RTC not running, starting from 00:00");
        if let Err(e) = rtc.set_datetime(RTC_EPOCH) {
            error!("Failed to set RTC: {:?}", e);
        }
    }

    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));
    let mut last: Option<ClockState> = None;

    loop {
        if let Some(now) = read_clock(&rtc) {
            let event = match last {
                None => Some(AppEvent::Started(now)),
                Some(prev) if prev != now => Some(AppEvent::MinuteTick(now)),
                Some(_) => None,
            };

            if let Some(event) = event {
                let text = now.format();
                debug!("Clock {=str}", text.as_str());
                EVENT_CHANNEL.send(event).await;
                last = Some(now);
            }
        }

        ticker.next().await;
    }
}

/// Read hours and minutes from the RTC
fn read_clock(rtc: &Rtc<'static, RTC>) -> Option<ClockState> {
    let now = match rtc.now() {
        Ok(now) => now,
        Err(e) => {
            warn!("RTC read failed: {:?}", e);
            return None;
        }
    };

    match ClockState::new(now.hour, now.minute) {
        Ok(clock) => Some(clock),
        Err(e) => {
            warn!("RTC returned invalid time: {:?}", e);
            None
        }
    }
}
