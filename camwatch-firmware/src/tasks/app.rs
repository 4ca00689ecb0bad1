//! Application task
//!
//! Owns the dispatcher and the LCD. Handles one event at a time, logs what
//! the dispatcher did, and pushes painted frames to the panel. A one second
//! ticker keeps the panel's VCOM alternating and catches up on deferred
//! repaints.

use core::fmt::Debug;

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Async, Spi};
use embassy_time::{Delay, Duration, Ticker};

use camwatch_core::app::{AppContext, DispatchReport, Dispatcher};
use camwatch_core::channel::ChannelError;
use camwatch_core::config::WatchConfig;
use camwatch_core::state::AppEvent;
use camwatch_display::{FaceSurface, FrameBuffer, Theme};
use camwatch_drivers::display::MemoryLcd;
use camwatch_protocol::CommandResult;

use crate::channels::EVENT_CHANNEL;
use crate::haptics::SignalHaptics;
use crate::link::LinkTransport;

/// VCOM toggle interval in milliseconds
const VCOM_INTERVAL_MS: u64 = 1000;

/// Memory LCD on SPI0
pub type Lcd = MemoryLcd<Spi<'static, SPI0, Async>, Output<'static>, Delay>;

type FaceDispatcher = Dispatcher<LinkTransport, SignalHaptics, FaceSurface<FrameBuffer>>;

/// Hardware and configuration handed to the app task
pub struct AppResources {
    pub lcd: Lcd,
    /// Panel enable, held high for as long as the task runs
    pub disp: Output<'static>,
    pub config: WatchConfig,
}

/// App task - runs the watch face
#[embassy_executor::task]
pub async fn app_task(resources: AppResources) {
    info!("App task started");

    let AppResources {
        mut lcd,
        disp: _disp,
        config,
    } = resources;

    if let Err(e) = lcd.init().await {
        error!("LCD init failed: {:?}", Debug2Format(&e));
    }

    let mut dispatcher: FaceDispatcher = Dispatcher::new(
        AppContext::new(config.layout),
        LinkTransport::new(config.outbox_size as usize),
        SignalHaptics,
        FaceSurface::new(FrameBuffer::new(), Theme::monochrome()),
    );

    let mut vcom_ticker = Ticker::every(Duration::from_millis(VCOM_INTERVAL_MS));

    loop {
        match select(EVENT_CHANNEL.receive(), vcom_ticker.next()).await {
            Either::First(event) => {
                let report = dispatcher.dispatch(&event);
                log_report(&event, &report);

                if report.repaint_requested
                    && EVENT_CHANNEL.try_send(AppEvent::RepaintRequested).is_err()
                {
                    debug!("Event channel full, repaint deferred");
                }
                if report.painted {
                    flush(&mut lcd, &dispatcher).await;
                }
            }
            Either::Second(()) => {
                if dispatcher.repaint_if_dirty().painted {
                    flush(&mut lcd, &dispatcher).await;
                } else if let Err(e) = lcd.toggle_vcom().await {
                    warn!("VCOM toggle failed: {:?}", Debug2Format(&e));
                }
            }
        }
    }
}

/// Send the painted frame to the panel
async fn flush(lcd: &mut Lcd, dispatcher: &FaceDispatcher) {
    let frame = dispatcher.surface().target();
    match lcd.flush(frame.as_bytes()).await {
        Ok(lines) => trace!("LCD: {} lines updated", lines),
        Err(e) => {
            warn!("LCD flush failed: {:?}", Debug2Format(&e));
            lcd.invalidate();
        }
    }
}

/// Log what the dispatcher did for one event
fn log_report<E: Debug>(event: &AppEvent, report: &DispatchReport<E>) {
    if report.is_empty() {
        if event.is_user_event() || event.is_inbox_event() {
            debug!("Event ignored");
        }
        return;
    }

    match report.sent {
        Some(Ok(())) => info!("Camera command sent"),
        Some(Err(ChannelError::OutboxUnavailable(e))) => {
            error!("Outbox unavailable, command dropped: {:?}", e)
        }
        Some(Err(ChannelError::Encode(e))) => error!("Command encoding failed: {:?}", e),
        Some(Err(ChannelError::SendRejected(e))) => {
            warn!("Command rejected by transport: {:?}", e)
        }
        None => {}
    }

    match report.result {
        Some(CommandResult::Success) => info!("Camera command succeeded"),
        Some(CommandResult::Failure) => warn!("Camera command failed"),
        None => {}
    }

    if let Some(e) = &report.paint_error {
        warn!("Paint failed, frame stays dirty: {:?}", Debug2Format(e));
    }
}
