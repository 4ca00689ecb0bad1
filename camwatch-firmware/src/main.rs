//! camwatch - Wrist Remote Firmware
//!
//! Main firmware binary for RP2040-based watch boards. Shows the time on a
//! Sharp memory LCD and sends camera start/stop commands to a companion on
//! the paired host over a UART link.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::rtc::Rtc;
use embassy_rp::spi::{Config as SpiConfig, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use camwatch_drivers::display::MemoryLcd;
use camwatch_protocol::ButtonId;

mod channels;
mod config;
mod haptics;
mod link;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

/// Companion link baud rate
const LINK_BAUDRATE: u32 = 115_200;

/// Memory LCD SPI clock (panel maximum is 2 MHz)
const LCD_SPI_HZ: u32 = 2_000_000;

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 512]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 512]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("camwatch firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load_config();

    // Companion link on UART0 (GPIO0 TX, GPIO1 RX)
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = LINK_BAUDRATE;

    let tx_buf = TX_BUF.init([0u8; 512]);
    let rx_buf = RX_BUF.init([0u8; 512]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for companion link");

    // Memory LCD on SPI0 (GPIO18 SCK, GPIO19 MOSI, GPIO17 CS, GPIO20 DISP)
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = LCD_SPI_HZ;
    let spi = Spi::new_txonly(p.SPI0, p.PIN_18, p.PIN_19, p.DMA_CH0, spi_config);
    let cs = Output::new(p.PIN_17, Level::Low);
    let disp = Output::new(p.PIN_20, Level::High);
    let lcd = MemoryLcd::new(spi, cs, Delay);

    info!("LCD SPI initialized");

    // Vibration motor (GPIO15, active high)
    let vibe_pin = Output::new(p.PIN_15, Level::Low);

    // Buttons (active low, GPIO2-5)
    let back = Input::new(p.PIN_2, Pull::Up);
    let up = Input::new(p.PIN_3, Pull::Up);
    let select = Input::new(p.PIN_4, Pull::Up);
    let down = Input::new(p.PIN_5, Pull::Up);

    let rtc = Rtc::new(p.RTC);

    // Spawn tasks
    spawner
        .spawn(tasks::link_rx_task(rx, config.inbox_size as usize))
        .unwrap();
    spawner.spawn(tasks::link_tx_task(tx)).unwrap();
    spawner.spawn(tasks::vibe_task(vibe_pin)).unwrap();
    spawner.spawn(tasks::button_task(back, ButtonId::Back)).unwrap();
    spawner.spawn(tasks::button_task(up, ButtonId::Up)).unwrap();
    spawner
        .spawn(tasks::button_task(select, ButtonId::Select))
        .unwrap();
    spawner.spawn(tasks::button_task(down, ButtonId::Down)).unwrap();
    spawner
        .spawn(tasks::app_task(tasks::AppResources { lcd, disp, config }))
        .unwrap();
    spawner.spawn(tasks::tick_task(rtc)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
