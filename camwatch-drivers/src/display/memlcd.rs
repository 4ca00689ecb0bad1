//! Sharp Memory LCD Driver
//!
//! Driver for the 144x168 Sharp memory-in-pixel LCD (LS013B7DH05 and
//! compatible) over SPI. The panel keeps its own image, so only the lines
//! that changed since the last flush are sent.
//!
//! The panel reads bits LSB first while most SPI peripherals shift MSB
//! first. Command and address bytes below are therefore stored bit
//! reversed, and frame data is expected with the leftmost pixel in the
//! most significant bit. A set bit is a white pixel.
//!
//! Chip select is active high on this panel.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::spi::SpiBus;

/// Display dimensions
pub const WIDTH: usize = 144;
pub const HEIGHT: usize = 168;
pub const LINE_BYTES: usize = WIDTH / 8;
pub const FRAME_BYTES: usize = LINE_BYTES * HEIGHT;

/// Chip select setup and hold times (in µs)
const SCS_SETUP_US: u32 = 6;
const SCS_HOLD_US: u32 = 2;

/// Memory LCD mode bits, bit reversed for MSB-first transfer
mod cmd {
    pub const WRITE_LINE: u8 = 0x80;
    pub const VCOM: u8 = 0x40;
    pub const CLEAR: u8 = 0x20;
    pub const TRAILER: u8 = 0x00;
}

/// Memory LCD errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MemLcdError<S, P> {
    /// SPI transfer failed
    Spi(S),
    /// Chip select could not be driven
    Pin(P),
    /// Frame is not `FRAME_BYTES` long
    FrameSize,
}

/// Sharp memory LCD driver
pub struct MemoryLcd<SPI, CS, D> {
    spi: SPI,
    cs: CS,
    delay: D,
    /// Current VCOM level, alternated on every transfer
    vcom: bool,
    /// What the panel currently shows
    shadow: [u8; FRAME_BYTES],
    /// Whether `shadow` matches the panel
    synced: bool,
}

impl<SPI, CS, D> MemoryLcd<SPI, CS, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayNs,
{
    /// Create a new driver; the first flush sends every line
    pub fn new(spi: SPI, cs: CS, delay: D) -> Self {
        Self {
            spi,
            cs,
            delay,
            vcom: false,
            shadow: [0xFF; FRAME_BYTES],
            synced: false,
        }
    }

    /// Deselect the panel and clear it
    pub async fn init(&mut self) -> Result<(), MemLcdError<SPI::Error, CS::Error>> {
        self.cs.set_low().map_err(MemLcdError::Pin)?;
        self.clear().await
    }

    /// Clear the panel to white
    pub async fn clear(&mut self) -> Result<(), MemLcdError<SPI::Error, CS::Error>> {
        let command = [cmd::CLEAR | self.vcom_bit(), cmd::TRAILER];
        self.transaction(&command).await?;
        self.shadow.fill(0xFF);
        self.synced = true;
        Ok(())
    }

    /// Alternate VCOM without changing the image
    ///
    /// The panel needs this at least once per second while idle.
    pub async fn toggle_vcom(&mut self) -> Result<(), MemLcdError<SPI::Error, CS::Error>> {
        let command = [self.vcom_bit(), cmd::TRAILER];
        self.transaction(&command).await
    }

    /// Send the lines of `frame` that differ from the panel
    ///
    /// Returns the number of lines sent.
    pub async fn flush(&mut self, frame: &[u8]) -> Result<usize, MemLcdError<SPI::Error, CS::Error>> {
        if frame.len() != FRAME_BYTES {
            return Err(MemLcdError::FrameSize);
        }

        let changed = self.changed_lines(frame).count();
        if changed == 0 {
            return Ok(0);
        }

        self.select().await?;
        let written = self.write_lines(frame).await;
        let deselected = self.deselect().await;
        written?;
        deselected?;

        self.shadow.copy_from_slice(frame);
        self.synced = true;
        self.vcom = !self.vcom;
        Ok(changed)
    }

    /// Forget what the panel shows; the next flush sends every line
    pub fn invalidate(&mut self) {
        self.synced = false;
    }

    /// Current VCOM level
    pub fn vcom(&self) -> bool {
        self.vcom
    }

    /// Release the bus, pin and delay
    pub fn free(self) -> (SPI, CS, D) {
        (self.spi, self.cs, self.delay)
    }

    fn vcom_bit(&self) -> u8 {
        if self.vcom {
            cmd::VCOM
        } else {
            0
        }
    }

    fn changed_lines<'a>(&'a self, frame: &'a [u8]) -> impl Iterator<Item = usize> + 'a {
        frame
            .chunks_exact(LINE_BYTES)
            .zip(self.shadow.chunks_exact(LINE_BYTES))
            .enumerate()
            .filter(move |(_, (new, old))| !self.synced || new != old)
            .map(|(line, _)| line)
    }

    async fn write_lines(&mut self, frame: &[u8]) -> Result<(), MemLcdError<SPI::Error, CS::Error>> {
        let header = [cmd::WRITE_LINE | self.vcom_bit()];
        self.spi.write(&header).await.map_err(MemLcdError::Spi)?;

        let mut packet = [0u8; LINE_BYTES + 2];
        for line in 0..HEIGHT {
            let data = &frame[line * LINE_BYTES..(line + 1) * LINE_BYTES];
            let old = &self.shadow[line * LINE_BYTES..(line + 1) * LINE_BYTES];
            if self.synced && data == old {
                continue;
            }

            // Line addresses start at 1
            packet[0] = line_address(line);
            packet[1..=LINE_BYTES].copy_from_slice(data);
            packet[LINE_BYTES + 1] = cmd::TRAILER;
            self.spi.write(&packet).await.map_err(MemLcdError::Spi)?;
        }

        self.spi.write(&[cmd::TRAILER]).await.map_err(MemLcdError::Spi)
    }

    async fn transaction(&mut self, bytes: &[u8]) -> Result<(), MemLcdError<SPI::Error, CS::Error>> {
        self.select().await?;
        let written = self.spi.write(bytes).await.map_err(MemLcdError::Spi);
        let deselected = self.deselect().await;
        written?;
        deselected?;
        self.vcom = !self.vcom;
        Ok(())
    }

    async fn select(&mut self) -> Result<(), MemLcdError<SPI::Error, CS::Error>> {
        self.cs.set_high().map_err(MemLcdError::Pin)?;
        self.delay.delay_us(SCS_SETUP_US).await;
        Ok(())
    }

    async fn deselect(&mut self) -> Result<(), MemLcdError<SPI::Error, CS::Error>> {
        let flushed = self.spi.flush().await.map_err(MemLcdError::Spi);
        self.delay.delay_us(SCS_HOLD_US).await;
        self.cs.set_low().map_err(MemLcdError::Pin)?;
        flushed
    }
}

/// Bit-reversed, 1-based line address
fn line_address(line: usize) -> u8 {
    (line as u8 + 1).reverse_bits()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::{Cell, RefCell};
    use core::convert::Infallible;
    use embassy_futures::block_on;
    use std::rc::Rc;

    /// Bytes written while chip select was high, one entry per transaction
    #[derive(Default)]
    struct Bus {
        selected: Cell<bool>,
        transactions: RefCell<Vec<Vec<u8>>>,
        stray_writes: Cell<usize>,
    }

    struct MockSpi(Rc<Bus>);

    impl embedded_hal_async::spi::ErrorType for MockSpi {
        type Error = Infallible;
    }

    impl SpiBus for MockSpi {
        async fn read(&mut self, _words: &mut [u8]) -> Result<(), Infallible> {
            Ok(())
        }

        async fn write(&mut self, words: &[u8]) -> Result<(), Infallible> {
            if self.0.selected.get() {
                if let Some(current) = self.0.transactions.borrow_mut().last_mut() {
                    current.extend_from_slice(words);
                }
            } else {
                self.0.stray_writes.set(self.0.stray_writes.get() + 1);
            }
            Ok(())
        }

        async fn transfer(&mut self, _read: &mut [u8], write: &[u8]) -> Result<(), Infallible> {
            self.write(write).await
        }

        async fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Infallible> {
            Ok(())
        }

        async fn flush(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }

    struct MockCs(Rc<Bus>);

    impl embedded_hal::digital::ErrorType for MockCs {
        type Error = Infallible;
    }

    impl OutputPin for MockCs {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.selected.set(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            if !self.0.selected.get() {
                self.0.transactions.borrow_mut().push(Vec::new());
            }
            self.0.selected.set(true);
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        async fn delay_ns(&mut self, _ns: u32) {}
    }

    fn lcd() -> (MemoryLcd<MockSpi, MockCs, NoDelay>, Rc<Bus>) {
        let bus = Rc::new(Bus::default());
        let lcd = MemoryLcd::new(MockSpi(bus.clone()), MockCs(bus.clone()), NoDelay);
        (lcd, bus)
    }

    fn white() -> Vec<u8> {
        vec![0xFF; FRAME_BYTES]
    }

    /// Line numbers written by a line-update transaction
    fn written_lines(tx: &[u8]) -> Vec<usize> {
        let body = &tx[1..tx.len() - 1];
        body.chunks_exact(LINE_BYTES + 2)
            .map(|packet| packet[0].reverse_bits() as usize - 1)
            .collect()
    }

    #[test]
    fn test_line_address() {
        assert_eq!(line_address(0), 0x80);
        assert_eq!(line_address(1), 0x40);
        assert_eq!(line_address(167), 168u8.reverse_bits());
    }

    #[test]
    fn test_first_flush_sends_every_line() {
        let (mut lcd, bus) = lcd();
        let sent = block_on(lcd.flush(&white())).unwrap();
        assert_eq!(sent, HEIGHT);

        let transactions = bus.transactions.borrow();
        assert_eq!(transactions.len(), 1);
        let tx = &transactions[0];
        assert_eq!(tx.len(), 1 + HEIGHT * (LINE_BYTES + 2) + 1);
        assert_eq!(tx[0], cmd::WRITE_LINE);
        assert_eq!(written_lines(tx), (0..HEIGHT).collect::<Vec<_>>());
        assert_eq!(bus.stray_writes.get(), 0);
        assert!(!bus.selected.get());
    }

    #[test]
    fn test_only_changed_lines_sent() {
        let (mut lcd, bus) = lcd();
        let mut frame = white();
        block_on(lcd.flush(&frame)).unwrap();

        frame[10 * LINE_BYTES] = 0x00;
        frame[100 * LINE_BYTES + 5] = 0x0F;
        let sent = block_on(lcd.flush(&frame)).unwrap();
        assert_eq!(sent, 2);

        let transactions = bus.transactions.borrow();
        let tx = &transactions[1];
        assert_eq!(written_lines(tx), vec![10, 100]);
        // Line payload follows the address
        assert_eq!(tx[2], 0x00);
        assert_eq!(&tx[3..2 + LINE_BYTES], &[0xFF; LINE_BYTES - 1]);
    }

    #[test]
    fn test_unchanged_frame_sends_nothing() {
        let (mut lcd, bus) = lcd();
        let frame = white();
        block_on(lcd.flush(&frame)).unwrap();
        assert_eq!(block_on(lcd.flush(&frame)), Ok(0));
        assert_eq!(bus.transactions.borrow().len(), 1);
    }

    #[test]
    fn test_vcom_alternates() {
        let (mut lcd, bus) = lcd();
        let mut frame = white();
        block_on(lcd.flush(&frame)).unwrap();
        frame[0] = 0;
        block_on(lcd.flush(&frame)).unwrap();
        block_on(lcd.toggle_vcom()).unwrap();

        let transactions = bus.transactions.borrow();
        assert_eq!(transactions[0][0] & cmd::VCOM, 0);
        assert_eq!(transactions[1][0] & cmd::VCOM, cmd::VCOM);
        assert_eq!(transactions[2].as_slice(), &[0, cmd::TRAILER]);
        assert!(lcd.vcom());
    }

    #[test]
    fn test_clear_syncs_to_white() {
        let (mut lcd, bus) = lcd();
        block_on(lcd.init()).unwrap();
        assert_eq!(
            bus.transactions.borrow()[0].as_slice(),
            &[cmd::CLEAR, cmd::TRAILER]
        );

        // Panel is already white
        assert_eq!(block_on(lcd.flush(&white())), Ok(0));
    }

    #[test]
    fn test_invalidate_forces_full_flush() {
        let (mut lcd, _bus) = lcd();
        let frame = white();
        block_on(lcd.flush(&frame)).unwrap();
        lcd.invalidate();
        assert_eq!(block_on(lcd.flush(&frame)), Ok(HEIGHT));
    }

    #[test]
    fn test_wrong_frame_size() {
        let (mut lcd, bus) = lcd();
        assert_eq!(
            block_on(lcd.flush(&[0u8; 10])),
            Err(MemLcdError::FrameSize)
        );
        assert!(bus.transactions.borrow().is_empty());
    }
}
