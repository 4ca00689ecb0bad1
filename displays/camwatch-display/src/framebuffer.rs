//! 1bpp frame buffer
//!
//! Rows are `ROW_BYTES` long with the leftmost pixel in the most
//! significant bit. A set bit is `BinaryColor::On`, which the memory LCD
//! shows as white.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

/// Frame dimensions
pub const WIDTH: usize = 144;
pub const HEIGHT: usize = 168;
pub const ROW_BYTES: usize = WIDTH / 8;
pub const FRAME_BYTES: usize = ROW_BYTES * HEIGHT;

/// Off-screen frame
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    bytes: [u8; FRAME_BYTES],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &WIDTH)
            .field("height", &HEIGHT)
            .finish()
    }
}

impl FrameBuffer {
    /// Create a frame with every pixel on
    pub const fn new() -> Self {
        Self {
            bytes: [0xFF; FRAME_BYTES],
        }
    }

    /// Raw frame, row after row
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// One row of the frame
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        self.bytes.get(y * ROW_BYTES..(y + 1) * ROW_BYTES)
    }

    /// Read back a pixel
    pub fn pixel(&self, x: usize, y: usize) -> Option<BinaryColor> {
        if x >= WIDTH || y >= HEIGHT {
            return None;
        }
        let (index, mask) = Self::locate(x, y);
        Some(BinaryColor::from(self.bytes[index] & mask != 0))
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: BinaryColor) {
        let (index, mask) = Self::locate(x, y);
        if color.is_on() {
            self.bytes[index] |= mask;
        } else {
            self.bytes[index] &= !mask;
        }
    }

    fn locate(x: usize, y: usize) -> (usize, u8) {
        (y * ROW_BYTES + x / 8, 0x80 >> (x % 8))
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            // Off-screen pixels are clipped
            if let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) {
                if x < WIDTH && y < HEIGHT {
                    self.set_pixel(x, y, color);
                }
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let fill = if color.is_on() { 0xFF } else { 0x00 };
        self.bytes.fill(fill);
        Ok(())
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}
