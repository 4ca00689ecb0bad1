//! Face colours

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

/// Colours used by the face renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme<C: PixelColor> {
    pub background: C,
    pub text: C,
    /// Fill of the "recording" circle
    pub record: C,
    /// Fill of the "stop" square
    pub stop: C,
}

impl Theme<BinaryColor> {
    /// Black on white for 1bpp panels
    pub const fn monochrome() -> Self {
        Self {
            background: BinaryColor::On,
            text: BinaryColor::Off,
            record: BinaryColor::Off,
            stop: BinaryColor::Off,
        }
    }
}

impl Default for Theme<BinaryColor> {
    fn default() -> Self {
        Self::monochrome()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monochrome_contrast() {
        let theme = Theme::<BinaryColor>::default();
        assert_ne!(theme.text, theme.background);
        assert_ne!(theme.record, theme.background);
        assert_ne!(theme.stop, theme.background);
    }
}
