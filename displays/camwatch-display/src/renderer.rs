//! Watch face renderer
//!
//! Draws one complete frame from a `FaceView`: background, the time
//! centered in its region, the record circle and the stop square. The
//! output depends only on the view and the theme.

use camwatch_core::config::{Circle as CircleSpec, Rect, RoundedRect};
use camwatch_core::traits::{FaceView, Surface};
use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle, RoundedRectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use crate::theme::Theme;

/// Largest built-in font
pub const TIME_FONT: &MonoFont<'static> = &FONT_10X20;

/// Draw a complete frame
pub fn render<D>(target: &mut D, view: &FaceView<'_>, theme: &Theme<D::Color>) -> Result<(), D::Error>
where
    D: DrawTarget,
{
    target.clear(theme.background)?;
    draw_time(target, view.time_text, &view.layout.time_region, theme.text)?;
    draw_record(target, &view.layout.record, theme.record)?;
    draw_stop(target, &view.layout.stop, theme.stop)
}

fn draw_time<D: DrawTarget>(target: &mut D, text: &str, region: &Rect, color: D::Color) -> Result<(), D::Error> {
    let center = Point::new(
        region.x as i32 + region.width as i32 / 2,
        region.y as i32 + region.height as i32 / 2,
    );
    let character_style = MonoTextStyle::new(TIME_FONT, color);
    let text_style = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build();

    Text::with_text_style(text, center, character_style, text_style).draw(target)?;
    Ok(())
}

fn draw_record<D: DrawTarget>(target: &mut D, spec: &CircleSpec, color: D::Color) -> Result<(), D::Error> {
    Circle::with_center(Point::new(spec.x as i32, spec.y as i32), spec.radius as u32 * 2)
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(target)
}

fn draw_stop<D: DrawTarget>(target: &mut D, spec: &RoundedRect, color: D::Color) -> Result<(), D::Error> {
    let rect = Rectangle::new(
        Point::new(spec.x as i32, spec.y as i32),
        Size::new(spec.width as u32, spec.height as u32),
    );
    let corner = Size::new(spec.corner_radius as u32, spec.corner_radius as u32);

    RoundedRectangle::with_equal_corners(rect, corner)
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(target)
}

/// Paint target for the dispatcher
pub struct FaceSurface<D: DrawTarget> {
    target: D,
    theme: Theme<D::Color>,
}

impl<D: DrawTarget> FaceSurface<D> {
    pub fn new(target: D, theme: Theme<D::Color>) -> Self {
        Self { target, theme }
    }

    pub fn target(&self) -> &D {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    pub fn theme(&self) -> &Theme<D::Color> {
        &self.theme
    }

    pub fn into_inner(self) -> D {
        self.target
    }
}

impl<D: DrawTarget> Surface for FaceSurface<D> {
    type Error = D::Error;

    fn paint(&mut self, view: &FaceView<'_>) -> Result<(), Self::Error> {
        render(&mut self.target, view, &self.theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::FrameBuffer;
    use camwatch_core::config::Layout;
    use embedded_graphics::pixelcolor::BinaryColor;

    fn frame(text: &str) -> FrameBuffer {
        let layout = Layout::default();
        let view = FaceView {
            time_text: text,
            layout: &layout,
        };
        let mut fb = FrameBuffer::new();
        render(&mut fb, &view, &Theme::monochrome()).unwrap();
        fb
    }

    fn dark_pixels_in(fb: &FrameBuffer, region: Rect) -> usize {
        let mut count = 0;
        for y in region.y as usize..(region.y as usize + region.height as usize) {
            for x in region.x as usize..(region.x as usize + region.width as usize) {
                if fb.pixel(x, y) == Some(BinaryColor::Off) {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn test_indicators_filled() {
        let fb = frame("14:07");
        // Record circle center
        assert_eq!(fb.pixel(118, 27), Some(BinaryColor::Off));
        // Stop square center
        assert_eq!(fb.pixel(118, 137), Some(BinaryColor::Off));
        // Rounded corner stays background
        assert_eq!(fb.pixel(99, 118), Some(BinaryColor::On));
        // Top-left corner is background
        assert_eq!(fb.pixel(0, 0), Some(BinaryColor::On));
    }

    #[test]
    fn test_time_inside_region() {
        let fb = frame("14:07");
        let layout = Layout::default();
        assert!(dark_pixels_in(&fb, layout.time_region) > 0);

        // Nothing dark between the top edge and the time region, left of the circle
        let above = Rect {
            x: 0,
            y: 0,
            width: 90,
            height: 55,
        };
        assert_eq!(dark_pixels_in(&fb, above), 0);
    }

    #[test]
    fn test_time_centered() {
        let fb = frame("88:88");
        // Rows of the time region above the stop square
        let dark_columns: Vec<usize> = (0..144)
            .filter(|&x| (55..118).any(|y| fb.pixel(x, y) == Some(BinaryColor::Off)))
            .collect();

        let left_margin = dark_columns[0] as i32;
        let right_margin = 143 - dark_columns[dark_columns.len() - 1] as i32;
        assert!((left_margin - right_margin).abs() <= 4);
    }

    #[test]
    fn test_repaint_is_identical() {
        assert_eq!(frame("09:41").as_bytes(), frame("09:41").as_bytes());
    }

    #[test]
    fn test_time_change_changes_frame() {
        assert_ne!(frame("14:07").as_bytes(), frame("14:08").as_bytes());
    }

    #[test]
    fn test_surface_paints_over_previous_frame() {
        let layout = Layout::default();
        let mut surface = FaceSurface::new(FrameBuffer::new(), Theme::monochrome());

        let first = FaceView {
            time_text: "14:07",
            layout: &layout,
        };
        surface.paint(&first).unwrap();
        surface
            .paint(&FaceView {
                time_text: "14:08",
                layout: &layout,
            })
            .unwrap();
        surface.paint(&first).unwrap();

        assert_eq!(surface.target().as_bytes(), frame("14:07").as_bytes());
    }
}
