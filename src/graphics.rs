//! `embedded-graphics` drawing support. The draw target's size follows the orientation, and
//! every fill goes through a single address window.

use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{Dimensions, OriginDimensions, Size},
    pixelcolor::{IntoStorage, Rgb565},
    primitives::Rectangle,
    Pixel,
};

use crate::display::window::LogicalRect;
use crate::display::Display;
use crate::error::Error;
use crate::interface::DisplayInterface;

/// Inclusive logical rectangle covering `area`, or `None` when it is empty.
fn logical_rect(area: &Rectangle) -> Option<LogicalRect> {
    let bottom_right = area.bottom_right()?;
    Some(LogicalRect::new(
        area.top_left.x,
        bottom_right.x,
        area.top_left.y,
        bottom_right.y,
    ))
}

impl<DI> OriginDimensions for Display<DI>
where
    DI: DisplayInterface,
{
    fn size(&self) -> Size {
        let (width, height) = Display::size(self);
        Size::new(width as u32, height as u32)
    }
}

impl<DI> DrawTarget for Display<DI>
where
    DI: DisplayInterface,
{
    type Color = Rgb565;
    type Error = Error<DI::Error>;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bounds = self.bounding_box();
        for Pixel(point, color) in pixels {
            if !bounds.contains(point) {
                continue;
            }
            let mut region = self.begin_draw(LogicalRect::new(point.x, point.x, point.y, point.y))?;
            region.draw_pixels(Some(color.into_storage()))?;
        }
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        if area.intersection(&self.bounding_box()).is_zero_sized() {
            return Ok(());
        }
        let rect = match logical_rect(area) {
            Some(rect) => rect,
            None => return Ok(()),
        };
        let mut region = self.begin_draw(rect)?;
        region.draw_overscanned(colors.into_iter().map(|c| c.into_storage()))
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let rect = match logical_rect(&area) {
            Some(rect) => rect,
            None => return Ok(()),
        };
        let mut region = self.begin_draw(rect)?;
        region.draw_pixels(core::iter::repeat(color.into_storage()))
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        Display::clear(self, color.into_storage())
    }
}
