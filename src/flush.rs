//! Bridge between a renderer's dirty-region flushes and the display.
//!
//! The renderer hands over one rectangle and its pixel buffer at a time and may only reuse the
//! buffer, or flush an overlapping region, once it has been told the flush is complete. A flush
//! that failed is therefore never acknowledged: the region stays dirty and the renderer redraws
//! it on its own schedule.

use log::{debug, error};

use crate::display::window::LogicalRect;
use crate::display::Display;
use crate::interface::DisplayInterface;

/// The renderer's flush-complete notification.
pub trait FlushReady {
    fn flush_ready(&mut self);
}

impl<F> FlushReady for F
where
    F: FnMut(),
{
    fn flush_ready(&mut self) {
        self()
    }
}

impl<DI> Display<DI>
where
    DI: DisplayInterface,
{
    /// Draw one dirty region. `pixels` holds the RGB565 pixels of `rect` row by row, two bytes
    /// each in wire order. `ready` is signalled once the pixels have been streamed and the burst
    /// terminated, and only then.
    ///
    /// Parts of `rect` off the panel are cropped from the stream.
    pub fn on_flush<R>(&mut self, rect: LogicalRect, pixels: &[u8], ready: &mut R)
    where
        R: FlushReady + ?Sized,
    {
        debug!(
            "Flush: x={}-{}, y={}-{}",
            rect.x_start, rect.x_end, rect.y_start, rect.y_end
        );

        let mut region = match self.begin_draw(rect) {
            Ok(region) => region,
            Err(e) => {
                error!("Flush set draw area failed: {}", e);
                return;
            }
        };
        let streamed = if region.is_cropped() {
            region.draw_overscanned_raw(pixels)
        } else {
            region.draw_raw(pixels)
        };
        region.finish();

        match streamed {
            Ok(()) => ready.flush_ready(),
            Err(e) => error!("Flush draw failed: {}", e),
        }
    }
}
